//! CLI argument definitions for hldslog-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.
//! Every override flag takes precedence over the config file and
//! environment variables.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use hldslog_core::config::HldsLogConfig;

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "hldslog.toml";

/// HLDS (Counter-Strike 1.6) log relay.
///
/// Listens for the UDP log stream sent by `logaddress_add`, classifies
/// each line and prints the recognized game events.
#[derive(Parser, Debug)]
#[command(name = "hldslog-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to hldslog.toml configuration file.
    ///
    /// When omitted, `hldslog.toml` in the working directory is used if it
    /// exists, and built-in defaults otherwise.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the UDP bind host.
    #[arg(long)]
    pub host: Option<String>,

    /// Override the UDP listen port.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the locale used to translate triggered events (en, fr).
    #[arg(long)]
    pub locale: Option<String>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    #[arg(long)]
    pub log_format: Option<String>,

    /// Event output format on stdout.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Disable ANSI colors in text output.
    #[arg(long)]
    pub no_color: bool,

    /// Process a captured log file instead of listening on UDP.
    #[arg(long, value_name = "FILE")]
    pub replay: Option<PathBuf>,

    /// Validate configuration and exit without starting the relay.
    #[arg(long)]
    pub validate: bool,
}

/// Event output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One human-readable line per event.
    Text,
    /// One compact JSON object per event.
    Json,
}

impl DaemonCli {
    /// Config path to load, falling back to [`DEFAULT_CONFIG_PATH`].
    pub fn config_path(&self) -> &Path {
        self.config
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Whether `--config` was given on the command line.
    pub fn config_is_explicit(&self) -> bool {
        self.config.is_some()
    }

    /// Apply command-line overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut HldsLogConfig) {
        if let Some(host) = &self.host {
            config.parser.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.parser.port = port;
        }
        if let Some(locale) = &self.locale {
            config.parser.locale.clone_from(locale);
        }
        if let Some(level) = &self.log_level {
            config.general.log_level.clone_from(level);
        }
        if let Some(format) = &self.log_format {
            config.general.log_format.clone_from(format);
        }
    }
}
