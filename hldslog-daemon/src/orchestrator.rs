//! Relay orchestration -- configuration, handler assembly and lifecycle.
//!
//! The [`Orchestrator`] is the central coordinator of `hldslog-daemon`.
//! It takes a validated configuration, installs the metrics recorder,
//! builds the line handler with the selected displayer and runs either
//! a file replay or the UDP collector until a shutdown signal arrives.
//!
//! # Configuration Loading
//!
//! 1. `--config PATH` (or `hldslog.toml` when omitted)
//! 2. `HLDSLOG_*` environment variable overrides
//! 3. Command-line overrides (`--host`, `--port`, ...)
//! 4. Validation
//!
//! A missing file at the default path falls back to built-in defaults;
//! a missing file named with `--config` is an error.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use hldslog_core::config::HldsLogConfig;
use hldslog_core::display::Displayer;
use hldslog_core::error::{ConfigError, HldsLogError};
use hldslog_parser::{LogHandler, UdpLogCollector, replay_file};

use crate::cli::{DaemonCli, OutputFormat};
use crate::displayer::{ConsoleDisplayer, JsonDisplayer};
use crate::metrics_server;

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Loaded from this file.
    File(PathBuf),
    /// The default path did not exist; built-in defaults were used.
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Defaults => f.write_str("built-in defaults"),
        }
    }
}

/// Load, override and validate the configuration for a CLI invocation.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read or parsed
/// - Validation fails after all overrides are applied
pub async fn load_config(cli: &DaemonCli) -> Result<(HldsLogConfig, ConfigSource)> {
    let path = cli.config_path();
    let (mut config, source) = match read_config_file(path).await {
        Ok(config) => (config, ConfigSource::File(path.to_path_buf())),
        Err(HldsLogError::Config(ConfigError::FileNotFound { .. })) if !cli.config_is_explicit() => {
            let mut config = HldsLogConfig::default();
            config.apply_env_overrides();
            (config, ConfigSource::Defaults)
        }
        Err(e) => return Err(anyhow::anyhow!("failed to load config: {}", e)),
    };

    cli.apply_overrides(&mut config);
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

    Ok((config, source))
}

/// Parse the file and apply env overrides; validation happens after CLI overrides.
async fn read_config_file(path: &Path) -> Result<HldsLogConfig, HldsLogError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            HldsLogError::Config(ConfigError::FileNotFound {
                path: path.display().to_string(),
            })
        } else {
            HldsLogError::Io(e)
        }
    })?;
    let mut config = HldsLogConfig::parse(&content)?;
    config.apply_env_overrides();
    Ok(config)
}

/// Output and input options that are not part of the config file.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Event output format.
    pub output: OutputFormat,
    /// ANSI colors in text output.
    pub color: bool,
    /// Replay this file instead of listening on UDP.
    pub replay: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output: OutputFormat::Text,
            color: true,
            replay: None,
        }
    }
}

impl From<&DaemonCli> for RunOptions {
    fn from(cli: &DaemonCli) -> Self {
        Self {
            output: cli.output,
            color: !cli.no_color,
            replay: cli.replay.clone(),
        }
    }
}

/// The main daemon orchestrator.
pub struct Orchestrator {
    /// Loaded and validated configuration.
    config: HldsLogConfig,
    /// Output and input options.
    options: RunOptions,
    /// Cancels the UDP collector.
    cancel_token: CancellationToken,
}

impl Orchestrator {
    /// Load configuration for a CLI invocation and build the orchestrator.
    pub async fn build(cli: &DaemonCli) -> Result<Self> {
        let (config, _) = load_config(cli).await?;
        Self::build_from_config(config, RunOptions::from(cli))
    }

    /// Build from an already-loaded configuration.
    ///
    /// Installs the Prometheus recorder when `[metrics].enabled` is set.
    pub fn build_from_config(config: HldsLogConfig, options: RunOptions) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

        if config.metrics.enabled {
            metrics_server::install_metrics_recorder(&config.metrics)?;
            tracing::info!(port = config.metrics.port, "metrics endpoint enabled");
        }

        Ok(Self {
            config,
            options,
            cancel_token: CancellationToken::new(),
        })
    }

    /// Run the relay with the configured displayer.
    ///
    /// With `replay` set, processes the file and returns. Otherwise listens
    /// on UDP until `SIGTERM`/`SIGINT` or until [`Orchestrator::shutdown_token`]
    /// is cancelled.
    pub async fn run(&self) -> Result<()> {
        match self.options.output {
            OutputFormat::Text => self.serve(ConsoleDisplayer::new(self.options.color)).await,
            OutputFormat::Json => self.serve(JsonDisplayer::new()).await,
        }
    }

    async fn serve<D>(&self, displayer: D) -> Result<()>
    where
        D: Displayer + 'static,
    {
        let handler = LogHandler::builder()
            .config(self.config.parser.clone())
            .displayer(displayer)
            .load_translations()
            .await?
            .build()?;

        tracing::info!(
            source = handler.source_label(),
            locale = %self.config.parser.locale,
            "log handler ready"
        );

        if let Some(path) = &self.options.replay {
            // Replayed lines share the datagram size cap
            let stats =
                replay_file(path, &handler, self.config.collector.max_datagram_size).await?;
            tracing::info!(
                lines = stats.lines,
                events = stats.events,
                skipped = stats.skipped,
                "replay finished"
            );
            return Ok(());
        }

        let handler = Arc::new(handler);
        let mut collector = UdpLogCollector::new(
            Arc::clone(&handler),
            self.config.collector.clone(),
            self.cancel_token.clone(),
        );
        let mut collector_task = tokio::spawn(async move { collector.run().await });

        tokio::select! {
            result = &mut collector_task => {
                // Collector ended before any signal, e.g. bind failure
                return match result {
                    Ok(Ok(_)) => Ok(()),
                    Ok(Err(e)) => Err(e.into()),
                    Err(e) => Err(anyhow::anyhow!("collector task failed: {}", e)),
                };
            }
            signal = wait_for_shutdown_signal(self.cancel_token.clone()) => {
                let signal = signal?;
                tracing::info!(signal, "shutdown signal received");
            }
        }

        self.cancel_token.cancel();
        let stats = collector_task
            .await
            .map_err(|e| anyhow::anyhow!("collector task failed: {}", e))??;
        tracing::info!(
            datagrams = stats.datagrams,
            lines = stats.lines,
            events = stats.events,
            "relay stopped"
        );
        Ok(())
    }

    /// Token that stops the UDP collector when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Get a reference to the loaded configuration.
    pub fn config(&self) -> &HldsLogConfig {
        &self.config
    }

    /// Get the run options.
    pub fn options(&self) -> &RunOptions {
        &self.options
    }
}

/// Wait for a shutdown signal (SIGTERM or SIGINT) or an external cancel.
///
/// Returns the name of what triggered the shutdown.
///
/// # Errors
///
/// Returns an error if signal handlers cannot be installed.
#[cfg(unix)]
async fn wait_for_shutdown_signal(cancel: CancellationToken) -> Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("failed to install SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("failed to install SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
        _ = cancel.cancelled() => "cancelled",
    })
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal(cancel: CancellationToken) -> Result<&'static str> {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.map_err(|e| anyhow::anyhow!("failed to install Ctrl-C handler: {}", e))?;
            Ok("ctrl-c")
        }
        _ = cancel.cancelled() => Ok("cancelled"),
    }
}
