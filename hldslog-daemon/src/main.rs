use anyhow::Result;
use clap::Parser;

use hldslog_daemon::cli::DaemonCli;
use hldslog_daemon::logging::init_tracing;
use hldslog_daemon::orchestrator::{ConfigSource, Orchestrator, RunOptions, load_config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = DaemonCli::parse();

    // 설정 로드 (파일 → 환경변수 → CLI 인자 → 검증)
    let (config, source) = load_config(&cli).await?;

    if cli.validate {
        println!("configuration is valid (source: {source})");
        return Ok(());
    }

    // 로깅 초기화 (stderr)
    init_tracing(&config.general)?;

    match &source {
        ConfigSource::File(path) => {
            tracing::info!(path = %path.display(), "configuration loaded");
        }
        ConfigSource::Defaults => {
            tracing::warn!(
                path = %cli.config_path().display(),
                "config file not found, using built-in defaults"
            );
        }
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        source = %config.parser.source_label(),
        "hldslog-daemon starting"
    );

    let orchestrator = Orchestrator::build_from_config(config, RunOptions::from(&cli))?;
    orchestrator.run().await?;

    tracing::info!("hldslog-daemon shut down");
    Ok(())
}
