//! Prometheus exposition of the relay counters.
//!
//! The parser records line and event counters through the `metrics` facade.
//! This module resolves the `[metrics]` listener, installs the exporter and
//! seeds every counter series at zero, so a scrape lists all event kinds
//! before the first log line arrives.

use std::net::SocketAddr;

use anyhow::Result;
use hldslog_core::config::MetricsConfig;
use hldslog_core::event::EventKind;
use hldslog_core::metrics as m;
use metrics_exporter_prometheus::PrometheusBuilder;

/// The only scrape path served by the exporter's built-in listener.
pub const METRICS_ENDPOINT: &str = "/metrics";

/// Resolve the scrape listener address from `[metrics]`.
///
/// Warns when the address is a wildcard.
///
/// # Errors
///
/// - Endpoint other than [`METRICS_ENDPOINT`]
/// - `listen_addr:port` does not parse as a socket address
pub fn listen_addr(config: &MetricsConfig) -> Result<SocketAddr> {
    if config.endpoint != METRICS_ENDPOINT {
        anyhow::bail!(
            "unsupported metrics endpoint '{}': only '{}' is served",
            config.endpoint,
            METRICS_ENDPOINT
        );
    }

    let addr: SocketAddr = format!("{}:{}", config.listen_addr, config.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid metrics listen address: {}", e))?;

    if addr.ip().is_unspecified() {
        tracing::warn!(
            listen_addr = %addr,
            "relay counters are exposed on all interfaces"
        );
    }
    Ok(addr)
}

/// Describe every relay counter and register each series at zero.
///
/// Per-kind counters get one series per [`EventKind`], including kinds whose
/// display switch is off. Series that already hold a value keep it.
pub fn register_relay_metrics() {
    m::describe_all();

    for name in [
        m::DATAGRAMS_RECEIVED_TOTAL,
        m::LINES_RECEIVED_TOTAL,
        m::LINES_UNRECOGNIZED_TOTAL,
    ] {
        metrics::counter!(name).absolute(0);
    }

    for kind in EventKind::ALL {
        metrics::counter!(m::EVENTS_DISPATCHED_TOTAL, m::LABEL_KIND => kind.as_str()).absolute(0);
        metrics::counter!(m::EVENTS_SUPPRESSED_TOTAL, m::LABEL_KIND => kind.as_str()).absolute(0);
    }
}

/// Install the global Prometheus recorder with its HTTP listener, then
/// register the relay counters.
///
/// Call once per process.
///
/// # Errors
///
/// - Any error from [`listen_addr`]
/// - Socket binding fails or a global recorder is already installed
pub fn install_metrics_recorder(config: &MetricsConfig) -> Result<()> {
    let addr = listen_addr(config)?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("failed to install metrics recorder: {}", e))?;

    register_relay_metrics();

    tracing::info!(
        listen_addr = %addr,
        endpoint = METRICS_ENDPOINT,
        "relay metrics endpoint active"
    );
    Ok(())
}
