//! Endpoint Monitor Binary

use clap::Parser;
use clap::error::ErrorKind;
use endpoint_monitor::{
    Config, HttpProber, LogFormat, LogSink, Monitor, MonitorError, Result, TracingSink,
    load_endpoints,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Probe HTTP endpoints every 15 seconds and log per-domain availability
#[derive(Debug, Parser)]
#[command(name = "endpoint-monitor", version, about)]
struct Cli {
    /// YAML file listing the endpoints to check
    config_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Initialize tracing
    initialize_tracing(config.log_format);

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            error!("{}", MonitorError::Usage(e.render().to_string()));
            std::process::exit(1);
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("{}", MonitorError::Config(e));
        std::process::exit(1);
    }

    let endpoints = match load_endpoints(&cli.config_file) {
        Ok(endpoints) => endpoints,
        Err(e) => {
            error!(
                "Failed to load endpoints from {}: {}",
                cli.config_file.display(),
                e
            );
            std::process::exit(1);
        }
    };

    info!(
        "Monitor configuration - Endpoints: {}, Timeout: {}s, Concurrent checks: {}",
        endpoints.len(),
        config.http_timeout.as_secs(),
        config.max_concurrent_checks
    );

    let sink: Arc<dyn LogSink> = Arc::new(TracingSink);
    let prober = HttpProber::new(config.http_timeout, Arc::clone(&sink))?;
    let monitor = Monitor::new(endpoints, Arc::new(prober), sink, &config);

    monitor.run(shutdown_signal()).await;

    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed the monitor keeps
/// running until killed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Initialize structured logging
fn initialize_tracing(format: LogFormat) {
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter_layer);

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_file(false)
                    .with_line_number(false)
                    .json(),
            )
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init(),
    }
}
