mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use driftwatch::config::Config;
use driftwatch::monitor::EndpointMonitor;
use driftwatch::observability::Metrics;
use driftwatch::registry::SchemaRegistry;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path.clone())?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Watch => watch(config).await?,
        Commands::Check => check(config).await?,
        Commands::Describe(args) => {
            let registry = open_registry(&config);
            println!("{}", registry.generate_description(&args.endpoint));
        }
        Commands::Summary => {
            let registry = open_registry(&config);
            println!(
                "{}",
                serde_json::to_string_pretty(&registry.get_schema_summary())?
            );
        }
    }

    Ok(())
}

fn open_registry(config: &Config) -> SchemaRegistry {
    SchemaRegistry::open(&config.schema.cache_dir, config.schema.registry_options())
}

fn build_monitor(config: &Config) -> Result<Arc<EndpointMonitor>, AnyError> {
    let registry = Arc::new(open_registry(config));
    let metrics = Arc::new(Metrics::new());
    let monitor = EndpointMonitor::new(
        registry,
        &config.upstream,
        config.monitor.clone(),
        metrics,
    )?;
    Ok(Arc::new(monitor))
}

async fn watch(config: Config) -> Result<(), AnyError> {
    if !config.monitor.enabled {
        warn!("monitoring is disabled in configuration");
        return Ok(());
    }

    let monitor = build_monitor(&config)?;
    Arc::clone(&monitor).start();

    shutdown_signal().await;
    monitor.stop().await;

    let snapshot = monitor.metrics_snapshot();
    info!(
        sweeps = snapshot.sweeps_completed,
        checks = snapshot.endpoints_checked,
        schema_changes = snapshot.schema_changes,
        failures = snapshot.check_failures,
        "monitor shut down"
    );
    Ok(())
}

async fn check(config: Config) -> Result<(), AnyError> {
    let monitor = build_monitor(&config)?;
    monitor.run_full_check().await;
    let report = monitor.monitoring_report();
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
