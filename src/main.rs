//! filterpipe - Main Entry Point
//!
//! Loads the runtime configuration, registers the built-in and on-disk
//! plugins and prints every available filter as
//! `<plugin uuid> <filter uuid> <name>`.
//!
//! Usage: `filterpipe [CONFIG]`. Without an argument the config file from
//! the app data directory is used, falling back to defaults.

use anyhow::Context;
use filterpipe_rs::{config, Runtime, RuntimeConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging(config: &RuntimeConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "filterpipe.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    Ok(guard)
}

fn main() -> anyhow::Result<()> {
    let config = match std::env::args_os().nth(1) {
        Some(path) => RuntimeConfig::load(&path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => config::config_path()
            .map(RuntimeConfig::load_or_default)
            .unwrap_or_default(),
    };

    // Dropping the guard flushes the file writer
    let _guard = init_logging(&config)?;
    tracing::info!("Starting filterpipe");

    let mut runtime = Runtime::new(config).context("Failed to create runtime")?;
    runtime.load_plugins();

    for info in runtime.filters().filter_infos() {
        println!(
            "{} {} {}",
            info.handle.plugin_id, info.handle.filter_id, info.name
        );
    }

    tracing::info!("Shutting down...");
    Ok(())
}
