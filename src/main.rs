use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::config::KeyResolver;
use crate::remote::SandboxBackend;

mod app;
mod cli;
mod commands;
mod config;
mod entity;
mod form;
mod remote;
mod screen;
mod theme;
mod tui;
mod ui;

pub use theme::Theme;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting recordesk");

    let args = cli::Args::parse();

    let mut config = config::load()?;
    if let Some(latency_ms) = args.latency_ms {
        config.backend.latency_ms = latency_ms;
    }
    if let Some(data_file) = args.data_file {
        config.backend.data_file = Some(data_file);
    }
    info!(backend = ?config.backend, form = ?args.form, "Configuration resolved");

    let resolver = Arc::new(KeyResolver::new(Arc::new(config.keybindings.clone())));
    let theme = theme::theme_from_name(&config.theme.name);
    let backend = Arc::new(SandboxBackend::open(&config.backend)?);

    let mut app = App::new(&backend, resolver, theme, args.form.tab_index());
    app.run().await?;

    Ok(())
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = config::loader::data_dir()
        .map_or_else(|| std::path::PathBuf::from("logs"), |path| path.join("logs"));
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "recordesk.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
