//! Gracht Runtime
//!
//! Opens a window, emulates the host page around it and runs the canal
//! scene. An optional JSON settings file may be passed as the first argument.

mod app;
mod config;
mod host;

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Gracht v{}", gracht_core::VERSION);

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = config::Config::load(path.as_deref())?;
    if let Some(path) = &path {
        tracing::info!(path = %path.display(), "settings loaded");
    }

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = app::App::new(config);
    event_loop.run_app(&mut app).context("event loop failed")?;

    match app.take_error() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
