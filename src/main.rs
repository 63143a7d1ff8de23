//! WatchNotes
//!
//! A local-first desktop companion for taking timestamped notes on streaming
//! watch pages.

mod app;
mod components;
mod constants;
mod core;
mod state;
mod utils;
mod watch;

use dioxus::desktop::{Config, LogicalSize, WindowBuilder};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("watchnotes=info")),
        )
        .init();

    // Configure the window
    let config = Config::new()
        .with_window(
            WindowBuilder::new()
                .with_title("WatchNotes")
                .with_inner_size(LogicalSize::new(1200.0, 800.0))
                .with_resizable(true),
        )
        .with_menu(None); // Disable default menu bar

    // Launch the Dioxus desktop application
    dioxus::LaunchBuilder::desktop()
        .with_cfg(config)
        .launch(app::App);
}
