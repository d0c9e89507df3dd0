//! MicroSnap - Main Entry Point
//!
//! A small slide deck builder with a live preview and standalone HTML export.
//! Built with Rust and egui.

mod app;
mod cli;
mod config;
mod deck;
mod error;
mod export;
mod files;
mod preview;
mod projection;
mod server;
mod session;
mod state;
mod ui;

use app::MicroSnapApp;
use clap::Parser;
use cli::Cli;
use config::{load_config, Settings};
use log::{error, info};
use std::process::ExitCode;

/// Application name constant.
const APP_NAME: &str = "MicroSnap";

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = load_config();

    match cli.command {
        Some(command) => match cli::run(command, &settings) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("{}", e);
                ExitCode::FAILURE
            }
        },
        None => match run_gui(settings) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("Window closed with an error: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn run_gui(settings: Settings) -> eframe::Result<()> {
    info!("Starting {}", APP_NAME);

    let window_size = settings.window_size;
    info!(
        "Window configuration: {}x{}, maximized: {}",
        window_size.width, window_size.height, window_size.maximized
    );

    let viewport = eframe::egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size([window_size.width, window_size.height])
        .with_min_inner_size([720.0, 480.0]);

    // Apply position if saved
    let viewport = if let (Some(x), Some(y)) = (window_size.x, window_size.y) {
        viewport.with_position([x, y])
    } else {
        viewport
    };

    // Apply maximized state
    let viewport = if window_size.maximized {
        viewport.with_maximized(true)
    } else {
        viewport
    };

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| Ok(Box::new(MicroSnapApp::new(cc, settings)))),
    )
}
