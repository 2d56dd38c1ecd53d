#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod config;
mod export;
mod planner;
mod ui;

use eframe::egui;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` when set, `warn` otherwise
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .init();
}

fn main() -> eframe::Result<()> {
    init_tracing();

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1400.0, 900.0])
        .with_min_inner_size([1000.0, 600.0])
        .with_title("Qualification planner");

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Qualification planner",
        options,
        Box::new(|cc| Ok(Box::new(ui::PlannerApp::new(cc)))),
    )
}
