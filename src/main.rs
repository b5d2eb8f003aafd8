#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod config;
mod export;
mod schedule;
mod store;
mod ui;

use eframe::egui;

fn main() -> eframe::Result<()> {
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1200.0, 800.0])
        .with_min_inner_size([900.0, 600.0])
        .with_title("ShiftGrid");

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "ShiftGrid",
        options,
        Box::new(|cc| Ok(Box::new(ui::ShiftGridApp::new(cc)))),
    )
}
