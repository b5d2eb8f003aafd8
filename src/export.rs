use chrono::{Datelike, Local};
use std::fs;
use std::path::PathBuf;

/// Save a captured frame as a PNG under an exports/ directory next to the
/// executable. Returns the path of the created file on success. The
/// filename carries the ISO week, so re-exporting the same week replaces
/// the previous snapshot instead of piling up files.
pub fn save_grid_image(frame: &egui::ColorImage) -> Result<PathBuf, String> {
    // Get exe directory
    let exe_path =
        std::env::current_exe().map_err(|e| format!("Failed to get exe path: {}", e))?;
    let exe_dir = exe_path.parent().ok_or("Failed to get exe directory")?;

    let exports_dir = exe_dir.join("exports");
    fs::create_dir_all(&exports_dir)
        .map_err(|e| format!("Failed to create exports directory: {}", e))?;

    let iso_week = Local::now().date_naive().iso_week();
    let filename = format!("schedule-{}-W{:02}.png", iso_week.year(), iso_week.week());
    let file_path = exports_dir.join(&filename);

    let [width, height] = frame.size;
    let mut rgba = Vec::with_capacity(width * height * 4);
    for pixel in &frame.pixels {
        rgba.extend_from_slice(&pixel.to_array());
    }

    let buffer = image::RgbaImage::from_raw(width as u32, height as u32, rgba)
        .ok_or("Captured frame had an unexpected size")?;
    buffer
        .save(&file_path)
        .map_err(|e| format!("Failed to write PNG: {}", e))?;

    Ok(file_path)
}
