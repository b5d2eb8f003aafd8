use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

use crate::schedule::StatusTag;

/// Font family for filled Phosphor icons
pub fn phosphor_fill_family() -> FontFamily {
    FontFamily::Name("phosphor-fill".into())
}

pub fn setup_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();

    // Add Phosphor Regular icons as fallback in Proportional family
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);

    // Add Phosphor Fill as a separate font family for filled icons.
    // Include the default proportional font as fallback so regular text
    // still renders in that family.
    fonts.font_data.insert(
        "phosphor-fill".into(),
        egui_phosphor::Variant::Fill.font_data(),
    );
    let fallback = fonts
        .families
        .get(&FontFamily::Proportional)
        .and_then(|names| names.first().cloned());
    let mut fill_family = vec!["phosphor-fill".to_owned()];
    fill_family.extend(fallback);
    fonts
        .families
        .insert(FontFamily::Name("phosphor-fill".into()), fill_family);

    ctx.set_fonts(fonts);
}

pub fn setup_theme(ctx: &egui::Context) {
    let mut style = Style::default();

    // Dark visuals with blue accents
    let mut visuals = Visuals::dark();

    // Background colors - pure black
    let bg = Color32::BLACK;
    visuals.panel_fill = bg;
    visuals.window_fill = bg;
    visuals.faint_bg_color = Color32::from_rgb(20, 20, 18);
    visuals.extreme_bg_color = bg;

    // Widget colors - warm grays (R=G > B for warmth)
    visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(40, 40, 38);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, Color32::from_rgb(176, 176, 168));

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(56, 56, 52);
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, Color32::from_rgb(200, 200, 192));

    visuals.widgets.hovered.bg_fill = Color32::from_rgb(80, 80, 74);
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, Color32::from_rgb(255, 255, 255));

    // Accent color for active/pressed buttons
    let accent = Color32::from_rgb(19, 152, 244);
    visuals.widgets.active.bg_fill = accent;
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);

    // Selection color (accent background, white text)
    visuals.selection.bg_fill = accent;
    visuals.selection.stroke = Stroke::new(1.0, Color32::WHITE);

    // Hyperlink color (accent)
    visuals.hyperlink_color = accent;

    // Rounded corners
    visuals.widgets.noninteractive.rounding = Rounding::same(6.0);
    visuals.widgets.inactive.rounding = Rounding::same(6.0);
    visuals.widgets.hovered.rounding = Rounding::same(6.0);
    visuals.widgets.active.rounding = Rounding::same(6.0);
    visuals.window_rounding = Rounding::same(8.0);

    style.visuals = visuals;

    // Font sizes - standardized at 14pt
    style.text_styles = [
        (TextStyle::Small, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(14.0, FontFamily::Monospace)),
    ]
    .into();

    // Spacing (scaled up)
    style.spacing.item_spacing = egui::vec2(12.0, 10.0);
    style.spacing.button_padding = egui::vec2(18.0, 10.0);
    style.spacing.window_margin = egui::Margin::same(24.0);

    ctx.set_style(style);
}

/// Returns (chip_bg, chip_text) for a status tag cell
pub fn status_tag_colors(tag: StatusTag) -> (Color32, Color32) {
    match tag {
        StatusTag::DayOff => (Color32::from_rgb(0x5a, 0x1e, 0x1e), Color32::from_rgb(0xf8, 0x9a, 0x9a)),
        StatusTag::Leave => (Color32::from_rgb(0x54, 0x3c, 0x10), Color32::from_rgb(0xf5, 0xc9, 0x6b)),
        StatusTag::Trainee => (Color32::from_rgb(0x14, 0x32, 0x4e), Color32::from_rgb(0x8e, 0xc9, 0xf5)),
        StatusTag::Root => (Color32::from_rgb(0x36, 0x1e, 0x50), Color32::from_rgb(0xc9, 0xa2, 0xf2)),
    }
}

/// Returns (bg_color, border_color, accent) for grid cells
pub fn cell_colors() -> (Color32, Color32, Color32) {
    let accent = Color32::from_rgb(19, 152, 244);
    (
        Color32::from_rgb(0x1c, 0x1c, 0x1a), // bg
        Color32::from_rgb(0x28, 0x28, 0x26), // border - warm gray
        accent,
    )
}

/// Returns (bg_color, text_color) for button-like elements to ensure consistency
pub fn button_colors() -> (Color32, Color32) {
    (
        Color32::from_rgb(56, 56, 52),    // bg - warm gray
        Color32::from_rgb(200, 200, 192), // text - warm gray
    )
}

/// Returns (content_bg, frame_color, frame_text) for dialogs
pub fn dialog_colors() -> (Color32, Color32, Color32) {
    (
        Color32::BLACK,                   // content bg
        Color32::from_rgb(40, 40, 38),    // frame/border - warm gray
        Color32::from_rgb(176, 176, 168), // frame text - warm gray
    )
}
