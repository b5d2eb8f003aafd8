use chrono::{Datelike, Duration, NaiveDate};
use egui::{Color32, Ui};

use crate::schedule::{is_overnight, DayOfWeek, ScheduleEntry, TimeOfDay};
use crate::store::Schedule;

use super::theme::{cell_colors, phosphor_fill_family, status_tag_colors};

const NAME_COL_WIDTH: f32 = 110.0;
const CELL_WIDTH: f32 = 124.0;
const CELL_HEIGHT: f32 = 56.0;
const CELL_GAP: f32 = 6.0;

/// Result from grid interactions
#[derive(Default)]
pub struct GridResult {
    pub cell_clicked: Option<(String, DayOfWeek)>,
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let days_from_monday = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(days_from_monday)
}

/// "Week of Aug 3 – Aug 9" for the week containing `date`.
pub fn week_note(date: NaiveDate) -> String {
    let start = week_start(date);
    let end = start + Duration::days(6);
    format!(
        "Week of {} – {}",
        start.format("%b %-d"),
        end.format("%b %-d")
    )
}

/// The two display lines of a time-range cell. Overnight ranges get the
/// "next day" qualifier on the end label.
fn time_range_lines(start: TimeOfDay, end: TimeOfDay) -> (String, String) {
    let first = format!("{} –", start.label());
    let second = if is_overnight(start, end) {
        format!("next day {}", end.label())
    } else {
        end.label()
    };
    (first, second)
}

/// Render the agents × days grid. The selected agent's row is highlighted
/// and the rest are dimmed once an identity is chosen; every cell is
/// clickable and the caller decides what a click means.
pub fn render_grid(ui: &mut Ui, schedule: &Schedule, current_agent: Option<&str>) -> GridResult {
    let mut result = GridResult::default();

    egui::ScrollArea::both().show(ui, |ui| {
        ui.spacing_mut().item_spacing = egui::vec2(CELL_GAP, CELL_GAP);

        // header row: blank corner, then short day names
        ui.horizontal(|ui| {
            let _ = ui.allocate_exact_size(egui::vec2(NAME_COL_WIDTH, 20.0), egui::Sense::hover());
            for day in DayOfWeek::ALL {
                let (rect, _) =
                    ui.allocate_exact_size(egui::vec2(CELL_WIDTH, 20.0), egui::Sense::hover());
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    day.short(),
                    egui::FontId::proportional(14.0),
                    Color32::from_rgb(176, 176, 168),
                );
            }
        });

        for agent in schedule.agents() {
            let is_current = current_agent == Some(agent.as_str());
            let dimmed = current_agent.is_some() && !is_current;

            ui.horizontal(|ui| {
                render_name_pill(ui, agent, is_current, dimmed);

                for day in DayOfWeek::ALL {
                    let entry = schedule.entry(agent, day);
                    if render_cell(ui, entry, dimmed) {
                        result.cell_clicked = Some((agent.clone(), day));
                    }
                }
            });
        }
    });

    result
}

fn render_name_pill(ui: &mut Ui, agent: &str, is_current: bool, dimmed: bool) {
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(NAME_COL_WIDTH, CELL_HEIGHT),
        egui::Sense::hover(),
    );

    let (_, _, accent) = cell_colors();
    let (pill_bg, pill_text) = if is_current {
        (accent, Color32::WHITE)
    } else {
        (Color32::from_rgb(40, 40, 38), Color32::from_rgb(200, 200, 192))
    };
    let pill_bg = if dimmed { pill_bg.linear_multiply(0.4) } else { pill_bg };
    let pill_text = if dimmed { pill_text.linear_multiply(0.4) } else { pill_text };

    let pill_rect = egui::Rect::from_center_size(rect.center(), egui::vec2(NAME_COL_WIDTH - 10.0, 30.0));
    let painter = ui.painter();
    painter.rect_filled(pill_rect, 15.0, pill_bg);

    // the chosen identity gets a filled user badge next to the name
    let (text, font) = if is_current {
        (
            format!("{} {}", egui_phosphor::fill::USER_CIRCLE, agent),
            egui::FontId::new(14.0, phosphor_fill_family()),
        )
    } else {
        (agent.to_string(), egui::FontId::proportional(14.0))
    };
    painter.text(
        pill_rect.center(),
        egui::Align2::CENTER_CENTER,
        text,
        font,
        pill_text,
    );
}

/// Returns true when the cell was clicked.
fn render_cell(ui: &mut Ui, entry: ScheduleEntry, dimmed: bool) -> bool {
    let (rect, response) = ui.allocate_exact_size(
        egui::vec2(CELL_WIDTH, CELL_HEIGHT),
        egui::Sense::click(),
    );

    let (cell_bg, cell_border, accent) = cell_colors();
    let border = if response.hovered() && !dimmed {
        accent
    } else {
        cell_border
    };
    let fade = |c: Color32| if dimmed { c.linear_multiply(0.4) } else { c };

    let painter = ui.painter();
    painter.rect(rect, 6.0, fade(cell_bg), egui::Stroke::new(1.0, fade(border)));

    match entry {
        ScheduleEntry::Empty => {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "—",
                egui::FontId::proportional(14.0),
                fade(Color32::from_rgb(112, 112, 104)),
            );
        }
        ScheduleEntry::Status(tag) => {
            let (chip_bg, chip_text) = status_tag_colors(tag);
            let chip_rect =
                egui::Rect::from_center_size(rect.center(), egui::vec2(CELL_WIDTH - 24.0, 26.0));
            painter.rect_filled(chip_rect, 13.0, fade(chip_bg));
            painter.text(
                chip_rect.center(),
                egui::Align2::CENTER_CENTER,
                tag.as_str(),
                egui::FontId::proportional(13.0),
                fade(chip_text),
            );
        }
        ScheduleEntry::TimeRange { start, end } => {
            let (first, second) = time_range_lines(start, end);
            let text_color = fade(Color32::WHITE);
            painter.text(
                rect.center() - egui::vec2(0.0, 9.0),
                egui::Align2::CENTER_CENTER,
                first,
                egui::FontId::proportional(13.0),
                text_color,
            );
            painter.text(
                rect.center() + egui::vec2(0.0, 9.0),
                egui::Align2::CENTER_CENTER,
                second,
                egui::FontId::proportional(13.0),
                text_color,
            );
        }
    }

    if response.hovered() && !dimmed {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }

    // 24-hour clarification on hover
    let response = if let ScheduleEntry::TimeRange { start, end } = entry {
        response.on_hover_text(format!("{} – {}", start.value(), end.value()))
    } else {
        response
    };

    response.clicked()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_start_is_monday() {
        // 2025-12-02 is a Tuesday
        let tuesday = NaiveDate::from_ymd_opt(2025, 12, 2).unwrap();
        assert_eq!(week_start(tuesday), NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());

        // a Monday maps to itself
        let monday = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        assert_eq!(week_start(monday), monday);

        // a Sunday belongs to the week that started six days earlier
        let sunday = NaiveDate::from_ymd_opt(2025, 12, 7).unwrap();
        assert_eq!(week_start(sunday), monday);
    }

    #[test]
    fn overnight_ranges_get_the_next_day_qualifier() {
        let ten_pm = TimeOfDay::parse("10 PM").unwrap();
        let seven_am = TimeOfDay::parse("7 AM").unwrap();
        let (first, second) = time_range_lines(ten_pm, seven_am);
        assert_eq!(first, "10 PM –");
        assert_eq!(second, "next day 7 AM");

        let nine_am = TimeOfDay::parse("9 AM").unwrap();
        let five_pm = TimeOfDay::parse("5 PM").unwrap();
        let (_, second) = time_range_lines(nine_am, five_pm);
        assert_eq!(second, "5 PM");
    }
}
