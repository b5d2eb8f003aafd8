use chrono::Local;
use eframe::egui;
use egui::{Color32, RichText};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Instant;

use crate::config::{Config, StorageBackend};
use crate::export;
use crate::schedule::{is_overnight, DayOfWeek, ScheduleEntry, StatusTag, TimeOfDay};
use crate::store::{Schedule, ScheduleStore};
use super::theme;
use super::views;

pub struct ShiftGridApp {
    config: Config,
    state: AppState,

    // last-loaded snapshot; replaced only by completed loads
    schedule: Schedule,
    time_grid: Vec<TimeOfDay>,

    // the staged cell edit, carried from click through confirm to save
    pending: Option<PendingEdit>,

    // identity pick
    show_name_dialog: bool,
    name_choice: String,

    // settings dialog
    show_settings: bool,
    settings_api_url: String,
    settings_storage: StorageBackend,
    settings_agents: String,
    settings_font_scale: f32,

    // status
    status_message: Option<(String, bool)>, // (message, is_error)
    status_shown_at: Instant,
    loading: bool,
    saving: bool,
    is_offline: bool,
    toast_after_reload: bool,

    // progress bar state
    progress: f32, // current progress 0.0-1.0
    progress_start: Instant,
    progress_phase: ProgressPhase,

    // async communication
    runtime: tokio::runtime::Runtime,
    result_rx: Receiver<AsyncResult>,
    result_tx: Sender<AsyncResult>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum AppState {
    Setup,
    Main,
}

/// One staged cell edit: which cell, the selections made so far, and how
/// far through the dialog flow it has gotten.
struct PendingEdit {
    agent: String,
    day: DayOfWeek,
    start_idx: usize,
    end_idx: usize,
    staged: Option<ScheduleEntry>,
    stage: EditStage,
    error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum EditStage {
    Editing,
    Confirming,
    // save in flight; the edit surface stays hidden until the post-save
    // reload lands
    Saving,
}

enum AsyncResult {
    ScheduleLoaded(Schedule),
    LoadFailed(String),
    DaySaved,
    SaveFailed(String),
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ProgressPhase {
    Idle,
    FastStart,  // 0→17% in 0.25s
    SlowCrawl,  // 17%→50% slowly
    Completing, // snap to 100%
    FadingOut,  // fade out after completion
    Shrinking,  // shrink back on error
}

enum EditAction {
    None,
    SaveRange,
    SetStatus(StatusTag),
    Clear,
    Cancel,
}

enum ConfirmAction {
    None,
    GoBack,
    Confirm,
}

/// Human-readable description of a staged entry for the confirm dialog.
fn entry_summary(entry: ScheduleEntry) -> String {
    match entry {
        ScheduleEntry::Empty => "Clear this day".to_string(),
        ScheduleEntry::Status(tag) => tag.as_str().to_string(),
        ScheduleEntry::TimeRange { start, end } => {
            if is_overnight(start, end) {
                format!("{} – next day {}", start.label(), end.label())
            } else {
                format!("{} – {}", start.label(), end.label())
            }
        }
    }
}

impl ShiftGridApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = Config::load().unwrap_or_default();
        theme::setup_fonts(&cc.egui_ctx);
        theme::setup_theme(&cc.egui_ctx);
        let state = if config.is_configured() {
            AppState::Main
        } else {
            AppState::Setup
        };

        let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
        let (result_tx, result_rx) = channel();

        let name_choice = config
            .selected_agent
            .clone()
            .or_else(|| config.agents.first().cloned())
            .unwrap_or_default();

        let mut app = Self {
            show_settings: false,
            settings_api_url: config.api_url.clone(),
            settings_storage: config.storage,
            settings_agents: config.agents.join(", "),
            settings_font_scale: config.font_scale,
            schedule: Schedule::empty(&config.agents),
            time_grid: TimeOfDay::grid(),
            pending: None,
            show_name_dialog: state == AppState::Main && config.selected_agent.is_none(),
            name_choice,
            config,
            state,
            status_message: None,
            status_shown_at: Instant::now(),
            loading: false,
            saving: false,
            is_offline: false,
            toast_after_reload: false,
            progress: 0.0,
            progress_start: Instant::now(),
            progress_phase: ProgressPhase::Idle,
            runtime,
            result_rx,
            result_tx,
        };

        if state == AppState::Main {
            app.load_schedule();
        }

        app
    }

    fn set_status(&mut self, message: String, is_error: bool) {
        self.status_message = Some((message, is_error));
        self.status_shown_at = Instant::now();
    }

    fn check_async_results(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                AsyncResult::ScheduleLoaded(schedule) => {
                    self.schedule = schedule;
                    self.loading = false;
                    self.is_offline = false;
                    self.progress_phase = ProgressPhase::Completing;
                    self.progress_start = Instant::now();
                    if self.toast_after_reload {
                        self.toast_after_reload = false;
                        self.set_status("Saved successfully.".to_string(), false);
                    } else {
                        self.status_message = None;
                    }
                }
                AsyncResult::LoadFailed(msg) => {
                    self.loading = false;
                    self.toast_after_reload = false;
                    // keep the grid usable: every known agent, all empty
                    self.schedule = Schedule::empty(&self.config.agents);
                    self.set_status(msg, true);
                    self.progress_phase = ProgressPhase::Shrinking;
                    self.progress_start = Instant::now();
                }
                AsyncResult::DaySaved => {
                    self.saving = false;
                    self.pending = None;
                    // redraw from the store's state, not an optimistic patch
                    self.toast_after_reload = true;
                    self.load_schedule();
                }
                AsyncResult::SaveFailed(msg) => {
                    self.saving = false;
                    self.set_status(msg, true);
                    self.progress_phase = ProgressPhase::Shrinking;
                    self.progress_start = Instant::now();
                    // hand the staged edit back so the user can retry
                    if let Some(pending) = &mut self.pending {
                        if pending.stage == EditStage::Saving {
                            pending.stage = EditStage::Editing;
                        }
                    }
                }
                AsyncResult::Offline => {
                    self.loading = false;
                    self.saving = false;
                    self.is_offline = true;
                    self.status_message = None;
                    self.progress_phase = ProgressPhase::Shrinking;
                    self.progress_start = Instant::now();
                    if let Some(pending) = &mut self.pending {
                        if pending.stage == EditStage::Saving {
                            pending.stage = EditStage::Editing;
                        }
                    }
                }
            }
        }
    }

    fn load_schedule(&mut self) {
        if !self.config.is_configured() {
            return;
        }
        if self.loading {
            return;
        }

        self.loading = true;
        self.progress = 0.0;
        self.progress_phase = ProgressPhase::FastStart;
        self.progress_start = Instant::now();

        let config = self.config.clone();
        let tx = self.result_tx.clone();

        self.runtime.spawn(async move {
            let result = async {
                let store = ScheduleStore::from_config(&config)?;
                let schedule = store.load().await?;
                Ok::<_, anyhow::Error>(schedule)
            }
            .await;

            match result {
                Ok(schedule) => {
                    let _ = tx.send(AsyncResult::ScheduleLoaded(schedule));
                }
                Err(e) => {
                    // Check if this is a network connectivity error
                    let err_str = e.to_string().to_lowercase();
                    if err_str.contains("connection")
                        || err_str.contains("network")
                        || err_str.contains("dns")
                        || err_str.contains("resolve")
                        || err_str.contains("timeout")
                        || err_str.contains("unreachable")
                        || err_str.contains("error sending request")
                        || err_str.contains("no route")
                        || err_str.contains("failed to lookup")
                    {
                        let _ = tx.send(AsyncResult::Offline);
                    } else {
                        let _ = tx.send(AsyncResult::LoadFailed(format!(
                            "Failed to load the shared schedule: {}",
                            e
                        )));
                    }
                }
            }
        });
    }

    fn spawn_save(&mut self, agent: String, day: DayOfWeek, entry: ScheduleEntry) {
        self.saving = true;
        self.progress = 0.0;
        self.progress_phase = ProgressPhase::FastStart;
        self.progress_start = Instant::now();

        let config = self.config.clone();
        let week = self.schedule.week(&agent);
        let tx = self.result_tx.clone();

        self.runtime.spawn(async move {
            let result = async {
                let store = ScheduleStore::from_config(&config)?;
                if entry.is_empty() {
                    store.clear_day(&agent, day, &week).await?;
                } else {
                    store.save_day(&agent, day, entry, &week).await?;
                }
                Ok::<_, anyhow::Error>(())
            }
            .await;

            match result {
                Ok(()) => {
                    let _ = tx.send(AsyncResult::DaySaved);
                }
                Err(e) => {
                    let err_str = e.to_string().to_lowercase();
                    if err_str.contains("connection")
                        || err_str.contains("network")
                        || err_str.contains("error sending request")
                        || err_str.contains("timeout")
                    {
                        let _ = tx.send(AsyncResult::Offline);
                    } else {
                        let _ = tx.send(AsyncResult::SaveFailed(format!("Failed to save: {}", e)));
                    }
                }
            }
        });
    }

    fn handle_cell_click(&mut self, agent: String, day: DayOfWeek) {
        // no overlapping edits while a save or reload is pending
        if self.saving || self.loading {
            return;
        }

        let Some(current) = self.config.selected_agent.clone() else {
            self.show_name_dialog = true;
            return;
        };

        if current != agent {
            self.set_status(
                format!("You are logged in as {}. Please edit only your own row.", current),
                true,
            );
            return;
        }

        self.open_edit(agent, day);
    }

    fn open_edit(&mut self, agent: String, day: DayOfWeek) {
        let entry = self.schedule.entry(&agent, day);
        let (start_idx, end_idx) = match entry {
            ScheduleEntry::TimeRange { start, end } => (
                self.time_grid.iter().position(|t| *t == start).unwrap_or(0),
                self.time_grid.iter().position(|t| *t == end).unwrap_or(0),
            ),
            _ => (0, 0),
        };

        self.pending = Some(PendingEdit {
            agent,
            day,
            start_idx,
            end_idx,
            staged: None,
            stage: EditStage::Editing,
            error: None,
        });
    }

    fn open_settings(&mut self) {
        self.settings_api_url = self.config.api_url.clone();
        self.settings_storage = self.config.storage;
        self.settings_agents = self.config.agents.join(", ");
        self.settings_font_scale = self.config.font_scale;
        self.show_settings = true;
    }

    fn save_settings(&mut self) {
        let new_url = self.settings_api_url.trim().to_string();
        let backend_changed =
            self.config.storage != self.settings_storage || self.config.api_url != new_url;

        // Parse roster from comma-separated string; an emptied field keeps
        // the previous roster
        let agents: Vec<String> = self
            .settings_agents
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let roster_changed = !agents.is_empty() && agents != self.config.agents;

        self.config.api_url = new_url;
        self.config.storage = self.settings_storage;
        self.config.font_scale = self.settings_font_scale;
        if !agents.is_empty() {
            self.config.agents = agents;
        }

        // a remembered identity that left the roster is forgotten
        if let Some(selected) = &self.config.selected_agent {
            if !self.config.agents.contains(selected) {
                self.config.selected_agent = None;
            }
        }

        match self.config.save() {
            Ok(_) => {
                self.show_settings = false;
                if self.config.is_configured() && self.state == AppState::Setup {
                    self.state = AppState::Main;
                    self.show_name_dialog = self.config.selected_agent.is_none();
                }
                if backend_changed || roster_changed {
                    self.schedule = Schedule::empty(&self.config.agents);
                    self.load_schedule();
                }
            }
            Err(e) => {
                self.set_status(format!("Failed to save settings: {}", e), true);
            }
        }
    }

    fn render_progress_bar(&self, ui: &mut egui::Ui) {
        let full_width = ui.available_width();
        let (rect, _) = ui.allocate_exact_size(egui::vec2(full_width, 3.0), egui::Sense::hover());

        if self.progress <= 0.0 {
            return;
        }

        let alpha = if self.progress_phase == ProgressPhase::FadingOut {
            1.0 - (self.progress_start.elapsed().as_secs_f32() / 0.3).min(1.0)
        } else {
            1.0
        };

        let bar = egui::Rect::from_min_size(
            rect.min,
            egui::vec2(full_width * self.progress.clamp(0.0, 1.0), 3.0),
        );
        ui.painter().rect_filled(
            bar,
            2.0,
            Color32::from_rgb(19, 152, 244).linear_multiply(alpha),
        );
    }

    fn render_setup(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.heading("ShiftGrid setup");
            ui.add_space(20.0);

            ui.label("Point the app at the shared schedule endpoint, or keep the schedule on this machine.");
            ui.add_space(12.0);

            ui.horizontal(|ui| {
                ui.radio_value(
                    &mut self.settings_storage,
                    StorageBackend::Remote,
                    "Shared endpoint",
                );
                ui.radio_value(
                    &mut self.settings_storage,
                    StorageBackend::Local,
                    "This machine only",
                );
            });

            if self.settings_storage == StorageBackend::Remote {
                ui.add_space(8.0);
                ui.add(
                    egui::TextEdit::singleline(&mut self.settings_api_url)
                        .desired_width(420.0)
                        .hint_text("https://script.google.com/macros/s/.../exec"),
                );
            }

            ui.add_space(16.0);
            if ui.button("Save and continue").clicked() {
                self.save_settings();
            }
        });
    }

    fn render_main(&mut self, ui: &mut egui::Ui) {
        self.render_progress_bar(ui);

        ui.horizontal(|ui| {
            ui.heading("Team schedule");
            ui.label(
                RichText::new(views::week_note(Local::now().date_naive()))
                    .color(Color32::from_rgb(176, 176, 168)),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .button(egui_phosphor::regular::GEAR.to_string())
                    .on_hover_text("Settings")
                    .clicked()
                {
                    self.open_settings();
                }

                if ui
                    .button(format!("{} Export", egui_phosphor::regular::DOWNLOAD_SIMPLE))
                    .on_hover_text("Save the grid as an image")
                    .clicked()
                {
                    ui.ctx()
                        .send_viewport_cmd(egui::ViewportCommand::Screenshot);
                }

                if ui
                    .button(egui_phosphor::regular::ARROWS_CLOCKWISE.to_string())
                    .on_hover_text("Reload")
                    .clicked()
                {
                    self.load_schedule();
                }

                let identity_label = match &self.config.selected_agent {
                    Some(name) => format!("{} {}", egui_phosphor::regular::USER, name),
                    None => format!("{} Choose your name", egui_phosphor::regular::USER),
                };
                if ui.button(identity_label).clicked() {
                    self.show_name_dialog = true;
                }

                if self.loading || self.saving {
                    ui.spinner();
                }

                if self.is_offline {
                    ui.label(
                        RichText::new(format!("{} Offline", egui_phosphor::regular::WIFI_SLASH))
                            .color(Color32::from_rgb(0xec, 0x71, 0x1b)),
                    );
                }
            });
        });

        if let Some((message, is_error)) = &self.status_message {
            let color = if *is_error {
                Color32::from_rgb(0xff, 0x44, 0x44)
            } else {
                Color32::from_rgb(0x65, 0xba, 0x43)
            };
            ui.label(RichText::new(message).color(color));
        }

        ui.add_space(8.0);

        let result = views::render_grid(
            ui,
            &self.schedule,
            self.config.selected_agent.as_deref(),
        );
        if let Some((agent, day)) = result.cell_clicked {
            self.handle_cell_click(agent, day);
        }
    }

    fn render_name_dialog(&mut self, ctx: &egui::Context) {
        if !self.show_name_dialog {
            return;
        }

        let (content_bg, frame_color, frame_text) = theme::dialog_colors();
        let dialog_frame = egui::Frame::none()
            .fill(content_bg)
            .stroke(egui::Stroke::new(2.0, frame_color))
            .rounding(egui::Rounding::same(8.0))
            .inner_margin(egui::Margin::same(20.0));

        let agents = self.config.agents.clone();

        egui::Window::new("Choose your name")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(dialog_frame)
            .show(ctx, |ui| {
                ui.label(
                    RichText::new("Pick who you are - you can only edit your own row.")
                        .color(frame_text),
                );
                ui.add_space(4.0);

                egui::ComboBox::from_id_salt("name_select")
                    .selected_text(self.name_choice.clone())
                    .show_ui(ui, |ui| {
                        for agent in &agents {
                            ui.selectable_value(&mut self.name_choice, agent.clone(), agent);
                        }
                    });

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Confirm").clicked() && !self.name_choice.is_empty() {
                        self.config.selected_agent = Some(self.name_choice.clone());
                        if let Err(e) = self.config.save() {
                            self.set_status(format!("Failed to remember name: {}", e), true);
                        }
                        self.show_name_dialog = false;
                    }
                    if ui.button("Cancel").clicked() {
                        self.show_name_dialog = false;
                    }
                });
            });
    }

    fn render_edit_dialogs(&mut self, ctx: &egui::Context) {
        let Some(mut pending) = self.pending.take() else {
            return;
        };

        let (content_bg, frame_color, frame_text) = theme::dialog_colors();
        let dialog_frame = egui::Frame::none()
            .fill(content_bg)
            .stroke(egui::Stroke::new(2.0, frame_color))
            .rounding(egui::Rounding::same(8.0))
            .inner_margin(egui::Margin::same(20.0));

        match pending.stage {
            EditStage::Editing => {
                let mut action = EditAction::None;
                let grid = &self.time_grid;

                egui::Window::new("Edit schedule")
                    .collapsible(false)
                    .resizable(false)
                    .default_width(380.0)
                    .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                    .frame(dialog_frame)
                    .show(ctx, |ui| {
                        ui.label(
                            RichText::new(format!("{} • {}", pending.agent, pending.day.full()))
                                .color(frame_text),
                        );
                        ui.add_space(4.0);

                        egui::ComboBox::from_label("Start").show_index(
                            ui,
                            &mut pending.start_idx,
                            grid.len(),
                            |i| grid[i].label(),
                        );
                        egui::ComboBox::from_label("End").show_index(
                            ui,
                            &mut pending.end_idx,
                            grid.len(),
                            |i| grid[i].label(),
                        );

                        ui.add_space(8.0);
                        ui.label(RichText::new("Or set a status").color(frame_text));
                        ui.horizontal_wrapped(|ui| {
                            for tag in StatusTag::ALL {
                                let (chip_bg, chip_text) = theme::status_tag_colors(tag);
                                let button = egui::Button::new(
                                    RichText::new(tag.as_str()).color(chip_text),
                                )
                                .fill(chip_bg);
                                if ui.add(button).clicked() {
                                    action = EditAction::SetStatus(tag);
                                }
                            }
                        });

                        if let Some(error) = &pending.error {
                            ui.label(
                                RichText::new(error).color(Color32::from_rgb(0xff, 0x44, 0x44)),
                            );
                        }

                        ui.add_space(8.0);
                        ui.horizontal(|ui| {
                            if ui.button("Save").clicked() {
                                action = EditAction::SaveRange;
                            }
                            if ui.button("Clear").clicked() {
                                action = EditAction::Clear;
                            }
                            if ui.button("Cancel").clicked() {
                                action = EditAction::Cancel;
                            }
                        });
                    });

                match action {
                    EditAction::SaveRange => {
                        match ScheduleEntry::time_range(
                            grid[pending.start_idx],
                            grid[pending.end_idx],
                        ) {
                            Ok(entry) => {
                                pending.staged = Some(entry);
                                pending.stage = EditStage::Confirming;
                                pending.error = None;
                            }
                            Err(e) => pending.error = Some(e.to_string()),
                        }
                        self.pending = Some(pending);
                    }
                    EditAction::SetStatus(tag) => {
                        pending.staged = Some(ScheduleEntry::Status(tag));
                        pending.stage = EditStage::Confirming;
                        pending.error = None;
                        self.pending = Some(pending);
                    }
                    EditAction::Clear => {
                        pending.staged = Some(ScheduleEntry::Empty);
                        pending.stage = EditStage::Confirming;
                        pending.error = None;
                        self.pending = Some(pending);
                    }
                    EditAction::Cancel => {
                        // dropped; the snapshot was never touched
                    }
                    EditAction::None => {
                        self.pending = Some(pending);
                    }
                }
            }
            EditStage::Confirming => {
                let mut action = ConfirmAction::None;
                let staged = pending.staged.unwrap_or(ScheduleEntry::Empty);

                egui::Window::new("Confirm save")
                    .collapsible(false)
                    .resizable(false)
                    .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                    .frame(dialog_frame)
                    .show(ctx, |ui| {
                        ui.label(format!(
                            "Save changes for {} • {}?",
                            pending.agent,
                            pending.day.full()
                        ));
                        ui.label(RichText::new(entry_summary(staged)).color(Color32::WHITE));

                        ui.add_space(8.0);
                        ui.horizontal(|ui| {
                            if ui.button("Go back").clicked() {
                                action = ConfirmAction::GoBack;
                            }
                            if ui.button("Confirm save").clicked() {
                                action = ConfirmAction::Confirm;
                            }
                        });
                    });

                match action {
                    ConfirmAction::GoBack => {
                        pending.stage = EditStage::Editing;
                        self.pending = Some(pending);
                    }
                    ConfirmAction::Confirm => {
                        let agent = pending.agent.clone();
                        let day = pending.day;
                        pending.stage = EditStage::Saving;
                        self.pending = Some(pending);
                        self.spawn_save(agent, day, staged);
                    }
                    ConfirmAction::None => {
                        self.pending = Some(pending);
                    }
                }
            }
            EditStage::Saving => {
                // nothing rendered; check_async_results moves the edit back
                // to Editing on failure or drops it once the save lands
                self.pending = Some(pending);
            }
        }
    }

    fn render_settings_dialog(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }

        let (content_bg, frame_color, _) = theme::dialog_colors();
        let dialog_frame = egui::Frame::none()
            .fill(content_bg)
            .stroke(egui::Stroke::new(2.0, frame_color))
            .rounding(egui::Rounding::same(8.0))
            .inner_margin(egui::Margin::same(20.0));

        egui::Window::new("Settings")
            .collapsible(false)
            .resizable(false)
            .default_width(480.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(dialog_frame)
            .show(ctx, |ui| {
                egui::Grid::new("settings_grid")
                    .num_columns(2)
                    .spacing([20.0, 10.0])
                    .show(ui, |ui| {
                        ui.label("Storage");
                        ui.horizontal(|ui| {
                            ui.radio_value(
                                &mut self.settings_storage,
                                StorageBackend::Remote,
                                "Shared endpoint",
                            );
                            ui.radio_value(
                                &mut self.settings_storage,
                                StorageBackend::Local,
                                "This machine only",
                            );
                        });
                        ui.end_row();

                        if self.settings_storage == StorageBackend::Remote {
                            ui.label("Endpoint URL");
                            ui.add(
                                egui::TextEdit::singleline(&mut self.settings_api_url)
                                    .desired_width(320.0)
                                    .hint_text("https://script.google.com/macros/s/.../exec"),
                            );
                            ui.end_row();
                        }

                        ui.label("Agents");
                        ui.add(
                            egui::TextEdit::multiline(&mut self.settings_agents)
                                .desired_width(320.0)
                                .desired_rows(2)
                                .hint_text("Dyrine, Janrey, ..."),
                        );
                        ui.end_row();

                        ui.label("Font scale");
                        ui.add(egui::Slider::new(&mut self.settings_font_scale, 0.75..=2.0));
                        ui.end_row();
                    });

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        self.save_settings();
                    }
                    if ui.button("Cancel").clicked() {
                        self.show_settings = false;
                    }
                });
            });
    }

    fn handle_screenshot(&mut self, ctx: &egui::Context) {
        let frame = ctx.input(|i| {
            i.events.iter().rev().find_map(|event| {
                if let egui::Event::Screenshot { image, .. } = event {
                    Some(image.clone())
                } else {
                    None
                }
            })
        });

        if let Some(frame) = frame {
            match export::save_grid_image(&frame) {
                Ok(path) => {
                    self.set_status(format!("Exported {}", path.display()), false);
                    let _ = open::that(&path);
                }
                Err(e) => self.set_status(e, true),
            }
        }
    }
}

impl eframe::App for ShiftGridApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle pinch-to-zoom (trackpad pinch or Ctrl+scroll)
        let zoom_delta = ctx.input(|i| i.zoom_delta());
        if zoom_delta != 1.0 {
            self.config.font_scale = (self.config.font_scale * zoom_delta).clamp(0.75, 2.5);
            if (zoom_delta - 1.0).abs() > 0.01 {
                let _ = self.config.save();
            }
        }

        // Apply font scale
        ctx.set_pixels_per_point(self.config.font_scale);

        // Check for async results
        self.check_async_results();

        // A requested grid snapshot arrives as an input event
        self.handle_screenshot(ctx);

        // Success toasts dismiss themselves
        if let Some((_, is_error)) = &self.status_message {
            if !is_error {
                if self.status_shown_at.elapsed().as_secs_f32() > 2.5 {
                    self.status_message = None;
                } else {
                    ctx.request_repaint_after(std::time::Duration::from_millis(250));
                }
            }
        }

        // Update progress bar animation
        let elapsed = self.progress_start.elapsed().as_secs_f32();
        match self.progress_phase {
            ProgressPhase::Idle => {}
            ProgressPhase::FastStart => {
                // 0→17% in 0.25 seconds
                self.progress = (elapsed / 0.25 * 0.17).min(0.17);
                if elapsed >= 0.25 {
                    self.progress_phase = ProgressPhase::SlowCrawl;
                    self.progress_start = Instant::now();
                }
                ctx.request_repaint();
            }
            ProgressPhase::SlowCrawl => {
                // 17%→50% over ~7.5 seconds
                self.progress = 0.17 + (elapsed / 7.5 * 0.33).min(0.33);
                ctx.request_repaint();
            }
            ProgressPhase::Completing => {
                // Snap to 100% fast (0.15 seconds)
                let t = (elapsed / 0.15).min(1.0);
                self.progress = self.progress + (1.0 - self.progress) * t;
                if elapsed >= 0.15 {
                    self.progress = 1.0;
                    self.progress_phase = ProgressPhase::FadingOut;
                    self.progress_start = Instant::now();
                }
                ctx.request_repaint();
            }
            ProgressPhase::FadingOut => {
                // Fade out over 0.3 seconds
                if elapsed >= 0.3 {
                    self.progress_phase = ProgressPhase::Idle;
                    self.progress = 0.0;
                }
                ctx.request_repaint();
            }
            ProgressPhase::Shrinking => {
                // Shrink to 0 fast (0.2 seconds)
                let t = (elapsed / 0.2).min(1.0);
                self.progress = self.progress * (1.0 - t);
                if elapsed >= 0.2 {
                    self.progress_phase = ProgressPhase::Idle;
                    self.progress = 0.0;
                }
                ctx.request_repaint();
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.state {
            AppState::Setup => self.render_setup(ui),
            AppState::Main => self.render_main(ui),
        });

        self.render_name_dialog(ctx);
        self.render_edit_dialogs(ctx);
        self.render_settings_dialog(ctx);
    }
}
