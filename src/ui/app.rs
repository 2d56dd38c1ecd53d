use chrono::{Local, NaiveDate};
use eframe::egui;
use egui::{Color32, RichText};

use crate::config::Config;
use crate::export;
use crate::planner::{
    group_by_environment, teams, DirStorage, Environment, Filters, MemoryStorage, Planner, PlannerError,
    PlannerStore, RecordId,
};
use super::form::EditorForm;
use super::theme;
use super::views;

pub struct PlannerApp {
    config: Config,
    planner: Planner,
    filters: Filters,

    // Dialog for add/edit
    show_dialog: bool,
    dialog_mode: DialogMode,
    dialog_form: EditorForm,
    dialog_error: Option<String>,

    // Delete confirmation
    pending_delete: Option<RecordId>,

    // Status
    status_message: Option<(String, bool)>, // (message, is_error)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DialogMode {
    Add,
    Edit(RecordId),
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl PlannerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        theme::setup_fonts(&cc.egui_ctx);
        theme::setup_theme(&cc.egui_ctx);

        let mut status_message = None;
        let config = Config::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "config unreadable, using defaults");
            Config::default()
        });

        let store = match DirStorage::open_default() {
            Ok(storage) => PlannerStore::new(storage),
            Err(e) => {
                tracing::warn!(error = %e, "no data directory, changes will not be saved");
                status_message = Some((format!("Changes will not be saved: {}", e), true));
                PlannerStore::new(MemoryStorage::new())
            }
        };

        Self {
            config,
            planner: Planner::load(store, today()),
            filters: Filters::default(),
            show_dialog: false,
            dialog_mode: DialogMode::Add,
            dialog_form: EditorForm::default(),
            dialog_error: None,
            pending_delete: None,
            status_message,
        }
    }

    fn open_add_dialog(&mut self) {
        // Today when it is in the visible month, otherwise the month's first day
        let view = self.planner.month_view(today());
        let start = if (view.first..=view.last).contains(&today()) { today() } else { view.first };
        self.dialog_mode = DialogMode::Add;
        self.dialog_form = EditorForm::starting_on(start);
        self.dialog_error = None;
        self.show_dialog = true;
    }

    fn open_edit_dialog(&mut self, id: RecordId) {
        let Some(record) = self.planner.get(id) else {
            return;
        };
        self.dialog_mode = DialogMode::Edit(id);
        self.dialog_form = EditorForm::from_record(record);
        self.dialog_error = None;
        self.show_dialog = true;
    }

    fn close_dialog(&mut self) {
        self.show_dialog = false;
        self.dialog_error = None;
    }

    fn save_dialog(&mut self) {
        let input = match self.dialog_form.to_input() {
            Ok(input) => input,
            Err(e) => {
                self.dialog_error = Some(e.to_string());
                return;
            }
        };

        let name = input.name.clone();
        let result = match self.dialog_mode {
            DialogMode::Add => self.planner.add(input).map(|_| format!("Added {}", name)),
            DialogMode::Edit(id) => self.planner.edit(id, input).map(|_| format!("Updated {}", name)),
        };

        match result {
            Ok(msg) => {
                self.status_message = Some((msg, false));
                self.close_dialog();
            }
            Err(PlannerError::Invalid(e)) => {
                self.dialog_error = Some(e.to_string());
            }
            Err(e) => {
                self.status_message = Some((e.to_string(), true));
                self.close_dialog();
            }
        }
        self.surface_store_error();
    }

    fn delete_record(&mut self, id: RecordId) {
        match self.planner.delete(id) {
            Ok(removed) => {
                self.status_message = Some((format!("Deleted {}", removed.name), false));
            }
            Err(e) => {
                self.status_message = Some((e.to_string(), true));
            }
        }
        self.surface_store_error();
    }

    fn export_records(&mut self) {
        let result = self.config.resolved_export_dir()
            .and_then(|dir| export::export_csv(&self.planner.records(), &dir));

        match result {
            Ok(path) => {
                if self.config.open_after_export {
                    if let Err(e) = open::that(&path) {
                        tracing::warn!(error = %e, path = %path.display(), "could not open export");
                    }
                }
                self.status_message = Some((format!("Exported to {}", path.display()), false));
            }
            Err(e) => {
                tracing::warn!(error = %e, "export failed");
                self.status_message = Some((format!("Export failed: {:#}", e), true));
            }
        }
    }

    fn surface_store_error(&mut self) {
        if let Some(e) = self.planner.take_store_error() {
            self.status_message = Some((format!("Could not save: {}", e), true));
        }
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Qualification planner").size(18.0).strong().color(Color32::WHITE));
            ui.add_space(16.0);

            // Month navigation styled like a button but pill-shaped
            let (button_bg, button_text) = theme::button_colors();
            egui::Frame::none()
                .fill(button_bg)
                .rounding(egui::Rounding::same(12.0))
                .inner_margin(egui::Margin::symmetric(8.0, 4.0))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        let left_arrow = ui.add(egui::Label::new(
                            RichText::new(egui_phosphor::regular::CARET_LEFT).size(14.0).color(button_text)
                        ).sense(egui::Sense::click()));
                        if left_arrow.hovered() {
                            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                        }
                        if left_arrow.clicked() {
                            self.planner.previous_month();
                        }

                        ui.add_space(4.0);

                        // Min width for the longest month title, "September 2024"
                        let title = self.planner.month_view(today()).title();
                        ui.allocate_ui_with_layout(
                            egui::vec2(120.0, 14.0),
                            egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
                            |ui| {
                                ui.label(RichText::new(&title).size(14.0).color(button_text));
                            }
                        );

                        ui.add_space(4.0);

                        let right_arrow = ui.add(egui::Label::new(
                            RichText::new(egui_phosphor::regular::CARET_RIGHT).size(14.0).color(button_text)
                        ).sense(egui::Sense::click()));
                        if right_arrow.hovered() {
                            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                        }
                        if right_arrow.clicked() {
                            self.planner.next_month();
                        }
                    });
                });

            let on_today = self.planner.reference_date() == today();
            if ui.add_enabled(!on_today, egui::Button::new("Today")).clicked() {
                self.planner.go_to(today());
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let add_text = format!("{} Add version", egui_phosphor::regular::PLUS);
                if ui.add(egui::Button::new(RichText::new(add_text).color(Color32::WHITE)).fill(theme::ACCENT)).clicked() {
                    self.open_add_dialog();
                }

                ui.add_space(8.0);

                // Icon-only export button - gray, white on hover
                let text_color = Color32::from_rgb(150, 150, 150);
                let font_id = egui::FontId::proportional(18.0);
                let export_icon = egui_phosphor::regular::FILE_CSV;
                let icon_size = ui.fonts(|f| f.layout_no_wrap(export_icon.to_string(), font_id.clone(), Color32::WHITE).size());
                let (export_rect, export_response) = ui.allocate_exact_size(icon_size + egui::vec2(8.0, 4.0), egui::Sense::click());
                let export_col = if export_response.hovered() { Color32::WHITE } else { text_color };
                ui.painter().text(export_rect.center(), egui::Align2::CENTER_CENTER, export_icon, font_id, export_col);
                if export_response.on_hover_text("Export to CSV").clicked() {
                    self.export_records();
                }
            });
        });
        self.surface_store_error();
    }

    fn render_status(&mut self, ui: &mut egui::Ui) {
        let mut dismiss_message = false;
        let mut copy_message: Option<String> = None;
        if let Some((msg, is_error)) = &self.status_message {
            let color = if *is_error { theme::ERROR_COLOR } else { theme::SUCCESS_COLOR };
            let dim_color = Color32::from_rgb(120, 120, 130);
            ui.horizontal(|ui| {
                ui.add(egui::Label::new(RichText::new(msg).color(color)));

                ui.add_space(8.0);

                let copy_btn = ui.add(egui::Label::new(
                    RichText::new(egui_phosphor::regular::COPY).size(14.0).color(dim_color)
                ).sense(egui::Sense::click()));
                if copy_btn.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                if copy_btn.clicked() {
                    copy_message = Some(msg.clone());
                }

                let close_btn = ui.add(egui::Label::new(
                    RichText::new(egui_phosphor::regular::X).size(14.0).color(dim_color)
                ).sense(egui::Sense::click()));
                if close_btn.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                if close_btn.clicked() {
                    dismiss_message = true;
                }
            });
            ui.add_space(4.0);
        }
        if let Some(text) = copy_message {
            ui.ctx().copy_text(text);
        }
        if dismiss_message {
            self.status_message = None;
        }
    }

    fn render_main(&mut self, ui: &mut egui::Ui) {
        self.render_header(ui);
        ui.add_space(8.0);
        self.render_status(ui);

        let records = self.planner.records();
        let team_names = teams(&records);
        views::render_filter_bar(ui, &mut self.filters, &team_names);
        ui.add_space(8.0);

        let view = self.planner.month_view(today());
        let groups = group_by_environment(&records, &self.filters);

        // Legend sits under the scrollable timeline
        egui::TopBottomPanel::bottom("legend")
            .frame(egui::Frame::none().inner_margin(egui::Margin::symmetric(0.0, 8.0)))
            .show_inside(ui, views::render_legend);

        let result = views::render_timeline(ui, &view, &groups);
        if let Some(id) = result.edit {
            self.open_edit_dialog(id);
        }
    }

    fn render_editor(&mut self, ctx: &egui::Context) {
        let title = match self.dialog_mode {
            DialogMode::Add => "Add a version",
            DialogMode::Edit(_) => "Edit version",
        };
        let (_, _, label_color) = theme::dialog_colors();

        let mut save_requested = false;
        let mut close_requested = false;
        let mut delete_requested = false;
        let team_names = teams(&self.planner.records());

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .default_width(520.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(theme::dialog_frame())
            .show(ctx, |ui| {
                ui.set_min_width(480.0);
                let form = &mut self.dialog_form;

                egui::Grid::new("editor_grid")
                    .num_columns(2)
                    .spacing([12.0, 10.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Version").color(label_color));
                        ui.add(egui::TextEdit::singleline(&mut form.name).hint_text("v2.1.0").desired_width(320.0));
                        ui.end_row();

                        ui.label(RichText::new("Team").color(label_color));
                        ui.horizontal(|ui| {
                            ui.add(egui::TextEdit::singleline(&mut form.team).hint_text("Team A").desired_width(200.0));
                            if !team_names.is_empty() {
                                egui::ComboBox::from_id_salt("editor_team")
                                    .selected_text("Pick")
                                    .width(100.0)
                                    .show_ui(ui, |ui| {
                                        for team in &team_names {
                                            if ui.selectable_label(form.team == *team, team.as_str()).clicked() {
                                                form.team = team.clone();
                                            }
                                        }
                                    });
                            }
                        });
                        ui.end_row();

                        ui.label(RichText::new("Description").color(label_color));
                        ui.add(
                            egui::TextEdit::multiline(&mut form.description)
                                .hint_text("Briefly describe the changes...")
                                .desired_rows(3)
                                .desired_width(320.0)
                        );
                        ui.end_row();

                        ui.label(RichText::new("Environment").color(label_color));
                        egui::ComboBox::from_id_salt("editor_environment")
                            .selected_text(form.environment.name())
                            .width(200.0)
                            .show_ui(ui, |ui| {
                                for env in Environment::ALL {
                                    ui.selectable_value(&mut form.environment, env, env.name());
                                }
                            });
                        ui.end_row();

                        ui.label(RichText::new("Start").color(label_color));
                        ui.add(egui::TextEdit::singleline(&mut form.start_date).hint_text("YYYY-MM-DD").desired_width(140.0));
                        ui.end_row();

                        ui.label(RichText::new("End").color(label_color));
                        ui.add(egui::TextEdit::singleline(&mut form.end_date).hint_text("YYYY-MM-DD").desired_width(140.0));
                        ui.end_row();

                        ui.label("");
                        ui.checkbox(&mut form.deployed, "Deployed to production");
                        ui.end_row();
                    });

                if let Some(error) = &self.dialog_error {
                    ui.add_space(8.0);
                    ui.label(RichText::new(error).color(theme::ERROR_COLOR));
                }

                ui.add_space(16.0);
                ui.horizontal(|ui| {
                    let save_label = match self.dialog_mode {
                        DialogMode::Add => "Add",
                        DialogMode::Edit(_) => "Update",
                    };
                    if ui.add(egui::Button::new(RichText::new(save_label).color(Color32::WHITE)).fill(theme::ACCENT)).clicked() {
                        save_requested = true;
                    }
                    if ui.button("Cancel").clicked() {
                        close_requested = true;
                    }
                    if matches!(self.dialog_mode, DialogMode::Edit(_)) {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let delete = ui.add(egui::Button::new(
                                RichText::new(format!("{} Delete", egui_phosphor::regular::TRASH)).color(theme::ERROR_COLOR)
                            ));
                            if delete.clicked() {
                                delete_requested = true;
                            }
                        });
                    }
                });
            });

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            close_requested = true;
        }

        if save_requested {
            self.save_dialog();
        } else if delete_requested {
            if let DialogMode::Edit(id) = self.dialog_mode {
                self.pending_delete = Some(id);
            }
        } else if close_requested {
            self.close_dialog();
        }
    }

    fn render_delete_confirm(&mut self, ctx: &egui::Context, id: RecordId) {
        let mut do_delete = false;
        let mut cancel_delete = false;

        egui::Window::new("Confirm delete")
            .collapsible(false)
            .resizable(false)
            .default_width(400.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(theme::dialog_frame())
            .show(ctx, |ui| {
                if let Some(record) = self.planner.get(id) {
                    ui.label(RichText::new("Delete this version?").size(14.0));
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&record.name).strong());
                        ui.label("-");
                        ui.add(egui::Label::new(&record.team).truncate());
                    });
                    if let Some(description) = &record.description {
                        ui.label(RichText::new(description).italics());
                    }
                    ui.add_space(6.0);
                    ui.label(RichText::new("This cannot be undone.").color(theme::ERROR_COLOR));
                }

                ui.add_space(20.0);

                ui.horizontal(|ui| {
                    if ui.add(egui::Button::new(RichText::new("Delete permanently").color(theme::ERROR_COLOR))).clicked() {
                        do_delete = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel_delete = true;
                    }
                });
            });

        if do_delete {
            self.pending_delete = None;
            self.close_dialog();
            self.delete_record(id);
        }
        if cancel_delete {
            self.pending_delete = None;
        }
    }
}

impl eframe::App for PlannerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle pinch-to-zoom (trackpad pinch or Ctrl+scroll)
        let zoom_delta = ctx.input(|i| i.zoom_delta());
        if zoom_delta != 1.0 {
            self.config = self.config.with_font_scale(self.config.font_scale * zoom_delta);
            // Only persist noticeable changes
            if (zoom_delta - 1.0).abs() > 0.01 {
                if let Err(e) = self.config.save() {
                    tracing::warn!(error = %e, "failed to save config");
                }
            }
        }
        ctx.set_pixels_per_point(self.config.font_scale);

        // Delete confirmation replaces the editor while open
        if let Some(id) = self.pending_delete {
            self.render_delete_confirm(ctx, id);
        } else if self.show_dialog {
            self.render_editor(ctx);
        }

        egui::CentralPanel::default().frame(
            egui::Frame::none()
                .fill(Color32::BLACK)
                .inner_margin(egui::Margin::symmetric(16.0, 12.0))
        ).show(ctx, |ui| {
            self.render_main(ui);
        });
    }
}
