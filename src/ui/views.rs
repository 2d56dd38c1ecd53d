use egui::{Color32, RichText, Ui};

use crate::planner::{
    layout_bar, BarLayout, Environment, EnvironmentGroup, Filters, MonthView, QualificationRecord, RecordId,
};
use super::theme::{self, row_colors, rgb, timeline_colors};

const LABEL_COLUMN_WIDTH: f32 = 260.0;
const ROW_HEIGHT: f32 = 48.0;
const HEADER_ROW_HEIGHT: f32 = 22.0;

/// Result from timeline interactions
#[derive(Default)]
pub struct TimelineResult {
    pub edit: Option<RecordId>,
}

/// Environment, team and search controls
/// Returns true if any filter changed
pub fn render_filter_bar(ui: &mut Ui, filters: &mut Filters, teams: &[String]) -> bool {
    let mut changed = false;

    ui.horizontal(|ui| {
        ui.label("Environment");
        let env_text = filters.environment.map(Environment::name).unwrap_or("All");
        egui::ComboBox::from_id_salt("environment_filter")
            .selected_text(env_text)
            .width(170.0)
            .show_ui(ui, |ui| {
                changed |= ui.selectable_value(&mut filters.environment, None, "All").changed();
                for env in Environment::ALL {
                    changed |= ui.selectable_value(&mut filters.environment, Some(env), env.name()).changed();
                }
            });

        ui.add_space(8.0);
        ui.label("Team");
        let team_text = filters.team.clone().unwrap_or_else(|| "All".to_string());
        egui::ComboBox::from_id_salt("team_filter")
            .selected_text(team_text)
            .width(140.0)
            .show_ui(ui, |ui| {
                changed |= ui.selectable_value(&mut filters.team, None, "All").changed();
                for team in teams {
                    changed |= ui.selectable_value(&mut filters.team, Some(team.clone()), team.as_str()).changed();
                }
            });

        ui.add_space(8.0);
        ui.label(RichText::new(egui_phosphor::regular::MAGNIFYING_GLASS).size(16.0));
        let search = ui.add(
            egui::TextEdit::singleline(&mut filters.search)
                .hint_text("Search name, team, description...")
                .desired_width(260.0)
        );
        changed |= search.changed();

        if filters.is_active() {
            let clear = ui.add(egui::Label::new(
                RichText::new(format!("{} Clear", egui_phosphor::regular::X)).size(14.0).color(theme::ACCENT)
            ).sense(egui::Sense::click()));
            if clear.hovered() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            }
            if clear.clicked() {
                *filters = Filters::default();
                changed = true;
            }
        }
    });

    changed
}

/// Weekday abbreviations and day numbers, one column per working day
fn render_day_header(ui: &mut Ui, view: &MonthView, bar_width: f32) {
    let (grid_line, today_bg, header_text) = timeline_colors();
    let available_width = LABEL_COLUMN_WIDTH + bar_width;
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(available_width, HEADER_ROW_HEIGHT * 2.0),
        egui::Sense::hover()
    );
    let painter = ui.painter();
    let day_width = bar_width / view.days.len() as f32;

    painter.text(
        egui::pos2(rect.min.x + 8.0, rect.center().y),
        egui::Align2::LEFT_CENTER,
        "Version",
        egui::FontId::proportional(13.0),
        header_text,
    );

    for (i, day) in view.days.iter().enumerate() {
        let x = rect.min.x + LABEL_COLUMN_WIDTH + i as f32 * day_width;
        let col_rect = egui::Rect::from_min_size(
            egui::pos2(x, rect.min.y),
            egui::vec2(day_width, HEADER_ROW_HEIGHT * 2.0)
        );

        if day.is_today {
            painter.rect(col_rect.shrink(1.0), 4.0, today_bg, egui::Stroke::new(1.0, theme::ACCENT));
        }

        painter.text(
            egui::pos2(col_rect.center().x, col_rect.min.y + HEADER_ROW_HEIGHT / 2.0),
            egui::Align2::CENTER_CENTER,
            day.abbrev,
            egui::FontId::proportional(11.0),
            header_text,
        );

        let number_color = if day.is_today { theme::ACCENT } else { Color32::WHITE };
        painter.text(
            egui::pos2(col_rect.center().x, col_rect.min.y + HEADER_ROW_HEIGHT * 1.5),
            egui::Align2::CENTER_CENTER,
            day.date.format("%-d").to_string(),
            egui::FontId::proportional(13.0),
            number_color,
        );

        // Vertical separator between columns
        if i > 0 {
            painter.line_segment(
                [egui::pos2(x, col_rect.min.y + 4.0), egui::pos2(x, col_rect.max.y - 4.0)],
                egui::Stroke::new(1.0, grid_line),
            );
        }
    }
}

/// Render the month timeline, one section per environment
pub fn render_timeline(ui: &mut Ui, view: &MonthView, groups: &[EnvironmentGroup<'_>]) -> TimelineResult {
    let mut result = TimelineResult::default();
    let bar_width = (ui.available_width() - LABEL_COLUMN_WIDTH).max(200.0);

    render_day_header(ui, view, bar_width);
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, true])
        .show(ui, |ui| {
            for group in groups {
                render_group_heading(ui, group);
                if group.records.is_empty() {
                    ui.horizontal(|ui| {
                        ui.add_space(16.0);
                        ui.label(RichText::new("No qualifications").italics().color(row_colors().2));
                    });
                    ui.add_space(8.0);
                    continue;
                }
                for record in &group.records {
                    if render_row(ui, view, record, bar_width) {
                        result.edit = Some(record.id);
                    }
                }
                ui.add_space(12.0);
            }
        });

    result
}

fn render_group_heading(ui: &mut Ui, group: &EnvironmentGroup<'_>) {
    ui.horizontal(|ui| {
        let (dot, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
        ui.painter().circle_filled(dot.center(), 6.0, rgb(group.environment.color()));
        ui.label(RichText::new(group.environment.name()).size(16.0).strong().color(Color32::WHITE));
        ui.label(RichText::new(format!("{}", group.records.len())).size(13.0).color(row_colors().2));
    });
    ui.add_space(4.0);
}

/// One label cell plus its bar. Returns true if either was clicked.
fn render_row(ui: &mut Ui, view: &MonthView, record: &QualificationRecord, bar_width: f32) -> bool {
    let (row_bg, text_color, secondary) = row_colors();
    let (grid_line, today_bg, _) = timeline_colors();

    let (row_rect, _) = ui.allocate_exact_size(
        egui::vec2(LABEL_COLUMN_WIDTH + bar_width, ROW_HEIGHT),
        egui::Sense::hover()
    );
    let label_rect = egui::Rect::from_min_size(row_rect.min, egui::vec2(LABEL_COLUMN_WIDTH, ROW_HEIGHT)).shrink(2.0);
    let track_rect = egui::Rect::from_min_size(
        egui::pos2(row_rect.min.x + LABEL_COLUMN_WIDTH, row_rect.min.y),
        egui::vec2(bar_width, ROW_HEIGHT)
    );

    let label_response = ui.interact(label_rect, ui.id().with(("label", record.id)), egui::Sense::click());

    if !ui.is_rect_visible(row_rect) {
        return label_response.clicked();
    }

    let painter = ui.painter();

    // Label cell with an environment-colored left edge
    let label_bg = if label_response.hovered() { Color32::from_rgb(32, 32, 30) } else { row_bg };
    painter.rect_filled(label_rect, 6.0, label_bg);
    painter.rect_filled(
        egui::Rect::from_min_size(label_rect.min, egui::vec2(4.0, label_rect.height())),
        2.0,
        rgb(record.color),
    );

    let text_left = label_rect.min.x + 12.0;
    let name_rect = painter.text(
        egui::pos2(text_left, label_rect.min.y + 14.0),
        egui::Align2::LEFT_CENTER,
        &record.name,
        egui::FontId::proportional(14.0),
        text_color,
    );
    painter.text(
        egui::pos2(name_rect.max.x + 8.0, label_rect.min.y + 14.0),
        egui::Align2::LEFT_CENTER,
        &record.team,
        egui::FontId::proportional(12.0),
        secondary,
    );
    if record.deployed {
        painter.text(
            egui::pos2(label_rect.max.x - 8.0, label_rect.min.y + 14.0),
            egui::Align2::RIGHT_CENTER,
            format!("{} Deployed", egui_phosphor::regular::ROCKET_LAUNCH),
            egui::FontId::proportional(11.0),
            theme::DEPLOYED_BORDER,
        );
    }
    if let Some(description) = &record.description {
        let clipped = painter.with_clip_rect(label_rect.shrink(4.0));
        clipped.text(
            egui::pos2(text_left, label_rect.min.y + 33.0),
            egui::Align2::LEFT_CENTER,
            description,
            egui::FontId::proportional(12.0),
            secondary,
        );
    }

    // Track: today column and column separators
    let day_width = bar_width / view.days.len() as f32;
    if let Some(today) = view.today_index() {
        let x = track_rect.min.x + today as f32 * day_width;
        painter.rect_filled(
            egui::Rect::from_min_size(egui::pos2(x, track_rect.min.y), egui::vec2(day_width, ROW_HEIGHT)),
            0.0,
            today_bg,
        );
    }
    for i in 0..=view.days.len() {
        let x = track_rect.min.x + i as f32 * day_width;
        painter.line_segment(
            [egui::pos2(x, track_rect.min.y), egui::pos2(x, track_rect.max.y)],
            egui::Stroke::new(1.0, grid_line),
        );
    }

    let Some(bar) = layout_bar(record, view) else {
        return label_response.clicked();
    };
    let bar_clicked = render_bar(ui, record, &bar, track_rect);

    label_response.clicked() || bar_clicked
}

fn render_bar(ui: &mut Ui, record: &QualificationRecord, bar: &BarLayout, track_rect: egui::Rect) -> bool {
    let left = track_rect.min.x + track_rect.width() * (bar.left_percent / 100.0) as f32;
    let width = track_rect.width() * (bar.width_percent / 100.0) as f32;
    let bar_rect = egui::Rect::from_min_size(
        egui::pos2(left, track_rect.min.y + 8.0),
        egui::vec2(width, ROW_HEIGHT - 16.0)
    ).shrink2(egui::vec2(1.0, 0.0));

    let response = ui.interact(bar_rect, ui.id().with(("bar", record.id)), egui::Sense::click());

    let fill = rgb(record.color);
    let fill = if response.hovered() { fill.gamma_multiply(1.2) } else { fill };
    let stroke = if record.deployed {
        egui::Stroke::new(2.0, theme::DEPLOYED_BORDER)
    } else {
        egui::Stroke::new(1.0, Color32::from_black_alpha(25))
    };

    let painter = ui.painter();
    painter.rect(bar_rect, 4.0, fill, stroke);
    painter.with_clip_rect(bar_rect.shrink(2.0)).text(
        egui::pos2(bar_rect.min.x + 6.0, bar_rect.center().y),
        egui::Align2::LEFT_CENTER,
        format!("{} ({}d)", record.name, bar.duration_days),
        egui::FontId::proportional(12.0),
        Color32::WHITE,
    );

    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }

    let mut tooltip = format!(
        "{} ({})\n{}\n{} - {}",
        record.name,
        record.team,
        record.description.as_deref().unwrap_or("No description"),
        record.start_date.format("%-d %b %Y"),
        record.end_date.format("%-d %b %Y"),
    );
    if (bar.visible_start, bar.visible_end) != (record.start_date, record.end_date) {
        tooltip.push_str(&format!(
            "\nShown: {} - {}",
            bar.visible_start.format("%-d %b"),
            bar.visible_end.format("%-d %b"),
        ));
    }
    response.on_hover_text(tooltip).clicked()
}

pub fn render_legend(ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.label(RichText::new("Environments").color(row_colors().2));
        for env in Environment::ALL {
            ui.add_space(8.0);
            let (swatch, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
            ui.painter().rect_filled(swatch, 3.0, rgb(env.color()));
            ui.label(env.name());
        }
        ui.add_space(16.0);
        let (swatch, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
        ui.painter().rect_stroke(swatch, 3.0, egui::Stroke::new(2.0, theme::DEPLOYED_BORDER));
        ui.label("Deployed");
    });
}
