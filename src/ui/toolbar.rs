use gantt_core::model::CalendarDate;
use egui::{menu, RichText, Ui};

use crate::app::GanttApp;
use crate::ui::theme;

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut GanttApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_header()), |ui| {
            if ui.button("  New Project").clicked() {
                app.new_project();
                ui.close_menu();
            }
            if ui.button("  Open...").clicked() {
                app.open_project();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Save          Ctrl+S").clicked() {
                app.save_project();
                ui.close_menu();
            }
            if ui.button("  Save As...").clicked() {
                app.save_project_as();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_header()), |ui| {
            if ui.button("  Zoom In        Ctrl+Scroll ↑").clicked() {
                app.zoom.zoom_in();
                ui.close_menu();
            }
            if ui.button("  Zoom Out      Ctrl+Scroll ↓").clicked() {
                app.zoom.zoom_out();
                ui.close_menu();
            }
            ui.separator();
            ui.label(RichText::new("Columns").small().weak());
            let columns = &mut app.project.settings.column_visibility;
            ui.checkbox(&mut columns.assignee, "Assignee");
            ui.checkbox(&mut columns.start_date, "Start");
            ui.checkbox(&mut columns.end_date, "End");
            ui.checkbox(&mut columns.duration, "Duration");
            ui.checkbox(&mut columns.progress, "Progress");
            ui.checkbox(&mut columns.man_hours, "Man-hours");
        });

        ui.menu_button(RichText::new("  Calendar  ").font(theme::font_header()), |ui| {
            ui.label(RichText::new("Non-working days").small().weak());
            for (weekday, name) in WEEKDAY_NAMES.iter().enumerate() {
                let weekday = weekday as u8;
                let mut off = app.project.settings.non_working_days.contains(weekday);
                if ui.checkbox(&mut off, *name).changed()
                    && !app.project.settings.non_working_days.try_toggle(weekday)
                {
                    app.status_message = "At least one weekday must stay a working day".to_string();
                }
            }
        });

        ui.separator();
        window_fields(app, ui);

        // Right-aligned project name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let modified = if app.file_path.is_some() { "" } else { " (unsaved)" };
            ui.label(
                RichText::new(format!("{}{}", app.project.project_name, modified))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}

/// Project window and baseline date inputs.
fn window_fields(app: &mut GanttApp, ui: &mut Ui) {
    ui.label(RichText::new("From").size(11.0).color(theme::TEXT_SECONDARY));
    if let Some(start) = date_field(ui, "window-start", app.project.project_start) {
        app.project.set_window(start, app.project.project_end);
    }
    ui.label(RichText::new("to").size(11.0).color(theme::TEXT_SECONDARY));
    if let Some(end) = date_field(ui, "window-end", app.project.project_end) {
        app.project.set_window(app.project.project_start, end);
    }

    ui.add_space(8.0);
    let mut show_baseline = app.baseline.is_some();
    if ui.checkbox(&mut show_baseline, "Progress line").changed() {
        app.baseline = show_baseline.then(CalendarDate::today);
    }
    if let Some(current) = app.baseline {
        if let Some(cutoff) = date_field(ui, "baseline", current) {
            app.baseline = Some(cutoff);
        }
    }
}

/// Date text box that only commits a parseable `YYYY/MM/DD` on focus loss.
fn date_field(ui: &mut Ui, key: &str, current: CalendarDate) -> Option<CalendarDate> {
    let id = ui.make_persistent_id(key);
    let mut buffer = ui
        .data_mut(|d| d.get_temp::<String>(id))
        .unwrap_or_else(|| current.format());
    let response = ui.add_sized(
        [78.0, 20.0],
        egui::TextEdit::singleline(&mut buffer).id(id.with("edit")),
    );
    if response.lost_focus() {
        ui.data_mut(|d| d.remove::<String>(id));
        return CalendarDate::parse(buffer.trim()).filter(|d| *d != current);
    }
    if response.has_focus() {
        ui.data_mut(|d| d.insert_temp(id, buffer));
    }
    None
}
