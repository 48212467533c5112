use gantt_core::model::edit::{
    duration_label, set_duration, set_end_text, set_man_hours, set_progress, set_start_text,
};
use gantt_core::model::{DragState, GestureResolver, Project, RowBounds, Task};
use egui::{Color32, RichText, Sense, Stroke, Ui};
use uuid::Uuid;

use crate::ui::theme;

/// Actions that the task table can request.
pub enum TaskTableAction {
    None,
    Select(Uuid),
    Update(Task),
    Duplicate(Uuid),
    Delete(Uuid),
    Add,
    Reorder(Vec<Task>),
}

const NAME_WIDTH: f32 = 140.0;
const ASSIGNEE_WIDTH: f32 = 80.0;
const DATE_WIDTH: f32 = 78.0;
const NUMBER_WIDTH: f32 = 40.0;
const GRIP_WIDTH: f32 = 14.0;

/// Render the left-side task table panel.
///
/// Rows are laid out at the document row height below a header of the same
/// height as the chart header, so table rows line up with chart rows.
pub fn show_task_table(
    project: &Project,
    gestures: &mut GestureResolver,
    selected_task: Option<Uuid>,
    ui: &mut Ui,
) -> TaskTableAction {
    let mut action = TaskTableAction::None;
    let tasks = &project.tasks;
    let columns = project.settings.column_visibility;
    let window = project.window();
    let mask = project.mask();
    let row_height = project.settings.row_height.max(16.0);

    // Header area
    ui.allocate_ui_with_layout(
        egui::vec2(ui.available_width(), theme::HEADER_HEIGHT),
        egui::Layout::left_to_right(egui::Align::Center),
        |ui| {
            ui.label(
                RichText::new("Tasks")
                    .strong()
                    .size(15.0)
                    .color(theme::TEXT_PRIMARY),
            );
            ui.label(
                RichText::new(format!("({})", tasks.len()))
                    .size(11.0)
                    .color(theme::TEXT_DIM),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let btn = egui::Button::new(
                    RichText::new("＋  Add Task").color(Color32::WHITE).size(12.0),
                )
                .fill(theme::ACCENT)
                .rounding(egui::Rounding::same(5.0));
                if ui.add(btn).clicked() {
                    action = TaskTableAction::Add;
                }
            });
        },
    );

    // Column headers
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;
        let hdr = |ui: &mut Ui, text: &str, width: f32| {
            ui.add_sized(
                [width, 14.0],
                egui::Label::new(RichText::new(text).size(9.0).color(theme::TEXT_DIM).strong()),
            );
        };
        hdr(ui, "", GRIP_WIDTH);
        hdr(ui, "TASK", NAME_WIDTH);
        if columns.assignee {
            hdr(ui, "ASSIGNEE", ASSIGNEE_WIDTH);
        }
        if columns.start_date {
            hdr(ui, "START", DATE_WIDTH);
        }
        if columns.end_date {
            hdr(ui, "END", DATE_WIDTH);
        }
        if columns.duration {
            hdr(ui, "DAYS", NUMBER_WIDTH);
        }
        if columns.progress {
            hdr(ui, "%", NUMBER_WIDTH);
        }
        if columns.man_hours {
            hdr(ui, "HOURS", NUMBER_WIDTH);
        }
    });

    let mut grips = Vec::with_capacity(tasks.len());
    let mut rows = Vec::with_capacity(tasks.len());

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.spacing_mut().item_spacing.y = 0.0;
            for (i, task) in tasks.iter().enumerate() {
                let is_selected = selected_task == Some(task.id);
                let row_bg = if is_selected {
                    theme::BG_SELECTED
                } else if i % 2 == 0 {
                    theme::BG_PANEL
                } else {
                    theme::BG_DARK
                };

                let row = ui.allocate_ui_with_layout(
                    egui::vec2(ui.available_width(), row_height),
                    egui::Layout::left_to_right(egui::Align::Center),
                    |ui| {
                        ui.set_min_height(row_height);
                        ui.painter().rect_filled(ui.max_rect(), 0.0, row_bg);
                        ui.spacing_mut().item_spacing.x = 4.0;

                        let (grip_rect, grip) = ui.allocate_exact_size(
                            egui::vec2(GRIP_WIDTH, row_height),
                            Sense::drag(),
                        );
                        ui.painter().text(
                            grip_rect.center(),
                            egui::Align2::CENTER_CENTER,
                            "⠿",
                            theme::font_bar(),
                            theme::TEXT_DIM,
                        );
                        grips.push(grip.on_hover_cursor(egui::CursorIcon::Grab));

                        if let Some(name) = text_cell(ui, ("name", task.id), &task.name, NAME_WIDTH) {
                            let mut next = task.clone();
                            next.name = name;
                            action = TaskTableAction::Update(next);
                        }
                        if columns.assignee {
                            let current = task.assignee.clone().unwrap_or_default();
                            if let Some(text) = text_cell(ui, ("assignee", task.id), &current, ASSIGNEE_WIDTH) {
                                let mut next = task.clone();
                                let trimmed = text.trim();
                                next.assignee = (!trimmed.is_empty()).then(|| trimmed.to_string());
                                action = TaskTableAction::Update(next);
                            }
                        }
                        if columns.start_date {
                            let current = task.start_date.map(|d| d.format()).unwrap_or_default();
                            if let Some(text) = text_cell(ui, ("start", task.id), &current, DATE_WIDTH) {
                                if let Some(next) = set_start_text(task, &text, window) {
                                    action = TaskTableAction::Update(next);
                                }
                            }
                        }
                        if columns.end_date {
                            let current = task.end_date.map(|d| d.format()).unwrap_or_default();
                            if let Some(text) = text_cell(ui, ("end", task.id), &current, DATE_WIDTH) {
                                if let Some(next) = set_end_text(task, &text, window) {
                                    action = TaskTableAction::Update(next);
                                }
                            }
                        }
                        if columns.duration {
                            let current = duration_label(task, mask);
                            if let Some(text) = text_cell(ui, ("duration", task.id), &current, NUMBER_WIDTH) {
                                if let Some(next) = text
                                    .trim()
                                    .parse::<i64>()
                                    .ok()
                                    .and_then(|days| set_duration(task, days, window, mask))
                                {
                                    action = TaskTableAction::Update(next);
                                }
                            }
                        }
                        if columns.progress {
                            let current = task.progress.to_string();
                            if let Some(text) = text_cell(ui, ("progress", task.id), &current, NUMBER_WIDTH) {
                                if let Ok(value) = text.trim().parse::<f64>() {
                                    action = TaskTableAction::Update(set_progress(task, value.round() as i64));
                                }
                            }
                        }
                        if columns.man_hours {
                            let current = task.man_hours.map(|h| h.to_string()).unwrap_or_default();
                            if let Some(text) = text_cell(ui, ("hours", task.id), &current, NUMBER_WIDTH) {
                                let trimmed = text.trim();
                                let hours = if trimmed.is_empty() {
                                    Some(None)
                                } else {
                                    trimmed.parse::<f64>().ok().map(Some)
                                };
                                if let Some(next) = hours.and_then(|h| set_man_hours(task, h)) {
                                    action = TaskTableAction::Update(next);
                                }
                            }
                        }

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let del_btn = ui.add(
                                egui::Button::new(RichText::new("✕").size(10.0).color(theme::TEXT_DIM))
                                    .frame(false),
                            );
                            if del_btn.on_hover_text("Delete task").clicked() {
                                action = TaskTableAction::Delete(task.id);
                            }
                            let dup_btn = ui.add(
                                egui::Button::new(RichText::new("⧉").size(10.0).color(theme::TEXT_DIM))
                                    .frame(false),
                            );
                            if dup_btn.on_hover_text("Duplicate task").clicked() {
                                action = TaskTableAction::Duplicate(task.id);
                            }
                        });
                    },
                );

                let row_rect = row.response.rect;
                rows.push(RowBounds {
                    top: row_rect.top(),
                    bottom: row_rect.bottom(),
                });

                // Clicking the row background selects it
                let row_click = ui.interact(
                    row_rect,
                    egui::Id::new(("task-row", task.id)),
                    Sense::click(),
                );
                if row_click.clicked() {
                    action = TaskTableAction::Select(task.id);
                }
            }

            if let Some(reordered) = drive_reorder(project, gestures, &grips, &rows, ui) {
                action = TaskTableAction::Reorder(reordered);
            }

            if let DragState::Reordering(drag) = gestures.state() {
                let y = match rows.get(drag.drop_index) {
                    Some(row) => row.top,
                    None => rows.last().map(|r| r.bottom).unwrap_or(ui.min_rect().top()),
                };
                let x = ui.min_rect().x_range();
                ui.painter()
                    .hline(x, y, Stroke::new(2.0, theme::DROP_LINE));
            }
        });

    action
}

/// Feed the row-grip drag through the gesture resolver. Rows are in screen
/// coordinates; only their vertical extent matters here.
fn drive_reorder(
    project: &Project,
    gestures: &mut GestureResolver,
    grips: &[egui::Response],
    rows: &[RowBounds],
    ui: &Ui,
) -> Option<Vec<Task>> {
    let tasks = &project.tasks;
    for (grip, task) in grips.iter().zip(tasks) {
        if grip.drag_started() {
            gestures.begin_reorder(tasks, task.id);
        }
    }
    if !matches!(gestures.state(), DragState::Reordering(_)) {
        return None;
    }

    if grips.iter().any(|g| g.dragged()) {
        if let Some(pos) = ui.ctx().pointer_interact_pos() {
            gestures.reorder_moved(pos.y, rows);
        }
    }

    if grips.iter().any(|g| g.drag_stopped()) {
        return gestures.release(tasks);
    }
    None
}

/// Single-line editor that keeps its own buffer while focused and reports
/// the text once on commit (focus lost). Unchanged text reports nothing.
fn text_cell(ui: &mut Ui, key: (&str, Uuid), current: &str, width: f32) -> Option<String> {
    let id = ui.make_persistent_id(key);
    let mut buffer = ui
        .data_mut(|d| d.get_temp::<String>(id))
        .unwrap_or_else(|| current.to_string());
    let response = ui.add_sized(
        [width, 20.0],
        egui::TextEdit::singleline(&mut buffer).id(id.with("edit")),
    );

    if response.lost_focus() {
        ui.data_mut(|d| d.remove::<String>(id));
        return (buffer != current).then_some(buffer);
    }
    if response.has_focus() {
        ui.data_mut(|d| d.insert_temp(id, buffer));
    }
    None
}
