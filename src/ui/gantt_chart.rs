use gantt_core::model::progress::progress_line;
use gantt_core::model::segments::{bar_extent, segment_fills, task_segments};
use gantt_core::model::{
    CalendarDate, ChartContext, DayIndex, DragState, GestureResolver, GestureUpdate, Pointer, Project,
    ResizeEdge, RowBounds, Settings, Task, ZoomLevel,
};
use egui::{Color32, CursorIcon, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use uuid::Uuid;

use crate::ui::theme;

const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const HANDLE_WIDTH: f32 = theme::HANDLE_WIDTH;

/// Result details from interactions in the Gantt chart.
#[derive(Debug, Default)]
pub struct ChartInteraction {
    /// Replacement task list from a finished gesture.
    pub committed: Option<Vec<Task>>,
    /// Latest preview while a gesture is in flight.
    pub update: Option<GestureUpdate>,
}

/// Colors taken from the document settings.
struct ChartColors {
    bar: Color32,
    progress: Color32,
    non_working: Color32,
    baseline: Color32,
}

impl ChartColors {
    fn from_settings(settings: &Settings) -> Self {
        Self {
            bar: theme::hex_color(&settings.bar_color, theme::ACCENT),
            progress: theme::hex_color(&settings.progress_color, Color32::from_rgb(26, 95, 180)),
            non_working: theme::hex_color(&settings.non_working_color, theme::BG_HEADER),
            baseline: theme::hex_color(&settings.baseline_color, Color32::from_rgb(240, 75, 75)),
        }
    }
}

/// What the pointer is over, in chart coordinates.
enum HitTarget {
    EmptyRow,
    Edge(ResizeEdge),
    Body,
}

/// Render the Gantt chart area (right panel).
pub fn show_gantt_chart(
    project: &Project,
    zoom: &mut ZoomLevel,
    gestures: &mut GestureResolver,
    baseline: Option<CalendarDate>,
    selected_task: &mut Option<Uuid>,
    ui: &mut Ui,
) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();

    // Handle zoom with scroll wheel
    let scroll_delta = ui.input(|i| i.smooth_scroll_delta);
    if ui.rect_contains_pointer(ui.max_rect()) && ui.input(|i| i.modifiers.ctrl) {
        if scroll_delta.y > 0.0 {
            zoom.zoom_in();
        } else if scroll_delta.y < 0.0 {
            zoom.zoom_out();
        }
    }

    let window = project.window();
    let index = DayIndex::build(&window);
    let mask = project.mask();
    let day_width = zoom.day_width();
    let row_height = project.settings.row_height.max(16.0);
    let ctx = ChartContext {
        index: &index,
        day_width,
        window,
        mask,
    };
    let colors = ChartColors::from_settings(&project.settings);
    let tasks = &project.tasks;

    let available = ui.available_size();
    let chart_width = index.total_width(day_width).max(available.x);
    let chart_height = HEADER_HEIGHT + tasks.len() as f32 * row_height + 40.0;

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(
                Vec2::new(chart_width, chart_height.max(available.y)),
                Sense::click_and_drag(),
            );
            let origin = response.rect.min;
            let bottom = response.rect.bottom();
            let to_chart =
                |pos: Pos2| Pointer::new(pos.x - origin.x, pos.y - origin.y - HEADER_HEIGHT);
            let rows = row_bounds(tasks.len(), row_height);

            // ── Gesture input ──────────────────────────────────────────────
            if response.drag_started() {
                let press = ui
                    .input(|i| i.pointer.press_origin())
                    .or(response.interact_pointer_pos());
                if let Some(pos) = press {
                    if let Some(id) = begin_gesture(tasks, gestures, &ctx, to_chart(pos), row_height) {
                        *selected_task = Some(id);
                    }
                }
            }
            if response.dragged() && gestures.is_active() {
                if let Some(pos) = response.interact_pointer_pos() {
                    interaction.update = Some(gestures.pointer_moved(to_chart(pos), &ctx, &rows));
                }
            }
            if response.drag_stopped() {
                interaction.committed = gestures.release(tasks);
            }
            if response.clicked() {
                *selected_task = response
                    .interact_pointer_pos()
                    .and_then(|pos| row_at(to_chart(pos), row_height))
                    .and_then(|row| tasks.get(row))
                    .map(|t| t.id);
            }

            // ── Background ─────────────────────────────────────────────────
            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);
            for (i, _task) in tasks.iter().enumerate() {
                let y = origin.y + HEADER_HEIGHT + i as f32 * row_height;
                if i % 2 == 0 {
                    painter.rect_filled(
                        Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(chart_width, row_height)),
                        0.0,
                        theme::BG_PANEL,
                    );
                }
            }
            for (i, day) in index.days().iter().enumerate() {
                if !mask.is_working(*day) {
                    let x = origin.x + i as f32 * day_width;
                    painter.rect_filled(
                        Rect::from_min_max(
                            Pos2::new(x, origin.y + HEADER_HEIGHT),
                            Pos2::new(x + day_width, bottom),
                        ),
                        0.0,
                        colors.non_working,
                    );
                }
            }
            draw_timeline_header(&painter, origin, &index, day_width, chart_width, bottom, project);

            // ── Bars ───────────────────────────────────────────────────────
            let preview = gestures.preview();
            for (i, task) in tasks.iter().enumerate() {
                let y = origin.y + HEADER_HEIGHT + i as f32 * row_height;
                let shown = match preview {
                    Some((id, start, end)) if id == task.id => task.clone().with_dates(start, end),
                    _ => task.clone(),
                };
                let is_selected = *selected_task == Some(task.id);
                draw_task_bar(&painter, origin, &ctx, &shown, y, row_height, is_selected, &colors);
            }

            if let Some(cutoff) = baseline {
                draw_progress_line(&painter, origin, &ctx, tasks, cutoff, row_height, bottom, &colors);
            }

            // ── Cursor affordances ─────────────────────────────────────────
            match gestures.state() {
                DragState::Moving(_) => {
                    ui.ctx().set_cursor_icon(CursorIcon::Grabbing)
                }
                DragState::ResizingStart(_)
                | DragState::ResizingEnd(_) => {
                    ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal)
                }
                DragState::Creating(_) => {
                    ui.ctx().set_cursor_icon(CursorIcon::Crosshair)
                }
                _ => {
                    if let Some(pos) = response.hover_pos() {
                        match hit_test(tasks, &ctx, to_chart(pos), row_height) {
                            Some((_, HitTarget::Edge(_))) => {
                                ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal)
                            }
                            Some((_, HitTarget::Body)) => ui.ctx().set_cursor_icon(CursorIcon::Grab),
                            Some((_, HitTarget::EmptyRow)) => {
                                ui.ctx().set_cursor_icon(CursorIcon::Crosshair)
                            }
                            None => {}
                        }
                    }
                }
            }
        });

    interaction
}

fn row_bounds(count: usize, row_height: f32) -> Vec<RowBounds> {
    (0..count)
        .map(|i| RowBounds {
            top: i as f32 * row_height,
            bottom: (i + 1) as f32 * row_height,
        })
        .collect()
}

fn row_at(pointer: Pointer, row_height: f32) -> Option<usize> {
    if pointer.y < 0.0 {
        return None;
    }
    Some((pointer.y / row_height).floor() as usize)
}

fn hit_test<'t>(
    tasks: &'t [Task],
    ctx: &ChartContext<'_>,
    pointer: Pointer,
    row_height: f32,
) -> Option<(&'t Task, HitTarget)> {
    let task = tasks.get(row_at(pointer, row_height)?)?;
    if task.is_unscheduled() {
        return Some((task, HitTarget::EmptyRow));
    }
    let (left, right) = bar_extent(task, ctx.index, ctx.day_width, ctx.mask)?;
    let grip = grip_width(right - left, ctx.day_width);
    if (pointer.x - left).abs() <= grip {
        Some((task, HitTarget::Edge(ResizeEdge::Start)))
    } else if (pointer.x - right).abs() <= grip {
        Some((task, HitTarget::Edge(ResizeEdge::End)))
    } else if pointer.x > left && pointer.x < right {
        Some((task, HitTarget::Body))
    } else {
        None
    }
}

/// Width of the resize zone at each bar edge. Capped at a third of the bar so
/// narrow bars keep a body to grab for moving.
fn grip_width(bar_width: f32, day_width: f32) -> f32 {
    HANDLE_WIDTH.max(day_width * 0.2).min(bar_width / 3.0)
}

/// Start the gesture matching what is under the pointer; returns the task to select.
fn begin_gesture(
    tasks: &[Task],
    gestures: &mut GestureResolver,
    ctx: &ChartContext<'_>,
    pointer: Pointer,
    row_height: f32,
) -> Option<Uuid> {
    let (task, target) = hit_test(tasks, ctx, pointer, row_height)?;
    let started = match target {
        HitTarget::EmptyRow => gestures.begin_create(task, pointer.x, ctx),
        HitTarget::Edge(edge) => gestures.begin_resize(task, edge, pointer.x),
        HitTarget::Body => gestures.begin_move(task, pointer.x, ctx),
    };
    started.then_some(task.id)
}

fn draw_timeline_header(
    painter: &egui::Painter,
    origin: Pos2,
    index: &DayIndex,
    day_width: f32,
    width: f32,
    bottom: f32,
    project: &Project,
) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    let mask = project.mask();
    for (i, day) in index.days().iter().enumerate() {
        let x = origin.x + i as f32 * day_width;

        // Week lines always, day lines once there is room.
        if day.weekday_index() == 1 || day_width >= 20.0 {
            painter.line_segment(
                [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, bottom)],
                Stroke::new(0.5, theme::GRID_LINE),
            );
        }

        if day_width >= 16.0 {
            let day_color = if mask.is_working(*day) {
                theme::TEXT_SECONDARY
            } else {
                theme::TEXT_DIM
            };
            painter.text(
                Pos2::new(x + day_width / 2.0, origin.y + 30.0),
                egui::Align2::CENTER_CENTER,
                day.day().to_string(),
                theme::font_sub(),
                day_color,
            );
        }

        if day.day() == 1 || i == 0 {
            painter.text(
                Pos2::new(x + 3.0, origin.y + 12.0),
                egui::Align2::LEFT_CENTER,
                day.naive().format("%b %Y").to_string(),
                theme::font_header(),
                theme::TEXT_PRIMARY,
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_task_bar(
    painter: &egui::Painter,
    origin: Pos2,
    ctx: &ChartContext<'_>,
    task: &Task,
    y: f32,
    row_height: f32,
    is_selected: bool,
    colors: &ChartColors,
) {
    let Some((left, right)) = bar_extent(task, ctx.index, ctx.day_width, ctx.mask) else {
        return;
    };
    let top = y + theme::BAR_INSET;
    let bar_bottom = y + row_height - theme::BAR_INSET;
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    let segments = task_segments(task, ctx.mask);
    let fills = segment_fills(&segments, task.progress);
    let mut previous_right: Option<f32> = None;
    for (segment, fill) in segments.iter().zip(fills) {
        let Some(span) = ctx.index.grid_span(segment.start, segment.end) else {
            continue;
        };
        let x0 = origin.x + span.start_index as f32 * ctx.day_width;
        let x1 = origin.x + (span.end_index + 1) as f32 * ctx.day_width;

        // Thin connector across the non-working gap.
        if let Some(prev) = previous_right {
            let mid = (top + bar_bottom) / 2.0;
            painter.line_segment(
                [Pos2::new(prev, mid), Pos2::new(x0, mid)],
                Stroke::new(1.0, colors.bar.gamma_multiply(0.6)),
            );
        }
        previous_right = Some(x1);

        let rect = Rect::from_min_max(Pos2::new(x0, top), Pos2::new(x1, bar_bottom));
        painter.rect_filled(rect, rounding, colors.bar);
        if fill > 0.0 {
            let fill_rect = Rect::from_min_size(rect.min, Vec2::new(rect.width() * fill, rect.height()));
            painter.rect_filled(fill_rect, rounding, colors.progress);
        }
    }

    let extent = Rect::from_min_max(
        Pos2::new(origin.x + left, top),
        Pos2::new(origin.x + right, bar_bottom),
    );

    if is_selected {
        painter.rect_stroke(
            extent.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
        let handle_h = extent.height() * 0.55;
        let handle_y = extent.center().y - handle_h / 2.0;
        for hx in [extent.left() - 1.5, extent.right() - 2.5] {
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(hx, handle_y), Vec2::new(4.0, handle_h)),
                Rounding::same(2.0),
                theme::HANDLE_COLOR,
            );
        }
    }

    // Label starts at the first working day, clipped to the bar when it fits.
    let galley = painter.layout_no_wrap(task.name.clone(), theme::font_bar(), theme::TEXT_ON_BAR);
    let text_y = extent.center().y - galley.size().y / 2.0;
    if galley.size().x + 12.0 <= extent.width() {
        painter
            .with_clip_rect(extent)
            .galley(Pos2::new(extent.left() + 6.0, text_y), galley, Color32::TRANSPARENT);
    } else {
        painter.text(
            Pos2::new(extent.right() + 6.0, extent.center().y),
            egui::Align2::LEFT_CENTER,
            &task.name,
            theme::font_bar(),
            theme::TEXT_SECONDARY,
        );
    }
}

/// Zig-zag progress line: straight down the cutoff, bending out to each
/// task's progress marker at the middle of its row.
#[allow(clippy::too_many_arguments)]
fn draw_progress_line(
    painter: &egui::Painter,
    origin: Pos2,
    ctx: &ChartContext<'_>,
    tasks: &[Task],
    cutoff: CalendarDate,
    row_height: f32,
    bottom: f32,
    colors: &ChartColors,
) {
    let Some(cutoff_x) = ctx.index.date_to_x(cutoff, ctx.day_width) else {
        return;
    };
    let cx = origin.x + cutoff_x;
    let stroke = Stroke::new(1.5, colors.baseline);
    let markers = progress_line(cutoff, tasks, ctx.index, ctx.day_width, ctx.mask);

    let mut points = vec![Pos2::new(cx, origin.y + HEADER_HEIGHT)];
    for (i, marker) in markers.iter().enumerate() {
        let top = origin.y + HEADER_HEIGHT + i as f32 * row_height;
        if let Some(mx) = marker {
            points.push(Pos2::new(cx, top + row_height * 0.2));
            points.push(Pos2::new(origin.x + mx, top + row_height / 2.0));
            points.push(Pos2::new(cx, top + row_height * 0.8));
        }
    }
    points.push(Pos2::new(cx, bottom));
    painter.add(egui::Shape::line(points, stroke));

    painter.text(
        Pos2::new(cx + 4.0, origin.y + HEADER_HEIGHT + 8.0),
        egui::Align2::LEFT_CENTER,
        cutoff.format(),
        theme::font_small(),
        colors.baseline,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantt_core::model::{NonWorkingDays, ProjectWindow};

    fn d(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    #[test]
    fn one_day_bar_has_a_body_at_every_zoom() {
        let window = ProjectWindow::new(d("2024/01/01"), d("2024/01/31"));
        let index = DayIndex::build(&window);
        let tasks = vec![Task::new("t").with_dates(d("2024/01/10"), d("2024/01/10"))];

        for level in 0..gantt_core::model::timeline::DAY_WIDTHS.len() {
            let day_width = ZoomLevel::new(level).day_width();
            let ctx = ChartContext {
                index: &index,
                day_width,
                window,
                mask: NonWorkingDays::WEEKENDS,
            };
            let center = 9.5 * day_width;
            let hit = hit_test(&tasks, &ctx, Pointer::new(center, 5.0), 32.0);
            assert!(matches!(hit, Some((_, HitTarget::Body))), "zoom level {level}");

            let left = hit_test(&tasks, &ctx, Pointer::new(9.0 * day_width, 5.0), 32.0);
            assert!(matches!(left, Some((_, HitTarget::Edge(ResizeEdge::Start)))));
        }
    }
}
