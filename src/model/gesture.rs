//! Pointer gestures on the chart and the task table.
//!
//! One [`GestureResolver`] lives for the whole editing session and holds at
//! most one active [`DragState`]. The host feeds it pointer-down, every
//! pointer-move and the final pointer-up, wherever on screen they land; the
//! resolver answers with previews while dragging and a replacement task list
//! on release. It never touches host state itself.

use uuid::Uuid;

use super::calendar::{add_working_days, count_working_days, shift_working_days, NonWorkingDays};
use super::date::CalendarDate;
use super::task::{move_task, replace_task, Task};
use super::timeline::{DayIndex, ProjectWindow};

/// Everything a gesture needs to know about the current chart geometry.
#[derive(Debug, Clone, Copy)]
pub struct ChartContext<'a> {
    pub index: &'a DayIndex,
    pub day_width: f32,
    pub window: ProjectWindow,
    pub mask: NonWorkingDays,
}

/// Pointer position in chart coordinates: x = 0 is the left edge of the
/// first day column, y shares the frame of the [`RowBounds`] passed in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
}

impl Pointer {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Vertical extent of one task row, in row order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBounds {
    pub top: f32,
    pub bottom: f32,
}

impl RowBounds {
    pub fn midpoint(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Start,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateDrag {
    pub task_id: Uuid,
    pub anchor: CalendarDate,
    /// Last working day the pointer moved over; unordered relative to `anchor`.
    pub current: Option<CalendarDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveDrag {
    pub task_id: Uuid,
    pub origin_x: f32,
    pub start: CalendarDate,
    pub end: CalendarDate,
    /// Working-day duration, never below 1.
    pub duration: u32,
    pub preview: (CalendarDate, CalendarDate),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeDrag {
    pub task_id: Uuid,
    pub origin_x: f32,
    /// Endpoint that stays put.
    pub fixed: CalendarDate,
    /// Pre-drag position of the endpoint under the pointer.
    pub moving: CalendarDate,
    /// Edge the gesture started on; the state variant tracks the current one.
    pub grabbed: ResizeEdge,
    pub preview: (CalendarDate, CalendarDate),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReorderDrag {
    pub task_id: Uuid,
    pub drop_index: usize,
}

/// The single transient gesture session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Creating(CreateDrag),
    Moving(MoveDrag),
    ResizingStart(ResizeDrag),
    ResizingEnd(ResizeDrag),
    Reordering(ReorderDrag),
}

/// What the host should show while a gesture is in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureUpdate {
    None,
    /// Live dates for the dragged task, already ordered.
    Dates {
        task_id: Uuid,
        start: CalendarDate,
        end: CalendarDate,
    },
    /// Insertion point for a reordered row (0..=len).
    DropTarget { task_id: Uuid, index: usize },
}

#[derive(Debug, Default)]
pub struct GestureResolver {
    state: DragState,
}

impl GestureResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != DragState::Idle
    }

    /// Id of the task being dragged, if any.
    pub fn active_task(&self) -> Option<Uuid> {
        match &self.state {
            DragState::Idle => None,
            DragState::Creating(c) => Some(c.task_id),
            DragState::Moving(m) => Some(m.task_id),
            DragState::ResizingStart(r) | DragState::ResizingEnd(r) => Some(r.task_id),
            DragState::Reordering(r) => Some(r.task_id),
        }
    }

    /// Dates to draw for the dragged task in place of its stored ones.
    pub fn preview(&self) -> Option<(Uuid, CalendarDate, CalendarDate)> {
        match &self.state {
            DragState::Creating(c) => c
                .current
                .map(|cur| (c.task_id, c.anchor.min(cur), c.anchor.max(cur))),
            DragState::Moving(m) => Some((m.task_id, m.preview.0, m.preview.1)),
            DragState::ResizingStart(r) | DragState::ResizingEnd(r) => {
                Some((r.task_id, r.preview.0, r.preview.1))
            }
            DragState::Idle | DragState::Reordering(_) => None,
        }
    }

    /// Start drawing a new bar on an unscheduled row.
    ///
    /// Rejected when a gesture is already active, the task already has a
    /// date, or the day under the pointer is outside the index or masked.
    pub fn begin_create(&mut self, task: &Task, pointer_x: f32, ctx: &ChartContext<'_>) -> bool {
        if self.is_active() || !task.is_unscheduled() {
            return false;
        }
        let anchor = match ctx.index.x_to_date(pointer_x, ctx.day_width) {
            Some(day) if ctx.mask.is_working(day) => day,
            _ => return false,
        };
        tracing::debug!(task = %task.id, %anchor, "create gesture started");
        self.state = DragState::Creating(CreateDrag {
            task_id: task.id,
            anchor,
            current: None,
        });
        true
    }

    /// Start dragging a whole bar.
    pub fn begin_move(&mut self, task: &Task, pointer_x: f32, ctx: &ChartContext<'_>) -> bool {
        if self.is_active() {
            return false;
        }
        let Some((start, end)) = task.dates() else {
            return false;
        };
        let duration = count_working_days(start, end, ctx.mask).max(1);
        tracing::debug!(task = %task.id, %start, %end, duration, "move gesture started");
        self.state = DragState::Moving(MoveDrag {
            task_id: task.id,
            origin_x: pointer_x,
            start,
            end,
            duration,
            preview: (start, end),
        });
        true
    }

    /// Start dragging one edge of a bar.
    pub fn begin_resize(&mut self, task: &Task, edge: ResizeEdge, pointer_x: f32) -> bool {
        if self.is_active() {
            return false;
        }
        let Some((start, end)) = task.dates() else {
            return false;
        };
        let (fixed, moving) = match edge {
            ResizeEdge::Start => (end, start),
            ResizeEdge::End => (start, end),
        };
        let drag = ResizeDrag {
            task_id: task.id,
            origin_x: pointer_x,
            fixed,
            moving,
            grabbed: edge,
            preview: (start, end),
        };
        tracing::debug!(task = %task.id, ?edge, "resize gesture started");
        self.state = match edge {
            ResizeEdge::Start => DragState::ResizingStart(drag),
            ResizeEdge::End => DragState::ResizingEnd(drag),
        };
        true
    }

    /// Start dragging a row to a new position in the list.
    pub fn begin_reorder(&mut self, tasks: &[Task], task_id: Uuid) -> bool {
        if self.is_active() {
            return false;
        }
        let Some(from) = tasks.iter().position(|t| t.id == task_id) else {
            return false;
        };
        tracing::debug!(task = %task_id, from, "reorder gesture started");
        self.state = DragState::Reordering(ReorderDrag {
            task_id,
            drop_index: from,
        });
        true
    }

    /// Feed a pointer-move event. Cheap enough to call at the native event rate.
    pub fn pointer_moved(
        &mut self,
        pointer: Pointer,
        ctx: &ChartContext<'_>,
        rows: &[RowBounds],
    ) -> GestureUpdate {
        match &mut self.state {
            DragState::Idle => GestureUpdate::None,
            DragState::Creating(drag) => {
                if let Some(day) = ctx.index.x_to_date(pointer.x, ctx.day_width) {
                    if ctx.mask.is_working(day) {
                        drag.current = Some(day);
                    }
                }
                match drag.current {
                    Some(current) => GestureUpdate::Dates {
                        task_id: drag.task_id,
                        start: drag.anchor.min(current),
                        end: drag.anchor.max(current),
                    },
                    None => GestureUpdate::None,
                }
            }
            DragState::Moving(drag) => {
                let delta = day_delta(pointer.x - drag.origin_x, ctx.day_width);
                drag.preview = resolve_move(drag.start, drag.duration, delta, ctx.window, ctx.mask);
                GestureUpdate::Dates {
                    task_id: drag.task_id,
                    start: drag.preview.0,
                    end: drag.preview.1,
                }
            }
            DragState::ResizingStart(drag) | DragState::ResizingEnd(drag) => {
                let delta = day_delta(pointer.x - drag.origin_x, ctx.day_width);
                let (start, end, edge) =
                    resolve_resize(drag.fixed, drag.moving, drag.grabbed, delta, ctx.window);
                drag.preview = (start, end);
                let update = GestureUpdate::Dates {
                    task_id: drag.task_id,
                    start,
                    end,
                };
                self.reclassify(edge);
                update
            }
            DragState::Reordering(_) => self.reorder_moved(pointer.y, rows),
        }
    }

    /// Feed a vertical pointer position to a reorder gesture. Rows only need
    /// their vertical extent; any other gesture state is left untouched.
    pub fn reorder_moved(&mut self, y: f32, rows: &[RowBounds]) -> GestureUpdate {
        match &mut self.state {
            DragState::Reordering(drag) => {
                drag.drop_index = drop_index(rows, y);
                GestureUpdate::DropTarget {
                    task_id: drag.task_id,
                    index: drag.drop_index,
                }
            }
            _ => GestureUpdate::None,
        }
    }

    /// End the gesture on pointer-up (or pointer-cancel).
    ///
    /// Always returns to idle. Yields the replacement task list when the
    /// gesture changed something; a create gesture that never reached a
    /// working day commits nothing.
    pub fn release(&mut self, tasks: &[Task]) -> Option<Vec<Task>> {
        let state = std::mem::take(&mut self.state);
        let result = match state {
            DragState::Idle => None,
            DragState::Creating(drag) => {
                let current = drag.current?;
                apply_dates(tasks, drag.task_id, drag.anchor, current)
            }
            DragState::Moving(MoveDrag {
                task_id, preview, ..
            })
            | DragState::ResizingStart(ResizeDrag {
                task_id, preview, ..
            })
            | DragState::ResizingEnd(ResizeDrag {
                task_id, preview, ..
            }) => apply_dates(tasks, task_id, preview.0, preview.1),
            DragState::Reordering(drag) => {
                let from = tasks.iter().position(|t| t.id == drag.task_id)?;
                let next = move_task(tasks, from, drag.drop_index);
                let changed = next
                    .iter()
                    .zip(tasks)
                    .any(|(a, b)| a.id != b.id);
                changed.then_some(next)
            }
        };
        if result.is_some() {
            tracing::debug!("gesture committed");
        }
        result
    }

    /// Flip between the two resize states when the dragged edge crossed the
    /// fixed one.
    fn reclassify(&mut self, edge: ResizeEdge) {
        let state = std::mem::take(&mut self.state);
        self.state = match (state, edge) {
            (DragState::ResizingStart(d), ResizeEdge::End) => DragState::ResizingEnd(d),
            (DragState::ResizingEnd(d), ResizeEdge::Start) => DragState::ResizingStart(d),
            (other, _) => other,
        };
    }
}

fn apply_dates(tasks: &[Task], task_id: Uuid, a: CalendarDate, b: CalendarDate) -> Option<Vec<Task>> {
    let task = tasks.iter().find(|t| t.id == task_id)?;
    let updated = task.clone().with_dates(a, b);
    if updated == *task {
        return None;
    }
    Some(replace_task(tasks, updated))
}

/// Whole calendar days covered by a horizontal pointer delta.
pub fn day_delta(pixel_delta: f32, day_width: f32) -> i64 {
    if day_width <= 0.0 {
        return 0;
    }
    (pixel_delta / day_width).round() as i64
}

/// New dates for a bar moved by `delta` calendar days.
///
/// The start is kept inside the window and the end re-derived so the task
/// keeps `duration` working days. If that end overshoots the window, the end
/// is pinned to the window end and the start walked back by the same
/// duration; a task longer than the window collapses against its trailing
/// edge.
pub fn resolve_move(
    anchor_start: CalendarDate,
    duration: u32,
    delta: i64,
    window: ProjectWindow,
    mask: NonWorkingDays,
) -> (CalendarDate, CalendarDate) {
    let duration = i64::from(duration.max(1));
    let mut start = anchor_start.add_days(delta).max(window.start);
    let mut end = add_working_days(start, duration, mask);
    if end > window.end {
        end = window.end;
        let last_working = add_working_days(end, 0, mask);
        start = shift_working_days(last_working, -(duration - 1), mask).max(window.start);
    }
    if end < start {
        end = start;
    }
    (start, end)
}

/// New dates for a bar whose `moving` endpoint was dragged by `delta`
/// calendar days while `fixed` stays put.
///
/// Returns the ordered dates plus the edge the pointer now controls: when
/// the moving endpoint crosses the fixed one, the roles swap. Landing exactly
/// on the fixed endpoint keeps the `grabbed` edge.
pub fn resolve_resize(
    fixed: CalendarDate,
    moving: CalendarDate,
    grabbed: ResizeEdge,
    delta: i64,
    window: ProjectWindow,
) -> (CalendarDate, CalendarDate, ResizeEdge) {
    let candidate = window.clamp(moving.add_days(delta));
    if candidate < fixed || (candidate == fixed && grabbed == ResizeEdge::Start) {
        (candidate, fixed, ResizeEdge::Start)
    } else {
        (fixed, candidate, ResizeEdge::End)
    }
}

/// Insertion point for a dragged row at height `y`.
///
/// Above a row's midpoint inserts before it; past the last midpoint (or
/// below the list) appends.
pub fn drop_index(rows: &[RowBounds], y: f32) -> usize {
    rows.iter()
        .position(|row| y < row.midpoint())
        .unwrap_or(rows.len())
}
