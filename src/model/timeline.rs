use serde::{Deserialize, Serialize};

use super::date::{enumerate_range, CalendarDate};

/// Pixel width of one day at each zoom level, ascending.
pub const DAY_WIDTHS: [f32; 8] = [8.0, 12.0, 16.0, 20.0, 28.0, 36.0, 48.0, 64.0];

/// Index into [`DAY_WIDTHS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomLevel(usize);

impl Default for ZoomLevel {
    fn default() -> Self {
        Self(3)
    }
}

impl ZoomLevel {
    /// Out-of-range levels clamp to the widest one.
    pub fn new(level: usize) -> Self {
        Self(level.min(DAY_WIDTHS.len() - 1))
    }

    pub fn level(&self) -> usize {
        self.0
    }

    /// Pixels per day at this level.
    pub fn day_width(&self) -> f32 {
        DAY_WIDTHS[self.0]
    }

    pub fn zoom_in(&mut self) {
        self.0 = (self.0 + 1).min(DAY_WIDTHS.len() - 1);
    }

    pub fn zoom_out(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }
}

/// Visible and clampable bound of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectWindow {
    pub start: CalendarDate,
    pub end: CalendarDate,
}

impl ProjectWindow {
    pub fn new(start: CalendarDate, end: CalendarDate) -> Self {
        Self { start, end }
    }

    /// Parse both bounds from `YYYY/MM/DD` text.
    pub fn parse(start: &str, end: &str) -> Option<Self> {
        Some(Self::new(CalendarDate::parse(start)?, CalendarDate::parse(end)?))
    }

    pub fn contains(&self, date: CalendarDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Pull `date` inside the window. An inverted window pins to `start`.
    pub fn clamp(&self, date: CalendarDate) -> CalendarDate {
        if date > self.end {
            self.end.max(self.start)
        } else if date < self.start {
            self.start
        } else {
            date
        }
    }
}

/// Inclusive range of day-index positions covered by a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpan {
    pub start_index: usize,
    pub end_index: usize,
}

impl GridSpan {
    /// Number of day columns spanned.
    pub fn day_count(&self) -> usize {
        self.end_index - self.start_index + 1
    }
}

/// Dense ascending list of every day in the project window.
///
/// Position in the list times the day width is the X offset of that day.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DayIndex {
    days: Vec<CalendarDate>,
}

impl DayIndex {
    /// Build the index for `window`; empty when the window is inverted.
    pub fn build(window: &ProjectWindow) -> Self {
        Self {
            days: enumerate_range(window.start, window.end),
        }
    }

    /// Build the index from raw window text; malformed text yields an empty index.
    pub fn build_from_text(start: &str, end: &str) -> Self {
        ProjectWindow::parse(start, end)
            .map(|w| Self::build(&w))
            .unwrap_or_default()
    }

    pub fn days(&self) -> &[CalendarDate] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn first(&self) -> Option<CalendarDate> {
        self.days.first().copied()
    }

    pub fn last(&self) -> Option<CalendarDate> {
        self.days.last().copied()
    }

    /// Position of `date`, exact match only.
    pub fn position(&self, date: CalendarDate) -> Option<usize> {
        let first = self.first()?;
        let offset = date.days_since(first);
        if offset < 0 || offset as usize >= self.days.len() {
            return None;
        }
        Some(offset as usize)
    }

    /// X offset of `date`; `None` outside the index.
    pub fn date_to_x(&self, date: CalendarDate, day_width: f32) -> Option<f32> {
        self.position(date).map(|pos| pos as f32 * day_width)
    }

    /// Day whose column contains `x`; `None` left of zero or past the last day.
    pub fn x_to_date(&self, x: f32, day_width: f32) -> Option<CalendarDate> {
        if day_width <= 0.0 || !x.is_finite() {
            return None;
        }
        let pos = (x / day_width).floor();
        if pos < 0.0 || pos as usize >= self.days.len() {
            return None;
        }
        self.days.get(pos as usize).copied()
    }

    /// Clamp `[start, end]` to the index bounds.
    ///
    /// `None` when the range is inverted or does not intersect the window,
    /// in which case nothing should be drawn.
    pub fn grid_span(&self, start: CalendarDate, end: CalendarDate) -> Option<GridSpan> {
        let first = self.first()?;
        let last = self.last()?;
        if end < start || end < first || start > last {
            return None;
        }
        let start_index = self.position(start.max(first))?;
        let end_index = self.position(end.min(last))?;
        Some(GridSpan {
            start_index,
            end_index,
        })
    }

    /// Total chart width in pixels.
    pub fn total_width(&self, day_width: f32) -> f32 {
        self.days.len() as f32 * day_width
    }
}
