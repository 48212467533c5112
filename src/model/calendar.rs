use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::date::CalendarDate;

/// Upper bound on the number of calendar days a single working-day walk may
/// visit. A mask that blocks every weekday would otherwise never terminate.
pub const MAX_WALK_DAYS: usize = 100_000;

/// Set of weekday indices (0 = Sunday ... 6 = Saturday) that are globally
/// non-working. There are no single-date exceptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NonWorkingDays(u8);

impl NonWorkingDays {
    /// Every day is a working day.
    pub const NONE: Self = Self(0);
    /// Saturday and Sunday off.
    pub const WEEKENDS: Self = Self((1 << 0) | (1 << 6));

    /// Build a mask from weekday indices; indices above 6 are ignored.
    pub fn from_weekdays<I>(days: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        let bits = days
            .into_iter()
            .filter(|d| *d < 7)
            .fold(0u8, |acc, d| acc | (1 << d));
        Self(bits)
    }

    /// Weekday indices in ascending order.
    pub fn weekdays(&self) -> Vec<u8> {
        (0..7).filter(|d| self.contains(*d)).collect()
    }

    pub fn contains(&self, weekday: u8) -> bool {
        weekday < 7 && self.0 & (1 << weekday) != 0
    }

    /// Flip a single weekday in or out of the mask.
    pub fn toggle(&mut self, weekday: u8) {
        if weekday < 7 {
            self.0 ^= 1 << weekday;
        }
    }

    /// Toggle unless that would mask every weekday. Returns whether the mask
    /// changed.
    pub fn try_toggle(&mut self, weekday: u8) -> bool {
        let mut next = *self;
        next.toggle(weekday);
        if next == *self || next.blocks_every_day() {
            return false;
        }
        *self = next;
        true
    }

    /// True when every weekday is masked, in which case no working day exists.
    pub fn blocks_every_day(&self) -> bool {
        self.0 & 0x7f == 0x7f
    }

    pub fn is_working(&self, date: CalendarDate) -> bool {
        !self.contains(date.weekday_index())
    }
}

impl Serialize for NonWorkingDays {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.weekdays().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NonWorkingDays {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let days = Vec::<u8>::deserialize(deserializer)?;
        Ok(Self::from_weekdays(days))
    }
}

/// Number of working days in `[start, end]`; 0 when `end < start`.
///
/// This is the duration shown to the user.
pub fn count_working_days(start: CalendarDate, end: CalendarDate, mask: NonWorkingDays) -> u32 {
    let span = end.days_since(start);
    if span < 0 {
        return 0;
    }
    let span = span + 1;
    let full_weeks = span / 7;
    let working_per_week = 7 - mask.weekdays().len() as i64;
    let mut count = full_weeks * working_per_week;
    // Remainder days after the last full week.
    for offset in 0..span % 7 {
        if mask.is_working(start.add_days(full_weeks * 7 + offset)) {
            count += 1;
        }
    }
    count as u32
}

/// Date on which `n` working days starting at `start` are used up.
///
/// `start` is first snapped forward to a working day and counts as working
/// day 1. `n == 0` snaps `start` backward to the previous working day
/// instead, and any `n < 0` returns `start` unchanged.
pub fn add_working_days(start: CalendarDate, n: i64, mask: NonWorkingDays) -> CalendarDate {
    if n < 0 {
        return start;
    }
    if n == 0 {
        return snap_backward(start, mask);
    }

    let mut current = snap_forward(start, mask);
    let mut consumed = 1;
    let mut steps = 0;
    while consumed < n {
        if steps >= MAX_WALK_DAYS {
            tracing::warn!(%start, n, "working-day walk hit its iteration cap");
            break;
        }
        current = current.add_days(1);
        steps += 1;
        if mask.is_working(current) {
            consumed += 1;
        }
    }
    current
}

/// Offset `start` by `n` working days in either direction.
///
/// Each unit step lands on the next working day strictly after (or before,
/// for negative `n`) the current one; `n == 0` returns `start`.
pub fn shift_working_days(start: CalendarDate, n: i64, mask: NonWorkingDays) -> CalendarDate {
    let step = n.signum();
    let mut remaining = n.abs();
    let mut current = start;
    let mut steps = 0;
    while remaining > 0 {
        if steps >= MAX_WALK_DAYS {
            tracing::warn!(%start, n, "working-day shift hit its iteration cap");
            break;
        }
        current = current.add_days(step);
        steps += 1;
        if mask.is_working(current) {
            remaining -= 1;
        }
    }
    current
}

/// First working day at or after `date`.
pub fn snap_forward(date: CalendarDate, mask: NonWorkingDays) -> CalendarDate {
    snap(date, 1, mask)
}

/// Last working day at or before `date`.
pub fn snap_backward(date: CalendarDate, mask: NonWorkingDays) -> CalendarDate {
    snap(date, -1, mask)
}

fn snap(date: CalendarDate, step: i64, mask: NonWorkingDays) -> CalendarDate {
    if mask.blocks_every_day() {
        tracing::warn!(%date, "non-working mask blocks every weekday");
        return date;
    }
    let mut current = date;
    while !mask.is_working(current) {
        current = current.add_days(step);
    }
    current
}
