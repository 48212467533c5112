//! Edits typed into the task table.
//!
//! Each function takes the current task and returns the updated copy, or
//! `None` when the input is rejected and the field should revert.

use super::calendar::{add_working_days, count_working_days, shift_working_days, NonWorkingDays};
use super::date::CalendarDate;
use super::task::Task;
use super::timeline::ProjectWindow;

/// Apply a typed start date. An unset end is set to the same day.
pub fn set_start_text(task: &Task, text: &str, window: ProjectWindow) -> Option<Task> {
    let start = window.clamp(CalendarDate::parse(text.trim())?);
    let end = task.end_date.unwrap_or(start);
    Some(task.clone().with_dates(start, end))
}

/// Apply a typed end date. An unset start is set to the same day.
pub fn set_end_text(task: &Task, text: &str, window: ProjectWindow) -> Option<Task> {
    let end = window.clamp(CalendarDate::parse(text.trim())?);
    let start = task.start_date.unwrap_or(end);
    Some(task.clone().with_dates(start, end))
}

/// Apply a typed working-day duration.
///
/// With a start date the end is re-derived forward; with only an end date
/// the start is derived backward. Durations below 1 and unscheduled tasks
/// are rejected.
pub fn set_duration(
    task: &Task,
    days: i64,
    window: ProjectWindow,
    mask: NonWorkingDays,
) -> Option<Task> {
    if days < 1 {
        return None;
    }
    let (start, end) = match (task.start_date, task.end_date) {
        (Some(start), _) => (start, add_working_days(start, days, mask)),
        (None, Some(end)) => {
            let last = add_working_days(end, 0, mask);
            (shift_working_days(last, -(days - 1), mask), end)
        }
        (None, None) => return None,
    };
    Some(task.clone().with_dates(window.clamp(start), window.clamp(end)))
}

pub fn set_progress(task: &Task, progress: i64) -> Task {
    let mut next = task.clone();
    next.progress = progress.clamp(0, 100) as u8;
    next
}

/// `None` clears the estimate; negative or non-finite hours are rejected.
pub fn set_man_hours(task: &Task, hours: Option<f64>) -> Option<Task> {
    if let Some(h) = hours {
        if !h.is_finite() || h < 0.0 {
            return None;
        }
    }
    let mut next = task.clone();
    next.man_hours = hours;
    Some(next)
}

/// Working-day count for display; empty when either date is missing.
pub fn duration_label(task: &Task, mask: NonWorkingDays) -> String {
    task.dates()
        .map(|(start, end)| count_working_days(start, end, mask).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    fn window() -> ProjectWindow {
        ProjectWindow::new(d("2024/01/01"), d("2024/03/31"))
    }

    #[test]
    fn start_text_on_unscheduled_sets_both() {
        let task = set_start_text(&Task::new("t"), "2024/01/10", window()).unwrap();
        assert_eq!(task.dates(), Some((d("2024/01/10"), d("2024/01/10"))));
    }

    #[test]
    fn start_after_end_swaps() {
        let task = Task::new("t").with_dates(d("2024/01/10"), d("2024/01/12"));
        let task = set_start_text(&task, "2024/01/20", window()).unwrap();
        assert_eq!(task.dates(), Some((d("2024/01/12"), d("2024/01/20"))));
    }

    #[test]
    fn malformed_text_is_rejected() {
        let task = Task::new("t").with_dates(d("2024/01/10"), d("2024/01/12"));
        assert!(set_start_text(&task, "2024/02/30", window()).is_none());
        assert!(set_end_text(&task, "tomorrow", window()).is_none());
    }

    #[test]
    fn typed_dates_clamp_to_window() {
        let task = Task::new("t").with_dates(d("2024/01/10"), d("2024/01/12"));
        let task = set_end_text(&task, "2024/09/01", window()).unwrap();
        assert_eq!(task.end_date, Some(d("2024/03/31")));
    }

    #[test]
    fn duration_from_start() {
        let mask = NonWorkingDays::WEEKENDS;
        let task = Task::new("t").with_dates(d("2024/01/05"), d("2024/01/05"));
        let task = set_duration(&task, 3, window(), mask).unwrap();
        assert_eq!(task.end_date, Some(d("2024/01/09")));
        assert_eq!(duration_label(&task, mask), "3");
    }

    #[test]
    fn duration_from_end_only() {
        let mask = NonWorkingDays::WEEKENDS;
        let mut task = Task::new("t");
        task.end_date = Some(d("2024/01/09"));
        let task = set_duration(&task, 3, window(), mask).unwrap();
        assert_eq!(task.dates(), Some((d("2024/01/05"), d("2024/01/09"))));
    }

    #[test]
    fn duration_below_one_rejected() {
        let task = Task::new("t").with_dates(d("2024/01/05"), d("2024/01/09"));
        assert!(set_duration(&task, 0, window(), NonWorkingDays::WEEKENDS).is_none());
        assert!(set_duration(&Task::new("u"), 2, window(), NonWorkingDays::WEEKENDS).is_none());
    }

    #[test]
    fn progress_and_hours() {
        let task = Task::new("t");
        assert_eq!(set_progress(&task, 250).progress, 100);
        assert_eq!(set_progress(&task, -4).progress, 0);
        assert!(set_man_hours(&task, Some(-1.0)).is_none());
        assert!(set_man_hours(&task, Some(f64::NAN)).is_none());
        assert_eq!(set_man_hours(&task, Some(7.5)).unwrap().man_hours, Some(7.5));
        assert_eq!(set_man_hours(&task, None).unwrap().man_hours, None);
        assert_eq!(duration_label(&task, NonWorkingDays::WEEKENDS), "");
    }
}
