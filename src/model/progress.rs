//! Progress markers against a baseline cutoff date.
//!
//! Each task gets an X coordinate that shows where its reported progress
//! reaches on the timeline, so joining the markers row by row draws the
//! familiar zig-zag "progress line" against the cutoff.

use super::calendar::{count_working_days, NonWorkingDays};
use super::date::CalendarDate;
use super::segments::progress_budget;
use super::task::Task;
use super::timeline::DayIndex;

/// X coordinate of the task's progress marker.
///
/// A finished task that ended before the cutoff, or an untouched task that
/// starts after it, sits on the cutoff itself. Otherwise the progress budget
/// (in working days) is walked forward from the task start: working days
/// consume budget, masked days only advance the pixel offset.
///
/// `None` when the task has no dates or the cutoff / task start falls
/// outside the day index.
pub fn locate_progress_x(
    cutoff: CalendarDate,
    task: &Task,
    index: &DayIndex,
    day_width: f32,
    mask: NonWorkingDays,
) -> Option<f32> {
    let (start, end) = task.dates()?;

    let trivially_ahead = task.progress >= 100 && end < cutoff;
    let trivially_behind = task.progress == 0 && start > cutoff;
    if trivially_ahead || trivially_behind {
        return index.date_to_x(cutoff, day_width);
    }

    let base_x = index.date_to_x(start, day_width)?;
    let mut budget = progress_budget(count_working_days(start, end, mask), task.progress);
    let mut offset = 0.0f64;
    let mut day = start;
    while budget > 0.0 && day <= end {
        if mask.is_working(day) {
            let used = budget.min(1.0);
            offset += used * f64::from(day_width);
            budget -= used;
        } else {
            offset += f64::from(day_width);
        }
        day = day.add_days(1);
    }
    Some(base_x + offset as f32)
}

/// Marker positions for every row, in row order.
pub fn progress_line(
    cutoff: CalendarDate,
    tasks: &[Task],
    index: &DayIndex,
    day_width: f32,
    mask: NonWorkingDays,
) -> Vec<Option<f32>> {
    tasks
        .iter()
        .map(|task| locate_progress_x(cutoff, task, index, day_width, mask))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::timeline::ProjectWindow;

    fn d(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    fn index() -> DayIndex {
        DayIndex::build(&ProjectWindow::new(d("2024/01/01"), d("2024/01/31")))
    }

    const W: f32 = 10.0;

    #[test]
    fn finished_task_before_cutoff_sits_on_cutoff() {
        let task = Task::new("t")
            .with_dates(d("2024/01/01"), d("2024/01/05"))
            .with_progress(100);
        let x = locate_progress_x(d("2024/01/15"), &task, &index(), W, NonWorkingDays::WEEKENDS);
        assert_eq!(x, Some(140.0));
    }

    #[test]
    fn untouched_task_after_cutoff_sits_on_cutoff() {
        let task = Task::new("t").with_dates(d("2024/01/20"), d("2024/01/25"));
        let x = locate_progress_x(d("2024/01/10"), &task, &index(), W, NonWorkingDays::WEEKENDS);
        assert_eq!(x, Some(90.0));
    }

    #[test]
    fn half_done_walks_working_days() {
        // Mon 1st to Fri 5th, 5 working days, 40% = 2 days.
        let task = Task::new("t")
            .with_dates(d("2024/01/01"), d("2024/01/05"))
            .with_progress(40);
        let x = locate_progress_x(d("2024/01/03"), &task, &index(), W, NonWorkingDays::WEEKENDS);
        assert_eq!(x, Some(20.0));
    }

    #[test]
    fn masked_days_advance_without_consuming_budget() {
        // Fri 5th to Tue 9th: Fri, Mon, Tue working; 2/3 done = 2 days.
        let task = Task::new("t")
            .with_dates(d("2024/01/05"), d("2024/01/09"))
            .with_progress(67);
        let x = locate_progress_x(d("2024/01/08"), &task, &index(), W, NonWorkingDays::WEEKENDS)
            .unwrap();
        // start x = 40; Fri, Sat, Sun, Mon add 40, then 0.01 of Tue
        assert!((x - 80.1).abs() < 0.05, "x = {x}");
    }

    #[test]
    fn zero_progress_at_task_start() {
        let task = Task::new("t").with_dates(d("2024/01/08"), d("2024/01/12"));
        let x = locate_progress_x(d("2024/01/10"), &task, &index(), W, NonWorkingDays::WEEKENDS);
        assert_eq!(x, Some(70.0));
    }

    #[test]
    fn missing_dates_or_out_of_index() {
        let mask = NonWorkingDays::WEEKENDS;
        assert_eq!(locate_progress_x(d("2024/01/10"), &Task::new("t"), &index(), W, mask), None);
        let early = Task::new("t")
            .with_dates(d("2023/12/20"), d("2024/01/05"))
            .with_progress(50);
        assert_eq!(locate_progress_x(d("2024/01/10"), &early, &index(), W, mask), None);
    }

    #[test]
    fn progress_line_per_row() {
        let tasks = vec![
            Task::new("a").with_dates(d("2024/01/01"), d("2024/01/05")).with_progress(100),
            Task::new("b"),
        ];
        let line = progress_line(d("2024/01/10"), &tasks, &index(), W, NonWorkingDays::WEEKENDS);
        assert_eq!(line, vec![Some(90.0), None]);
    }
}
