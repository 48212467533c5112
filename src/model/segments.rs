use super::calendar::{count_working_days, NonWorkingDays};
use super::date::{enumerate_range, CalendarDate};
use super::task::Task;
use super::timeline::DayIndex;

/// Maximal run of consecutive working days inside a task's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: CalendarDate,
    pub end: CalendarDate,
}

impl Segment {
    /// Every day in a segment is a working day.
    pub fn working_days(&self) -> u32 {
        (self.end.days_since(self.start) + 1) as u32
    }
}

/// Split `[start, end]` into working-day segments.
///
/// Non-working days never belong to a segment, so a range that opens or
/// closes on a masked day yields a bar that starts or ends strictly inside
/// its nominal range. Empty for an inverted range.
pub fn compute_segments(start: CalendarDate, end: CalendarDate, mask: NonWorkingDays) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut open: Option<Segment> = None;
    for day in enumerate_range(start, end) {
        if mask.is_working(day) {
            match open.as_mut() {
                Some(seg) => seg.end = day,
                None => open = Some(Segment { start: day, end: day }),
            }
        } else if let Some(seg) = open.take() {
            segments.push(seg);
        }
    }
    segments.extend(open);
    segments
}

/// Segments for a task; empty unless both dates are set.
pub fn task_segments(task: &Task, mask: NonWorkingDays) -> Vec<Segment> {
    task.dates()
        .map(|(start, end)| compute_segments(start, end, mask))
        .unwrap_or_default()
}

/// Number of working days a given progress percentage stands for.
pub fn progress_budget(total_working_days: u32, progress: u8) -> f64 {
    total_working_days as f64 * f64::from(progress.min(100)) / 100.0
}

/// Fraction (0.0..=1.0) of each segment to draw as completed.
///
/// The progress budget is consumed segment by segment in order, so the fill
/// stays gapless across the bar's gaps.
pub fn segment_fills(segments: &[Segment], progress: u8) -> Vec<f32> {
    let total: u32 = segments.iter().map(Segment::working_days).sum();
    let mut remaining = progress_budget(total, progress);
    segments
        .iter()
        .map(|seg| {
            let days = f64::from(seg.working_days());
            let filled = remaining.min(days).max(0.0);
            remaining -= filled;
            (filled / days) as f32
        })
        .collect()
}

/// First and last working day of the range, used to place the label and the
/// interactive region of a bar whose nominal edges fall on masked days.
pub fn working_bounds(segments: &[Segment]) -> Option<(CalendarDate, CalendarDate)> {
    Some((segments.first()?.start, segments.last()?.end))
}

/// Horizontal pixel extent `(left, right)` of a task's interactive region.
///
/// Aligned to the first and last working day when the nominal edges are
/// masked, clamped to the day index, `None` when nothing is visible.
pub fn bar_extent(task: &Task, index: &DayIndex, day_width: f32, mask: NonWorkingDays) -> Option<(f32, f32)> {
    let (start, end) = task.dates()?;
    let segments = compute_segments(start, end, mask);
    let (first, last) = working_bounds(&segments).unwrap_or((start, end));
    let span = index.grid_span(first, last)?;
    Some((
        span.start_index as f32 * day_width,
        (span.end_index + 1) as f32 * day_width,
    ))
}

/// Working-day duration of a task; `None` when either date is missing.
pub fn task_duration(task: &Task, mask: NonWorkingDays) -> Option<u32> {
    task.dates()
        .map(|(start, end)| count_working_days(start, end, mask))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    #[test]
    fn single_segment_for_work_week() {
        let segs = compute_segments(d("2024/01/01"), d("2024/01/05"), NonWorkingDays::WEEKENDS);
        assert_eq!(
            segs,
            vec![Segment {
                start: d("2024/01/01"),
                end: d("2024/01/05")
            }]
        );
        assert_eq!(segs[0].working_days(), 5);
    }

    #[test]
    fn weekend_splits_into_two_segments() {
        let segs = compute_segments(d("2024/01/05"), d("2024/01/08"), NonWorkingDays::WEEKENDS);
        assert_eq!(
            segs,
            vec![
                Segment {
                    start: d("2024/01/05"),
                    end: d("2024/01/05")
                },
                Segment {
                    start: d("2024/01/08"),
                    end: d("2024/01/08")
                },
            ]
        );
    }

    #[test]
    fn masked_edges_are_trimmed() {
        let segs = compute_segments(d("2024/01/06"), d("2024/01/14"), NonWorkingDays::WEEKENDS);
        assert_eq!(segs.len(), 1);
        assert_eq!(working_bounds(&segs), Some((d("2024/01/08"), d("2024/01/12"))));
    }

    #[test]
    fn degenerate_ranges_have_no_segments() {
        let mask = NonWorkingDays::WEEKENDS;
        assert!(compute_segments(d("2024/01/08"), d("2024/01/05"), mask).is_empty());
        assert!(compute_segments(d("2024/01/06"), d("2024/01/07"), mask).is_empty());
        assert!(task_segments(&Task::new("x"), mask).is_empty());
        assert_eq!(working_bounds(&[]), None);
    }

    #[test]
    fn fill_carries_across_segments() {
        // Wed-Fri, then Mon-Fri: 3 + 5 = 8 working days.
        let segs = compute_segments(d("2024/01/03"), d("2024/01/12"), NonWorkingDays::WEEKENDS);
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].working_days() + segs[1].working_days(), 8);

        // 50% of 8 = 4 days: first segment (3 days) full, 1 of 5 in the second.
        let fills = segment_fills(&segs, 50);
        assert!((fills[0] - 1.0).abs() < 1e-6);
        assert!((fills[1] - 0.2).abs() < 1e-6);

        let none = segment_fills(&segs, 0);
        assert!(none.iter().all(|f| *f == 0.0));
        let full = segment_fills(&segs, 100);
        assert!(full.iter().all(|f| (*f - 1.0).abs() < 1e-6));
    }

    #[test]
    fn bar_extent_skips_masked_edges() {
        use crate::model::timeline::ProjectWindow;
        let index = DayIndex::build(&ProjectWindow::new(d("2024/01/01"), d("2024/01/31")));
        let mask = NonWorkingDays::WEEKENDS;
        // Sat 6th .. Sun 14th renders Mon 8th .. Fri 12th.
        let task = Task::new("t").with_dates(d("2024/01/06"), d("2024/01/14"));
        assert_eq!(bar_extent(&task, &index, 10.0, mask), Some((70.0, 120.0)));
        let outside = Task::new("o").with_dates(d("2024/02/05"), d("2024/02/09"));
        assert_eq!(bar_extent(&outside, &index, 10.0, mask), None);
        assert_eq!(bar_extent(&Task::new("u"), &index, 10.0, mask), None);
    }

    #[test]
    fn duration_of_task() {
        let mask = NonWorkingDays::WEEKENDS;
        let task = Task::new("t").with_dates(d("2024/01/05"), d("2024/01/08"));
        assert_eq!(task_duration(&task, mask), Some(2));
        assert_eq!(task_duration(&Task::new("u"), mask), None);
    }
}
