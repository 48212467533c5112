use gantt_core::model::calendar::{add_working_days, count_working_days, snap_forward};
use gantt_core::model::gesture::resolve_move;
use gantt_core::model::segments::compute_segments;
use gantt_core::model::{CalendarDate, DayIndex, NonWorkingDays, ProjectWindow};
use proptest::prelude::*;

fn date() -> impl Strategy<Value = CalendarDate> {
    (1990i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, day)| CalendarDate::from_ymd(y, m, day).unwrap())
}

fn mask() -> impl Strategy<Value = NonWorkingDays> {
    (0u8..0x7f).prop_map(|bits| NonWorkingDays::from_weekdays((0..7u8).filter(move |w| bits & (1u8 << *w) != 0)))
}

proptest! {
    #[test]
    fn format_then_parse_round_trips(d in date()) {
        prop_assert_eq!(CalendarDate::parse(&d.format()), Some(d));
    }

    #[test]
    fn single_day_counts_zero_or_one(d in date(), m in mask()) {
        let expected = if m.is_working(d) { 1 } else { 0 };
        prop_assert_eq!(count_working_days(d, d, m), expected);
    }

    #[test]
    fn count_matches_segment_sum(start in date(), span in 0i64..120, m in mask()) {
        let end = start.add_days(span);
        let total: u32 = compute_segments(start, end, m).iter().map(|s| s.working_days()).sum();
        prop_assert_eq!(count_working_days(start, end, m), total);
    }

    #[test]
    fn one_working_day_is_first_working_day_at_or_after(d in date(), m in mask()) {
        let got = add_working_days(d, 1, m);
        prop_assert_eq!(got, snap_forward(d, m));
        prop_assert!(got >= d);
        prop_assert!(m.is_working(got));
        prop_assert_eq!(count_working_days(d, got, m), 1);
    }

    #[test]
    fn grid_round_trips_inside_window(
        start in date(),
        len in 2i64..200,
        offset in 0i64..200,
        width in prop::sample::select(vec![8.0f32, 12.0, 16.0, 20.0, 28.0, 36.0, 48.0, 64.0]),
    ) {
        let window = ProjectWindow::new(start, start.add_days(len));
        let index = DayIndex::build(&window);
        let day = start.add_days(offset % (len + 1));

        let span = index.grid_span(day, day).unwrap();
        prop_assert_eq!(span.day_count(), 1);
        let x = index.date_to_x(day, width).unwrap();
        prop_assert_eq!(x, span.start_index as f32 * width);
        prop_assert_eq!(index.x_to_date(x + width / 2.0, width), Some(day));
    }

    #[test]
    fn move_preserves_duration_in_wide_window(
        offset in 0i64..90,
        duration in 1u32..15,
        delta in -120i64..120,
    ) {
        let mask = NonWorkingDays::WEEKENDS;
        let window = ProjectWindow::new(
            CalendarDate::from_ymd(2024, 1, 1).unwrap(),
            CalendarDate::from_ymd(2024, 3, 31).unwrap(),
        );
        let anchor = window.start.add_days(offset);

        let (start, end) = resolve_move(anchor, duration, delta, window, mask);
        prop_assert!(start <= end);
        prop_assert!(start >= window.start && end <= window.end);
        prop_assert_eq!(count_working_days(start, end, mask), duration);
    }

    #[test]
    fn move_never_inverts_in_narrow_window(
        span in 0i64..6,
        duration in 1u32..30,
        delta in -20i64..20,
        m in mask(),
    ) {
        let start = CalendarDate::from_ymd(2024, 5, 6).unwrap();
        let window = ProjectWindow::new(start, start.add_days(span));
        let (s, e) = resolve_move(start, duration, delta, window, m);
        prop_assert!(s <= e);
        prop_assert!(s >= window.start);
    }
}
