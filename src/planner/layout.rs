//! Maps date ranges onto the working-day columns of the visible month.
//!
//! Weekends are not columns: every working day gets the same width, so a bar
//! spanning Friday to Monday is two columns wide.

use chrono::NaiveDate;

use super::calendar::{MonthView, WorkingDay};
use super::types::QualificationRecord;

/// Horizontal placement of a bar inside the timeline column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarLayout {
    pub left_percent: f64,
    pub width_percent: f64,
    pub duration_days: usize,
    /// Range clipped to the month
    pub visible_start: NaiveDate,
    pub visible_end: NaiveDate,
}

/// Lay out `[start, end]` against the working days of `[month_start, month_end]`.
/// Returns `None` when no working day of the month falls inside the range.
pub fn layout_range(
    start: NaiveDate,
    end: NaiveDate,
    days: &[WorkingDay],
    month_start: NaiveDate,
    month_end: NaiveDate,
) -> Option<BarLayout> {
    let visible_start = start.max(month_start);
    let visible_end = end.min(month_end);
    if visible_start > visible_end || days.is_empty() {
        return None;
    }

    let mut first = None;
    let mut duration = 0;
    for (i, day) in days.iter().enumerate() {
        if day.date >= visible_start && day.date <= visible_end {
            first.get_or_insert(i);
            duration += 1;
        }
    }

    // Clipped range sits entirely on a weekend
    let start_index = first?;

    let total = days.len() as f64;
    Some(BarLayout {
        left_percent: start_index as f64 * 100.0 / total,
        width_percent: duration as f64 * 100.0 / total,
        duration_days: duration,
        visible_start,
        visible_end,
    })
}

pub fn layout_bar(record: &QualificationRecord, view: &MonthView) -> Option<BarLayout> {
    layout_range(record.start_date, record.end_date, &view.days, view.first, view.last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::types::{Environment, QualificationInput, RecordId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn september() -> MonthView {
        MonthView::new(date(2024, 9, 1), date(2024, 9, 18))
    }

    fn record(start: NaiveDate, end: NaiveDate) -> QualificationRecord {
        QualificationRecord::from_input(
            RecordId(1),
            QualificationInput {
                name: "v2.1.0".to_string(),
                team: "Team A".to_string(),
                description: None,
                environment: Environment::LightSimulation,
                start_date: start,
                end_date: end,
                deployed: false,
            },
        )
    }

    #[test]
    fn mid_month_range_skips_weekends() {
        let view = september();
        let bar = layout_bar(&record(date(2024, 9, 15), date(2024, 9, 25)), &view).unwrap();
        // 16th-20th and 23rd-25th
        assert_eq!(bar.duration_days, 8);
        // Sept 16 is the 11th working day of the month
        assert_eq!(bar.visible_start, date(2024, 9, 15));
        assert_eq!(bar.visible_end, date(2024, 9, 25));
        assert!((bar.left_percent - 10.0 * 100.0 / 21.0).abs() < 1e-9);
        assert!((bar.width_percent - 8.0 * 100.0 / 21.0).abs() < 1e-9);
    }

    #[test]
    fn weekend_only_range_has_no_bar() {
        let view = september();
        assert_eq!(layout_bar(&record(date(2024, 9, 14), date(2024, 9, 15)), &view), None);
    }

    #[test]
    fn range_covering_the_month_is_clipped() {
        let view = september();
        let bar = layout_bar(&record(date(2024, 8, 20), date(2024, 10, 5)), &view).unwrap();
        assert_eq!(bar.visible_start, date(2024, 9, 1));
        assert_eq!(bar.visible_end, date(2024, 9, 30));
        assert_eq!(bar.duration_days, 21);
        assert!(bar.left_percent.abs() < 1e-9);
        assert!((bar.width_percent - 100.0).abs() < 1e-9);
    }

    #[test]
    fn ranges_outside_the_month_are_not_visible() {
        let view = september();
        assert_eq!(layout_bar(&record(date(2024, 8, 1), date(2024, 8, 31)), &view), None);
        assert_eq!(layout_bar(&record(date(2024, 10, 1), date(2024, 10, 3)), &view), None);
        assert_eq!(layout_bar(&record(date(2023, 9, 1), date(2023, 9, 30)), &view), None);
    }

    #[test]
    fn range_ending_on_first_weekday_has_one_column() {
        let view = september();
        let bar = layout_bar(&record(date(2024, 8, 28), date(2024, 9, 2)), &view).unwrap();
        assert_eq!(bar.duration_days, 1);
        assert!(bar.left_percent.abs() < 1e-9);
        assert_eq!(bar.visible_start, date(2024, 9, 1));
    }

    #[test]
    fn duration_matches_working_days_in_range_for_every_inner_range() {
        let view = september();
        let total = view.days.len();
        for start_day in 1..=30 {
            for end_day in start_day..=30 {
                let start = date(2024, 9, start_day);
                let end = date(2024, 9, end_day);
                let expected = view
                    .days
                    .iter()
                    .filter(|d| d.date >= start && d.date <= end)
                    .count();
                match layout_range(start, end, &view.days, view.first, view.last) {
                    None => assert_eq!(expected, 0),
                    Some(bar) => {
                        assert_eq!(bar.duration_days, expected);
                        let first = view.days.iter().position(|d| d.date >= start).unwrap();
                        assert!((bar.left_percent - first as f64 * 100.0 / total as f64).abs() < 1e-9);
                        assert!(bar.left_percent + bar.width_percent <= 100.0 + 1e-9);
                    }
                }
            }
        }
    }

    #[test]
    fn layout_is_idempotent() {
        let view = september();
        let rec = record(date(2024, 9, 5), date(2024, 9, 12));
        assert_eq!(layout_bar(&rec, &view), layout_bar(&rec, &view));
    }

    #[test]
    fn empty_day_list_has_no_bar() {
        assert_eq!(
            layout_range(date(2024, 9, 2), date(2024, 9, 3), &[], date(2024, 9, 1), date(2024, 9, 30)),
            None
        );
    }
}
