//! Working-day calendar for a reference month

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};

/// A Monday-to-Friday day of the visible month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingDay {
    pub date: NaiveDate,
    pub abbrev: &'static str,
    pub is_today: bool,
}

/// First and last calendar day of the month containing `reference`
pub fn month_bounds(reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = reference - Duration::days(reference.day0() as i64);
    let last = first + Months::new(1) - Duration::days(1);
    (first, last)
}

/// First day of the month `delta` months away from `reference`
pub fn shift_month(reference: NaiveDate, delta: i32) -> NaiveDate {
    let (first, _) = month_bounds(reference);
    if delta >= 0 {
        first + Months::new(delta.unsigned_abs())
    } else {
        first - Months::new(delta.unsigned_abs())
    }
}

/// "September 2024"
pub fn month_title(reference: NaiveDate) -> String {
    reference.format("%B %Y").to_string()
}

pub fn weekday_abbrev(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Working days of the month containing `reference`, in calendar order.
/// `today` is a calendar date so time-of-day never affects the flag.
pub fn working_days(reference: NaiveDate, today: NaiveDate) -> impl Iterator<Item = WorkingDay> {
    let (first, last) = month_bounds(reference);
    first
        .iter_days()
        .take_while(move |day| *day <= last)
        .filter(|day| is_working_day(*day))
        .map(move |date| WorkingDay {
            date,
            abbrev: weekday_abbrev(date.weekday()),
            is_today: date == today,
        })
}

/// The visible month: its bounds plus the working-day columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    pub first: NaiveDate,
    pub last: NaiveDate,
    pub days: Vec<WorkingDay>,
}

impl MonthView {
    pub fn new(reference: NaiveDate, today: NaiveDate) -> Self {
        let (first, last) = month_bounds(reference);
        Self {
            first,
            last,
            days: working_days(reference, today).collect(),
        }
    }

    pub fn title(&self) -> String {
        month_title(self.first)
    }

    pub fn today_index(&self) -> Option<usize> {
        self.days.iter().position(|day| day.is_today)
    }
}
