use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

pub const DAY_LABELS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Monday 00:00 up to (not including) the following Monday 00:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl WeekWindow {
    /// Window of the week containing `reference`. The time of day is
    /// dropped before offsetting.
    pub fn containing(reference: NaiveDateTime) -> Self {
        Self::for_date(reference.date())
    }

    pub fn for_date(date: NaiveDate) -> Self {
        let start = week_start(date).and_time(NaiveTime::MIN);
        Self {
            start,
            end: start + Duration::days(7),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.contains(date.and_time(NaiveTime::MIN))
    }

    /// The seven dates of the window, Monday first.
    pub fn days(&self) -> Vec<NaiveDate> {
        let first = self.first_day();
        (0..7).map(|i| first + Duration::days(i)).collect()
    }

    pub fn next(&self) -> Self {
        Self::for_date(self.first_day() + Duration::days(7))
    }

    pub fn previous(&self) -> Self {
        Self::for_date(self.first_day() - Duration::days(7))
    }
}

/// Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let index = date.weekday().num_days_from_sunday() as i64;
    let offset = if index == 0 { -6 } else { 1 - index };
    date + Duration::days(offset)
}
