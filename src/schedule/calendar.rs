use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
}

/// Month panel: Sunday-first rows covering every day of `month`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCalendar {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<[CalendarCell; 7]>,
}

impl MonthCalendar {
    pub fn build(month: NaiveDate, selected: NaiveDate, today: NaiveDate) -> Self {
        let first = first_of_month(month);
        let last = last_of_month(first);
        let grid_start = first - Duration::days(first.weekday().num_days_from_sunday() as i64);
        let grid_end = last + Duration::days(6 - last.weekday().num_days_from_sunday() as i64);

        let mut weeks = Vec::new();
        let mut day = grid_start;
        while day <= grid_end {
            let row: [CalendarCell; 7] = std::array::from_fn(|i| {
                let date = day + Duration::days(i as i64);
                CalendarCell {
                    date,
                    in_month: date.month() == first.month() && date.year() == first.year(),
                    is_today: date == today,
                    is_selected: date == selected,
                }
            });
            weeks.push(row);
            day += Duration::days(7);
        }

        Self {
            year: first.year(),
            month: first.month(),
            weeks,
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    first
        .checked_add_months(Months::new(1))
        .map(|next| next - Duration::days(1))
        .unwrap_or(first)
}

pub fn next_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    first.checked_add_months(Months::new(1)).unwrap_or(first)
}

pub fn previous_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    first.checked_sub_months(Months::new(1)).unwrap_or(first)
}
