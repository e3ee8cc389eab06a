use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

use crate::error::AppError;

/// Years a schedule date may fall in. Week and month arithmetic stays
/// well clear of chrono's limits inside this range.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

pub fn is_supported_date(date: NaiveDate) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&date.year())
}

/// Parse a `YYYY-MM-DD` string into a calendar date.
///
/// The string is split into its numeric parts and the date is built from
/// them directly, so no offset is ever applied to the day.
pub fn parse_calendar_date(input: &str) -> Result<NaiveDate, AppError> {
    let parts: Vec<&str> = input.trim().split('-').collect();
    if parts.len() != 3 {
        return Err(AppError::MalformedTask(format!("Invalid date: {}", input)));
    }

    let year: i32 = parse_component(parts[0], input)?;
    let month: u32 = parse_component(parts[1], input)?;
    let day: u32 = parse_component(parts[2], input)?;

    NaiveDate::from_ymd_opt(year, month, day)
        .filter(|date| is_supported_date(*date))
        .ok_or_else(|| AppError::MalformedTask(format!("Date out of range: {}", input)))
}

/// Parse `HH:MM` or `HH:MM:SS` into a time of day. Seconds are validated
/// but dropped.
pub fn parse_time_of_day(input: &str) -> Result<NaiveTime, AppError> {
    let parts: Vec<&str> = input.trim().split(':').collect();
    if parts.len() != 2 && parts.len() != 3 {
        return Err(AppError::MalformedTask(format!("Invalid time: {}", input)));
    }

    let hour: u32 = parse_component(parts[0], input)?;
    let minute: u32 = parse_component(parts[1], input)?;
    if let Some(seconds) = parts.get(2) {
        // FastAPI serializes `time` with optional fractional seconds
        let whole = seconds.split('.').next().unwrap_or_default();
        let _: u32 = parse_component(whole, input)?;
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| AppError::MalformedTask(format!("Time out of range: {}", input)))
}

pub fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

fn parse_component<T: std::str::FromStr>(part: &str, input: &str) -> Result<T, AppError> {
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::MalformedTask(format!("Invalid component in {}", input)));
    }
    part.parse::<T>()
        .map_err(|_| AppError::MalformedTask(format!("Invalid component in {}", input)))
}
