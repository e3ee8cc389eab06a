use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::schedule::layout::{GridConfig, column_index};
use crate::schedule::week::WeekWindow;
use crate::time::minutes_since_midnight;

/// Horizontal "now" line drawn across today's column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NowMarker {
    pub column: usize,
    pub offset_px: f64,
}

/// Marker position for `now`, or `None` when the current hour is outside
/// the grid or the week shown for `selected` does not contain today.
pub fn now_marker(now: NaiveDateTime, selected: NaiveDate, grid: &GridConfig) -> Option<NowMarker> {
    let hour = now.hour();
    if hour < grid.start_hour || hour >= grid.end_hour {
        return None;
    }

    let today = now.date();
    if !WeekWindow::for_date(selected).contains_date(today) {
        return None;
    }

    Some(NowMarker {
        column: column_index(today),
        offset_px: grid.offset_for_minutes(minutes_since_midnight(now.time())),
    })
}
