use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::time::{parse_calendar_date, parse_time_of_day};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
    Skipped,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
            TaskStatus::Skipped => "skipped",
        }
    }

    /// `completed` is never overwritten by an automatic transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "completed" => Ok(TaskStatus::Completed),
            "skipped" => Ok(TaskStatus::Skipped),
            other => Err(AppError::BadRequest(format!("Unknown task status: {}", other))),
        }
    }
}

/// One scheduled learning block as served by the schedule API.
///
/// `date`, `start` and `end` are kept in their wire form and parsed on
/// demand so a single malformed record can be excluded without failing
/// the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub id: i64,
    pub user_id: i64,
    pub module: i32,
    pub skill: String,
    pub date: String,
    pub start: String,
    pub end: String,
    pub resource_name: String,
    pub resource_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub status: TaskStatus,
}

impl ScheduledTask {
    pub fn calendar_date(&self) -> Result<NaiveDate, AppError> {
        parse_calendar_date(&self.date)
    }

    pub fn start_time(&self) -> Result<NaiveTime, AppError> {
        parse_time_of_day(&self.start)
    }

    pub fn end_time(&self) -> Result<NaiveTime, AppError> {
        parse_time_of_day(&self.end)
    }

    pub fn starts_at(&self) -> Result<NaiveDateTime, AppError> {
        Ok(self.calendar_date()?.and_time(self.start_time()?))
    }

    pub fn ends_at(&self) -> Result<NaiveDateTime, AppError> {
        Ok(self.calendar_date()?.and_time(self.end_time()?))
    }

    /// Duration in minutes, or zero when the record is out of contract.
    pub fn duration_minutes(&self) -> i64 {
        match (self.start_time(), self.end_time()) {
            (Ok(start), Ok(end)) if end > start => (end - start).num_minutes(),
            _ => 0,
        }
    }

    pub fn with_status(&self, status: TaskStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_task(id: i64, date: &str, start: &str, end: &str) -> ScheduledTask {
    ScheduledTask {
        id,
        user_id: 1,
        module: 1,
        skill: "python".to_string(),
        date: date.to_string(),
        start: start.to_string(),
        end: end.to_string(),
        resource_name: format!("Resource {}", id),
        resource_url: format!("https://example.com/resource/{}", id),
        thumbnail_url: None,
        status: TaskStatus::Pending,
    }
}
