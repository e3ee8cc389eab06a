use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{ScheduledTask, TaskStatus};

#[derive(Debug, Serialize)]
pub struct StatusUpdateRequest {
    pub status: TaskStatus,
}

#[derive(Debug, Serialize)]
pub struct GenerateScheduleRequest {
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

/// Raw body of the generate endpoint; tasks are parsed one by one afterwards.
#[derive(Debug, Deserialize)]
pub struct GenerateScheduleResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub tasks: Vec<serde_json::Value>,
    #[serde(default)]
    pub modules: Option<Vec<GeneratedModule>>,
}

/// Module overview produced by the generator: hours per skill, aligned with `skills`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedModule {
    pub module: i32,
    pub skills: Vec<String>,
    #[serde(default)]
    pub duration: Vec<f64>,
}

impl GeneratedModule {
    pub fn total_hours(&self) -> f64 {
        self.duration.iter().sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedSchedule {
    pub message: Option<String>,
    pub tasks: Vec<ScheduledTask>,
    pub modules: Vec<GeneratedModule>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceTasksResponse {
    #[serde(default)]
    pub tasks_added: usize,
}
