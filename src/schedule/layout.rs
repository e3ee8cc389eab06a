use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::warn;

use crate::error::AppError;
use crate::models::{ScheduledTask, TaskStatus};
use crate::schedule::filter::filter_tasks_for_week;
use crate::schedule::week::WeekWindow;
use crate::time::minutes_since_midnight;

pub const GRID_START_HOUR: u32 = 8;
pub const GRID_END_HOUR: u32 = 21;
pub const DEFAULT_HOUR_HEIGHT: f64 = 60.0;
pub const DEFAULT_TRACK_WIDTH: f64 = 700.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridConfig {
    pub start_hour: u32,
    pub end_hour: u32,
    pub hour_height: f64,
    pub track_width: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            start_hour: GRID_START_HOUR,
            end_hour: GRID_END_HOUR,
            hour_height: DEFAULT_HOUR_HEIGHT,
            track_width: DEFAULT_TRACK_WIDTH,
        }
    }
}

impl GridConfig {
    pub fn with_hour_height(mut self, hour_height: f64) -> Self {
        self.hour_height = hour_height;
        self
    }

    pub fn with_track_width(mut self, track_width: f64) -> Self {
        self.track_width = track_width;
        self
    }

    pub fn hours(&self) -> u32 {
        self.end_hour.saturating_sub(self.start_hour)
    }

    pub fn column_width(&self) -> f64 {
        self.track_width / 7.0
    }

    pub fn total_height(&self) -> f64 {
        self.hours() as f64 * self.hour_height
    }

    /// Vertical offset of a minute-of-day measured from the top of the grid.
    pub fn offset_for_minutes(&self, minutes: u32) -> f64 {
        let from_top = minutes as f64 - (self.start_hour * 60) as f64;
        from_top / 60.0 * self.hour_height
    }
}

/// Monday-first column: Monday is 0, Sunday is 6.
pub fn column_index(date: NaiveDate) -> usize {
    ((date.weekday().num_days_from_sunday() + 6) % 7) as usize
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskBlock {
    pub task_id: i64,
    pub column: usize,
    pub top_px: f64,
    pub height_px: f64,
    pub left_px: f64,
    pub width_px: f64,
    pub status: TaskStatus,
    pub skill: String,
    pub resource_name: String,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeekLayout {
    pub blocks: Vec<TaskBlock>,
    /// Ids of tasks that could not be placed.
    pub rejected: Vec<i64>,
}

/// Place one task on the grid.
///
/// `end <= start` is rejected. Parts of a block outside the grid hours are
/// clipped, and a block entirely outside them is rejected.
pub fn place_task(task: &ScheduledTask, grid: &GridConfig) -> Result<TaskBlock, AppError> {
    let date = task.calendar_date()?;
    let start = minutes_since_midnight(task.start_time()?);
    let end = minutes_since_midnight(task.end_time()?);

    if end <= start {
        return Err(AppError::MalformedTask(format!(
            "task {} ends before it starts ({} - {})",
            task.id, task.start, task.end
        )));
    }

    let grid_start = grid.start_hour * 60;
    let grid_end = grid.end_hour * 60;
    let clipped_start = start.clamp(grid_start, grid_end);
    let clipped_end = end.clamp(grid_start, grid_end);
    if clipped_end <= clipped_start {
        return Err(AppError::MalformedTask(format!(
            "task {} lies outside the grid hours ({} - {})",
            task.id, task.start, task.end
        )));
    }

    let column = column_index(date);
    let top_px = grid.offset_for_minutes(clipped_start);
    let height_px = (clipped_end - clipped_start) as f64 / 60.0 * grid.hour_height;

    Ok(TaskBlock {
        task_id: task.id,
        column,
        top_px,
        height_px,
        left_px: column as f64 * grid.column_width(),
        width_px: grid.column_width(),
        status: task.status,
        skill: task.skill.clone(),
        resource_name: task.resource_name.clone(),
        thumbnail_url: task.thumbnail_url.clone(),
    })
}

/// Lay out the tasks of `window`. Overlapping blocks are left overlapping;
/// the later one in the input is drawn on top. Tasks with an unreadable
/// date belong to no week and are listed as rejected.
pub fn layout_week(tasks: &[ScheduledTask], window: &WeekWindow, grid: &GridConfig) -> WeekLayout {
    let mut layout = WeekLayout::default();
    layout.rejected.extend(
        tasks
            .iter()
            .filter(|task| task.calendar_date().is_err())
            .map(|task| task.id),
    );

    for task in filter_tasks_for_week(tasks, window.first_day()) {
        match place_task(&task, grid) {
            Ok(block) => layout.blocks.push(block),
            Err(e) => {
                warn!("Skipping grid placement: {}", e);
                layout.rejected.push(task.id);
            }
        }
    }

    layout
}
