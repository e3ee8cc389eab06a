use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{error, info};

use crate::board::TaskBoard;
use crate::client::{GeneratedModule, ScheduleApi};
use crate::clock::Clock;
use crate::error::AppError;
use crate::models::{ScheduledTask, SessionContext};
use crate::schedule::{
    DAY_LABELS, GridConfig, ModuleProgress, MonthCalendar, NowMarker, TaskBlock, WeekWindow,
    layout_week, now_marker, summarize_modules,
};
use crate::services::{ClickOutcome, ResourceOpener, StatusService, ViewTimers};
use crate::time::is_supported_date;

pub const LOADING_MESSAGE: &str = "Loading scheduled tasks...";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch scheduled tasks.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

impl LoadState {
    /// Text shown in place of the grid, if any.
    pub fn placeholder(&self) -> Option<&str> {
        match self {
            LoadState::Loading => Some(LOADING_MESSAGE),
            LoadState::Ready => None,
            LoadState::Failed(message) => Some(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayColumn {
    pub label: &'static str,
    pub date: NaiveDate,
    pub is_today: bool,
}

/// Everything needed to draw one week of the schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekGrid {
    pub window: WeekWindow,
    pub selected: NaiveDate,
    pub days: Vec<DayColumn>,
    pub hour_labels: Vec<String>,
    pub grid: GridConfig,
    pub blocks: Vec<TaskBlock>,
    pub rejected: Vec<i64>,
    pub now_marker: Option<NowMarker>,
    pub load_state: LoadState,
}

/// View-model behind the weekly schedule screen.
pub struct ScheduleView {
    session: SessionContext,
    api: Arc<dyn ScheduleApi>,
    board: TaskBoard,
    status: Arc<StatusService>,
    clock: Arc<dyn Clock>,
    grid: GridConfig,
    selected: watch::Sender<NaiveDate>,
    marker: watch::Sender<Option<NowMarker>>,
    load_state: watch::Sender<LoadState>,
}

impl ScheduleView {
    pub fn new(
        session: SessionContext,
        api: Arc<dyn ScheduleApi>,
        clock: Arc<dyn Clock>,
        opener: Arc<dyn ResourceOpener>,
        grid: GridConfig,
    ) -> Self {
        let board = TaskBoard::default();
        let status = Arc::new(StatusService::new(
            api.clone(),
            board.clone(),
            clock.clone(),
            opener,
        ));
        let today = clock.now().date();

        Self {
            session,
            api,
            board,
            status,
            clock,
            grid,
            selected: watch::Sender::new(today),
            marker: watch::Sender::new(None),
            load_state: watch::Sender::new(LoadState::Loading),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn board(&self) -> &TaskBoard {
        &self.board
    }

    pub fn status_service(&self) -> Arc<StatusService> {
        self.status.clone()
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state.borrow().clone()
    }

    pub fn selected_date(&self) -> NaiveDate {
        *self.selected.borrow()
    }

    pub fn now_marker(&self) -> Option<NowMarker> {
        *self.marker.borrow()
    }

    pub fn subscribe_now_marker(&self) -> watch::Receiver<Option<NowMarker>> {
        self.marker.subscribe()
    }

    /// Initial fetch. A failure leaves the view in the failed state.
    pub async fn load(&self) -> Result<usize, AppError> {
        self.load_state.send_replace(LoadState::Loading);
        match self.api.fetch_tasks(self.session.user_id).await {
            Ok(tasks) => {
                let count = tasks.len();
                self.board.replace_all(tasks);
                self.load_state.send_replace(LoadState::Ready);
                info!("Loaded {} scheduled tasks for user {}", count, self.session.user_id);
                Ok(count)
            }
            Err(e) => {
                error!("Failed to fetch scheduled tasks: {}", e);
                self.load_state
                    .send_replace(LoadState::Failed(FETCH_FAILED_MESSAGE.to_string()));
                Err(e)
            }
        }
    }

    /// Re-fetch from the store and replace the local copy, dropping any
    /// optimistic state the store does not share. Keeps the current tasks
    /// on failure.
    pub async fn refresh(&self) -> Result<usize, AppError> {
        let tasks = self.api.fetch_tasks(self.session.user_id).await?;
        let count = tasks.len();
        self.board.replace_all(tasks);
        self.load_state.send_replace(LoadState::Ready);
        info!("Refreshed {} scheduled tasks", count);
        Ok(count)
    }

    /// Ask the store to generate a schedule, then reload it.
    pub async fn generate(&self, start_date: Option<NaiveDate>) -> Result<Vec<GeneratedModule>, AppError> {
        let schedule = self
            .api
            .generate_tasks(self.session.user_id, start_date)
            .await?;
        if let Some(message) = &schedule.message {
            info!("{}", message);
        }

        if let Err(e) = self.refresh().await {
            if schedule.tasks.is_empty() {
                return Err(e);
            }
            error!("Reload after generation failed, using generated tasks: {}", e);
            self.board.replace_all(schedule.tasks);
            self.load_state.send_replace(LoadState::Ready);
        }
        Ok(schedule.modules)
    }

    /// Replace the user's whole schedule in the store, then reload it.
    pub async fn save_tasks(&self, tasks: Vec<ScheduledTask>) -> Result<usize, AppError> {
        let added = self.api.replace_tasks(self.session.user_id, &tasks).await?;
        info!("Stored {} scheduled tasks for user {}", added, self.session.user_id);
        if let Err(e) = self.refresh().await {
            error!("Reload after save failed, using saved tasks: {}", e);
            self.board.replace_all(tasks);
        }
        Ok(added)
    }

    /// Select `date`. Dates outside the supported years are refused and
    /// the current selection is kept.
    pub fn select_date(&self, date: NaiveDate) -> Result<NaiveDate, AppError> {
        ensure_supported(date)?;
        self.selected.send_replace(date);
        self.refresh_now_marker();
        Ok(date)
    }

    pub fn next_week(&self) -> Result<NaiveDate, AppError> {
        let date = self
            .selected_date()
            .checked_add_days(Days::new(7))
            .ok_or_else(|| out_of_range(self.selected_date()))?;
        self.select_date(date)
    }

    pub fn previous_week(&self) -> Result<NaiveDate, AppError> {
        let date = self
            .selected_date()
            .checked_sub_days(Days::new(7))
            .ok_or_else(|| out_of_range(self.selected_date()))?;
        self.select_date(date)
    }

    /// Jump to the week holding the first task of `module`.
    pub fn select_module(&self, module: i32) -> Result<NaiveDate, AppError> {
        let first = self
            .module_summary()
            .into_iter()
            .find(|m| m.module == module)
            .and_then(|m| m.first_date)
            .ok_or(AppError::NotFound)?;
        self.select_date(first)
    }

    pub fn refresh_now_marker(&self) -> Option<NowMarker> {
        let marker = now_marker(self.clock.now(), self.selected_date(), &self.grid);
        self.marker.send_replace(marker);
        marker
    }

    /// Grid of the selected week with the last computed marker.
    pub fn week_grid(&self) -> WeekGrid {
        self.build_week_grid(self.selected_date(), self.now_marker())
    }

    /// Grid of the week holding `date`, leaving the selection untouched.
    pub fn week_grid_for(&self, date: NaiveDate) -> Result<WeekGrid, AppError> {
        ensure_supported(date)?;
        let marker = now_marker(self.clock.now(), date, &self.grid);
        Ok(self.build_week_grid(date, marker))
    }

    fn build_week_grid(&self, selected: NaiveDate, marker: Option<NowMarker>) -> WeekGrid {
        let today = self.clock.now().date();
        let window = WeekWindow::for_date(selected);

        let snapshot = self.board.snapshot();
        let layout = layout_week(&snapshot, &window, &self.grid);

        let days = window
            .days()
            .into_iter()
            .zip(DAY_LABELS)
            .map(|(date, label)| DayColumn {
                label,
                date,
                is_today: date == today,
            })
            .collect();
        let hour_labels = (self.grid.start_hour..=self.grid.end_hour)
            .map(|h| format!("{}:00", h))
            .collect();

        WeekGrid {
            window,
            selected,
            days,
            hour_labels,
            grid: self.grid,
            blocks: layout.blocks,
            rejected: layout.rejected,
            now_marker: marker,
            load_state: self.load_state(),
        }
    }

    /// Per-module progress over the whole task list, not just the visible week.
    pub fn module_summary(&self) -> Vec<ModuleProgress> {
        summarize_modules(&self.board.snapshot())
    }

    pub fn calendar(&self, month: Option<NaiveDate>) -> Result<MonthCalendar, AppError> {
        let selected = self.selected_date();
        let month = month.unwrap_or(selected);
        ensure_supported(month)?;
        Ok(MonthCalendar::build(month, selected, self.clock.now().date()))
    }

    pub fn open_task(&self, task_id: i64) -> Result<ClickOutcome, AppError> {
        self.status.open_task(task_id)
    }

    /// Compute the marker now and start both periodic timers.
    pub fn mount(self: &Arc<Self>, interval: Duration) -> ViewTimers {
        self.refresh_now_marker();
        ViewTimers::spawn(self, interval)
    }
}

fn ensure_supported(date: NaiveDate) -> Result<(), AppError> {
    if is_supported_date(date) {
        Ok(())
    } else {
        Err(out_of_range(date))
    }
}

fn out_of_range(date: NaiveDate) -> AppError {
    AppError::BadRequest(format!("Date out of range: {}", date))
}
