use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::board::TaskBoard;
use crate::client::ScheduleApi;
use crate::clock::Clock;
use crate::error::AppError;
use crate::models::TaskStatus;
use crate::services::opener::ResourceOpener;

/// Applies status transitions to the local board and the remote store.
pub struct StatusService {
    api: Arc<dyn ScheduleApi>,
    board: TaskBoard,
    clock: Arc<dyn Clock>,
    opener: Arc<dyn ResourceOpener>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SkipStats {
    pub overdue: usize,
    pub skipped: usize,
    pub failed: usize,
    pub malformed: usize,
}

#[derive(Debug)]
pub struct ClickOutcome {
    pub task_id: i64,
    pub status: TaskStatus,
    pub resource_url: String,
    /// Whether this click moved the task to `completed`.
    pub completed_now: bool,
    /// Background remote update, present when `completed_now` is set.
    pub remote_update: Option<JoinHandle<()>>,
}

impl StatusService {
    pub fn new(
        api: Arc<dyn ScheduleApi>,
        board: TaskBoard,
        clock: Arc<dyn Clock>,
        opener: Arc<dyn ResourceOpener>,
    ) -> Self {
        Self {
            api,
            board,
            clock,
            opener,
        }
    }

    pub fn board(&self) -> &TaskBoard {
        &self.board
    }

    /// Mark every pending task whose end has passed as skipped.
    ///
    /// The local copy only follows a successful remote update; a failed
    /// task stays pending and is picked up again on the next scan. Each
    /// task is re-read from the board right before its update is sent.
    pub async fn skip_overdue(&self) -> SkipStats {
        let now = self.clock.now();
        let snapshot = self.board.snapshot();
        let mut stats = SkipStats::default();

        for task in snapshot.iter().filter(|t| t.status == TaskStatus::Pending) {
            let ends_at = match task.ends_at() {
                Ok(ends_at) => ends_at,
                Err(e) => {
                    warn!("Cannot check task {} for overdue: {}", task.id, e);
                    stats.malformed += 1;
                    continue;
                }
            };
            if ends_at >= now {
                continue;
            }
            // a click may have landed while an earlier update was in flight
            if !self.board.get(task.id).is_some_and(|t| t.status == TaskStatus::Pending) {
                debug!("Task {} changed during the scan, leaving it alone", task.id);
                continue;
            }

            stats.overdue += 1;
            match self.api.update_task_status(task.id, TaskStatus::Skipped).await {
                Ok(()) => {
                    if self.board.transition(task.id, TaskStatus::Skipped) {
                        stats.skipped += 1;
                    }
                }
                Err(e) => {
                    warn!("Failed to mark task {} skipped: {}", task.id, e);
                    stats.failed += 1;
                }
            }
        }

        if stats.overdue > 0 {
            info!(
                "Overdue scan: {} overdue, {} skipped, {} failed",
                stats.overdue, stats.skipped, stats.failed
            );
        }
        stats
    }

    /// Handle a click on a task block.
    ///
    /// Once the task's start time is reached, a task that is not yet
    /// completed flips to `completed` locally right away and the remote
    /// update runs in the background. The resource link is opened in every
    /// case. Must be called from within a tokio runtime.
    pub fn open_task(&self, task_id: i64) -> Result<ClickOutcome, AppError> {
        let task = self.board.get(task_id).ok_or(AppError::NotFound)?;
        let now = self.clock.now();

        let started = match task.starts_at() {
            Ok(starts_at) => now >= starts_at,
            Err(e) => {
                warn!("Task {} has an unreadable start: {}", task_id, e);
                false
            }
        };

        let mut completed_now = false;
        let mut remote_update = None;
        if task.status != TaskStatus::Completed && started {
            completed_now = self.board.transition(task_id, TaskStatus::Completed);
            if completed_now {
                info!("Task {} completed by user", task_id);
                let api = self.api.clone();
                remote_update = Some(tokio::spawn(async move {
                    match api.update_task_status(task_id, TaskStatus::Completed).await {
                        Ok(()) => debug!("Remote completion stored for task {}", task_id),
                        Err(e) => warn!("Failed to store completion of task {}: {}", task_id, e),
                    }
                }));
            }
        }

        if let Err(e) = self.opener.open(&task.resource_url) {
            warn!("Could not open resource for task {}: {}", task_id, e);
        }

        let status = self
            .board
            .get(task_id)
            .map(|t| t.status)
            .unwrap_or(task.status);

        Ok(ClickOutcome {
            task_id,
            status,
            resource_url: task.resource_url,
            completed_now,
            remote_update,
        })
    }
}
