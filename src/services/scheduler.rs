use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::services::status::StatusService;
use crate::view::ScheduleView;

pub const DEFAULT_TICK_SECS: u64 = 60;

/// Periodic overdue scan. The first scan runs as soon as it starts.
pub struct StatusScheduler {
    service: Arc<StatusService>,
    interval: Duration,
}

impl StatusScheduler {
    pub fn new(service: Arc<StatusService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    pub async fn start(self) {
        info!("Starting overdue scan (interval: {:?})", self.interval);

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let stats = self.service.skip_overdue().await;
            debug!("Overdue scan finished: {:?}", stats);
        }
    }
}

/// Periodic recomputation of the "now" marker.
pub struct NowMarkerTicker {
    view: Arc<ScheduleView>,
    interval: Duration,
}

impl NowMarkerTicker {
    pub fn new(view: Arc<ScheduleView>, interval: Duration) -> Self {
        Self { view, interval }
    }

    pub async fn start(self) {
        info!("Starting now-marker refresh (interval: {:?})", self.interval);

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.view.refresh_now_marker();
        }
    }
}

/// Both view timers. Dropping this aborts them.
pub struct ViewTimers {
    handles: Vec<JoinHandle<()>>,
}

impl ViewTimers {
    pub fn spawn(view: &Arc<ScheduleView>, interval: Duration) -> Self {
        let status = StatusScheduler::new(view.status_service(), interval);
        let marker = NowMarkerTicker::new(view.clone(), interval);

        Self {
            handles: vec![
                tokio::spawn(status.start()),
                tokio::spawn(marker.start()),
            ],
        }
    }

    pub fn is_running(&self) -> bool {
        self.handles.iter().any(|h| !h.is_finished())
    }

    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for ViewTimers {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
        info!("View timers stopped");
    }
}
