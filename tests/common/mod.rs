#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use studygrid::client::{GeneratedModule, GeneratedSchedule, ScheduleApi};
use studygrid::clock::ManualClock;
use studygrid::error::AppError;
use studygrid::models::{ScheduledTask, SessionContext, TaskStatus};
use studygrid::schedule::GridConfig;
use studygrid::services::ResourceOpener;
use studygrid::view::ScheduleView;

/// In-memory store that records every status update it receives.
#[derive(Default)]
pub struct RecordingApi {
    pub tasks: Mutex<Vec<ScheduledTask>>,
    pub updates: Mutex<Vec<(i64, TaskStatus)>>,
    pub fail_updates: AtomicBool,
    pub fail_fetch: AtomicBool,
    pub fetches: AtomicUsize,
    /// Held by a test to keep status updates waiting.
    pub update_gate: tokio::sync::Mutex<()>,
    pub waiting_updates: AtomicUsize,
}

impl RecordingApi {
    pub fn with_tasks(tasks: Vec<ScheduledTask>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            ..Default::default()
        }
    }

    pub fn updates(&self) -> Vec<(i64, TaskStatus)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScheduleApi for RecordingApi {
    async fn fetch_tasks(&self, _user_id: i64) -> Result<Vec<ScheduledTask>, AppError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(AppError::Remote {
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn update_task_status(&self, task_id: i64, status: TaskStatus) -> Result<(), AppError> {
        self.waiting_updates.fetch_add(1, Ordering::SeqCst);
        let _gate = self.update_gate.lock().await;
        self.waiting_updates.fetch_sub(1, Ordering::SeqCst);
        self.updates.lock().unwrap().push((task_id, status));
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Remote {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        let mut tasks = self.tasks.lock().unwrap();
        if let Some(task) = tasks.iter_mut().find(|t| t.id == task_id) {
            task.status = status;
        }
        Ok(())
    }

    async fn generate_tasks(
        &self,
        user_id: i64,
        _start_date: Option<NaiveDate>,
    ) -> Result<GeneratedSchedule, AppError> {
        let generated = vec![
            task(100, "2025-06-10", "09:00", "10:00"),
            task(101, "2025-06-11", "09:00", "11:00"),
        ];
        let mut tasks = self.tasks.lock().unwrap();
        *tasks = generated
            .into_iter()
            .map(|mut t| {
                t.user_id = user_id;
                t
            })
            .collect();
        Ok(GeneratedSchedule {
            message: Some(format!("Scheduled {} tasks", tasks.len())),
            tasks: Vec::new(),
            modules: vec![GeneratedModule {
                module: 1,
                skills: vec!["python".to_string()],
                duration: vec![3.0],
            }],
        })
    }

    async fn replace_tasks(&self, _user_id: i64, tasks: &[ScheduledTask]) -> Result<usize, AppError> {
        *self.tasks.lock().unwrap() = tasks.to_vec();
        Ok(tasks.len())
    }
}

/// Opener that only remembers what it was asked to open.
#[derive(Default)]
pub struct RecordingOpener {
    pub opened: Mutex<Vec<String>>,
}

impl ResourceOpener for RecordingOpener {
    fn open(&self, url: &str) -> Result<(), AppError> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

pub fn task(id: i64, date: &str, start: &str, end: &str) -> ScheduledTask {
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

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

pub struct Fixture {
    pub api: Arc<RecordingApi>,
    pub clock: Arc<ManualClock>,
    pub opener: Arc<RecordingOpener>,
    pub view: Arc<ScheduleView>,
}

pub async fn loaded_view(tasks: Vec<ScheduledTask>, now: NaiveDateTime) -> Fixture {
    let api = Arc::new(RecordingApi::with_tasks(tasks));
    let clock = Arc::new(ManualClock::new(now));
    let opener = Arc::new(RecordingOpener::default());
    let view = Arc::new(ScheduleView::new(
        SessionContext::new(1),
        api.clone(),
        clock.clone(),
        opener.clone(),
        GridConfig::default(),
    ));
    view.load().await.expect("initial load");
    Fixture {
        api,
        clock,
        opener,
        view,
    }
}
