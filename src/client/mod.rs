pub mod dto;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::models::{ScheduledTask, TaskStatus};

pub use dto::{GeneratedModule, GeneratedSchedule};

#[derive(Clone, Debug)]
pub struct ScheduleApiConfig {
    pub base_url: String,
    pub access_token: Option<String>,
}

impl ScheduleApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }
}

/// Remote store owning the scheduled tasks.
#[async_trait]
pub trait ScheduleApi: Send + Sync {
    async fn fetch_tasks(&self, user_id: i64) -> Result<Vec<ScheduledTask>, AppError>;
    async fn update_task_status(&self, task_id: i64, status: TaskStatus) -> Result<(), AppError>;
    async fn generate_tasks(
        &self,
        user_id: i64,
        start_date: Option<NaiveDate>,
    ) -> Result<GeneratedSchedule, AppError>;
    async fn replace_tasks(&self, user_id: i64, tasks: &[ScheduledTask]) -> Result<usize, AppError>;
}

pub struct ScheduleHttpClient {
    client: Client,
    config: ScheduleApiConfig,
}

impl ScheduleHttpClient {
    pub fn new(config: ScheduleApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn ensure_success(response: Response) -> Result<Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Remote {
            status: status.as_u16(),
            body,
        })
    }
}

/// Parse records one at a time so a bad record only drops itself.
pub fn parse_tasks(records: Vec<serde_json::Value>) -> Vec<ScheduledTask> {
    let mut tasks = Vec::with_capacity(records.len());
    for record in records {
        match serde_json::from_value::<ScheduledTask>(record) {
            Ok(task) => tasks.push(task),
            Err(e) => warn!("Failed to parse scheduled task: {}", e),
        }
    }
    tasks
}

#[async_trait]
impl ScheduleApi for ScheduleHttpClient {
    async fn fetch_tasks(&self, user_id: i64) -> Result<Vec<ScheduledTask>, AppError> {
        let url = self.url(&format!("scheduled-tasks/{}", user_id));
        let response = self.authorize(self.client.get(&url)).send().await?;
        let response = Self::ensure_success(response).await?;

        let records: Vec<serde_json::Value> = response.json().await?;
        let total = records.len();
        let tasks = parse_tasks(records);
        debug!("Fetched {} of {} scheduled tasks for user {}", tasks.len(), total, user_id);
        Ok(tasks)
    }

    async fn update_task_status(&self, task_id: i64, status: TaskStatus) -> Result<(), AppError> {
        let url = self.url(&format!("scheduled-tasks/{}", task_id));
        let request_body = dto::StatusUpdateRequest { status };

        let response = self
            .authorize(self.client.patch(&url))
            .json(&request_body)
            .send()
            .await?;
        Self::ensure_success(response).await?;

        debug!("Task {} marked {} remotely", task_id, status);
        Ok(())
    }

    async fn generate_tasks(
        &self,
        user_id: i64,
        start_date: Option<NaiveDate>,
    ) -> Result<GeneratedSchedule, AppError> {
        let url = self.url("generate-scheduled-tasks");
        let request_body = dto::GenerateScheduleRequest {
            user_id,
            start_date,
        };

        let response = self
            .authorize(self.client.post(&url))
            .json(&request_body)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let body: dto::GenerateScheduleResponse = response.json().await?;
        let generated = body.tasks.len();
        // The generator may echo tasks before the store has assigned ids
        let persisted: Vec<serde_json::Value> = body
            .tasks
            .into_iter()
            .filter(|record| record.get("id").is_some())
            .collect();
        let schedule = GeneratedSchedule {
            message: body.message,
            tasks: parse_tasks(persisted),
            modules: body.modules.unwrap_or_default(),
        };
        info!(
            "Generated {} tasks in {} modules for user {}",
            generated,
            schedule.modules.len(),
            user_id
        );
        Ok(schedule)
    }

    async fn replace_tasks(&self, user_id: i64, tasks: &[ScheduledTask]) -> Result<usize, AppError> {
        let url = self.url(&format!("scheduled-tasks/{}", user_id));
        let response = self
            .authorize(self.client.post(&url))
            .json(tasks)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let body: dto::ReplaceTasksResponse = response.json().await?;
        Ok(body.tasks_added)
    }
}

pub struct NoopScheduleApi;

#[async_trait]
impl ScheduleApi for NoopScheduleApi {
    async fn fetch_tasks(&self, _user_id: i64) -> Result<Vec<ScheduledTask>, AppError> {
        Ok(Vec::new())
    }

    async fn update_task_status(&self, _task_id: i64, _status: TaskStatus) -> Result<(), AppError> {
        Ok(())
    }

    async fn generate_tasks(
        &self,
        _user_id: i64,
        _start_date: Option<NaiveDate>,
    ) -> Result<GeneratedSchedule, AppError> {
        Ok(GeneratedSchedule {
            message: None,
            tasks: Vec::new(),
            modules: Vec::new(),
        })
    }

    async fn replace_tasks(&self, _user_id: i64, tasks: &[ScheduledTask]) -> Result<usize, AppError> {
        Ok(tasks.len())
    }
}
