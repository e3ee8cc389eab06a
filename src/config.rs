use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::AppError;
use crate::models::SessionContext;
use crate::schedule::GridConfig;
use crate::services::scheduler::DEFAULT_TICK_SECS;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_url: String,
    pub session: SessionContext,
    pub tick: Duration,
    pub grid: GridConfig,
    pub bind: SocketAddr,
    pub open_links: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let user_id = env::var("STUDYGRID_USER_ID")
            .map_err(|_| AppError::Config("STUDYGRID_USER_ID is not set".to_string()))?;
        let user_id: i64 = parse_value("STUDYGRID_USER_ID", &user_id)?;

        let mut session = SessionContext::new(user_id);
        if let Ok(token) = env::var("STUDYGRID_ACCESS_TOKEN") {
            if !token.is_empty() {
                session = session.with_token(token);
            }
        }

        let tick_secs: u64 = optional("STUDYGRID_TICK_SECS", DEFAULT_TICK_SECS)?;
        if tick_secs == 0 {
            return Err(AppError::Config("STUDYGRID_TICK_SECS must be positive".to_string()));
        }

        let defaults = GridConfig::default();
        let hour_height: f64 = optional("STUDYGRID_HOUR_HEIGHT", defaults.hour_height)?;
        let track_width: f64 = optional("STUDYGRID_TRACK_WIDTH", defaults.track_width)?;
        if hour_height <= 0.0 || track_width <= 0.0 {
            return Err(AppError::Config("grid dimensions must be positive".to_string()));
        }

        let bind = env::var("STUDYGRID_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());

        Ok(Self {
            api_url: env::var("SCHEDULE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            session,
            tick: Duration::from_secs(tick_secs),
            grid: defaults
                .with_hour_height(hour_height)
                .with_track_width(track_width),
            bind: parse_value("STUDYGRID_BIND", &bind)?,
            open_links: optional("STUDYGRID_OPEN_LINKS", true)?,
        })
    }
}

fn optional<T: std::str::FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", key, raw)))
}
