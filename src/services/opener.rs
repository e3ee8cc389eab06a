use tracing::debug;

use crate::error::AppError;

/// Opens a learning resource link for the user.
pub trait ResourceOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), AppError>;
}

/// Hands the URL to the platform's default browser.
pub struct BrowserOpener;

impl ResourceOpener for BrowserOpener {
    fn open(&self, url: &str) -> Result<(), AppError> {
        open::that(url).map_err(|e| AppError::BadRequest(format!("Failed to open {}: {}", url, e)))
    }
}

/// Leaves opening to the caller (the URL is returned in the click outcome).
pub struct NoopOpener;

impl ResourceOpener for NoopOpener {
    fn open(&self, url: &str) -> Result<(), AppError> {
        debug!("Resource link left to caller: {}", url);
        Ok(())
    }
}
