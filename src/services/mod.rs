pub mod opener;
pub mod scheduler;
pub mod status;

pub use opener::{BrowserOpener, NoopOpener, ResourceOpener};
pub use scheduler::{NowMarkerTicker, StatusScheduler, ViewTimers};
pub use status::{ClickOutcome, SkipStats, StatusService};
