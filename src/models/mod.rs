pub mod session;
pub mod task;

pub use session::SessionContext;
pub use task::{ScheduledTask, TaskStatus};
