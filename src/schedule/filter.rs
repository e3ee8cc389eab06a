use chrono::NaiveDate;
use tracing::warn;

use crate::models::ScheduledTask;
use crate::schedule::week::WeekWindow;

/// Tasks whose date falls inside the week containing `reference`.
/// Order follows the input; records with an unparseable date are dropped.
pub fn filter_tasks_for_week(tasks: &[ScheduledTask], reference: NaiveDate) -> Vec<ScheduledTask> {
    let window = WeekWindow::for_date(reference);
    tasks
        .iter()
        .filter(|task| match task.calendar_date() {
            Ok(date) => window.contains_date(date),
            Err(e) => {
                warn!("Excluding task {} from week view: {}", task.id, e);
                false
            }
        })
        .cloned()
        .collect()
}
