use std::sync::Arc;

use tokio::sync::watch;

use crate::models::{ScheduledTask, TaskStatus};

/// Local copy of the task list.
///
/// Every change publishes a brand new `Arc<Vec<_>>`, so a snapshot taken by
/// a reader is never modified underneath it. Clones share the same list.
#[derive(Clone)]
pub struct TaskBoard {
    tasks: Arc<watch::Sender<Arc<Vec<ScheduledTask>>>>,
}

impl Default for TaskBoard {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl TaskBoard {
    pub fn new(tasks: Vec<ScheduledTask>) -> Self {
        let (sender, _) = watch::channel(Arc::new(tasks));
        Self {
            tasks: Arc::new(sender),
        }
    }

    pub fn snapshot(&self) -> Arc<Vec<ScheduledTask>> {
        self.tasks.borrow().clone()
    }

    /// Receiver notified after every published change.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<ScheduledTask>>> {
        self.tasks.subscribe()
    }

    pub fn get(&self, id: i64) -> Option<ScheduledTask> {
        self.tasks.borrow().iter().find(|t| t.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn replace_all(&self, tasks: Vec<ScheduledTask>) {
        self.tasks.send_replace(Arc::new(tasks));
    }

    /// Move task `id` to `to`. Returns whether the list changed.
    ///
    /// A completed task is never moved to another status, and setting the
    /// current status again is a no-op.
    pub fn transition(&self, id: i64, to: TaskStatus) -> bool {
        self.tasks.send_if_modified(|current| {
            let Some(task) = current.iter().find(|t| t.id == id) else {
                return false;
            };
            if task.status == to || task.status.is_terminal() {
                return false;
            }

            let next: Vec<ScheduledTask> = current
                .iter()
                .map(|t| if t.id == id { t.with_status(to) } else { t.clone() })
                .collect();
            *current = Arc::new(next);
            true
        })
    }
}
