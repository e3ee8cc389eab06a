use std::sync::Arc;

use crate::view::ScheduleView;

#[derive(Clone)]
pub struct AppState {
    pub view: Arc<ScheduleView>,
}
