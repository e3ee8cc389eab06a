pub mod calendar;
pub mod filter;
pub mod layout;
pub mod now_marker;
pub mod progress;
pub mod week;

pub use calendar::{CalendarCell, MonthCalendar};
pub use filter::filter_tasks_for_week;
pub use layout::{GridConfig, TaskBlock, WeekLayout, column_index, layout_week, place_task};
pub use now_marker::{NowMarker, now_marker};
pub use progress::{ModuleProgress, SkillCount, completion_percent, summarize_modules};
pub use week::{DAY_LABELS, WeekWindow, week_start};
