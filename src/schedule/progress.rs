use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{ScheduledTask, TaskStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillCount {
    pub skill: String,
    pub tasks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleProgress {
    pub module: i32,
    pub total: usize,
    pub completed: usize,
    pub percent: u8,
    /// Distinct skills in order of first appearance.
    pub skills: Vec<SkillCount>,
    pub total_minutes: i64,
    pub first_date: Option<NaiveDate>,
}

/// Completion percentage rounded half up; 0 for an empty group.
pub fn completion_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total);
    ((200 * completed + total) / (2 * total)) as u8
}

/// Group the full task list by module, then by skill. Modules are returned
/// in ascending order.
pub fn summarize_modules(tasks: &[ScheduledTask]) -> Vec<ModuleProgress> {
    let mut grouped: BTreeMap<i32, Vec<&ScheduledTask>> = BTreeMap::new();
    for task in tasks {
        grouped.entry(task.module).or_default().push(task);
    }

    grouped
        .into_iter()
        .map(|(module, module_tasks)| {
            let total = module_tasks.len();
            let completed = module_tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Completed)
                .count();

            let mut skills: Vec<SkillCount> = Vec::new();
            for task in &module_tasks {
                match skills.iter_mut().find(|s| s.skill == task.skill) {
                    Some(entry) => entry.tasks += 1,
                    None => skills.push(SkillCount {
                        skill: task.skill.clone(),
                        tasks: 1,
                    }),
                }
            }

            ModuleProgress {
                module,
                total,
                completed,
                percent: completion_percent(completed, total),
                skills,
                total_minutes: module_tasks.iter().map(|t| t.duration_minutes()).sum(),
                first_date: module_tasks
                    .iter()
                    .filter_map(|t| t.calendar_date().ok())
                    .min(),
            }
        })
        .collect()
}
