use chrono::NaiveDate;
use serde::Serialize;

use super::{EntityCollection, Record};
use crate::{
    models::{Category, Task, TaskDraft, TaskPatch},
    store::keys,
};

impl Record for Task {
    type Draft = TaskDraft;
    type Patch = TaskPatch;

    const DOMAIN: &'static str = keys::TASKS;

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn from_draft(id: String, owner_id: &str, draft: TaskDraft) -> Self {
        Task {
            id,
            title: draft.title,
            description: draft.description,
            completed: draft.completed,
            due_date: draft.due_date,
            priority: draft.priority,
            category: draft.category,
            owner_id: owner_id.to_string(),
        }
    }

    fn apply(&mut self, patch: &TaskPatch) {
        patch.apply_to(self);
    }
}

pub type TaskCollection = EntityCollection<Task>;

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub today: usize,
    /// `this-week` and `next-week` together.
    pub this_week: usize,
    pub overdue: usize,
}

impl EntityCollection<Task> {
    pub fn toggle_completed(&mut self, id: &str) -> bool {
        self.modify(id, |task| task.completed = !task.completed)
    }

    pub fn filter_by_category(&self, category: Category) -> Vec<&Task> {
        self.records()
            .iter()
            .filter(|task| task.category == category)
            .collect()
    }

    pub fn stats(&self, today: NaiveDate) -> TaskStats {
        self.records()
            .iter()
            .fold(TaskStats::default(), |mut stats, task| {
                stats.total += 1;
                if task.completed {
                    stats.completed += 1;
                }
                match task.category {
                    Category::Today => stats.today += 1,
                    Category::ThisWeek | Category::NextWeek => stats.this_week += 1,
                    Category::Tomorrow | Category::Later => {}
                }
                if task.is_overdue(today) {
                    stats.overdue += 1;
                }
                stats
            })
    }
}
