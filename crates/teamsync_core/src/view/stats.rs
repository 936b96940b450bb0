//! Count summaries for the dashboard header and task list.

use crate::model::member::Member;
use crate::model::task::{Task, TaskStatus};
use serde::Serialize;

/// Task counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub todo: usize,
}

/// Classifies every task by status in one pass.
pub fn task_stats(tasks: &[Task]) -> TaskStats {
    tasks.iter().fold(
        TaskStats {
            total: tasks.len(),
            ..TaskStats::default()
        },
        |mut stats, task| {
            match task.status {
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Todo => stats.todo += 1,
            }
            stats
        },
    )
}

pub fn member_count(members: &[Member]) -> usize {
    members.len()
}

#[cfg(test)]
mod tests {
    use super::{member_count, task_stats, TaskStats};
    use crate::model::seed::{seed_members, seed_tasks};

    #[test]
    fn seed_stats() {
        assert_eq!(
            task_stats(&seed_tasks()),
            TaskStats {
                total: 4,
                completed: 1,
                in_progress: 2,
                todo: 1,
            }
        );
        assert_eq!(member_count(&seed_members()), 4);
    }

    #[test]
    fn empty_collection_has_zero_counts() {
        assert_eq!(task_stats(&[]), TaskStats::default());
    }
}
