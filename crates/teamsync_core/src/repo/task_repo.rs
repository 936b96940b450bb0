//! Task collection with copy-on-write updates.
//!
//! # Responsibility
//! - Apply status and field updates to one task at a time.
//! - Remove tasks belonging to a deleted member.
//!
//! # Invariants
//! - `update_status` touches nothing but `status`.
//! - `update_fields` never changes `id`.
//! - Removal keeps the relative order of surviving tasks.

use crate::clock::Clock;
use crate::model::member::Member;
use crate::model::task::{Task, TaskDraft, TaskId, TaskPatch, TaskStatus};
use crate::repo::{IdAllocator, RepoError, RepoResult};
use log::debug;
use std::sync::Arc;

/// Owner of the ordered task collection.
#[derive(Debug, Clone)]
pub struct TaskRepository {
    tasks: Arc<Vec<Task>>,
    version: u64,
    ids: IdAllocator,
}

impl TaskRepository {
    pub fn new(tasks: Vec<Task>) -> Self {
        let ids = IdAllocator::starting_after(tasks.iter().map(|task| task.id));
        Self {
            tasks: Arc::new(tasks),
            version: 0,
            ids,
        }
    }

    pub fn all(&self) -> Arc<Vec<Task>> {
        Arc::clone(&self.tasks)
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Validates `draft` and appends the new task.
    ///
    /// The caller is responsible for resolving `assignee` when the draft is
    /// linked by member id.
    pub fn add(&mut self, draft: TaskDraft, clock: &dyn Clock) -> RepoResult<Task> {
        draft.validate()?;

        let task = draft.into_task(self.ids.next(clock.now_millis()));
        let mut next = self.tasks.as_ref().clone();
        next.push(task.clone());
        self.replace(next);

        debug!(
            "event=task_add module=repo status=ok task_id={} count={}",
            task.id,
            self.tasks.len()
        );
        Ok(task)
    }

    /// Sets the status of one task. Any status may follow any other.
    pub fn update_status(&mut self, id: TaskId, status: TaskStatus) -> RepoResult<Task> {
        self.update_with(id, |task| Task {
            status,
            ..task.clone()
        })
    }

    /// Shallow-merges `patch` into one task.
    pub fn update_fields(&mut self, id: TaskId, patch: &TaskPatch) -> RepoResult<Task> {
        self.update_with(id, |task| patch.apply_to(task))
    }

    /// Removes every task whose `assignee` is exactly `name`.
    pub fn remove_by_assignee_name(&mut self, name: &str) -> Vec<Task> {
        self.remove_where(|task| task.assignee == name)
    }

    /// Removes the tasks that belong to `member`.
    ///
    /// Id-linked tasks match on `assignee_id`; free-text tasks match on the
    /// member's current name.
    pub fn remove_for_member(&mut self, member: &Member) -> Vec<Task> {
        self.remove_where(|task| task.is_assigned_to(member.id, &member.name))
    }

    fn update_with(&mut self, id: TaskId, change: impl FnOnce(&Task) -> Task) -> RepoResult<Task> {
        let position = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(RepoError::TaskNotFound(id))?;

        let mut updated = change(&self.tasks[position]);
        updated.id = id;
        if updated == self.tasks[position] {
            return Ok(updated);
        }

        let mut next = self.tasks.as_ref().clone();
        next[position] = updated.clone();
        self.replace(next);

        debug!("event=task_update module=repo status=ok task_id={id}");
        Ok(updated)
    }

    fn remove_where(&mut self, matches: impl Fn(&Task) -> bool) -> Vec<Task> {
        let (removed, kept): (Vec<Task>, Vec<Task>) =
            self.tasks.iter().cloned().partition(|task| matches(task));
        if removed.is_empty() {
            return removed;
        }

        self.replace(kept);
        debug!(
            "event=task_remove module=repo status=ok removed={} count={}",
            removed.len(),
            self.tasks.len()
        );
        removed
    }

    fn replace(&mut self, next: Vec<Task>) {
        self.tasks = Arc::new(next);
        self.version += 1;
    }
}
