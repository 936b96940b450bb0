//! Dashboard use-case service.
//!
//! # Responsibility
//! - Expose the user-facing actions (add, delete, update, search, filter).
//! - Persist the affected collection after every successful mutation.
//! - Return the recomputed derived view from every action.
//!
//! # Invariants
//! - Member deletion is two-step: `request_delete_member` then
//!   `confirm_delete`; only the most recent request can be confirmed.
//! - Confirmed deletion removes the member and its tasks, then persists
//!   both collections in one batch before returning.
//! - An id-linked task's `assignee` matches its member's name.
//! - Persistence failures never fail an action.

use crate::clock::{Clock, SystemClock};
use crate::config::DashboardConfig;
use crate::model::member::{Member, MemberDraft, MemberId};
use crate::model::seed::{seed_members, seed_tasks};
use crate::model::task::{Task, TaskDraft, TaskId, TaskPatch, TaskStatus};
use crate::repo::member_repo::MemberRepository;
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoError;
use crate::service::notifier::{MessageRecipient, Notifier};
use crate::service::search_input::SearchDebouncer;
use crate::store::kv_store::KeyValueStorage;
use crate::store::persistent_store::PersistentStore;
use crate::view::filter::{filter_members, filter_tasks, DepartmentFilter, StatusFilter};
use crate::view::stats::{member_count, task_stats, TaskStats};
use crate::view::DashboardView;
use log::info;
use std::cell::Cell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Logical storage key of the member collection.
pub const MEMBERS_KEY: &str = "teamMembers";
/// Logical storage key of the task collection.
pub const TASKS_KEY: &str = "tasks";

/// Dashboard action error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    Repo(RepoError),
    /// Confirmation presented while no deletion is pending.
    NoPendingDeletion,
    /// Confirmation token does not match the pending request.
    StaleDeletion { token: Uuid },
}

impl Display for DashboardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::NoPendingDeletion => write!(f, "no member deletion is pending"),
            Self::StaleDeletion { token } => {
                write!(f, "deletion request {token} is no longer pending")
            }
        }
    }
}

impl Error for DashboardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::NoPendingDeletion | Self::StaleDeletion { .. } => None,
        }
    }
}

impl From<RepoError> for DashboardError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;

/// Deletion awaiting user confirmation.
///
/// Carries what a confirmation prompt needs to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeletion {
    pub token: Uuid,
    pub member_id: MemberId,
    pub member_name: String,
    /// Tasks the cascade would remove if confirmed now.
    pub affected_task_ids: Vec<TaskId>,
}

/// Result of a confirmed deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub member: Member,
    pub removed_tasks: Vec<Task>,
    pub view: DashboardView,
}

/// State core behind the dashboard UI.
pub struct DashboardService<S: KeyValueStorage> {
    store: PersistentStore<S>,
    members: MemberRepository,
    tasks: TaskRepository,
    search: SearchDebouncer,
    department_filter: DepartmentFilter,
    status_filter: StatusFilter,
    pending_deletion: Option<PendingDeletion>,
    clock: Box<dyn Clock>,
    stats_cache: Cell<Option<(u64, TaskStats)>>,
}

impl<S: KeyValueStorage> DashboardService<S> {
    /// Opens the dashboard with default configuration and the system clock.
    pub fn open(storage: S) -> Self {
        Self::open_with(storage, &DashboardConfig::default(), Box::new(SystemClock))
    }

    /// Loads both collections, seeding the defaults on first use.
    pub fn open_with(storage: S, config: &DashboardConfig, clock: Box<dyn Clock>) -> Self {
        let store = PersistentStore::with_namespace(storage, config.namespace.as_str());
        let members: Vec<Member> = store.load(MEMBERS_KEY, seed_members());
        let tasks: Vec<Task> = store.load(TASKS_KEY, seed_tasks());

        info!(
            "event=dashboard_open module=service status=ok members={} tasks={}",
            members.len(),
            tasks.len()
        );

        Self {
            store,
            members: MemberRepository::new(members),
            tasks: TaskRepository::new(tasks),
            search: SearchDebouncer::new(config.search_debounce()),
            department_filter: DepartmentFilter::All,
            status_filter: StatusFilter::All,
            pending_deletion: None,
            clock,
            stats_cache: Cell::new(None),
        }
    }

    pub fn members(&self) -> Arc<Vec<Member>> {
        self.members.all()
    }

    pub fn tasks(&self) -> Arc<Vec<Task>> {
        self.tasks.all()
    }

    pub fn store(&self) -> &PersistentStore<S> {
        &self.store
    }

    /// Text currently typed in the search box.
    pub fn search_draft(&self) -> &str {
        self.search.draft()
    }

    /// Query currently applied to filters.
    pub fn search_query(&self) -> &str {
        self.search.committed()
    }

    pub fn department_filter(&self) -> DepartmentFilter {
        self.department_filter
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    pub fn pending_deletion(&self) -> Option<&PendingDeletion> {
        self.pending_deletion.as_ref()
    }

    /// Counts over the full task collection, memoized per collection version.
    pub fn task_stats(&self) -> TaskStats {
        let version = self.tasks.version();
        if let Some((cached_version, stats)) = self.stats_cache.get() {
            if cached_version == version {
                return stats;
            }
        }
        let stats = task_stats(&self.tasks.all());
        self.stats_cache.set(Some((version, stats)));
        stats
    }

    /// Recomputes the derived view from current state.
    pub fn view(&self) -> DashboardView {
        let members = self.members.all();
        let tasks = self.tasks.all();
        let query = self.search.committed();
        DashboardView {
            members: filter_members(&members, query, self.department_filter),
            tasks: filter_tasks(&tasks, query, self.status_filter),
            task_stats: self.task_stats(),
            member_count: member_count(&members),
        }
    }

    /// Adds a member from a form draft.
    ///
    /// # Errors
    /// - `RepoError::Validation` when a required field is empty.
    pub fn add_member(&mut self, draft: MemberDraft) -> DashboardResult<DashboardView> {
        let member = self.members.add(draft, self.clock.as_ref())?;
        self.persist_members();
        info!(
            "event=member_add module=service status=ok member_id={}",
            member.id
        );
        Ok(self.view())
    }

    /// Starts a deletion and returns the token to confirm or cancel it.
    ///
    /// A new request replaces any earlier pending one.
    pub fn request_delete_member(&mut self, id: MemberId) -> DashboardResult<PendingDeletion> {
        let member = self
            .members
            .get(id)
            .ok_or(RepoError::MemberNotFound(id))?;
        let affected_task_ids = self
            .tasks
            .all()
            .iter()
            .filter(|task| task.is_assigned_to(member.id, &member.name))
            .map(|task| task.id)
            .collect();

        let pending = PendingDeletion {
            token: Uuid::new_v4(),
            member_id: member.id,
            member_name: member.name.clone(),
            affected_task_ids,
        };
        if let Some(previous) = self.pending_deletion.replace(pending.clone()) {
            info!(
                "event=member_delete module=service status=superseded token={}",
                previous.token
            );
        }
        Ok(pending)
    }

    /// Performs a pending deletion and its task cascade.
    ///
    /// # Errors
    /// - `NoPendingDeletion` / `StaleDeletion` when `pending` is not the
    ///   current request.
    /// - `RepoError::MemberNotFound` when the member vanished meanwhile.
    pub fn confirm_delete(&mut self, pending: &PendingDeletion) -> DashboardResult<DeletionOutcome> {
        self.take_pending(pending)?;

        let member = self
            .members
            .remove(pending.member_id)
            .ok_or(RepoError::MemberNotFound(pending.member_id))?;
        let removed_tasks = self.tasks.remove_for_member(&member);

        self.store
            .batch()
            .stage(MEMBERS_KEY, self.members.all().as_slice())
            .stage(TASKS_KEY, self.tasks.all().as_slice())
            .commit();
        info!(
            "event=member_delete module=service status=ok member_id={} removed_tasks={}",
            member.id,
            removed_tasks.len()
        );

        Ok(DeletionOutcome {
            member,
            removed_tasks,
            view: self.view(),
        })
    }

    /// Declines a pending deletion; nothing is removed.
    pub fn cancel_delete(&mut self, pending: &PendingDeletion) -> DashboardView {
        if self.take_pending(pending).is_ok() {
            info!(
                "event=member_delete module=service status=cancelled member_id={}",
                pending.member_id
            );
        }
        self.view()
    }

    pub fn update_task_status(
        &mut self,
        id: TaskId,
        status: TaskStatus,
    ) -> DashboardResult<DashboardView> {
        self.tasks.update_status(id, status)?;
        self.persist_tasks();
        Ok(self.view())
    }

    /// Shallow-merges `patch` into one task.
    ///
    /// While the patched task is linked to a member, `assignee` always
    /// carries that member's name; free-text assignee edits are ignored.
    ///
    /// # Errors
    /// - `RepoError::TaskNotFound` when no task has `id`.
    /// - `RepoError::MemberNotFound` when the patched link points nowhere.
    pub fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> DashboardResult<DashboardView> {
        let current = self.tasks.get(id).ok_or(RepoError::TaskNotFound(id))?;
        let linked_id = patch.assignee_id.unwrap_or(current.assignee_id);

        let mut patch = patch.clone();
        if let Some(member_id) = linked_id {
            let member = self
                .members
                .get(member_id)
                .ok_or(RepoError::MemberNotFound(member_id))?;
            patch.assignee = Some(member.name.clone());
        }

        self.tasks.update_fields(id, &patch)?;
        self.persist_tasks();
        Ok(self.view())
    }

    /// Adds a task; id-linked drafts take their assignee name from the member.
    ///
    /// # Errors
    /// - `RepoError::MemberNotFound` when the linked member does not exist.
    /// - `RepoError::Validation` when title or assignee is empty.
    pub fn add_task(&mut self, mut draft: TaskDraft) -> DashboardResult<DashboardView> {
        if let Some(member_id) = draft.assignee_id {
            let member = self
                .members
                .get(member_id)
                .ok_or(RepoError::MemberNotFound(member_id))?;
            draft.assignee = member.name.clone();
        }
        let task = self.tasks.add(draft, self.clock.as_ref())?;
        self.persist_tasks();
        info!("event=task_add module=service status=ok task_id={}", task.id);
        Ok(self.view())
    }

    /// Display name for a task's assignee.
    ///
    /// Id-linked tasks show the member's current name; free-text tasks (and
    /// links to members that no longer exist) show the stored text.
    pub fn resolve_assignee<'a>(&'a self, task: &'a Task) -> &'a str {
        task.assignee_id
            .and_then(|id| self.members.get(id))
            .map_or(task.assignee.as_str(), |member| member.name.as_str())
    }

    /// Applies `text` as the query immediately.
    pub fn set_search_query(&mut self, text: impl Into<String>) -> DashboardView {
        self.search.commit(text);
        self.view()
    }

    /// Records a keystroke; the query changes on a later [`Self::tick`].
    pub fn type_search(&mut self, text: impl Into<String>, now: Instant) {
        self.search.keystroke(text, now);
    }

    /// Drives the search debounce; returns a view when the query changed.
    pub fn tick(&mut self, now: Instant) -> Option<DashboardView> {
        self.search.poll(now)?;
        Some(self.view())
    }

    pub fn clear_search(&mut self) -> DashboardView {
        self.search.clear();
        self.view()
    }

    pub fn set_department_filter(&mut self, filter: DepartmentFilter) -> DashboardView {
        self.department_filter = filter;
        self.view()
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) -> DashboardView {
        self.status_filter = filter;
        self.view()
    }

    /// Hands a member's name and email to `notifier`.
    pub fn send_message(&self, id: MemberId, notifier: &dyn Notifier) -> DashboardResult<()> {
        let member = self
            .members
            .get(id)
            .ok_or(RepoError::MemberNotFound(id))?;
        notifier.send_message(&MessageRecipient {
            name: member.name.clone(),
            email: member.email.clone(),
        });
        Ok(())
    }

    fn take_pending(&mut self, pending: &PendingDeletion) -> DashboardResult<()> {
        let current = self
            .pending_deletion
            .as_ref()
            .ok_or(DashboardError::NoPendingDeletion)?;
        if current.token != pending.token {
            return Err(DashboardError::StaleDeletion {
                token: pending.token,
            });
        }
        self.pending_deletion = None;
        Ok(())
    }

    fn persist_members(&self) {
        self.store.save(MEMBERS_KEY, self.members.all().as_slice());
    }

    fn persist_tasks(&self) {
        self.store.save(TASKS_KEY, self.tasks.all().as_slice());
    }
}
