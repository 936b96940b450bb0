//! State core for the TeamSync dashboard.
//! Owns member/task collections, their persistence, and the derived views a
//! presentation layer renders.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod view;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, DashboardConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::member::{Department, Member, MemberDraft, MemberId};
pub use model::task::{Task, TaskDraft, TaskId, TaskPatch, TaskPriority, TaskStatus};
pub use model::validation::ValidationError;
pub use repo::member_repo::MemberRepository;
pub use repo::task_repo::TaskRepository;
pub use repo::{RepoError, RepoResult};
pub use service::dashboard_service::{
    DashboardError, DashboardResult, DashboardService, DeletionOutcome, PendingDeletion,
};
pub use service::notifier::{LogNotifier, MessageRecipient, Notifier};
pub use service::search_input::SearchDebouncer;
pub use store::kv_store::{
    KeyValueStorage, MemoryKeyValueStorage, SqliteKeyValueStorage, StoreError, StoreResult,
};
pub use store::persistent_store::{PersistentStore, WriteBatch};
pub use view::filter::{filter_members, filter_tasks, DepartmentFilter, StatusFilter};
pub use view::stats::{member_count, task_stats, TaskStats};
pub use view::DashboardView;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
