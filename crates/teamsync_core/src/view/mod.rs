//! Derived, read-only projections over the member/task collections.
//!
//! # Responsibility
//! - Filter members and tasks for display.
//! - Summarize task progress and team size.
//!
//! # Invariants
//! - Every function here is pure; inputs are never mutated.
//! - Output order follows input order.

use crate::model::member::Member;
use crate::model::task::Task;
use serde::Serialize;

pub mod filter;
pub mod stats;

pub use stats::TaskStats;

/// What a presentation layer renders after each action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Members passing the current query and department filter.
    pub members: Vec<Member>,
    /// Tasks passing the current query and status filter.
    pub tasks: Vec<Task>,
    /// Counts over the full (unfiltered) task collection.
    pub task_stats: TaskStats,
    /// Size of the full (unfiltered) member collection.
    pub member_count: usize,
}
