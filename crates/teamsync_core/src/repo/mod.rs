//! In-memory repositories for members and tasks.
//!
//! # Responsibility
//! - Own the ordered member/task collections for one session.
//! - Expose copy-producing mutations and immutable snapshots.
//!
//! # Invariants
//! - Each mutation replaces the whole collection and bumps its version.
//! - Callers never receive a mutable alias into a collection.
//! - Allocated ids are unique and strictly increasing per repository.

use crate::model::member::MemberId;
use crate::model::task::TaskId;
use crate::model::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod member_repo;
pub mod task_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for create/update operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    Validation(ValidationError),
    MemberNotFound(MemberId),
    TaskNotFound(TaskId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::MemberNotFound(id) => write!(f, "member not found: {id}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::MemberNotFound(_) | Self::TaskNotFound(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Timestamp-based id source.
///
/// Uses the clock reading when it is ahead of every id handed out so far,
/// otherwise the next integer, so two creations in the same millisecond
/// (or after a clock step back) never collide.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IdAllocator {
    last: i64,
}

impl IdAllocator {
    pub(crate) fn starting_after(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            last: ids.into_iter().max().unwrap_or(0),
        }
    }

    pub(crate) fn next(&mut self, now_millis: i64) -> i64 {
        let id = now_millis.max(self.last.saturating_add(1));
        self.last = id;
        id
    }
}
