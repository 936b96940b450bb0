//! Member collection with insertion-ordered, copy-on-write storage.
//!
//! # Responsibility
//! - Create members from validated drafts.
//! - Remove members by id and hand back the removed record so the caller
//!   can cascade to tasks.
//!
//! # Invariants
//! - New members are appended; existing order never changes.
//! - No uniqueness check on name or email.

use crate::clock::Clock;
use crate::model::member::{Member, MemberDraft, MemberId};
use crate::repo::{IdAllocator, RepoResult};
use log::debug;
use std::sync::Arc;

/// Owner of the ordered member collection.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    members: Arc<Vec<Member>>,
    version: u64,
    ids: IdAllocator,
}

impl MemberRepository {
    /// Wraps a loaded (or seeded) collection.
    pub fn new(members: Vec<Member>) -> Self {
        let ids = IdAllocator::starting_after(members.iter().map(|member| member.id));
        Self {
            members: Arc::new(members),
            version: 0,
            ids,
        }
    }

    /// Returns the current snapshot in insertion order.
    pub fn all(&self) -> Arc<Vec<Member>> {
        Arc::clone(&self.members)
    }

    pub fn get(&self, id: MemberId) -> Option<&Member> {
        self.members.iter().find(|member| member.id == id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Monotonic counter bumped by every mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Validates `draft`, assigns id and join date, and appends the member.
    ///
    /// # Errors
    /// - `RepoError::Validation` when `name`, `role` or `email` is empty.
    pub fn add(&mut self, draft: MemberDraft, clock: &dyn Clock) -> RepoResult<Member> {
        draft.validate()?;

        let id = self.ids.next(clock.now_millis());
        let member = draft.into_member(id, clock.today());

        let mut next = Vec::with_capacity(self.members.len() + 1);
        next.extend(self.members.iter().cloned());
        next.push(member.clone());
        self.replace(next);

        debug!(
            "event=member_add module=repo status=ok member_id={} count={}",
            member.id,
            self.members.len()
        );
        Ok(member)
    }

    /// Removes the member with `id`.
    ///
    /// Returns `None` (and leaves the version untouched) when absent.
    pub fn remove(&mut self, id: MemberId) -> Option<Member> {
        let position = self.members.iter().position(|member| member.id == id)?;

        let mut next: Vec<Member> = self.members.as_ref().clone();
        let removed = next.remove(position);
        self.replace(next);

        debug!(
            "event=member_remove module=repo status=ok member_id={} count={}",
            id,
            self.members.len()
        );
        Some(removed)
    }

    fn replace(&mut self, next: Vec<Member>) {
        self.members = Arc::new(next);
        self.version += 1;
    }
}
