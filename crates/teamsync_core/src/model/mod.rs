//! Domain model for the team dashboard.
//!
//! # Responsibility
//! - Define the member/task records shared by repositories, filters and views.
//! - Provide draft and patch shapes used by the create/update actions.
//!
//! # Invariants
//! - Every record carries an integer id that never changes after creation.
//! - Serialized field names are camelCase and match the persisted documents.

pub mod member;
pub mod seed;
pub mod task;
pub mod validation;
