//! Durable key/value persistence for whole-collection snapshots.
//!
//! # Responsibility
//! - Abstract the raw string store behind [`KeyValueStorage`].
//! - Provide [`PersistentStore`], the seeded load / last-write-wins save
//!   contract used by the dashboard.
//!
//! # Invariants
//! - Values are complete JSON documents; there is no partial update.
//! - `PersistentStore` never propagates storage or decoding failures.

pub mod kv_store;
pub mod persistent_store;
