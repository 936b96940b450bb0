//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate repositories, persistence and derived views into the
//!   actions a presentation layer invokes.
//! - Keep presentation layers decoupled from storage details.

pub mod dashboard_service;
pub mod notifier;
pub mod search_input;
