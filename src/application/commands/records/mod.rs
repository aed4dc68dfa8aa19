// src/application/commands/records/mod.rs
//! Audited mutations over soft-deletable records. Every write goes through
//! here so the audit trail is an explicit part of the call, not a hook.
mod create;
mod delete;
mod service;
mod update;

pub use service::{Mutation, RecordCommandService};
