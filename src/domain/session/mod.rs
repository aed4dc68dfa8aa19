// src/domain/session/mod.rs
pub mod entity;
pub mod policy;
pub mod repository;

pub use entity::{AuthToken, NewAuthToken};
pub use policy::{ExpiryReason, IdlePolicy, TokenDecision};
pub use repository::{AuthTokenRepository, TokenCheck};
