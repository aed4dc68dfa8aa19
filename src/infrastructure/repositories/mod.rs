// src/infrastructure/repositories/mod.rs
mod error;
mod models;
mod postgres_audit_log;
mod postgres_auth_token;
mod postgres_sync_result;
mod postgres_user;
pub mod records;

pub use error::map_sqlx;
pub use postgres_audit_log::PostgresAuditLogRepository;
pub use postgres_auth_token::PostgresAuthTokenRepository;
pub use postgres_sync_result::PostgresSyncResultRepository;
pub use postgres_user::PostgresUserRepository;
pub use records::{PgModel, PgRecordRepository, PgValue};
