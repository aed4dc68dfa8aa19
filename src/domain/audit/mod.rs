pub mod cursor;
pub mod diff;
pub mod entity;
pub mod repository;

pub use cursor::AuditLogCursor;
pub use diff::{FieldDiff, FieldMap, Redactor, snapshot};
pub use entity::{AuditAction, AuditLog};
pub use repository::{AuditLogFilter, AuditLogRepository};
