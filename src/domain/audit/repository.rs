use crate::domain::audit::{cursor::AuditLogCursor, entity::AuditLog};
use crate::domain::errors::DomainResult;
use async_trait::async_trait;

#[derive(Debug, Clone, Default)]
pub struct AuditLogFilter {
    pub model: Option<String>,
    pub object_pk: Option<String>,
    pub actor_id: Option<i64>,
}

impl AuditLogFilter {
    pub fn matches(&self, log: &AuditLog) -> bool {
        self.model.as_deref().is_none_or(|m| m == log.model)
            && self.object_pk.as_deref().is_none_or(|pk| pk == log.object_pk)
            && self
                .actor_id
                .is_none_or(|actor| log.actor_id.map(i64::from) == Some(actor))
    }
}

#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Persist one audit row and return its id.
    async fn insert(&self, log: AuditLog) -> DomainResult<i64>;

    /// Newest first, keyset-paginated on `(created_at, id)`.
    async fn list(
        &self,
        filter: &AuditLogFilter,
        limit: u32,
        cursor: Option<AuditLogCursor>,
    ) -> DomainResult<(Vec<AuditLog>, Option<String>)>;
}
