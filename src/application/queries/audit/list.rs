use super::{AuditQueryService, common};
use crate::{
    application::{
        dto::{AuditLogDto, CursorPage},
        error::{ApplicationError, ApplicationResult},
    },
    domain::audit::{AuditLogFilter, cursor::AuditLogCursor},
};

#[derive(Debug, Clone, Default)]
pub struct ListAuditLogsQuery {
    pub limit: u32,
    pub cursor: Option<String>,
    pub model: Option<String>,
    pub object_pk: Option<String>,
    pub actor_id: Option<i64>,
}

impl AuditQueryService {
    /// Newest first. The filter fields combine with AND.
    pub async fn list_audit_logs(
        &self,
        query: ListAuditLogsQuery,
    ) -> ApplicationResult<CursorPage<AuditLogDto>> {
        let limit = common::normalize_limit(query.limit);
        let typed_cursor = self.decode_cursor(query.cursor.as_deref())?;
        let filter = AuditLogFilter {
            model: query.model.map(|m| m.trim().to_lowercase()).filter(|m| !m.is_empty()),
            object_pk: query.object_pk.filter(|pk| !pk.trim().is_empty()),
            actor_id: query.actor_id,
        };

        let (items, next_cursor) = self
            .repo
            .list(&filter, limit, typed_cursor)
            .await
            .map_err(ApplicationError::from)?;
        let dtos: Vec<_> = items.into_iter().map(Into::<AuditLogDto>::into).collect();
        Ok(CursorPage::new(dtos, next_cursor))
    }

    fn decode_cursor(&self, cursor: Option<&str>) -> ApplicationResult<Option<AuditLogCursor>> {
        match cursor {
            Some(token) => Ok(Some(
                AuditLogCursor::decode(token).map_err(ApplicationError::from)?,
            )),
            None => Ok(None),
        }
    }
}
