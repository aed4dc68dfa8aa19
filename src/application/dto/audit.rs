use crate::domain::audit::entity::AuditLog;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::serde_time;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditLogDto {
    pub id: i64,
    pub actor_id: Option<i64>,
    pub actor_name: Option<String>,
    pub action: String,
    pub app_label: String,
    pub model: String,
    pub object_pk: String,
    /// `{"field": [old, new]}`
    #[schema(value_type = Object)]
    pub changes: serde_json::Value,
    pub path: Option<String>,
    pub method: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
}

impl From<AuditLog> for AuditLogDto {
    fn from(a: AuditLog) -> Self {
        Self {
            id: a.id.unwrap_or_default(),
            actor_id: a.actor_id.map(Into::into),
            actor_name: a.actor_name,
            action: a.action.as_str().to_string(),
            app_label: a.app_label,
            model: a.model,
            object_pk: a.object_pk,
            changes: a.changes.to_json(),
            path: a.path,
            method: a.method,
            ip_address: a.ip_address,
            user_agent: a.user_agent,
            created_at: a.created_at,
        }
    }
}
