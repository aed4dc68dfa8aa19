// src/presentation/http/controllers/audit.rs
use crate::application::dto::{AuditLogDto, CursorPage};
use crate::application::queries::audit::ListAuditLogsQuery;
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, extract::Query};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListAuditParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub cursor: Option<String>,
    /// Model name, e.g. `affaire`.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub object_pk: Option<String>,
    #[serde(default)]
    pub actor_id: Option<i64>,
}

fn default_limit() -> u32 {
    20
}

#[derive(Debug, serde::Serialize, ToSchema)]
pub struct AuditLogListResponse {
    pub items: Vec<AuditLogDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl From<CursorPage<AuditLogDto>> for AuditLogListResponse {
    fn from(page: CursorPage<AuditLogDto>) -> Self {
        Self {
            items: page.items,
            next_cursor: page.next_cursor,
            has_more: page.has_more,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/audit-logs",
    params(ListAuditParams),
    responses(
        (status = 200, description = "Audit trail, newest first.", body = AuditLogListResponse),
        (status = 400, description = "Malformed cursor.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Audit"
)]
pub async fn list_audit_logs(
    Extension(state): Extension<HttpState>,
    Query(params): Query<ListAuditParams>,
) -> HttpResult<Json<AuditLogListResponse>> {
    let query = ListAuditLogsQuery {
        limit: params.limit,
        cursor: params.cursor,
        model: params.model,
        object_pk: params.object_pk,
        actor_id: params.actor_id,
    };
    state
        .services
        .audit_queries
        .list_audit_logs(query)
        .await
        .into_http()
        .map(|page| Json(page.into()))
}
