// src/presentation/http/controllers/sync.rs
use crate::application::dto::SyncResultDto;
use crate::domain::record::Scope;
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    extract::{Path, Query},
};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SyncHistoryParams {
    /// At most 100; defaults to 20.
    #[serde(default)]
    pub limit: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/api/v1/affaires/{id}/sync-results",
    params(
        ("id" = i64, Path, description = "Affaire id"),
        SyncHistoryParams
    ),
    responses(
        (status = 200, description = "Portal sync attempts, newest first.", body = [SyncResultDto]),
        (status = 404, description = "Unknown affaire.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Affaires"
)]
pub async fn list_sync_results(
    Extension(state): Extension<HttpState>,
    Path(id): Path<i64>,
    Query(params): Query<SyncHistoryParams>,
) -> HttpResult<Json<Vec<SyncResultDto>>> {
    // 404 for unknown ids, soft-deleted affaires keep their history
    state
        .services
        .affaires
        .queries
        .get(id, Scope::All)
        .await
        .into_http()?;
    state
        .services
        .sync_queries
        .history(id, params.limit)
        .await
        .into_http()
        .map(Json)
}
