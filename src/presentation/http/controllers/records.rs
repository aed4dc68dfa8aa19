// src/presentation/http/controllers/records.rs
//! One generic CRUD surface shared by every soft-deletable resource.
use crate::application::{
    dto::{MutationDto, RecordDto},
    services::{ApplicationServices, RecordServices},
};
use crate::domain::{
    cases::{
        AffaireData, AlerteData, AudienceData, AvertissementData, DecisionData, ExecutionData,
        VoieDeRecoursData,
    },
    record::{RecordData, Scope},
};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::AuditContext;
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::{delete, get, post},
};
use serde::Deserialize;
use utoipa::IntoParams;

/// A record type exposed under `/api/v1/{PATH}`.
pub trait HttpResource: RecordData {
    const PATH: &'static str;
    const TAG: &'static str;

    fn services(services: &ApplicationServices) -> &RecordServices<Self>;
}

macro_rules! http_resource {
    ($data:ty, $path:literal, $tag:literal, $field:ident) => {
        impl HttpResource for $data {
            const PATH: &'static str = $path;
            const TAG: &'static str = $tag;

            fn services(services: &ApplicationServices) -> &RecordServices<Self> {
                &services.$field
            }
        }
    };
}

http_resource!(AffaireData, "affaires", "Affaires", affaires);
http_resource!(AudienceData, "audiences", "Audiences", audiences);
http_resource!(DecisionData, "decisions", "Decisions", decisions);
http_resource!(VoieDeRecoursData, "recours", "Recours", recours);
http_resource!(ExecutionData, "executions", "Executions", executions);
http_resource!(AvertissementData, "avertissements", "Avertissements", avertissements);
http_resource!(AlerteData, "alertes", "Alertes", alertes);

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ScopeParams {
    /// `active` (default) hides soft-deleted rows, `all` includes them.
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub scope: Scope,
}

pub async fn list_records<R: HttpResource>(
    Extension(state): Extension<HttpState>,
    Query(params): Query<ScopeParams>,
) -> HttpResult<Json<Vec<RecordDto<R>>>> {
    R::services(&state.services)
        .queries
        .list(params.scope)
        .await
        .into_http()
        .map(Json)
}

pub async fn get_record<R: HttpResource>(
    Extension(state): Extension<HttpState>,
    Path(id): Path<i64>,
    Query(params): Query<ScopeParams>,
) -> HttpResult<Json<RecordDto<R>>> {
    R::services(&state.services)
        .queries
        .get(id, params.scope)
        .await
        .into_http()
        .map(Json)
}

pub async fn create_record<R: HttpResource>(
    Extension(state): Extension<HttpState>,
    AuditContext(ctx): AuditContext,
    Json(data): Json<R>,
) -> HttpResult<(StatusCode, Json<MutationDto<R>>)> {
    let mutation = R::services(&state.services)
        .commands
        .create(&ctx, data)
        .await
        .into_http()?;
    Ok((StatusCode::CREATED, Json(mutation.into())))
}

pub async fn update_record<R: HttpResource>(
    Extension(state): Extension<HttpState>,
    AuditContext(ctx): AuditContext,
    Path(id): Path<i64>,
    Json(data): Json<R>,
) -> HttpResult<Json<MutationDto<R>>> {
    R::services(&state.services)
        .commands
        .update(&ctx, id, data)
        .await
        .into_http()
        .map(|m| Json(m.into()))
}

pub async fn delete_record<R: HttpResource>(
    Extension(state): Extension<HttpState>,
    AuditContext(ctx): AuditContext,
    Path(id): Path<i64>,
) -> HttpResult<Json<MutationDto<R>>> {
    R::services(&state.services)
        .commands
        .delete(&ctx, id)
        .await
        .into_http()
        .map(|m| Json(m.into()))
}

pub async fn restore_record<R: HttpResource>(
    Extension(state): Extension<HttpState>,
    AuditContext(ctx): AuditContext,
    Path(id): Path<i64>,
) -> HttpResult<Json<MutationDto<R>>> {
    R::services(&state.services)
        .commands
        .restore(&ctx, id)
        .await
        .into_http()
        .map(|m| Json(m.into()))
}

pub async fn purge_record<R: HttpResource>(
    Extension(state): Extension<HttpState>,
    AuditContext(ctx): AuditContext,
    Path(id): Path<i64>,
) -> HttpResult<Json<MutationDto<R>>> {
    R::services(&state.services)
        .commands
        .purge(&ctx, id)
        .await
        .into_http()
        .map(|m| Json(m.into()))
}

pub fn resource_router<R: HttpResource>() -> Router {
    let collection = format!("/api/v1/{}", R::PATH);
    let item = format!("{collection}/{{id}}");
    Router::new()
        .route(
            &collection,
            get(list_records::<R>).post(create_record::<R>),
        )
        .route(
            &item,
            get(get_record::<R>)
                .put(update_record::<R>)
                .delete(delete_record::<R>),
        )
        .route(&format!("{item}/restore"), post(restore_record::<R>))
        .route(&format!("{item}/purge"), delete(purge_record::<R>))
}

pub fn records_router() -> Router {
    Router::new()
        .merge(resource_router::<AffaireData>())
        .merge(resource_router::<AudienceData>())
        .merge(resource_router::<DecisionData>())
        .merge(resource_router::<VoieDeRecoursData>())
        .merge(resource_router::<ExecutionData>())
        .merge(resource_router::<AvertissementData>())
        .merge(resource_router::<AlerteData>())
}
