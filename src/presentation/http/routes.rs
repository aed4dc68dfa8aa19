// src/presentation/http/routes.rs
use crate::presentation::http::state::HttpState;
use crate::presentation::http::{
    controllers::{audit, auth, records, sync},
    middleware::{rate_limit::login_rate_limit_layer, session_guard::session_guard},
    openapi::{self, StatusResponse},
};
use axum::{
    Extension, Router,
    http::Method,
    middleware,
    routing::{MethodRouter, get, post},
};
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn build_router(state: HttpState) -> Router {
    build_router_with_rate_limiter(state, true)
}

/// `rate_limited = false` drops the per-IP login limiter, which needs the
/// peer address and so cannot run under `oneshot` tests.
pub fn build_router_with_rate_limiter(state: HttpState, rate_limited: bool) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(tower_http::cors::Any)
        .max_age(Duration::from_secs(3600));

    let login_submit: MethodRouter = if rate_limited {
        post(auth::login).layer(login_rate_limit_layer())
    } else {
        post(auth::login)
    };

    Router::new()
        .merge(openapi::docs_router())
        .route("/health", get(health))
        .route("/auth/login", get(auth::login_page).merge(login_submit))
        .route("/auth/logout", post(auth::logout))
        .route("/api/v1/me", get(auth::me))
        .route("/api/v1/audit-logs", get(audit::list_audit_logs))
        .route(
            "/api/v1/affaires/{id}/sync-results",
            get(sync::list_sync_results),
        )
        .merge(records::records_router())
        .layer(middleware::from_fn(session_guard))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(Extension(state))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health check.", body = crate::presentation::http::openapi::StatusResponse)
    ),
    tag = "System"
)]
pub async fn health() -> axum::Json<StatusResponse> {
    axum::Json(StatusResponse {
        status: "ok".into(),
    })
}
