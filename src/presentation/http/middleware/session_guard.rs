// src/presentation/http/middleware/session_guard.rs
use crate::{
    application::{
        commands::sessions::SessionVerdict,
        dto::{CurrentUser, UiResponse},
    },
    presentation::http::state::{HttpState, SessionSettings},
};
use axum::{
    Json,
    body::Body,
    extract::{Extension, Request},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use headers::{Cookie, HeaderMapExt};
use tracing::debug;

pub const HX_REDIRECT: &str = "hx-redirect";

const EXPIRED_MESSAGE: &str = "انتهت صلاحية الجلسة، يرجى تسجيل الدخول من جديد";

/// Resolves the session cookie on every non-safe path. Valid sessions get a
/// `CurrentUser` in the request extensions; everything else is sent back to
/// the login page.
pub async fn session_guard(
    Extension(state): Extension<HttpState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    if state.session.is_safe_path(&path) {
        return next.run(req).await;
    }

    let token = session_token(req.headers(), &state.session.cookie_name);
    match state.services.sessions.check(token.as_deref()).await {
        SessionVerdict::Authenticated { user, touched } => {
            debug!(user_id = %user.id, touched, %path, "session accepted");
            req.extensions_mut().insert(CurrentUser::from(&user));
            next.run(req).await
        }
        SessionVerdict::Expired => {
            let target = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or(path);
            expired_response(&state.session, req.headers(), &target)
        }
    }
}

pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .typed_get::<Cookie>()
        .and_then(|cookie| cookie.get(cookie_name).map(str::to_string))
}

/// htmx, classic XHR, or a client that asks for JSON.
pub fn wants_json(headers: &HeaderMap) -> bool {
    let header_is = |name: &str, expected: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim().eq_ignore_ascii_case(expected))
    };
    if header_is("hx-request", "true") || header_is("x-requested-with", "XMLHttpRequest") {
        return true;
    }
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .and_then(|accept| accept.split(',').next())
        .is_some_and(|first| first.trim().starts_with("application/json"))
}

fn expired_response(settings: &SessionSettings, headers: &HeaderMap, target: &str) -> Response {
    let login = settings.login_redirect(target);
    let mut response = if wants_json(headers) {
        let body = UiResponse::failure(EXPIRED_MESSAGE).with_redirect(login.clone());
        let mut response = (StatusCode::UNAUTHORIZED, Json(body)).into_response();
        if let Ok(value) = HeaderValue::from_str(&login) {
            response.headers_mut().insert(HX_REDIRECT, value);
        }
        response
    } else {
        Redirect::to(&login).into_response()
    };

    if let Ok(value) = HeaderValue::from_str(&settings.clearing_cookie()) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}
