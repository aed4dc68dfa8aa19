// src/presentation/http/controllers/auth.rs
use crate::application::{
    commands::sessions::LoginCommand,
    dto::{CurrentUser, UiResponse},
};
use crate::presentation::http::error::{HttpError, HttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::middleware::session_guard::{session_token, wants_json};
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Form, Json,
    extract::Query,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

const DEFAULT_LANDING: &str = "/";

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LoginPageParams {
    #[serde(default)]
    pub next: Option<String>,
}

/// Only same-site absolute paths are followed after login.
pub fn sanitize_next(next: Option<&str>) -> String {
    match next.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path.to_string()
        }
        _ => DEFAULT_LANDING.to_string(),
    }
}

#[utoipa::path(
    get,
    path = "/auth/login",
    params(LoginPageParams),
    responses((status = 200, description = "Login form.", content_type = "text/html")),
    tag = "Auth"
)]
pub async fn login_page(
    Extension(state): Extension<HttpState>,
    Query(params): Query<LoginPageParams>,
) -> Html<String> {
    let next = sanitize_next(params.next.as_deref());
    Html(render_login_page(&state.session.login_url, &next, None))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Session opened (AJAX clients).", body = UiResponse),
        (status = 303, description = "Session opened; redirect to `next`."),
        (status = 401, description = "Invalid credentials.", body = crate::presentation::http::error::ErrorResponse),
        (status = 403, description = "Account disabled.", body = crate::presentation::http::error::ErrorResponse),
        (status = 429, description = "Too many attempts from this address.")
    ),
    tag = "Auth"
)]
pub async fn login(
    Extension(state): Extension<HttpState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let next = sanitize_next(form.next.as_deref());
    let command = LoginCommand {
        username: form.username,
        password: form.password,
    };

    let result = match state.services.sessions.login(command).await {
        Ok(result) => result,
        Err(err) => {
            let err = HttpError::from_error(err);
            if wants_json(&headers) {
                return err.into_response();
            }
            let status = err.status();
            let page = render_login_page(
                &state.session.login_url,
                &next,
                Some("اسم المستخدم أو كلمة المرور غير صحيحة"),
            );
            return (status, Html(page)).into_response();
        }
    };

    let mut response = if wants_json(&headers) {
        let greeting = format!("مرحبا {}", result.user.display_name());
        Json(UiResponse::success(greeting).with_redirect(next)).into_response()
    } else {
        Redirect::to(&next).into_response()
    };
    set_cookie(&mut response, &state.session.session_cookie(&result.token));
    response
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Session closed (AJAX clients).", body = UiResponse),
        (status = 303, description = "Session closed; redirect to the login page.")
    ),
    tag = "Auth"
)]
pub async fn logout(
    Extension(state): Extension<HttpState>,
    headers: HeaderMap,
) -> HttpResult<Response> {
    if let Some(token) = session_token(&headers, &state.session.cookie_name) {
        state
            .services
            .sessions
            .logout(&token)
            .await
            .map_err(HttpError::from_error)?;
    }

    let login_url = state.session.login_url.clone();
    let mut response = if wants_json(&headers) {
        Json(UiResponse::success("تم تسجيل الخروج").with_redirect(login_url)).into_response()
    } else {
        Redirect::to(&login_url).into_response()
    };
    set_cookie(&mut response, &state.session.clearing_cookie());
    Ok(response)
}

#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current session owner.", body = CurrentUser),
        (status = 401, description = "Session expired.", body = UiResponse)
    ),
    tag = "Auth"
)]
pub async fn me(Authenticated(user): Authenticated) -> Json<CurrentUser> {
    Json(user)
}

fn set_cookie(response: &mut Response, cookie: &str) {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(err) => {
            tracing::error!(error = %err, "session cookie is not a valid header value");
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        }
    }
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// The form posts back to `action`, the configured login URL.
fn render_login_page(action: &str, next: &str, error: Option<&str>) -> String {
    let error = error
        .map(|msg| format!(r#"<p class="error" role="alert">{}</p>"#, escape_html(msg)))
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html lang="ar" dir="rtl">
<head>
<meta charset="utf-8">
<title>تسجيل الدخول</title>
</head>
<body>
<main>
<h1>تسجيل الدخول</h1>
{error}
<form method="post" action="{action}">
<input type="hidden" name="next" value="{next}">
<label>اسم المستخدم <input type="text" name="username" autocomplete="username" required></label>
<label>كلمة المرور <input type="password" name="password" autocomplete="current-password" required></label>
<button type="submit">دخول</button>
</form>
</main>
</body>
</html>"#,
        action = escape_html(action),
        next = escape_html(next),
    )
}
