use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::TimeDelta;
use serde_json::json;

mod support;

use support::{TestApp, authed, body_json, body_text, cookie_pair};

#[tokio::test]
async fn browser_without_cookie_is_redirected_to_login() {
    let app = TestApp::new();
    let resp = app
        .send(
            Request::builder()
                .uri("/api/v1/affaires?scope=all")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/auth/login?next=%2Fapi%2Fv1%2Faffaires%3Fscope%3Dall"
    );
}

#[tokio::test]
async fn ajax_without_cookie_gets_json_redirect() {
    let app = TestApp::new();
    let resp = app
        .send(
            Request::builder()
                .uri("/api/v1/me")
                .header("HX-Request", "true")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers().get("hx-redirect").unwrap(),
        "/auth/login?next=%2Fapi%2Fv1%2Fme"
    );
    let body = body_json(resp).await;
    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["redirect"], json!("/auth/login?next=%2Fapi%2Fv1%2Fme"));
    assert!(!body["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn safe_paths_need_no_session() {
    let app = TestApp::new();
    let health = app
        .send(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await;
    assert_eq!(health.status(), StatusCode::OK);

    let login = app
        .send(
            Request::builder()
                .uri("/auth/login?next=/api/v1/alertes")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(login.status(), StatusCode::OK);
    let page = body_text(login).await;
    assert!(page.contains(r#"dir="rtl""#));
    assert!(page.contains(r#"value="/api/v1/alertes""#));
}

#[tokio::test]
async fn login_sets_session_cookie_and_redirects_to_next() {
    let app = TestApp::new();
    app.create_admin().await;

    let resp = app
        .send(
            Request::builder()
                .method(Method::POST)
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(
                    "username=admin&password=correct-horse&next=%2Fapi%2Fv1%2Fme",
                ))
                .unwrap(),
        )
        .await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/api/v1/me");
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(cookie, "auth_token=token-1; Path=/; HttpOnly; SameSite=Lax");

    // only the digest is stored
    assert!(app.tokens.get("digest:token-1").is_some());
    assert!(app.tokens.get("token-1").is_none());
}

#[tokio::test]
async fn ajax_login_answers_with_ui_response() {
    let app = TestApp::new();
    app.create_admin().await;

    let resp = app
        .send(
            Request::builder()
                .method(Method::POST)
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header("X-Requested-With", "XMLHttpRequest")
                .body(Body::from("username=admin&password=correct-horse&next=//evil.example"))
                .unwrap(),
        )
        .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(cookie_pair(&resp).is_some());
    let body = body_json(resp).await;
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["redirect"], json!("/"));
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = TestApp::new();
    app.create_admin().await;

    let resp = app
        .send(
            Request::builder()
                .method(Method::POST)
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header(header::ACCEPT, "application/json")
                .body(Body::from("username=admin&password=nope"))
                .unwrap(),
        )
        .await;

    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    support::assert_error_response(resp, StatusCode::UNAUTHORIZED, "Unauthorized").await;
}

#[tokio::test]
async fn valid_cookie_reaches_the_handler() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let resp = app
        .send(authed(Method::GET, "/api/v1/me", &cookie).body(Body::empty()).unwrap())
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["username"], json!("admin"));
    assert_eq!(body["display_name"], json!("Maître Admin"));
}

#[tokio::test]
async fn six_minutes_idle_revokes_the_token() {
    let app = TestApp::new();
    let cookie = app.login().await;

    app.clock.advance(TimeDelta::minutes(6));
    let resp = app
        .send(authed(Method::GET, "/api/v1/me", &cookie).body(Body::empty()).unwrap())
        .await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let token = app.tokens.get("digest:token-1").unwrap();
    assert!(!token.is_active, "idle token must be revoked");
    let cleared = resp
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cleared.starts_with("auth_token=;"));
    assert!(cleared.contains("Max-Age=0"));

    // stays dead even though the clock is no longer past the threshold
    app.tokens.set_last_seen("digest:token-1", app.clock_now());
    let again = app
        .send(authed(Method::GET, "/api/v1/me", &cookie).body(Body::empty()).unwrap())
        .await;
    assert_eq!(again.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn last_seen_is_written_at_most_once_per_interval() {
    let app = TestApp::new();
    let cookie = app.login().await;
    let me = || authed(Method::GET, "/api/v1/me", &cookie).body(Body::empty()).unwrap();

    app.clock.advance(TimeDelta::seconds(30));
    assert_eq!(app.send(me()).await.status(), StatusCode::OK);
    assert_eq!(app.tokens.touch_writes(), 0);

    app.clock.advance(TimeDelta::seconds(40));
    assert_eq!(app.send(me()).await.status(), StatusCode::OK);
    assert_eq!(app.tokens.touch_writes(), 1);

    app.clock.advance(TimeDelta::seconds(10));
    assert_eq!(app.send(me()).await.status(), StatusCode::OK);
    assert_eq!(app.tokens.touch_writes(), 1);

    let token = app.tokens.get("digest:token-1").unwrap();
    assert_eq!(token.last_seen, *support::FIXED_NOW + TimeDelta::seconds(70));
}

#[tokio::test]
async fn logout_revokes_and_clears_cookie() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let resp = app
        .send(authed(Method::POST, "/auth/logout", &cookie).body(Body::empty()).unwrap())
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/auth/login");
    assert_eq!(cookie_pair(&resp).as_deref(), Some("auth_token="));

    let after = app
        .send(authed(Method::GET, "/api/v1/me", &cookie).body(Body::empty()).unwrap())
        .await;
    assert_eq!(after.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn disabled_owner_loses_the_session() {
    let app = TestApp::new();
    let cookie = app.login().await;

    app.users
        .set_active(cabinet_core::domain::user::UserId(1), false);
    let resp = app
        .send(authed(Method::GET, "/api/v1/me", &cookie).body(Body::empty()).unwrap())
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(!app.tokens.get("digest:token-1").unwrap().is_active);
}

#[tokio::test]
async fn disabled_owner_loses_every_open_session() {
    let app = TestApp::new();
    let cookie = app.login().await;
    let second_login = app
        .send(
            Request::builder()
                .method(Method::POST)
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(format!(
                    "username={}&password={}",
                    support::ADMIN_USERNAME,
                    support::ADMIN_PASSWORD
                )))
                .unwrap(),
        )
        .await;
    assert_eq!(second_login.status(), StatusCode::SEE_OTHER);
    assert!(app.tokens.get("digest:token-2").unwrap().is_active);

    app.users
        .set_active(cabinet_core::domain::user::UserId(1), false);
    let resp = app
        .send(authed(Method::GET, "/api/v1/me", &cookie).body(Body::empty()).unwrap())
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(!app.tokens.get("digest:token-1").unwrap().is_active);
    assert!(
        !app.tokens.get("digest:token-2").unwrap().is_active,
        "the other device's session is closed too"
    );
}

#[tokio::test]
async fn login_form_targets_the_configured_login_url() {
    let mut app = TestApp::new();
    app.session.login_url = "/cabinet/connexion".into();
    let resp = app
        .send(Request::builder().uri("/auth/login").body(Body::empty()).unwrap())
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = body_text(resp).await;
    assert!(page.contains(r#"<form method="post" action="/cabinet/connexion">"#));
}
