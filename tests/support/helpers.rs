// tests/support/helpers.rs
use super::mocks::{
    FakeBrowser, InMemoryAuditLogs, InMemoryRecords, InMemorySyncResults, InMemoryTokens,
    InMemoryUsers, PlainPasswordHasher, SequentialTokens, TestClock,
};
use axum::body::{self, Body};
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use cabinet_core::application::{
    audit::AuditSettings,
    commands::mahakim::{FormSelectors, PortalSettings},
    services::{Adapters, ApplicationServices, Repositories, ServiceSettings},
};
use cabinet_core::domain::{
    cases::{
        AffaireData, AlerteData, AudienceData, AvertissementData, DecisionData, ExecutionData,
        VoieDeRecoursData,
    },
    session::IdlePolicy,
    user::{NewUser, PasswordHash, UserRepository, Username},
};
use cabinet_core::presentation::http::{
    routes::build_router_with_rate_limiter,
    state::{HttpState, SessionSettings},
};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tower::util::ServiceExt as _;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct-horse";
pub const PORTAL_URL: &str = "https://portal.test/suivi";

/// Services wired over in-memory adapters, with handles on every store so
/// tests can look behind the HTTP surface.
pub struct TestApp {
    pub services: Arc<ApplicationServices>,
    pub session: SessionSettings,
    pub clock: Arc<TestClock>,
    pub users: Arc<InMemoryUsers>,
    pub tokens: Arc<InMemoryTokens>,
    pub audit_logs: Arc<InMemoryAuditLogs>,
    pub sync_results: Arc<InMemorySyncResults>,
    pub affaires: Arc<InMemoryRecords<AffaireData>>,
    pub audiences: Arc<InMemoryRecords<AudienceData>>,
    pub recours: Arc<InMemoryRecords<VoieDeRecoursData>>,
    pub avertissements: Arc<InMemoryRecords<AvertissementData>>,
    pub alertes: Arc<InMemoryRecords<AlerteData>>,
    pub browser: Arc<FakeBrowser>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_audit(AuditSettings::default())
    }

    pub fn with_audit(audit: AuditSettings) -> Self {
        let clock = Arc::new(TestClock::new());
        let users = Arc::new(InMemoryUsers::default());
        let tokens = Arc::new(InMemoryTokens::default());
        let audit_logs = Arc::new(InMemoryAuditLogs::default());
        let sync_results = Arc::new(InMemorySyncResults::default());
        let affaires = Arc::new(InMemoryRecords::<AffaireData>::default());
        let audiences = Arc::new(InMemoryRecords::<AudienceData>::default());
        let recours = Arc::new(InMemoryRecords::<VoieDeRecoursData>::default());
        let avertissements = Arc::new(InMemoryRecords::<AvertissementData>::default());
        let alertes = Arc::new(InMemoryRecords::<AlerteData>::default());
        let browser = Arc::new(FakeBrowser::default());

        let repos = Repositories {
            users: users.clone(),
            tokens: tokens.clone(),
            audit_logs: audit_logs.clone(),
            sync_results: sync_results.clone(),
            affaires: affaires.clone(),
            audiences: audiences.clone(),
            decisions: Arc::new(InMemoryRecords::<DecisionData>::default()),
            recours: recours.clone(),
            executions: Arc::new(InMemoryRecords::<ExecutionData>::default()),
            avertissements: avertissements.clone(),
            alertes: alertes.clone(),
            alerte_index: alertes.clone(),
        };
        let adapters = Adapters {
            password_hasher: Arc::new(PlainPasswordHasher),
            token_generator: Arc::new(SequentialTokens::default()),
            clock: clock.clone(),
            browser: browser.clone(),
        };
        let settings = ServiceSettings {
            audit,
            idle_policy: IdlePolicy::default(),
            portal: PortalSettings {
                url: PORTAL_URL.into(),
                timeout: Duration::from_secs(5),
                headless: true,
                selectors: FormSelectors::default(),
            },
        };

        Self {
            services: Arc::new(ApplicationServices::new(repos, adapters, settings)),
            session: SessionSettings::default(),
            clock,
            users,
            tokens,
            audit_logs,
            sync_results,
            affaires,
            audiences,
            recours,
            avertissements,
            alertes,
            browser,
        }
    }

    pub fn router(&self) -> axum::Router {
        let state = HttpState {
            services: Arc::clone(&self.services),
            session: self.session.clone(),
        };
        build_router_with_rate_limiter(state, false)
    }

    pub async fn create_admin(&self) {
        self.users
            .insert(NewUser::new(
                Username::new(ADMIN_USERNAME).unwrap(),
                PasswordHash::new(format!("plain:{ADMIN_PASSWORD}")).unwrap(),
                Some("Maître Admin".into()),
                self.clock_now(),
            ))
            .await
            .unwrap();
    }

    pub fn clock_now(&self) -> chrono::DateTime<chrono::Utc> {
        use cabinet_core::application::ports::time::Clock;
        self.clock.now()
    }

    /// Logs the admin in through the router and returns the cookie pair
    /// (`auth_token=...`) to send back.
    pub async fn login(&self) -> String {
        self.create_admin().await;
        let form = format!("username={ADMIN_USERNAME}&password={ADMIN_PASSWORD}");
        let resp = self
            .router()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/auth/login")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(form))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        cookie_pair(&resp).expect("login sets the session cookie")
    }

    pub async fn send(&self, req: Request<Body>) -> Response {
        self.router().oneshot(req).await.unwrap()
    }
}

/// `name=value` part of the first `Set-Cookie` header.
pub fn cookie_pair(resp: &Response) -> Option<String> {
    resp.headers()
        .get(header::SET_COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .next()
        .map(str::to_string)
}

pub fn authed(method: Method, uri: &str, cookie: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, cookie)
}

pub fn json_request(method: Method, uri: &str, cookie: &str, body: &Value) -> Request<Body> {
    authed(method, uri, cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(resp: Response) -> Value {
    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub async fn body_text(resp: Response) -> String {
    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// Assert that a response is an ErrorResponse JSON with the expected status and error string.
pub async fn assert_error_response(resp: Response, expected_status: StatusCode, expected_error: &str) {
    assert_eq!(resp.status(), expected_status);
    let ct = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(ct.starts_with("application/json"), "unexpected content-type: {ct}");
    let json = body_json(resp).await;
    assert_eq!(json["error"].as_str(), Some(expected_error));
    assert!(
        !json["message"].as_str().unwrap_or("").is_empty(),
        "expected non-empty message field in ErrorResponse"
    );
}
