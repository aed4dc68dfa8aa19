// src/presentation/http/state.rs
use crate::application::services::ApplicationServices;
use std::sync::Arc;

pub const DEFAULT_SAFE_PREFIXES: &[&str] = &[
    "/auth/login",
    "/health",
    "/static/",
    "/docs",
    "/api-docs",
    "/redoc",
];

/// Cookie and redirect settings used by the session guard and the auth
/// controller.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub login_url: String,
    pub safe_prefixes: Vec<String>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: "auth_token".into(),
            cookie_secure: false,
            login_url: "/auth/login".into(),
            safe_prefixes: DEFAULT_SAFE_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl SessionSettings {
    pub fn is_safe_path(&self, path: &str) -> bool {
        self.safe_prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Session cookie: no `Max-Age`, so it dies with the browser; the idle
    /// timeout is enforced server side.
    pub fn session_cookie(&self, token: &str) -> String {
        let mut cookie = format!("{}={token}; Path=/; HttpOnly; SameSite=Lax", self.cookie_name);
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    pub fn clearing_cookie(&self) -> String {
        let mut cookie = format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
            self.cookie_name
        );
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// `login_url?next=<target>`, with `target` form-encoded.
    pub fn login_redirect(&self, target: &str) -> String {
        match serde_urlencoded::to_string([("next", target)]) {
            Ok(query) if !target.is_empty() && target != "/" => {
                format!("{}?{query}", self.login_url)
            }
            _ => self.login_url.clone(),
        }
    }
}

#[derive(Clone)]
pub struct HttpState {
    pub services: Arc<ApplicationServices>,
    pub session: SessionSettings,
}
