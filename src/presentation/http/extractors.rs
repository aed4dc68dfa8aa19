// src/presentation/http/extractors.rs
use crate::application::{context::RequestContext, dto::CurrentUser, error::ApplicationError};
use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, header::USER_AGENT, request::Parts},
};
use std::net::SocketAddr;

use super::error::HttpError;

/// The user the session guard attached to this request.
#[derive(Debug, Clone)]
pub struct Authenticated(pub CurrentUser);

impl<S: Send + Sync> FromRequestParts<S> for Authenticated {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(Self)
            .ok_or_else(|| {
                HttpError::from_error(ApplicationError::unauthorized("session required"))
            })
    }
}

/// Request metadata for the audit trail, with the acting user when known.
#[derive(Debug, Clone)]
pub struct AuditContext(pub RequestContext);

impl<S: Send + Sync> FromRequestParts<S> for AuditContext {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        let mut ctx = RequestContext {
            path: Some(parts.uri.path().to_string()),
            method: Some(parts.method.as_str().to_string()),
            ip_address: client_ip(&parts.headers).or(peer),
            user_agent: header_value(&parts.headers, USER_AGENT.as_str()),
            ..RequestContext::default()
        };
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            ctx = ctx.with_actor(user.id, user.display_name.clone());
        }
        Ok(Self(ctx))
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// First hop of `X-Forwarded-For`, then `X-Real-IP`.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    header_value(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()))
        .filter(|ip| !ip.is_empty())
        .or_else(|| header_value(headers, "x-real-ip"))
}
