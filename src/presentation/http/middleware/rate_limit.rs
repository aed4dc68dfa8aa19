// src/presentation/http/middleware/rate_limit.rs
use ::governor::middleware::NoOpMiddleware;
use axum::body::Body;
use std::sync::OnceLock;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

pub type LoginRateLimit = GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware, Body>;

/// Per client IP: a burst of 5 login attempts, then one every 6 seconds.
/// The client IP comes from `X-Forwarded-For`/`X-Real-IP`/`Forwarded` or the
/// peer address, so the server must be started with connect info.
pub fn login_rate_limit_layer() -> LoginRateLimit {
    static LOGIN_LIMITER: OnceLock<LoginRateLimit> = OnceLock::new();

    LOGIN_LIMITER
        .get_or_init(|| {
            let config = GovernorConfigBuilder::default()
                .per_second(6)
                .burst_size(5)
                .key_extractor(SmartIpKeyExtractor)
                .finish()
                .expect("login rate limit quota is non-zero");
            GovernorLayer::new(config)
        })
        .clone()
}
