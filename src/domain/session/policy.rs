// src/domain/session/policy.rs
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::session::entity::AuthToken;
use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_TOUCH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryReason {
    Inactive,
    Idle,
}

impl ExpiryReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ExpiryReason::Inactive => "inactive",
            ExpiryReason::Idle => "idle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenDecision {
    Expired(ExpiryReason),
    /// Valid, and `last_seen` is stale enough to be rewritten.
    Touch,
    /// Valid, seen recently; no write needed.
    Fresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdlePolicy {
    idle_timeout: TimeDelta,
    touch_interval: TimeDelta,
}

impl IdlePolicy {
    pub fn new(idle_timeout: Duration, touch_interval: Duration) -> DomainResult<Self> {
        if idle_timeout.is_zero() {
            return Err(DomainError::Validation(
                "idle timeout must be positive".into(),
            ));
        }
        if touch_interval >= idle_timeout {
            return Err(DomainError::Validation(
                "touch interval must be shorter than the idle timeout".into(),
            ));
        }
        let to_delta = |d: Duration| {
            TimeDelta::from_std(d)
                .map_err(|_| DomainError::Validation("session duration out of range".into()))
        };
        Ok(Self {
            idle_timeout: to_delta(idle_timeout)?,
            touch_interval: to_delta(touch_interval)?,
        })
    }

    /// Idle expiry applies whatever `is_active` says; a token that was
    /// never revoked still dies once it has been idle past the timeout.
    pub fn evaluate(&self, token: &AuthToken, now: DateTime<Utc>) -> TokenDecision {
        let idle_for = now - token.last_seen;
        if idle_for > self.idle_timeout {
            return TokenDecision::Expired(ExpiryReason::Idle);
        }
        if !token.is_active {
            return TokenDecision::Expired(ExpiryReason::Inactive);
        }
        if idle_for >= self.touch_interval {
            TokenDecision::Touch
        } else {
            TokenDecision::Fresh
        }
    }
}

impl Default for IdlePolicy {
    fn default() -> Self {
        Self {
            idle_timeout: TimeDelta::seconds(300),
            touch_interval: TimeDelta::seconds(60),
        }
    }
}
