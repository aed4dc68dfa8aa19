use crate::domain::errors::DomainResult;
use crate::domain::session::{
    entity::{AuthToken, NewAuthToken},
    policy::{ExpiryReason, IdlePolicy},
};
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenCheck {
    /// No token row matches the presented hash.
    Missing,
    /// The token was (or already is) revoked.
    Expired { user_id: UserId, reason: ExpiryReason },
    Valid { token: AuthToken, touched: bool },
}

#[async_trait]
pub trait AuthTokenRepository: Send + Sync {
    async fn insert(&self, token: NewAuthToken) -> DomainResult<AuthToken>;

    /// Evaluate `policy` against the stored token while holding a row lock,
    /// revoking or touching it as the policy decides.
    async fn check_and_touch(
        &self,
        token_hash: &str,
        policy: &IdlePolicy,
        now: DateTime<Utc>,
    ) -> DomainResult<TokenCheck>;

    /// Returns true when an active token was revoked.
    async fn revoke(&self, token_hash: &str) -> DomainResult<bool>;

    async fn revoke_all_for_user(&self, user_id: UserId) -> DomainResult<u64>;
}
