use super::SessionCommandService;
use crate::domain::{
    session::{ExpiryReason, TokenCheck},
    user::User,
};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub enum SessionVerdict {
    Authenticated { user: User, touched: bool },
    /// Anything else: missing cookie, unknown or revoked token, idle
    /// timeout, disabled account, or a storage failure.
    Expired,
}

impl SessionCommandService {
    /// Resolve a cookie value to a user. Never fails: every error degrades
    /// to `Expired` so the caller forces a new login.
    pub async fn check(&self, token: Option<&str>) -> SessionVerdict {
        let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
            debug!("no session cookie");
            return SessionVerdict::Expired;
        };

        let hash = self.token_generator.digest(token);
        let now = self.clock.now();
        let check = match self.tokens.check_and_touch(&hash, &self.policy, now).await {
            Ok(check) => check,
            Err(err) => {
                warn!(error = %err, "session check failed; treating as expired");
                return SessionVerdict::Expired;
            }
        };

        let (token, touched) = match check {
            TokenCheck::Missing => {
                debug!("unknown session token");
                return SessionVerdict::Expired;
            }
            TokenCheck::Expired { user_id, reason } => {
                match reason {
                    ExpiryReason::Idle => info!(%user_id, "session revoked after idle timeout"),
                    ExpiryReason::Inactive => debug!(%user_id, "revoked session presented"),
                }
                return SessionVerdict::Expired;
            }
            TokenCheck::Valid { token, touched } => (token, touched),
        };

        match self.users.find_by_id(token.user_id).await {
            Ok(Some(user)) if user.is_active => SessionVerdict::Authenticated { user, touched },
            Ok(_) => {
                match self.tokens.revoke_all_for_user(token.user_id).await {
                    Ok(revoked) => info!(
                        user_id = %token.user_id,
                        revoked,
                        "session owner missing or disabled; sessions revoked"
                    ),
                    Err(err) => warn!(error = %err, "failed to revoke orphaned sessions"),
                }
                SessionVerdict::Expired
            }
            Err(err) => {
                warn!(error = %err, "user lookup failed; treating session as expired");
                SessionVerdict::Expired
            }
        }
    }
}
