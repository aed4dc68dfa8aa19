use super::SessionCommandService;
use crate::application::error::ApplicationResult;

impl SessionCommandService {
    /// Revoke the presented token. Returns false when there was nothing
    /// active to revoke.
    pub async fn logout(&self, token: &str) -> ApplicationResult<bool> {
        let revoked = self
            .tokens
            .revoke(&self.token_generator.digest(token))
            .await?;
        if revoked {
            tracing::info!("session closed");
        }
        Ok(revoked)
    }
}
