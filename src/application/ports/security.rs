// src/application/ports/security.rs
use crate::application::ApplicationResult;
use async_trait::async_trait;

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> ApplicationResult<String>;
    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<()>;
}

/// Opaque session token source. The plain token only ever lives in the
/// cookie; storage sees `digest(token)`.
pub trait TokenGenerator: Send + Sync {
    fn generate(&self) -> String;
    fn digest(&self, token: &str) -> String;
}
