// src/infrastructure/security/token.rs
use crate::application::ports::security::TokenGenerator;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// 256 random bits from two v4 UUIDs, URL-safe base64 encoded. Storage only
/// ever sees the SHA-256 hex digest.
#[derive(Default, Clone)]
pub struct OpaqueTokenGenerator;

impl TokenGenerator for OpaqueTokenGenerator {
    fn generate(&self) -> String {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(Uuid::new_v4().as_bytes());
        bytes[16..].copy_from_slice(Uuid::new_v4().as_bytes());
        URL_SAFE_NO_PAD.encode(bytes)
    }

    fn digest(&self, token: &str) -> String {
        sha256_hex(token.as_bytes())
    }
}

pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
