use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// One synchronisation attempt against the portal. Failed attempts are
/// stored too, with `error_message` set.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncResult {
    pub id: Option<i64>,
    pub affaire_id: i64,
    pub numero_dossier: String,
    pub success: bool,
    pub statut: Option<String>,
    pub prochaine_audience: Option<NaiveDate>,
    pub juge: Option<String>,
    pub raw_html: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait SyncResultRepository: Send + Sync {
    async fn insert(&self, result: SyncResult) -> DomainResult<SyncResult>;

    /// Most recent attempts first.
    async fn list_for_affaire(&self, affaire_id: i64, limit: u32) -> DomainResult<Vec<SyncResult>>;
}
