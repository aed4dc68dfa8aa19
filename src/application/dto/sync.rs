use crate::domain::mahakim::SyncResult;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::serde_time;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SyncResultDto {
    pub id: i64,
    pub affaire_id: i64,
    pub numero_dossier: String,
    pub success: bool,
    pub statut: Option<String>,
    pub prochaine_audience: Option<NaiveDate>,
    pub juge: Option<String>,
    pub error_message: Option<String>,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
}

impl From<SyncResult> for SyncResultDto {
    fn from(r: SyncResult) -> Self {
        Self {
            id: r.id.unwrap_or_default(),
            affaire_id: r.affaire_id,
            numero_dossier: r.numero_dossier,
            success: r.success,
            statut: r.statut,
            prochaine_audience: r.prochaine_audience,
            juge: r.juge,
            error_message: r.error_message,
            created_at: r.created_at,
        }
    }
}

/// Totals for one `sync-mahakim` run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub attempted: u32,
    pub succeeded: u32,
    pub failed: u32,
    /// Affaires without a usable portal number.
    pub skipped: u32,
}
