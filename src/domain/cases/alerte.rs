// src/domain/cases/alerte.rs
use super::require_text;
use crate::domain::errors::DomainResult;
use crate::domain::record::{RecordData, Stored};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlerteType {
    AvertissementEcheance,
    RecoursEcheance,
    AudienceProche,
}

impl AlerteType {
    pub fn as_str(self) -> &'static str {
        match self {
            AlerteType::AvertissementEcheance => "avertissement_echeance",
            AlerteType::RecoursEcheance => "recours_echeance",
            AlerteType::AudienceProche => "audience_proche",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AlerteType::AvertissementEcheance => "اقتراب أجل الإنذار",
            AlerteType::RecoursEcheance => "اقتراب أجل الطعن",
            AlerteType::AudienceProche => "جلسة قريبة",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlerteData {
    #[serde(default)]
    pub affaire_id: Option<i64>,
    pub type_alerte: AlerteType,
    /// Id of the record (notice, appeal, hearing) this reminder is about.
    pub reference_id: i64,
    pub titre: String,
    pub message: String,
    pub date_echeance: NaiveDate,
    #[serde(default)]
    pub is_read: bool,
}

impl RecordData for AlerteData {
    const MODEL: &'static str = "alerte";

    fn validate(&self) -> DomainResult<()> {
        require_text("titre", &self.titre)
    }
}

pub type Alerte = Stored<AlerteData>;

/// Lookup used to keep reminder creation idempotent. Soft-deleted alerts
/// count as existing.
#[async_trait]
pub trait AlerteIndex: Send + Sync {
    async fn exists(&self, type_alerte: AlerteType, reference_id: i64) -> DomainResult<bool>;
}
