// src/domain/cases/audience.rs
use super::require_positive_id;
use crate::domain::errors::DomainResult;
use crate::domain::record::{RecordData, Stored};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudienceData {
    pub affaire_id: i64,
    pub date_audience: NaiveDate,
    #[serde(default)]
    pub salle: Option<String>,
    #[serde(default)]
    pub objet: Option<String>,
    #[serde(default)]
    pub resultat: Option<String>,
}

impl AudienceData {
    /// A hearing is still ahead of us until a result has been recorded.
    pub fn is_pending(&self) -> bool {
        self.resultat
            .as_deref()
            .is_none_or(|r| r.trim().is_empty())
    }
}

impl RecordData for AudienceData {
    const MODEL: &'static str = "audience";

    fn validate(&self) -> DomainResult<()> {
        require_positive_id("affaire_id", self.affaire_id)
    }
}

pub type Audience = Stored<AudienceData>;
