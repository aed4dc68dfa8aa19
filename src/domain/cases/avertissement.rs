// src/domain/cases/avertissement.rs
use super::{require_delay, require_text};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::record::{RecordData, Stored};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvertissementStatut {
    Ouvert,
    Repondu,
    Clos,
}

/// Formal notice; the addressee has `delai_jours` to answer from the day
/// it was received (or sent, when reception was never confirmed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvertissementData {
    #[serde(default)]
    pub affaire_id: Option<i64>,
    pub destinataire: String,
    pub date_envoi: NaiveDate,
    #[serde(default)]
    pub date_reception: Option<NaiveDate>,
    pub delai_jours: i32,
    pub statut: AvertissementStatut,
}

impl AvertissementData {
    pub fn is_open(&self) -> bool {
        self.statut == AvertissementStatut::Ouvert
    }

    pub fn deadline(&self) -> Option<NaiveDate> {
        let start = self.date_reception.unwrap_or(self.date_envoi);
        let days = u64::try_from(self.delai_jours).ok()?;
        start.checked_add_days(Days::new(days))
    }
}

impl RecordData for AvertissementData {
    const MODEL: &'static str = "avertissement";

    fn validate(&self) -> DomainResult<()> {
        require_text("destinataire", &self.destinataire)?;
        require_delay(self.delai_jours)?;
        if self
            .date_reception
            .is_some_and(|received| received < self.date_envoi)
        {
            return Err(DomainError::Validation(
                "date_reception cannot precede date_envoi".into(),
            ));
        }
        Ok(())
    }
}

pub type Avertissement = Stored<AvertissementData>;
