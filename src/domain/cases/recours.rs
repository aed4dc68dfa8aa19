// src/domain/cases/recours.rs
use super::{require_delay, require_positive_id};
use crate::domain::errors::DomainResult;
use crate::domain::record::{RecordData, Stored};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRecours {
    Appel,
    Cassation,
    Opposition,
}

impl TypeRecours {
    /// Statutory delay in days used when the filing does not specify one.
    pub fn default_delai_jours(self) -> i32 {
        match self {
            TypeRecours::Appel => 30,
            TypeRecours::Cassation => 30,
            TypeRecours::Opposition => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoursStatut {
    EnAttente,
    Deposee,
    Rejetee,
    Abandonnee,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoieDeRecoursData {
    pub affaire_id: i64,
    #[serde(default)]
    pub decision_id: Option<i64>,
    pub type_recours: TypeRecours,
    pub date_notification: NaiveDate,
    pub delai_jours: i32,
    #[serde(default)]
    pub date_depot: Option<NaiveDate>,
    pub statut: RecoursStatut,
}

impl VoieDeRecoursData {
    pub fn is_pending(&self) -> bool {
        self.statut == RecoursStatut::EnAttente && self.date_depot.is_none()
    }

    pub fn deadline(&self) -> Option<NaiveDate> {
        let days = u64::try_from(self.delai_jours).ok()?;
        self.date_notification.checked_add_days(Days::new(days))
    }
}

impl RecordData for VoieDeRecoursData {
    const MODEL: &'static str = "voiederecours";

    fn validate(&self) -> DomainResult<()> {
        require_positive_id("affaire_id", self.affaire_id)?;
        require_delay(self.delai_jours)
    }
}

pub type VoieDeRecours = Stored<VoieDeRecoursData>;
