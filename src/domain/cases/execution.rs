// src/domain/cases/execution.rs
use super::require_positive_id;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::record::{RecordData, Stored};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatut {
    EnCours,
    Executee,
    Suspendue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionData {
    pub affaire_id: i64,
    #[serde(default)]
    pub decision_id: Option<i64>,
    pub date_demande: NaiveDate,
    #[serde(default)]
    pub huissier: Option<String>,
    #[serde(default)]
    pub montant_centimes: Option<i64>,
    pub statut: ExecutionStatut,
}

impl RecordData for ExecutionData {
    const MODEL: &'static str = "execution";

    fn validate(&self) -> DomainResult<()> {
        require_positive_id("affaire_id", self.affaire_id)?;
        if self.montant_centimes.is_some_and(|v| v < 0) {
            return Err(DomainError::Validation(
                "montant_centimes cannot be negative".into(),
            ));
        }
        Ok(())
    }
}

pub type Execution = Stored<ExecutionData>;
