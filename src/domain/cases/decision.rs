// src/domain/cases/decision.rs
use super::{require_positive_id, require_text};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::record::{RecordData, Stored};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensDecision {
    Favorable,
    Defavorable,
    Partiel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionData {
    pub affaire_id: i64,
    pub date_decision: NaiveDate,
    pub dispositif: String,
    #[serde(default)]
    pub sens: Option<SensDecision>,
    #[serde(default)]
    pub date_notification: Option<NaiveDate>,
}

impl RecordData for DecisionData {
    const MODEL: &'static str = "decision";

    fn validate(&self) -> DomainResult<()> {
        require_positive_id("affaire_id", self.affaire_id)?;
        require_text("dispositif", &self.dispositif)?;
        if self
            .date_notification
            .is_some_and(|notified| notified < self.date_decision)
        {
            return Err(DomainError::Validation(
                "date_notification cannot precede date_decision".into(),
            ));
        }
        Ok(())
    }
}

pub type Decision = Stored<DecisionData>;
