// src/domain/cases/mod.rs
pub mod affaire;
pub mod alerte;
pub mod audience;
pub mod avertissement;
pub mod decision;
pub mod execution;
pub mod recours;

pub use affaire::{Affaire, AffaireData, AffaireStatut};
pub use alerte::{Alerte, AlerteData, AlerteIndex, AlerteType};
pub use audience::{Audience, AudienceData};
pub use avertissement::{Avertissement, AvertissementData, AvertissementStatut};
pub use decision::{Decision, DecisionData, SensDecision};
pub use execution::{Execution, ExecutionData, ExecutionStatut};
pub use recours::{RecoursStatut, TypeRecours, VoieDeRecours, VoieDeRecoursData};

use crate::domain::errors::{DomainError, DomainResult};

pub(crate) fn require_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

pub(crate) fn require_positive_id(field: &str, value: i64) -> DomainResult<()> {
    if value <= 0 {
        return Err(DomainError::Validation(format!("{field} must be positive")));
    }
    Ok(())
}

pub(crate) fn require_delay(value: i32) -> DomainResult<()> {
    if value < 0 {
        return Err(DomainError::Validation(
            "delai_jours cannot be negative".into(),
        ));
    }
    Ok(())
}
