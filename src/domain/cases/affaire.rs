// src/domain/cases/affaire.rs
use super::require_text;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::mahakim::DossierNumber;
use crate::domain::record::{RecordData, Stored};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffaireStatut {
    Ouverte,
    EnCours,
    Suspendue,
    Cloturee,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffaireData {
    pub reference: String,
    pub intitule: String,
    pub client: String,
    #[serde(default)]
    pub adversaire: Option<String>,
    #[serde(default)]
    pub juridiction: Option<String>,
    /// Number on the Mahakim portal, `numero/code/annee`.
    #[serde(default)]
    pub numero_dossier: Option<String>,
    pub statut: AffaireStatut,
    pub date_ouverture: NaiveDate,
    #[serde(default)]
    pub honoraires_centimes: Option<i64>,
}

impl AffaireData {
    pub fn dossier_number(&self) -> Option<DomainResult<DossierNumber>> {
        self.numero_dossier
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(DossierNumber::parse)
    }

    pub fn is_closed(&self) -> bool {
        self.statut == AffaireStatut::Cloturee
    }
}

impl RecordData for AffaireData {
    const MODEL: &'static str = "affaire";

    fn validate(&self) -> DomainResult<()> {
        require_text("reference", &self.reference)?;
        require_text("intitule", &self.intitule)?;
        require_text("client", &self.client)?;
        if let Some(Err(err)) = self.dossier_number() {
            return Err(err);
        }
        if self.honoraires_centimes.is_some_and(|v| v < 0) {
            return Err(DomainError::Validation(
                "honoraires_centimes cannot be negative".into(),
            ));
        }
        Ok(())
    }
}

pub type Affaire = Stored<AffaireData>;
