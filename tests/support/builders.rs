// tests/support/builders.rs
use chrono::NaiveDate;
use serde_json::{Value, json};

use cabinet_core::domain::cases::{
    AffaireData, AffaireStatut, AvertissementData, AvertissementStatut, RecoursStatut,
    TypeRecours, VoieDeRecoursData,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub struct AffaireBuilder {
    data: AffaireData,
}

impl AffaireBuilder {
    pub fn new(reference: &str) -> Self {
        Self {
            data: AffaireData {
                reference: reference.into(),
                intitule: "Atlas c/ Nour".into(),
                client: "Société Atlas".into(),
                adversaire: Some("Société Nour".into()),
                juridiction: Some("Tribunal de commerce de Casablanca".into()),
                numero_dossier: None,
                statut: AffaireStatut::Ouverte,
                date_ouverture: date(2024, 1, 15),
                honoraires_centimes: None,
            },
        }
    }

    pub fn numero(mut self, numero: &str) -> Self {
        self.data.numero_dossier = Some(numero.into());
        self
    }

    pub fn statut(mut self, statut: AffaireStatut) -> Self {
        self.data.statut = statut;
        self
    }

    pub fn build(self) -> AffaireData {
        self.data
    }

    pub fn json(self) -> Value {
        serde_json::to_value(self.data).unwrap()
    }
}

pub fn affaire_json(reference: &str, statut: &str) -> Value {
    json!({
        "reference": reference,
        "intitule": "Atlas c/ Nour",
        "client": "Société Atlas",
        "statut": statut,
        "date_ouverture": "2024-01-15"
    })
}

pub fn notice(affaire_id: Option<i64>, envoi: NaiveDate, delai_jours: i32) -> AvertissementData {
    AvertissementData {
        affaire_id,
        destinataire: "Société Nour".into(),
        date_envoi: envoi,
        date_reception: None,
        delai_jours,
        statut: AvertissementStatut::Ouvert,
    }
}

pub fn appeal(affaire_id: i64, notification: NaiveDate) -> VoieDeRecoursData {
    VoieDeRecoursData {
        affaire_id,
        decision_id: None,
        type_recours: TypeRecours::Appel,
        date_notification: notification,
        delai_jours: TypeRecours::Appel.default_delai_jours(),
        date_depot: None,
        statut: RecoursStatut::EnAttente,
    }
}
