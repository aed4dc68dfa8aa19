// src/infrastructure/repositories/models.rs
use super::records::{PgModel, PgValue, enum_to_text, text_to_enum};
use crate::domain::cases::{
    AffaireData, AlerteData, AudienceData, AvertissementData, DecisionData, ExecutionData,
    VoieDeRecoursData,
};
use sqlx::{Row, postgres::PgRow};

fn opt_enum<E: serde::de::DeserializeOwned>(
    row: &PgRow,
    column: &str,
) -> Result<Option<E>, sqlx::Error> {
    row.try_get::<Option<String>, _>(column)?
        .map(|raw| text_to_enum(column, raw))
        .transpose()
}

fn req_enum<E: serde::de::DeserializeOwned>(row: &PgRow, column: &str) -> Result<E, sqlx::Error> {
    text_to_enum(column, row.try_get::<String, _>(column)?)
}

impl PgModel for AffaireData {
    const TABLE: &'static str = "affaires";

    fn columns() -> &'static [&'static str] {
        &[
            "reference",
            "intitule",
            "client",
            "adversaire",
            "juridiction",
            "numero_dossier",
            "statut",
            "date_ouverture",
            "honoraires_centimes",
        ]
    }

    fn values(&self) -> Vec<PgValue> {
        vec![
            PgValue::Text(Some(self.reference.clone())),
            PgValue::Text(Some(self.intitule.clone())),
            PgValue::Text(Some(self.client.clone())),
            PgValue::Text(self.adversaire.clone()),
            PgValue::Text(self.juridiction.clone()),
            PgValue::Text(self.numero_dossier.clone()),
            PgValue::Text(Some(enum_to_text(&self.statut))),
            PgValue::Date(Some(self.date_ouverture)),
            PgValue::BigInt(self.honoraires_centimes),
        ]
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            reference: row.try_get("reference")?,
            intitule: row.try_get("intitule")?,
            client: row.try_get("client")?,
            adversaire: row.try_get("adversaire")?,
            juridiction: row.try_get("juridiction")?,
            numero_dossier: row.try_get("numero_dossier")?,
            statut: req_enum(row, "statut")?,
            date_ouverture: row.try_get("date_ouverture")?,
            honoraires_centimes: row.try_get("honoraires_centimes")?,
        })
    }
}

impl PgModel for AudienceData {
    const TABLE: &'static str = "audiences";

    fn columns() -> &'static [&'static str] {
        &["affaire_id", "date_audience", "salle", "objet", "resultat"]
    }

    fn values(&self) -> Vec<PgValue> {
        vec![
            PgValue::BigInt(Some(self.affaire_id)),
            PgValue::Date(Some(self.date_audience)),
            PgValue::Text(self.salle.clone()),
            PgValue::Text(self.objet.clone()),
            PgValue::Text(self.resultat.clone()),
        ]
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            affaire_id: row.try_get("affaire_id")?,
            date_audience: row.try_get("date_audience")?,
            salle: row.try_get("salle")?,
            objet: row.try_get("objet")?,
            resultat: row.try_get("resultat")?,
        })
    }
}

impl PgModel for DecisionData {
    const TABLE: &'static str = "decisions";

    fn columns() -> &'static [&'static str] {
        &[
            "affaire_id",
            "date_decision",
            "dispositif",
            "sens",
            "date_notification",
        ]
    }

    fn values(&self) -> Vec<PgValue> {
        vec![
            PgValue::BigInt(Some(self.affaire_id)),
            PgValue::Date(Some(self.date_decision)),
            PgValue::Text(Some(self.dispositif.clone())),
            PgValue::Text(self.sens.as_ref().map(enum_to_text)),
            PgValue::Date(self.date_notification),
        ]
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            affaire_id: row.try_get("affaire_id")?,
            date_decision: row.try_get("date_decision")?,
            dispositif: row.try_get("dispositif")?,
            sens: opt_enum(row, "sens")?,
            date_notification: row.try_get("date_notification")?,
        })
    }
}

impl PgModel for VoieDeRecoursData {
    const TABLE: &'static str = "voies_de_recours";

    fn columns() -> &'static [&'static str] {
        &[
            "affaire_id",
            "decision_id",
            "type_recours",
            "date_notification",
            "delai_jours",
            "date_depot",
            "statut",
        ]
    }

    fn values(&self) -> Vec<PgValue> {
        vec![
            PgValue::BigInt(Some(self.affaire_id)),
            PgValue::BigInt(self.decision_id),
            PgValue::Text(Some(enum_to_text(&self.type_recours))),
            PgValue::Date(Some(self.date_notification)),
            PgValue::Int(Some(self.delai_jours)),
            PgValue::Date(self.date_depot),
            PgValue::Text(Some(enum_to_text(&self.statut))),
        ]
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            affaire_id: row.try_get("affaire_id")?,
            decision_id: row.try_get("decision_id")?,
            type_recours: req_enum(row, "type_recours")?,
            date_notification: row.try_get("date_notification")?,
            delai_jours: row.try_get("delai_jours")?,
            date_depot: row.try_get("date_depot")?,
            statut: req_enum(row, "statut")?,
        })
    }
}

impl PgModel for ExecutionData {
    const TABLE: &'static str = "executions";

    fn columns() -> &'static [&'static str] {
        &[
            "affaire_id",
            "decision_id",
            "date_demande",
            "huissier",
            "montant_centimes",
            "statut",
        ]
    }

    fn values(&self) -> Vec<PgValue> {
        vec![
            PgValue::BigInt(Some(self.affaire_id)),
            PgValue::BigInt(self.decision_id),
            PgValue::Date(Some(self.date_demande)),
            PgValue::Text(self.huissier.clone()),
            PgValue::BigInt(self.montant_centimes),
            PgValue::Text(Some(enum_to_text(&self.statut))),
        ]
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            affaire_id: row.try_get("affaire_id")?,
            decision_id: row.try_get("decision_id")?,
            date_demande: row.try_get("date_demande")?,
            huissier: row.try_get("huissier")?,
            montant_centimes: row.try_get("montant_centimes")?,
            statut: req_enum(row, "statut")?,
        })
    }
}

impl PgModel for AvertissementData {
    const TABLE: &'static str = "avertissements";

    fn columns() -> &'static [&'static str] {
        &[
            "affaire_id",
            "destinataire",
            "date_envoi",
            "date_reception",
            "delai_jours",
            "statut",
        ]
    }

    fn values(&self) -> Vec<PgValue> {
        vec![
            PgValue::BigInt(self.affaire_id),
            PgValue::Text(Some(self.destinataire.clone())),
            PgValue::Date(Some(self.date_envoi)),
            PgValue::Date(self.date_reception),
            PgValue::Int(Some(self.delai_jours)),
            PgValue::Text(Some(enum_to_text(&self.statut))),
        ]
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            affaire_id: row.try_get("affaire_id")?,
            destinataire: row.try_get("destinataire")?,
            date_envoi: row.try_get("date_envoi")?,
            date_reception: row.try_get("date_reception")?,
            delai_jours: row.try_get("delai_jours")?,
            statut: req_enum(row, "statut")?,
        })
    }
}

impl PgModel for AlerteData {
    const TABLE: &'static str = "alertes";

    fn columns() -> &'static [&'static str] {
        &[
            "affaire_id",
            "type_alerte",
            "reference_id",
            "titre",
            "message",
            "date_echeance",
            "is_read",
        ]
    }

    fn values(&self) -> Vec<PgValue> {
        vec![
            PgValue::BigInt(self.affaire_id),
            PgValue::Text(Some(self.type_alerte.as_str().to_string())),
            PgValue::BigInt(Some(self.reference_id)),
            PgValue::Text(Some(self.titre.clone())),
            PgValue::Text(Some(self.message.clone())),
            PgValue::Date(Some(self.date_echeance)),
            PgValue::Bool(self.is_read),
        ]
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            affaire_id: row.try_get("affaire_id")?,
            type_alerte: req_enum(row, "type_alerte")?,
            reference_id: row.try_get("reference_id")?,
            titre: row.try_get("titre")?,
            message: row.try_get("message")?,
            date_echeance: row.try_get("date_echeance")?,
            is_read: row.try_get("is_read")?,
        })
    }
}
