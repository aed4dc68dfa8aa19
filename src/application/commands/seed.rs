// src/application/commands/seed.rs
use std::sync::Arc;

use crate::{
    application::{
        commands::records::RecordCommandService,
        context::RequestContext,
        error::{ApplicationError, ApplicationResult},
        ports::{security::PasswordHasher, time::Clock},
    },
    domain::{
        cases::{
            AffaireData, AffaireStatut, AudienceData, AvertissementData, AvertissementStatut,
            RecoursStatut, TypeRecours, VoieDeRecoursData,
        },
        record::RecordRepository,
        user::{NewUser, PasswordHash, UserRepository, Username},
    },
};
use chrono::Days;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub admin_created: bool,
    pub records_created: u32,
}

/// Idempotent demo data: an admin account when no user exists, and one
/// sample affaire with a hearing, a notice and an appeal when no affaire
/// exists.
pub struct DemoSeeder {
    users: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
    affaire_repo: Arc<dyn RecordRepository<AffaireData>>,
    affaires: Arc<RecordCommandService<AffaireData>>,
    audiences: Arc<RecordCommandService<AudienceData>>,
    avertissements: Arc<RecordCommandService<AvertissementData>>,
    recours: Arc<RecordCommandService<VoieDeRecoursData>>,
}

impl DemoSeeder {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
        affaire_repo: Arc<dyn RecordRepository<AffaireData>>,
        affaires: Arc<RecordCommandService<AffaireData>>,
        audiences: Arc<RecordCommandService<AudienceData>>,
        avertissements: Arc<RecordCommandService<AvertissementData>>,
        recours: Arc<RecordCommandService<VoieDeRecoursData>>,
    ) -> Self {
        Self {
            users,
            password_hasher,
            clock,
            affaire_repo,
            affaires,
            audiences,
            avertissements,
            recours,
        }
    }

    pub async fn seed(&self, admin_username: &str, admin_password: &str) -> ApplicationResult<SeedReport> {
        let mut report = SeedReport::default();

        if self.users.count().await? == 0 {
            if admin_password.len() < 8 {
                return Err(ApplicationError::validation(
                    "admin password must be at least 8 characters",
                ));
            }
            let hash = self.password_hasher.hash(admin_password).await?;
            let user = self
                .users
                .insert(NewUser::new(
                    Username::new(admin_username)?,
                    PasswordHash::new(hash)?,
                    Some("Administrateur".into()),
                    self.clock.now(),
                ))
                .await?;
            tracing::info!(user_id = %user.id, username = %user.username, "admin account created");
            report.admin_created = true;
        }

        if self.affaire_repo.all().await?.is_empty() {
            report.records_created = self.seed_cases().await?;
        } else {
            tracing::info!("affaires already present; demo cases not seeded");
        }

        Ok(report)
    }

    async fn seed_cases(&self) -> ApplicationResult<u32> {
        let ctx = RequestContext::system("seed-demo");
        let today = self.clock.today();
        let days_ago = |n: u64| today.checked_sub_days(Days::new(n)).unwrap_or(today);
        let days_ahead = |n: u64| today.checked_add_days(Days::new(n)).unwrap_or(today);

        let affaire = self
            .affaires
            .create(
                &ctx,
                AffaireData {
                    reference: "CAB-2024-001".into(),
                    intitule: "Recouvrement de créance commerciale".into(),
                    client: "Société Atlas Distribution".into(),
                    adversaire: Some("SARL Nour Import".into()),
                    juridiction: Some("Tribunal de commerce de Casablanca".into()),
                    numero_dossier: Some("1234/8201/2024".into()),
                    statut: AffaireStatut::EnCours,
                    date_ouverture: days_ago(60),
                    honoraires_centimes: Some(1_500_000),
                },
            )
            .await?;
        let affaire_id = affaire.record.id;

        self.audiences
            .create(
                &ctx,
                AudienceData {
                    affaire_id,
                    date_audience: days_ahead(3),
                    salle: Some("3".into()),
                    objet: Some("Plaidoirie".into()),
                    resultat: None,
                },
            )
            .await?;

        self.avertissements
            .create(
                &ctx,
                AvertissementData {
                    affaire_id: Some(affaire_id),
                    destinataire: "SARL Nour Import".into(),
                    date_envoi: days_ago(10),
                    date_reception: Some(days_ago(9)),
                    delai_jours: 15,
                    statut: AvertissementStatut::Ouvert,
                },
            )
            .await?;

        self.recours
            .create(
                &ctx,
                VoieDeRecoursData {
                    affaire_id,
                    decision_id: None,
                    type_recours: TypeRecours::Appel,
                    date_notification: days_ago(25),
                    delai_jours: TypeRecours::Appel.default_delai_jours(),
                    date_depot: None,
                    statut: RecoursStatut::EnAttente,
                },
            )
            .await?;

        tracing::info!(affaire_id, "demo case seeded");
        Ok(4)
    }
}
