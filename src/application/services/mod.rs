// src/application/services/mod.rs
use std::sync::Arc;

use crate::{
    application::{
        audit::{AuditRecorder, AuditSettings},
        commands::{
            deadlines::DeadlineScanner,
            mahakim::{MahakimSyncService, PortalSettings},
            records::RecordCommandService,
            seed::DemoSeeder,
            sessions::SessionCommandService,
        },
        ports::{
            browser::BrowserLauncher,
            security::{PasswordHasher, TokenGenerator},
            time::Clock,
        },
        queries::{audit::AuditQueryService, records::RecordQueryService, sync::SyncQueryService},
    },
    domain::{
        audit::AuditLogRepository,
        cases::{
            AffaireData, AlerteData, AlerteIndex, AudienceData, AvertissementData, DecisionData,
            ExecutionData, VoieDeRecoursData,
        },
        mahakim::SyncResultRepository,
        record::{RecordData, RecordRepository},
        session::{AuthTokenRepository, IdlePolicy},
        user::UserRepository,
    },
};

/// Storage ports, one per table.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn AuthTokenRepository>,
    pub audit_logs: Arc<dyn AuditLogRepository>,
    pub sync_results: Arc<dyn SyncResultRepository>,
    pub affaires: Arc<dyn RecordRepository<AffaireData>>,
    pub audiences: Arc<dyn RecordRepository<AudienceData>>,
    pub decisions: Arc<dyn RecordRepository<DecisionData>>,
    pub recours: Arc<dyn RecordRepository<VoieDeRecoursData>>,
    pub executions: Arc<dyn RecordRepository<ExecutionData>>,
    pub avertissements: Arc<dyn RecordRepository<AvertissementData>>,
    pub alertes: Arc<dyn RecordRepository<AlerteData>>,
    pub alerte_index: Arc<dyn AlerteIndex>,
}

/// Non-storage ports.
#[derive(Clone)]
pub struct Adapters {
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub token_generator: Arc<dyn TokenGenerator>,
    pub clock: Arc<dyn Clock>,
    pub browser: Arc<dyn BrowserLauncher>,
}

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub audit: AuditSettings,
    pub idle_policy: IdlePolicy,
    pub portal: PortalSettings,
}

pub struct RecordServices<D: RecordData> {
    pub commands: Arc<RecordCommandService<D>>,
    pub queries: Arc<RecordQueryService<D>>,
}

impl<D: RecordData> RecordServices<D> {
    fn new(
        repo: &Arc<dyn RecordRepository<D>>,
        audit: &Arc<AuditRecorder>,
        clock: &Arc<dyn Clock>,
    ) -> Self {
        Self {
            commands: Arc::new(RecordCommandService::new(
                Arc::clone(repo),
                Arc::clone(audit),
                Arc::clone(clock),
            )),
            queries: Arc::new(RecordQueryService::new(Arc::clone(repo))),
        }
    }
}

pub struct ApplicationServices {
    pub sessions: Arc<SessionCommandService>,
    pub affaires: RecordServices<AffaireData>,
    pub audiences: RecordServices<AudienceData>,
    pub decisions: RecordServices<DecisionData>,
    pub recours: RecordServices<VoieDeRecoursData>,
    pub executions: RecordServices<ExecutionData>,
    pub avertissements: RecordServices<AvertissementData>,
    pub alertes: RecordServices<AlerteData>,
    pub audit_queries: Arc<AuditQueryService>,
    pub sync_queries: Arc<SyncQueryService>,
    pub mahakim: Arc<MahakimSyncService>,
    pub deadlines: Arc<DeadlineScanner>,
    pub seeder: Arc<DemoSeeder>,
}

impl ApplicationServices {
    pub fn new(repos: Repositories, adapters: Adapters, settings: ServiceSettings) -> Self {
        let clock = adapters.clock;
        let audit = Arc::new(AuditRecorder::new(
            Arc::clone(&repos.audit_logs),
            settings.audit,
            Arc::clone(&clock),
        ));

        let sessions = Arc::new(SessionCommandService::new(
            Arc::clone(&repos.users),
            Arc::clone(&repos.tokens),
            Arc::clone(&adapters.password_hasher),
            Arc::clone(&adapters.token_generator),
            Arc::clone(&clock),
            settings.idle_policy,
        ));

        let affaires = RecordServices::new(&repos.affaires, &audit, &clock);
        let audiences = RecordServices::new(&repos.audiences, &audit, &clock);
        let decisions = RecordServices::new(&repos.decisions, &audit, &clock);
        let recours = RecordServices::new(&repos.recours, &audit, &clock);
        let executions = RecordServices::new(&repos.executions, &audit, &clock);
        let avertissements = RecordServices::new(&repos.avertissements, &audit, &clock);
        let alertes = RecordServices::new(&repos.alertes, &audit, &clock);

        let deadlines = Arc::new(DeadlineScanner::new(
            Arc::clone(&repos.avertissements),
            Arc::clone(&repos.recours),
            Arc::clone(&repos.audiences),
            Arc::clone(&alertes.commands),
            Arc::clone(&repos.alerte_index),
            Arc::clone(&clock),
        ));

        let mahakim = Arc::new(MahakimSyncService::new(
            Arc::clone(&repos.affaires),
            Arc::clone(&repos.sync_results),
            Arc::clone(&adapters.browser),
            Arc::clone(&clock),
            settings.portal,
        ));

        let seeder = Arc::new(DemoSeeder::new(
            Arc::clone(&repos.users),
            Arc::clone(&adapters.password_hasher),
            Arc::clone(&clock),
            Arc::clone(&repos.affaires),
            Arc::clone(&affaires.commands),
            Arc::clone(&audiences.commands),
            Arc::clone(&avertissements.commands),
            Arc::clone(&recours.commands),
        ));

        Self {
            sessions,
            affaires,
            audiences,
            decisions,
            recours,
            executions,
            avertissements,
            alertes,
            audit_queries: Arc::new(AuditQueryService::new(Arc::clone(&repos.audit_logs))),
            sync_queries: Arc::new(SyncQueryService::new(Arc::clone(&repos.sync_results))),
            mahakim,
            deadlines,
            seeder,
        }
    }
}
