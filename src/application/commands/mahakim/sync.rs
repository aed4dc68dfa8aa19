use super::MahakimSyncService;
use crate::{
    application::{
        dto::SyncReport,
        error::{ApplicationError, ApplicationResult},
        ports::browser::{BrowserError, BrowserOptions, BrowserSession},
    },
    domain::{
        cases::Affaire,
        mahakim::{DossierNumber, SyncResult, extract_fields},
        record::Scope,
    },
};
use std::time::Duration;
use tracing::{info, warn};

/// Overrides for one batch run; `None` falls back to the configured value.
#[derive(Debug, Clone, Default)]
pub struct SyncRequest {
    pub limit: Option<u32>,
    pub affaire_id: Option<i64>,
    pub headless: Option<bool>,
    pub timeout: Option<Duration>,
}

impl MahakimSyncService {
    /// Sequentially sync every open affaire that carries a portal number.
    /// A failed attempt is stored and the loop moves on.
    pub async fn sync_batch(&self, request: SyncRequest) -> ApplicationResult<SyncReport> {
        let options = BrowserOptions {
            headless: request.headless.unwrap_or(self.settings.headless),
            timeout: request.timeout.unwrap_or(self.settings.timeout),
        };

        let candidates = match request.affaire_id {
            Some(id) => vec![self.affaires.find(id, Scope::Active).await?.ok_or_else(|| {
                ApplicationError::not_found(format!("affaire {id} not found"))
            })?],
            None => self
                .affaires
                .active()
                .await?
                .into_iter()
                .filter(|a| !a.data.is_closed() && a.data.numero_dossier.is_some())
                .collect(),
        };
        let limit = request.limit.map_or(usize::MAX, |l| l as usize);

        let mut report = SyncReport::default();
        let mut queue = Vec::new();
        for affaire in candidates {
            match affaire.data.dossier_number() {
                Some(Ok(dossier)) => queue.push((affaire, dossier)),
                Some(Err(err)) => {
                    warn!(affaire_id = affaire.id, error = %err, "skipping affaire with malformed dossier number");
                    report.skipped += 1;
                }
                None => {
                    warn!(affaire_id = affaire.id, "skipping affaire without dossier number");
                    report.skipped += 1;
                }
            }
        }

        for (affaire, dossier) in queue.iter().take(limit) {
            report.attempted += 1;
            match self.sync_affaire(affaire, dossier, options).await {
                Ok(result) if result.success => report.succeeded += 1,
                Ok(_) => report.failed += 1,
                Err(err) => {
                    warn!(affaire_id = affaire.id, error = %err, "failed to store sync result; continuing");
                    report.failed += 1;
                }
            }
        }

        info!(
            attempted = report.attempted,
            succeeded = report.succeeded,
            failed = report.failed,
            skipped = report.skipped,
            "mahakim sync finished"
        );
        Ok(report)
    }

    /// One attempt for one affaire; the outcome is stored either way.
    async fn sync_affaire(
        &self,
        affaire: &Affaire,
        dossier: &DossierNumber,
        options: BrowserOptions,
    ) -> ApplicationResult<SyncResult> {
        let outcome = self.fetch(dossier, options).await;
        let now = self.clock.now();
        let result = match outcome {
            Ok(html) => {
                let extract = extract_fields(&html);
                if extract.is_empty() {
                    warn!(affaire_id = affaire.id, dossier = %dossier, "portal answered but no field was recognised");
                }
                SyncResult {
                    id: None,
                    affaire_id: affaire.id,
                    numero_dossier: dossier.to_string(),
                    success: true,
                    statut: extract.statut,
                    prochaine_audience: extract.prochaine_audience,
                    juge: extract.juge,
                    raw_html: Some(html),
                    error_message: None,
                    created_at: now,
                }
            }
            Err(err) => {
                warn!(
                    affaire_id = affaire.id,
                    dossier = %dossier,
                    kind = err.kind(),
                    error = %err,
                    "mahakim sync attempt failed"
                );
                SyncResult {
                    id: None,
                    affaire_id: affaire.id,
                    numero_dossier: dossier.to_string(),
                    success: false,
                    statut: None,
                    prochaine_audience: None,
                    juge: None,
                    raw_html: None,
                    error_message: Some(err.stored_message()),
                    created_at: now,
                }
            }
        };

        Ok(self.results.insert(result).await?)
    }

    async fn fetch(
        &self,
        dossier: &DossierNumber,
        options: BrowserOptions,
    ) -> Result<String, BrowserError> {
        let mut session = self.launcher.launch(options).await?;
        let outcome = self.submit_search(session.as_mut(), dossier, options).await;
        if let Err(err) = session.close().await {
            warn!(error = %err, "failed to close browser session");
        }
        outcome
    }

    async fn submit_search(
        &self,
        session: &mut dyn BrowserSession,
        dossier: &DossierNumber,
        options: BrowserOptions,
    ) -> Result<String, BrowserError> {
        let selectors = &self.settings.selectors;
        session.goto(&self.settings.url).await?;
        session.fill(&selectors.numero, dossier.numero()).await?;
        session
            .fill(&selectors.code, dossier.code_categorie())
            .await?;
        session
            .fill(&selectors.annee, &dossier.annee().to_string())
            .await?;
        session.click(&selectors.submit).await?;
        session
            .wait_for_html(&selectors.result, options.timeout)
            .await
    }
}
