// src/application/commands/deadlines.rs
use std::sync::Arc;

use crate::{
    application::{
        commands::records::RecordCommandService,
        context::RequestContext,
        error::{ApplicationError, ApplicationResult},
        ports::time::Clock,
    },
    domain::{
        cases::{AlerteData, AlerteIndex, AudienceData, AvertissementData, VoieDeRecoursData},
        deadline::{
            DeadlineCandidate, DeadlineWindow, audience_candidate, avertissement_candidate,
            recours_candidate,
        },
        errors::DomainError,
        record::RecordRepository,
    },
};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub created: u32,
    /// Candidates that already had an alert.
    pub skipped: u32,
    pub horizon_days: u32,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
}

/// Turns upcoming deadlines into alerts. Safe to run repeatedly: at most one
/// alert ever exists per (alert type, source record).
pub struct DeadlineScanner {
    avertissements: Arc<dyn RecordRepository<AvertissementData>>,
    recours: Arc<dyn RecordRepository<VoieDeRecoursData>>,
    audiences: Arc<dyn RecordRepository<AudienceData>>,
    alertes: Arc<RecordCommandService<AlerteData>>,
    index: Arc<dyn AlerteIndex>,
    clock: Arc<dyn Clock>,
}

impl DeadlineScanner {
    pub fn new(
        avertissements: Arc<dyn RecordRepository<AvertissementData>>,
        recours: Arc<dyn RecordRepository<VoieDeRecoursData>>,
        audiences: Arc<dyn RecordRepository<AudienceData>>,
        alertes: Arc<RecordCommandService<AlerteData>>,
        index: Arc<dyn AlerteIndex>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            avertissements,
            recours,
            audiences,
            alertes,
            index,
            clock,
        }
    }

    pub async fn scan(&self, horizon_days: u32) -> ApplicationResult<ScanReport> {
        let window = DeadlineWindow::new(self.clock.today(), horizon_days);
        let candidates = self.candidates(&window).await?;
        tracing::debug!(
            start = %window.start(),
            end = %window.end(),
            candidates = candidates.len(),
            "deadline window evaluated"
        );

        let ctx = RequestContext::system("scan-deadlines");
        let mut report = ScanReport {
            created: 0,
            skipped: 0,
            horizon_days,
            window_start: window.start(),
            window_end: window.end(),
        };

        for candidate in candidates {
            if self
                .index
                .exists(candidate.type_alerte, candidate.reference_id)
                .await?
            {
                report.skipped += 1;
                continue;
            }
            let type_alerte = candidate.type_alerte;
            let reference_id = candidate.reference_id;
            match self.alertes.create(&ctx, candidate.into_alerte()).await {
                Ok(created) => {
                    tracing::info!(
                        alerte_id = created.record.id,
                        type_alerte = type_alerte.as_str(),
                        reference_id,
                        "alert created"
                    );
                    report.created += 1;
                }
                // Lost a race against a concurrent scan; the unique index won.
                Err(ApplicationError::Conflict(_))
                | Err(ApplicationError::Domain(DomainError::Conflict(_))) => {
                    report.skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }

        tracing::info!(
            created = report.created,
            skipped = report.skipped,
            horizon_days,
            "deadline scan finished"
        );
        Ok(report)
    }

    async fn candidates(&self, window: &DeadlineWindow) -> ApplicationResult<Vec<DeadlineCandidate>> {
        let mut out = Vec::new();
        out.extend(
            self.avertissements
                .active()
                .await?
                .iter()
                .filter_map(|r| avertissement_candidate(r, window)),
        );
        out.extend(
            self.recours
                .active()
                .await?
                .iter()
                .filter_map(|r| recours_candidate(r, window)),
        );
        out.extend(
            self.audiences
                .active()
                .await?
                .iter()
                .filter_map(|r| audience_candidate(r, window)),
        );
        Ok(out)
    }
}
