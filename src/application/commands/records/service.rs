use std::sync::Arc;

use crate::{
    application::{
        audit::{AuditEvent, AuditRecorder},
        context::RequestContext,
        error::{ApplicationError, ApplicationResult},
        ports::time::Clock,
    },
    domain::{
        audit::{AuditAction, FieldDiff},
        record::{RecordData, RecordRepository, Scope, Stored},
    },
};

/// Outcome of an audited mutation.
#[derive(Debug, Clone)]
pub struct Mutation<D> {
    pub record: Stored<D>,
    pub action: AuditAction,
    pub changes: FieldDiff,
    pub audit_id: Option<i64>,
}

pub struct RecordCommandService<D: RecordData> {
    pub(super) repo: Arc<dyn RecordRepository<D>>,
    pub(super) audit: Arc<AuditRecorder>,
    pub(super) clock: Arc<dyn Clock>,
}

impl<D: RecordData> RecordCommandService<D> {
    pub fn new(
        repo: Arc<dyn RecordRepository<D>>,
        audit: Arc<AuditRecorder>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { repo, audit, clock }
    }

    pub(super) async fn load(&self, id: i64, scope: Scope) -> ApplicationResult<Stored<D>> {
        self.repo
            .find(id, scope)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("{} {id} not found", D::MODEL)))
    }

    pub(super) async fn finish(
        &self,
        ctx: &RequestContext,
        action: AuditAction,
        record: Stored<D>,
        changes: FieldDiff,
    ) -> Mutation<D> {
        let audit_id = self
            .audit
            .record(
                ctx,
                AuditEvent {
                    action,
                    app_label: D::APP_LABEL,
                    model: D::MODEL,
                    object_pk: record.object_pk(),
                    changes: changes.clone(),
                },
            )
            .await;

        tracing::info!(
            model = D::MODEL,
            id = record.id,
            %action,
            changed = changes.len(),
            "record mutated"
        );

        Mutation {
            record,
            action,
            changes,
            audit_id,
        }
    }
}
