use super::{Mutation, RecordCommandService};
use crate::{
    application::{context::RequestContext, error::ApplicationResult},
    domain::{
        audit::{AuditAction, FieldDiff, snapshot},
        record::{RecordData, Scope},
    },
};

impl<D: RecordData> RecordCommandService<D> {
    /// Replace the payload of an active record.
    ///
    /// When nothing serializes differently the record is left untouched:
    /// no write, no audit row, and an empty change set in the result.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        data: D,
    ) -> ApplicationResult<Mutation<D>> {
        data.validate()?;
        let mut record = self.load(id, Scope::Active).await?;

        let before = snapshot(&record.data)?;
        let after = snapshot(&data)?;
        let changes = FieldDiff::between(Some(&before), Some(&after), self.audit.redactor());
        if changes.is_empty() {
            tracing::debug!(model = D::MODEL, id, "update without changes skipped");
            return Ok(Mutation {
                record,
                action: AuditAction::Update,
                changes,
                audit_id: None,
            });
        }

        record.data = data;
        record.lifecycle.touch(self.clock.now());
        let saved = self.repo.update(record).await?;
        Ok(self.finish(ctx, AuditAction::Update, saved, changes).await)
    }
}
