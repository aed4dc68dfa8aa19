use super::{Mutation, RecordCommandService};
use crate::{
    application::{
        context::RequestContext,
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        audit::{AuditAction, FieldDiff, snapshot},
        record::{RecordData, Scope},
    },
};
use serde_json::Value;

impl<D: RecordData> RecordCommandService<D> {
    /// Soft delete: the row stays, hidden from active queries.
    pub async fn delete(&self, ctx: &RequestContext, id: i64) -> ApplicationResult<Mutation<D>> {
        let record = self.load(id, Scope::Active).await?;
        let before = snapshot(&record.data)?;
        let deleted = self.repo.soft_delete(record.id, self.clock.now()).await?;
        let changes = FieldDiff::between(Some(&before), None, self.audit.redactor());
        Ok(self.finish(ctx, AuditAction::Delete, deleted, changes).await)
    }

    pub async fn restore(&self, ctx: &RequestContext, id: i64) -> ApplicationResult<Mutation<D>> {
        let record = self.load(id, Scope::All).await?;
        if !record.is_deleted() {
            return Err(ApplicationError::conflict(format!(
                "{} {id} is not deleted",
                D::MODEL
            )));
        }
        let restored = self.repo.restore(record.id, self.clock.now()).await?;
        let changes = FieldDiff::single("is_deleted", Value::Bool(true), Value::Bool(false));
        Ok(self.finish(ctx, AuditAction::Restore, restored, changes).await)
    }

    /// Physically remove a record. Only soft-deleted records can be purged.
    pub async fn purge(&self, ctx: &RequestContext, id: i64) -> ApplicationResult<Mutation<D>> {
        let record = self.load(id, Scope::All).await?;
        if !record.is_deleted() {
            return Err(ApplicationError::conflict(format!(
                "{} {id} must be deleted before it can be purged",
                D::MODEL
            )));
        }
        let before = snapshot(&record.data)?;
        self.repo.purge(record.id).await?;
        let changes = FieldDiff::between(Some(&before), None, self.audit.redactor());
        Ok(self.finish(ctx, AuditAction::Purge, record, changes).await)
    }
}
