use super::{Mutation, RecordCommandService};
use crate::{
    application::{context::RequestContext, error::ApplicationResult},
    domain::{
        audit::{AuditAction, FieldDiff, snapshot},
        record::RecordData,
    },
};

impl<D: RecordData> RecordCommandService<D> {
    pub async fn create(&self, ctx: &RequestContext, data: D) -> ApplicationResult<Mutation<D>> {
        data.validate()?;
        let record = self.repo.insert(data, self.clock.now()).await?;
        let after = snapshot(&record.data)?;
        let changes = FieldDiff::between(None, Some(&after), self.audit.redactor());
        Ok(self.finish(ctx, AuditAction::Create, record, changes).await)
    }
}
