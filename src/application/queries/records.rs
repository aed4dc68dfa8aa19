// src/application/queries/records.rs
use crate::{
    application::{
        dto::RecordDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::record::{RecordData, RecordRepository, Scope},
};
use std::sync::Arc;

pub struct RecordQueryService<D: RecordData> {
    repo: Arc<dyn RecordRepository<D>>,
}

impl<D: RecordData> RecordQueryService<D> {
    pub fn new(repo: Arc<dyn RecordRepository<D>>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, id: i64, scope: Scope) -> ApplicationResult<RecordDto<D>> {
        self.repo
            .find(id, scope)
            .await?
            .map(RecordDto::from)
            .ok_or_else(|| ApplicationError::not_found(format!("{} {id} not found", D::MODEL)))
    }

    pub async fn list(&self, scope: Scope) -> ApplicationResult<Vec<RecordDto<D>>> {
        Ok(self
            .repo
            .list(scope)
            .await?
            .into_iter()
            .map(RecordDto::from)
            .collect())
    }
}
