// src/application/queries/sync.rs
use crate::{
    application::{dto::SyncResultDto, error::ApplicationResult},
    domain::mahakim::SyncResultRepository,
};
use std::sync::Arc;

const DEFAULT_LIMIT: u32 = 20;

pub struct SyncQueryService {
    repo: Arc<dyn SyncResultRepository>,
}

impl SyncQueryService {
    pub fn new(repo: Arc<dyn SyncResultRepository>) -> Self {
        Self { repo }
    }

    pub async fn history(
        &self,
        affaire_id: i64,
        limit: Option<u32>,
    ) -> ApplicationResult<Vec<SyncResultDto>> {
        let limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT).min(100);
        Ok(self
            .repo
            .list_for_affaire(affaire_id, limit)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }
}
