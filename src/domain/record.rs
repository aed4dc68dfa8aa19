// src/domain/record.rs
use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Query variant over a soft-deletable table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Active,
    All,
}

impl Scope {
    pub fn admits(self, lifecycle: &Lifecycle) -> bool {
        match self {
            Scope::Active => !lifecycle.is_deleted,
            Scope::All => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
}

impl Lifecycle {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
            is_deleted: false,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    pub fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.is_deleted = true;
        self.updated_at = now;
    }

    pub fn mark_restored(&mut self, now: DateTime<Utc>) {
        self.is_deleted = false;
        self.updated_at = now;
    }
}

/// Business payload of an audited, soft-deletable entity.
///
/// The serialized form of the payload is what the audit trail diffs, so
/// every field that should show up in a change set must be serialized.
pub trait RecordData: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const MODEL: &'static str;
    const APP_LABEL: &'static str = "cabinet";

    fn validate(&self) -> DomainResult<()> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Stored<D> {
    pub id: i64,
    pub lifecycle: Lifecycle,
    pub data: D,
}

impl<D: RecordData> Stored<D> {
    pub fn new(id: i64, lifecycle: Lifecycle, data: D) -> Self {
        Self {
            id,
            lifecycle,
            data,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.lifecycle.is_deleted
    }

    pub fn object_pk(&self) -> String {
        self.id.to_string()
    }
}

/// Repository over a single soft-deletable table.
///
/// `soft_delete` and `restore` only flip `is_deleted`; `purge` is the one
/// operation that removes a row.
#[async_trait]
pub trait RecordRepository<D: RecordData>: Send + Sync {
    async fn find(&self, id: i64, scope: Scope) -> DomainResult<Option<Stored<D>>>;

    async fn list(&self, scope: Scope) -> DomainResult<Vec<Stored<D>>>;

    async fn insert(&self, data: D, now: DateTime<Utc>) -> DomainResult<Stored<D>>;

    async fn update(&self, record: Stored<D>) -> DomainResult<Stored<D>>;

    async fn soft_delete(&self, id: i64, now: DateTime<Utc>) -> DomainResult<Stored<D>>;

    async fn restore(&self, id: i64, now: DateTime<Utc>) -> DomainResult<Stored<D>>;

    async fn purge(&self, id: i64) -> DomainResult<()>;

    async fn active(&self) -> DomainResult<Vec<Stored<D>>> {
        self.list(Scope::Active).await
    }

    async fn all(&self) -> DomainResult<Vec<Stored<D>>> {
        self.list(Scope::All).await
    }
}

pub fn missing_record<D: RecordData>(id: i64) -> DomainError {
    DomainError::NotFound(format!("{} {id} not found", D::MODEL))
}
