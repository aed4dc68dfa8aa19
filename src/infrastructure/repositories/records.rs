// src/infrastructure/repositories/records.rs
//! One generic repository for every soft-deletable table. Each payload type
//! describes its table through [`PgModel`]; lifecycle columns
//! (`id, created_at, updated_at, is_deleted`) are shared.
use super::map_sqlx;
use crate::domain::{
    cases::{AlerteData, AlerteIndex, AlerteType},
    errors::{DomainError, DomainResult},
    record::{Lifecycle, RecordData, RecordRepository, Scope, Stored, missing_record},
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, de::DeserializeOwned};
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};
use std::marker::PhantomData;

const LIFECYCLE_COLUMNS: &str = "id, created_at, updated_at, is_deleted";

/// Column value as bound into a query.
#[derive(Debug, Clone, PartialEq)]
pub enum PgValue {
    Text(Option<String>),
    BigInt(Option<i64>),
    Int(Option<i32>),
    Bool(bool),
    Date(Option<NaiveDate>),
}

impl PgValue {
    fn push_to(self, builder: &mut QueryBuilder<'_, Postgres>) {
        match self {
            PgValue::Text(v) => builder.push_bind(v),
            PgValue::BigInt(v) => builder.push_bind(v),
            PgValue::Int(v) => builder.push_bind(v),
            PgValue::Bool(v) => builder.push_bind(v),
            PgValue::Date(v) => builder.push_bind(v),
        };
    }
}

/// Table mapping for a record payload. `columns()` and `values()` must line
/// up one to one.
pub trait PgModel: RecordData {
    const TABLE: &'static str;

    fn columns() -> &'static [&'static str];

    fn values(&self) -> Vec<PgValue>;

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error>;
}

/// Enums are stored as their serde string form.
pub(crate) fn enum_to_text<E: Serialize>(value: &E) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(other) => other.to_string(),
        Err(_) => String::new(),
    }
}

pub(crate) fn text_to_enum<E: DeserializeOwned>(column: &str, raw: String) -> Result<E, sqlx::Error> {
    serde_json::from_value(serde_json::Value::String(raw)).map_err(|err| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(err),
    })
}

pub struct PgRecordRepository<D: PgModel> {
    pool: PgPool,
    _model: PhantomData<fn() -> D>,
}

impl<D: PgModel> Clone for PgRecordRepository<D> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

impl<D: PgModel> PgRecordRepository<D> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _model: PhantomData,
        }
    }

    fn select_list() -> String {
        format!("{LIFECYCLE_COLUMNS}, {}", D::columns().join(", "))
    }

    fn decode(row: &PgRow) -> DomainResult<Stored<D>> {
        let decode = || -> Result<Stored<D>, sqlx::Error> {
            let lifecycle = Lifecycle {
                created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
                updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
                is_deleted: row.try_get::<bool, _>("is_deleted")?,
            };
            Ok(Stored::new(row.try_get("id")?, lifecycle, D::from_row(row)?))
        };
        decode().map_err(|err| {
            DomainError::Persistence(format!("failed to decode {} row: {err}", D::MODEL))
        })
    }

    async fn fetch_one_returning(
        &self,
        mut builder: QueryBuilder<'_, Postgres>,
        id: i64,
    ) -> DomainResult<Stored<D>> {
        builder.push(" RETURNING ");
        builder.push(Self::select_list());
        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .ok_or_else(|| missing_record::<D>(id))?;
        Self::decode(&row)
    }

    async fn set_deleted(&self, id: i64, deleted: bool, now: DateTime<Utc>) -> DomainResult<Stored<D>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("UPDATE {} SET is_deleted = ", D::TABLE));
        builder.push_bind(deleted);
        builder.push(", updated_at = ");
        builder.push_bind(now);
        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(" AND is_deleted = ");
        builder.push_bind(!deleted);
        self.fetch_one_returning(builder, id).await
    }
}

#[async_trait]
impl<D: PgModel> RecordRepository<D> for PgRecordRepository<D> {
    async fn find(&self, id: i64, scope: Scope) -> DomainResult<Option<Stored<D>>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {} FROM {} WHERE id = ",
            Self::select_list(),
            D::TABLE
        ));
        builder.push_bind(id);
        if scope == Scope::Active {
            builder.push(" AND NOT is_deleted");
        }
        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;
        row.as_ref().map(Self::decode).transpose()
    }

    async fn list(&self, scope: Scope) -> DomainResult<Vec<Stored<D>>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {} FROM {}",
            Self::select_list(),
            D::TABLE
        ));
        if scope == Scope::Active {
            builder.push(" WHERE NOT is_deleted");
        }
        builder.push(" ORDER BY created_at DESC, id DESC");
        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;
        rows.iter().map(Self::decode).collect()
    }

    async fn insert(&self, data: D, now: DateTime<Utc>) -> DomainResult<Stored<D>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "INSERT INTO {} (created_at, updated_at, is_deleted, {}) VALUES (",
            D::TABLE,
            D::columns().join(", ")
        ));
        builder.push_bind(now);
        builder.push(", ");
        builder.push_bind(now);
        builder.push(", FALSE");
        for value in data.values() {
            builder.push(", ");
            value.push_to(&mut builder);
        }
        builder.push(")");
        self.fetch_one_returning(builder, 0).await
    }

    async fn update(&self, record: Stored<D>) -> DomainResult<Stored<D>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("UPDATE {} SET updated_at = ", D::TABLE));
        builder.push_bind(record.lifecycle.updated_at);
        for (column, value) in D::columns().iter().zip(record.data.values()) {
            builder.push(format!(", {column} = "));
            value.push_to(&mut builder);
        }
        builder.push(" WHERE id = ");
        builder.push_bind(record.id);
        builder.push(" AND NOT is_deleted");
        self.fetch_one_returning(builder, record.id).await
    }

    async fn soft_delete(&self, id: i64, now: DateTime<Utc>) -> DomainResult<Stored<D>> {
        self.set_deleted(id, true, now).await
    }

    async fn restore(&self, id: i64, now: DateTime<Utc>) -> DomainResult<Stored<D>> {
        self.set_deleted(id, false, now).await
    }

    async fn purge(&self, id: i64) -> DomainResult<()> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE id = $1 AND is_deleted",
            D::TABLE
        ))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(missing_record::<D>(id));
        }
        Ok(())
    }
}

#[async_trait]
impl AlerteIndex for PgRecordRepository<AlerteData> {
    async fn exists(&self, type_alerte: AlerteType, reference_id: i64) -> DomainResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM alertes WHERE type_alerte = $1 AND reference_id = $2)",
        )
        .bind(type_alerte.as_str())
        .bind(reference_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }
}
