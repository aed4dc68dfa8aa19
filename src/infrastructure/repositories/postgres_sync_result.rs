// src/infrastructure/repositories/postgres_sync_result.rs
use super::map_sqlx;
use crate::domain::errors::DomainResult;
use crate::domain::mahakim::{SyncResult, SyncResultRepository};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};

const COLUMNS: &str = "id, affaire_id, numero_dossier, success, statut, prochaine_audience, juge, raw_html, error_message, created_at";

#[derive(Clone)]
pub struct PostgresSyncResultRepository {
    pool: PgPool,
}

impl PostgresSyncResultRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SyncResultRow {
    id: i64,
    affaire_id: i64,
    numero_dossier: String,
    success: bool,
    statut: Option<String>,
    prochaine_audience: Option<NaiveDate>,
    juge: Option<String>,
    raw_html: Option<String>,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<SyncResultRow> for SyncResult {
    fn from(row: SyncResultRow) -> Self {
        SyncResult {
            id: Some(row.id),
            affaire_id: row.affaire_id,
            numero_dossier: row.numero_dossier,
            success: row.success,
            statut: row.statut,
            prochaine_audience: row.prochaine_audience,
            juge: row.juge,
            raw_html: row.raw_html,
            error_message: row.error_message,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl SyncResultRepository for PostgresSyncResultRepository {
    async fn insert(&self, result: SyncResult) -> DomainResult<SyncResult> {
        let row = sqlx::query_as::<_, SyncResultRow>(&format!(
            "INSERT INTO mahakim_sync_results
                (affaire_id, numero_dossier, success, statut, prochaine_audience, juge,
                 raw_html, error_message, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        ))
        .bind(result.affaire_id)
        .bind(result.numero_dossier)
        .bind(result.success)
        .bind(result.statut)
        .bind(result.prochaine_audience)
        .bind(result.juge)
        .bind(result.raw_html)
        .bind(result.error_message)
        .bind(result.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(row.into())
    }

    async fn list_for_affaire(&self, affaire_id: i64, limit: u32) -> DomainResult<Vec<SyncResult>> {
        let rows = sqlx::query_as::<_, SyncResultRow>(&format!(
            "SELECT {COLUMNS} FROM mahakim_sync_results
             WHERE affaire_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2"
        ))
        .bind(affaire_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
