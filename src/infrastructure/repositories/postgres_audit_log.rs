// src/infrastructure/repositories/postgres_audit_log.rs
use super::map_sqlx;
use crate::domain::audit::{
    AuditAction, AuditLog, AuditLogCursor, AuditLogFilter, AuditLogRepository, FieldDiff,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

#[derive(Clone)]
pub struct PostgresAuditLogRepository {
    pool: PgPool,
}

impl PostgresAuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuditLogRow {
    id: i64,
    actor_id: Option<i64>,
    actor_name: Option<String>,
    action: String,
    app_label: String,
    model: String,
    object_pk: String,
    changes: serde_json::Value,
    path: Option<String>,
    method: Option<String>,
    ip_address: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AuditLogRow> for AuditLog {
    type Error = DomainError;

    fn try_from(row: AuditLogRow) -> Result<Self, Self::Error> {
        Ok(AuditLog {
            id: Some(row.id),
            actor_id: row.actor_id.map(UserId::new).transpose()?,
            actor_name: row.actor_name,
            action: row.action.parse::<AuditAction>()?,
            app_label: row.app_label,
            model: row.model,
            object_pk: row.object_pk,
            changes: FieldDiff::from_json(row.changes)?,
            path: row.path,
            method: row.method,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl AuditLogRepository for PostgresAuditLogRepository {
    async fn insert(&self, log: AuditLog) -> DomainResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO audit_logs
                (actor_id, actor_name, action, app_label, model, object_pk, changes,
                 path, method, ip_address, user_agent, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(log.actor_id.map(i64::from))
        .bind(log.actor_name)
        .bind(log.action.as_str())
        .bind(log.app_label)
        .bind(log.model)
        .bind(log.object_pk)
        .bind(log.changes.to_json())
        .bind(log.path)
        .bind(log.method)
        .bind(log.ip_address)
        .bind(log.user_agent)
        .bind(log.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn list(
        &self,
        filter: &AuditLogFilter,
        limit: u32,
        cursor: Option<AuditLogCursor>,
    ) -> DomainResult<(Vec<AuditLog>, Option<String>)> {
        let limit = limit.clamp(1, 100);
        let fetch_limit = (limit as i64) + 1;

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, actor_id, actor_name, action, app_label, model, object_pk, changes,
                    path, method, ip_address, user_agent, created_at
             FROM audit_logs WHERE TRUE",
        );
        if let Some(model) = &filter.model {
            builder.push(" AND model = ");
            builder.push_bind(model.clone());
        }
        if let Some(object_pk) = &filter.object_pk {
            builder.push(" AND object_pk = ");
            builder.push_bind(object_pk.clone());
        }
        if let Some(actor_id) = filter.actor_id {
            builder.push(" AND actor_id = ");
            builder.push_bind(actor_id);
        }
        if let Some(cursor) = &cursor {
            builder.push(" AND (created_at, id) < (");
            builder.push_bind(cursor.created_at);
            builder.push(", ");
            builder.push_bind(cursor.id);
            builder.push(")");
        }
        builder.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        builder.push_bind(fetch_limit);

        let rows = builder
            .build_query_as::<AuditLogRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let mut logs = rows
            .into_iter()
            .map(AuditLog::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let mut next_cursor = None;
        if logs.len() > limit as usize {
            logs.pop();
            if let Some(last) = logs.last() {
                next_cursor = last
                    .id
                    .map(|id| AuditLogCursor::new(last.created_at, id).encode());
            }
        }

        Ok((logs, next_cursor))
    }
}
