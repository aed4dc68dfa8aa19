// src/infrastructure/repositories/postgres_auth_token.rs
use super::{error::is_feature_not_supported, map_sqlx};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::session::{
    AuthToken, AuthTokenRepository, IdlePolicy, NewAuthToken, TokenCheck, TokenDecision,
};
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};

const TOKEN_COLUMNS: &str = "id, user_id, token_hash, created_at, last_seen, is_active";

#[derive(Clone)]
pub struct PostgresAuthTokenRepository {
    pool: PgPool,
}

impl PostgresAuthTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuthTokenRow {
    id: i64,
    user_id: i64,
    token_hash: String,
    created_at: DateTime<Utc>,
    last_seen: DateTime<Utc>,
    is_active: bool,
}

impl TryFrom<AuthTokenRow> for AuthToken {
    type Error = DomainError;

    fn try_from(row: AuthTokenRow) -> Result<Self, Self::Error> {
        Ok(AuthToken {
            id: row.id,
            user_id: UserId::new(row.user_id)?,
            token_hash: row.token_hash,
            created_at: row.created_at,
            last_seen: row.last_seen,
            is_active: row.is_active,
        })
    }
}

const SAVEPOINT: &str = "token_lock";

/// Read the token row, locking it when the backend supports row locks.
async fn fetch_for_update(
    conn: &mut PgConnection,
    token_hash: &str,
) -> Result<Option<AuthTokenRow>, sqlx::Error> {
    let locked_sql =
        format!("SELECT {TOKEN_COLUMNS} FROM auth_tokens WHERE token_hash = $1 FOR UPDATE");
    fetch_locked_or_plain(conn, token_hash, &locked_sql).await
}

/// Runs `locked_sql` under a savepoint. A rejected lock aborts only the
/// savepoint, so the plain read still runs in the caller's transaction.
async fn fetch_locked_or_plain(
    conn: &mut PgConnection,
    token_hash: &str,
    locked_sql: &str,
) -> Result<Option<AuthTokenRow>, sqlx::Error> {
    sqlx::query(&format!("SAVEPOINT {SAVEPOINT}"))
        .execute(&mut *conn)
        .await?;
    let locked = sqlx::query_as::<_, AuthTokenRow>(locked_sql)
        .bind(token_hash)
        .fetch_optional(&mut *conn)
        .await;

    match locked {
        Ok(row) => {
            sqlx::query(&format!("RELEASE SAVEPOINT {SAVEPOINT}"))
                .execute(&mut *conn)
                .await?;
            Ok(row)
        }
        Err(err) if is_feature_not_supported(&err) => {
            tracing::debug!("row locks unsupported; reading token without FOR UPDATE");
            sqlx::query(&format!("ROLLBACK TO SAVEPOINT {SAVEPOINT}"))
                .execute(&mut *conn)
                .await?;
            sqlx::query_as::<_, AuthTokenRow>(&format!(
                "SELECT {TOKEN_COLUMNS} FROM auth_tokens WHERE token_hash = $1"
            ))
            .bind(token_hash)
            .fetch_optional(&mut *conn)
            .await
        }
        Err(err) => Err(err),
    }
}

#[async_trait]
impl AuthTokenRepository for PostgresAuthTokenRepository {
    async fn insert(&self, token: NewAuthToken) -> DomainResult<AuthToken> {
        let row = sqlx::query_as::<_, AuthTokenRow>(&format!(
            "INSERT INTO auth_tokens (user_id, token_hash, created_at, last_seen, is_active)
             VALUES ($1, $2, $3, $3, TRUE)
             RETURNING {TOKEN_COLUMNS}"
        ))
        .bind(i64::from(token.user_id))
        .bind(&token.token_hash)
        .bind(token.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        AuthToken::try_from(row)
    }

    async fn check_and_touch(
        &self,
        token_hash: &str,
        policy: &IdlePolicy,
        now: DateTime<Utc>,
    ) -> DomainResult<TokenCheck> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let Some(row) = fetch_for_update(&mut tx, token_hash)
            .await
            .map_err(map_sqlx)?
        else {
            tx.rollback().await.map_err(map_sqlx)?;
            return Ok(TokenCheck::Missing);
        };
        let mut token = AuthToken::try_from(row)?;

        let check = match policy.evaluate(&token, now) {
            TokenDecision::Expired(reason) => {
                if token.is_active {
                    sqlx::query("UPDATE auth_tokens SET is_active = FALSE WHERE id = $1")
                        .bind(token.id)
                        .execute(&mut *tx)
                        .await
                        .map_err(map_sqlx)?;
                }
                TokenCheck::Expired {
                    user_id: token.user_id,
                    reason,
                }
            }
            TokenDecision::Touch => {
                sqlx::query("UPDATE auth_tokens SET last_seen = $1 WHERE id = $2")
                    .bind(now)
                    .bind(token.id)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_sqlx)?;
                token.touch(now);
                TokenCheck::Valid {
                    token,
                    touched: true,
                }
            }
            TokenDecision::Fresh => TokenCheck::Valid {
                token,
                touched: false,
            },
        };

        tx.commit().await.map_err(map_sqlx)?;
        Ok(check)
    }

    async fn revoke(&self, token_hash: &str) -> DomainResult<bool> {
        let result = sqlx::query(
            "UPDATE auth_tokens SET is_active = FALSE WHERE token_hash = $1 AND is_active",
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all_for_user(&self, user_id: UserId) -> DomainResult<u64> {
        let result = sqlx::query(
            "UPDATE auth_tokens SET is_active = FALSE WHERE user_id = $1 AND is_active",
        )
        .bind(i64::from(user_id))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(result.rows_affected())
    }
}
