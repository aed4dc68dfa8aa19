// src/infrastructure/repositories/postgres_user.rs
use super::map_sqlx;
use crate::domain::errors::DomainResult;
use crate::domain::user::{NewUser, PasswordHash, User, UserId, UserRepository, Username};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres};

const ACCOUNT_BY_ID: &str = "SELECT id, username, password_hash, full_name, is_active, created_at
     FROM users WHERE id = $1";
const ACCOUNT_BY_USERNAME: &str = "SELECT id, username, password_hash, full_name, is_active, created_at
     FROM users WHERE username = $1";
const INSERT_ACCOUNT: &str = "INSERT INTO users (username, password_hash, full_name, is_active, created_at)
     VALUES ($1, $2, $3, $4, $5)
     RETURNING id, username, password_hash, full_name, is_active, created_at";

/// Staff accounts. Disabled accounts are still returned so the session
/// check can tell them apart from deleted ones.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn account_where<'q, T>(&self, sql: &'q str, key: T) -> DomainResult<Option<User>>
    where
        T: 'q + Send + sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres>,
    {
        sqlx::query_as::<_, AccountRow>(sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .map(AccountRow::into_user)
            .transpose()
    }
}

#[derive(Debug, FromRow)]
struct AccountRow {
    id: i64,
    username: String,
    password_hash: String,
    full_name: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_user(self) -> DomainResult<User> {
        Ok(User {
            id: UserId::new(self.id)?,
            username: Username::new(self.username)?,
            password_hash: PasswordHash::new(self.password_hash)?,
            full_name: self.full_name.filter(|name| !name.trim().is_empty()),
            is_active: self.is_active,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn count(&self) -> DomainResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(total.max(0) as u64)
    }

    async fn insert(&self, account: NewUser) -> DomainResult<User> {
        sqlx::query_as::<_, AccountRow>(INSERT_ACCOUNT)
            .bind(account.username.as_str())
            .bind(account.password_hash.as_str())
            .bind(account.full_name.as_deref())
            .bind(account.is_active)
            .bind(account.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?
            .into_user()
    }

    async fn find_by_username(&self, username: &Username) -> DomainResult<Option<User>> {
        self.account_where(ACCOUNT_BY_USERNAME, username.as_str()).await
    }

    async fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>> {
        self.account_where(ACCOUNT_BY_ID, i64::from(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;
    use crate::infrastructure::database::{init_pool, run_migrations};

    #[tokio::test]
    async fn duplicate_usernames_conflict_and_disabled_accounts_stay_visible() {
        if std::env::var("RUN_DB_INTEGRATION").unwrap_or_default() != "1" {
            eprintln!("skipping integration test: set RUN_DB_INTEGRATION=1 and DATABASE_URL to run");
            return;
        }
        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");
        let pool = init_pool(&database_url).await.expect("init pool");
        run_migrations(&pool).await.expect("run migrations");
        let repo = PostgresUserRepository::new(pool.clone());

        let username = format!("clerk-{}", uuid::Uuid::new_v4().simple());
        let account = || {
            NewUser::new(
                Username::new(username.clone()).unwrap(),
                PasswordHash::new("plain:unused").unwrap(),
                Some("   ".into()),
                Utc::now(),
            )
        };
        let created = repo.insert(account()).await.expect("insert");
        assert_eq!(created.full_name, None, "blank names are dropped");

        let duplicate = repo.insert(account()).await;
        assert!(matches!(duplicate, Err(DomainError::Conflict(_))));

        sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
            .bind(i64::from(created.id))
            .execute(&pool)
            .await
            .expect("disable");
        let found = repo
            .find_by_id(created.id)
            .await
            .expect("lookup")
            .expect("disabled account still returned");
        assert!(!found.is_active);

        let by_name = repo
            .find_by_username(&Username::new(username.to_uppercase()).unwrap())
            .await
            .expect("lookup");
        assert_eq!(by_name.map(|u| u.id), Some(created.id));

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(i64::from(created.id))
            .execute(&pool)
            .await
            .expect("cleanup");
    }
}
