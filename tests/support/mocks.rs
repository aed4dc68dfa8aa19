// tests/support/mocks.rs
//! In-memory adapters for every port the services depend on.
use async_trait::async_trait;
use cabinet_core::application::{
    ApplicationResult,
    error::ApplicationError,
    ports::{
        browser::{BrowserError, BrowserLauncher, BrowserOptions, BrowserSession},
        security::{PasswordHasher, TokenGenerator},
        time::Clock,
    },
};
use cabinet_core::domain::{
    audit::{AuditLog, AuditLogCursor, AuditLogFilter, AuditLogRepository},
    cases::{AlerteData, AlerteIndex, AlerteType},
    errors::{DomainError, DomainResult},
    mahakim::{SyncResult, SyncResultRepository},
    record::{Lifecycle, RecordData, RecordRepository, Scope, Stored, missing_record},
    session::{AuthToken, AuthTokenRepository, IdlePolicy, NewAuthToken, TokenCheck, TokenDecision},
    user::{NewUser, User, UserId, UserRepository, Username},
};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use once_cell::sync::Lazy;
use std::{
    collections::BTreeMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    },
    time::Duration,
};

pub static FIXED_NOW: Lazy<DateTime<Utc>> =
    Lazy::new(|| Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap());

/// Starts at `FIXED_NOW`; only moves when a test advances it.
pub struct TestClock {
    now: Mutex<DateTime<Utc>>,
}

impl TestClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(*FIXED_NOW),
        }
    }

    pub fn advance(&self, by: TimeDelta) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Stores `plain:<password>`; fast enough for router tests.
pub struct PlainPasswordHasher;

#[async_trait]
impl PasswordHasher for PlainPasswordHasher {
    async fn hash(&self, password: &str) -> ApplicationResult<String> {
        Ok(format!("plain:{password}"))
    }

    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<()> {
        if expected_hash == format!("plain:{password}") {
            Ok(())
        } else {
            Err(ApplicationError::unauthorized("invalid credentials"))
        }
    }
}

/// `token-1`, `token-2`, ...
#[derive(Default)]
pub struct SequentialTokens {
    next: AtomicU64,
}

impl TokenGenerator for SequentialTokens {
    fn generate(&self) -> String {
        format!("token-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn digest(&self, token: &str) -> String {
        format!("digest:{token}")
    }
}

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

impl InMemoryUsers {
    pub fn set_active(&self, id: UserId, active: bool) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.is_active = active;
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn count(&self) -> DomainResult<u64> {
        Ok(self.users.lock().unwrap().len() as u64)
    }

    async fn insert(&self, new_user: NewUser) -> DomainResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == new_user.username) {
            return Err(DomainError::Conflict("username already exists".into()));
        }
        let user = User {
            id: UserId(users.len() as i64 + 1),
            username: new_user.username,
            password_hash: new_user.password_hash,
            full_name: new_user.full_name,
            is_active: new_user.is_active,
            created_at: new_user.created_at,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &Username) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| &u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }
}

/// Mirrors the Postgres token store, and counts `last_seen` writes.
#[derive(Default)]
pub struct InMemoryTokens {
    tokens: Mutex<Vec<AuthToken>>,
    touch_writes: AtomicUsize,
}

impl InMemoryTokens {
    pub fn touch_writes(&self) -> usize {
        self.touch_writes.load(Ordering::SeqCst)
    }

    pub fn get(&self, token_hash: &str) -> Option<AuthToken> {
        self.tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.token_hash == token_hash)
            .cloned()
    }

    pub fn set_last_seen(&self, token_hash: &str, last_seen: DateTime<Utc>) {
        let mut tokens = self.tokens.lock().unwrap();
        if let Some(token) = tokens.iter_mut().find(|t| t.token_hash == token_hash) {
            token.last_seen = last_seen;
        }
    }
}

#[async_trait]
impl AuthTokenRepository for InMemoryTokens {
    async fn insert(&self, token: NewAuthToken) -> DomainResult<AuthToken> {
        let mut tokens = self.tokens.lock().unwrap();
        let stored = AuthToken {
            id: tokens.len() as i64 + 1,
            user_id: token.user_id,
            token_hash: token.token_hash,
            created_at: token.created_at,
            last_seen: token.created_at,
            is_active: true,
        };
        tokens.push(stored.clone());
        Ok(stored)
    }

    async fn check_and_touch(
        &self,
        token_hash: &str,
        policy: &IdlePolicy,
        now: DateTime<Utc>,
    ) -> DomainResult<TokenCheck> {
        let mut tokens = self.tokens.lock().unwrap();
        let Some(token) = tokens.iter_mut().find(|t| t.token_hash == token_hash) else {
            return Ok(TokenCheck::Missing);
        };
        match policy.evaluate(token, now) {
            TokenDecision::Expired(reason) => {
                token.revoke();
                Ok(TokenCheck::Expired {
                    user_id: token.user_id,
                    reason,
                })
            }
            TokenDecision::Touch => {
                token.touch(now);
                self.touch_writes.fetch_add(1, Ordering::SeqCst);
                Ok(TokenCheck::Valid {
                    token: token.clone(),
                    touched: true,
                })
            }
            TokenDecision::Fresh => Ok(TokenCheck::Valid {
                token: token.clone(),
                touched: false,
            }),
        }
    }

    async fn revoke(&self, token_hash: &str) -> DomainResult<bool> {
        let mut tokens = self.tokens.lock().unwrap();
        match tokens
            .iter_mut()
            .find(|t| t.token_hash == token_hash && t.is_active)
        {
            Some(token) => {
                token.revoke();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_all_for_user(&self, user_id: UserId) -> DomainResult<u64> {
        let mut tokens = self.tokens.lock().unwrap();
        let mut revoked = 0;
        for token in tokens.iter_mut().filter(|t| t.user_id == user_id && t.is_active) {
            token.revoke();
            revoked += 1;
        }
        Ok(revoked)
    }
}

#[derive(Default)]
pub struct InMemoryAuditLogs {
    rows: Mutex<Vec<AuditLog>>,
    unavailable: AtomicBool,
}

impl InMemoryAuditLogs {
    pub fn rows(&self) -> Vec<AuditLog> {
        self.rows.lock().unwrap().clone()
    }

    /// Every later insert fails with a persistence error.
    pub fn go_down(&self) {
        self.unavailable.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditLogs {
    async fn insert(&self, mut log: AuditLog) -> DomainResult<i64> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::Persistence("audit table unavailable".into()));
        }
        let mut rows = self.rows.lock().unwrap();
        let id = rows.len() as i64 + 1;
        log.id = Some(id);
        rows.push(log);
        Ok(id)
    }

    async fn list(
        &self,
        filter: &AuditLogFilter,
        limit: u32,
        cursor: Option<AuditLogCursor>,
    ) -> DomainResult<(Vec<AuditLog>, Option<String>)> {
        let mut rows: Vec<AuditLog> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|log| filter.matches(log))
            .filter(|log| {
                cursor
                    .as_ref()
                    .is_none_or(|c| c.precedes(log.created_at, log.id.unwrap_or_default()))
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        let limit = limit as usize;
        let next = if rows.len() > limit {
            rows.truncate(limit);
            rows.last()
                .map(|last| AuditLogCursor::new(last.created_at, last.id.unwrap_or_default()).encode())
        } else {
            None
        };
        Ok((rows, next))
    }
}

#[derive(Default)]
pub struct InMemorySyncResults {
    rows: Mutex<Vec<SyncResult>>,
    failures: AtomicUsize,
}

impl InMemorySyncResults {
    pub fn rows(&self) -> Vec<SyncResult> {
        self.rows.lock().unwrap().clone()
    }

    /// The next `count` inserts fail with a persistence error.
    pub fn fail_next_inserts(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }
}

#[async_trait]
impl SyncResultRepository for InMemorySyncResults {
    async fn insert(&self, mut result: SyncResult) -> DomainResult<SyncResult> {
        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(DomainError::Persistence("sync_results insert failed".into()));
        }
        let mut rows = self.rows.lock().unwrap();
        result.id = Some(rows.len() as i64 + 1);
        rows.push(result.clone());
        Ok(result)
    }

    async fn list_for_affaire(&self, affaire_id: i64, limit: u32) -> DomainResult<Vec<SyncResult>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|r| r.affaire_id == affaire_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

/// One table of soft-deletable records.
pub struct InMemoryRecords<D: RecordData> {
    rows: Mutex<BTreeMap<i64, Stored<D>>>,
    writes: AtomicUsize,
}

impl<D: RecordData> Default for InMemoryRecords<D> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            writes: AtomicUsize::new(0),
        }
    }
}

impl<D: RecordData> InMemoryRecords<D> {
    /// Inserts, updates, soft deletes, restores and purges.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn write<T>(&self, f: impl FnOnce(&mut BTreeMap<i64, Stored<D>>) -> DomainResult<T>) -> DomainResult<T> {
        let mut rows = self.rows.lock().unwrap();
        let out = f(&mut rows)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(out)
    }
}

#[async_trait]
impl<D: RecordData> RecordRepository<D> for InMemoryRecords<D> {
    async fn find(&self, id: i64, scope: Scope) -> DomainResult<Option<Stored<D>>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&id)
            .filter(|r| scope.admits(&r.lifecycle))
            .cloned())
    }

    async fn list(&self, scope: Scope) -> DomainResult<Vec<Stored<D>>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| scope.admits(&r.lifecycle))
            .cloned()
            .collect())
    }

    async fn insert(&self, data: D, now: DateTime<Utc>) -> DomainResult<Stored<D>> {
        self.write(|rows| {
            let id = rows.keys().next_back().copied().unwrap_or(0) + 1;
            let record = Stored::new(id, Lifecycle::new(now), data);
            rows.insert(id, record.clone());
            Ok(record)
        })
    }

    async fn update(&self, record: Stored<D>) -> DomainResult<Stored<D>> {
        self.write(|rows| match rows.get_mut(&record.id) {
            Some(existing) if !existing.is_deleted() => {
                *existing = record.clone();
                Ok(record)
            }
            _ => Err(missing_record::<D>(record.id)),
        })
    }

    async fn soft_delete(&self, id: i64, now: DateTime<Utc>) -> DomainResult<Stored<D>> {
        self.write(|rows| match rows.get_mut(&id) {
            Some(existing) if !existing.is_deleted() => {
                existing.lifecycle.mark_deleted(now);
                Ok(existing.clone())
            }
            _ => Err(missing_record::<D>(id)),
        })
    }

    async fn restore(&self, id: i64, now: DateTime<Utc>) -> DomainResult<Stored<D>> {
        self.write(|rows| match rows.get_mut(&id) {
            Some(existing) if existing.is_deleted() => {
                existing.lifecycle.mark_restored(now);
                Ok(existing.clone())
            }
            _ => Err(missing_record::<D>(id)),
        })
    }

    async fn purge(&self, id: i64) -> DomainResult<()> {
        self.write(|rows| {
            rows.remove(&id)
                .map(|_| ())
                .ok_or_else(|| missing_record::<D>(id))
        })
    }
}

#[async_trait]
impl AlerteIndex for InMemoryRecords<AlerteData> {
    async fn exists(&self, type_alerte: AlerteType, reference_id: i64) -> DomainResult<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .any(|a| a.data.type_alerte == type_alerte && a.data.reference_id == reference_id))
    }
}

/// What the fake portal does when the result fragment is awaited.
#[derive(Debug, Clone)]
pub enum PortalScript {
    Answer(String),
    Timeout,
    DriverDown,
}

/// Scripted browser. Every session shares the recorded interactions.
pub struct FakeBrowser {
    script: Mutex<PortalScript>,
    launches: AtomicUsize,
    filled: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeBrowser {
    pub fn new(script: PortalScript) -> Self {
        Self {
            script: Mutex::new(script),
            launches: AtomicUsize::new(0),
            filled: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_script(&self, script: PortalScript) {
        *self.script.lock().unwrap() = script;
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    /// `(selector, value)` pairs typed into the search form.
    pub fn filled(&self) -> Vec<(String, String)> {
        self.filled.lock().unwrap().clone()
    }
}

impl Default for FakeBrowser {
    fn default() -> Self {
        Self::new(PortalScript::Timeout)
    }
}

#[async_trait]
impl BrowserLauncher for FakeBrowser {
    async fn launch(&self, options: BrowserOptions) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let script = self.script.lock().unwrap().clone();
        if matches!(script, PortalScript::DriverDown) {
            return Err(BrowserError::Driver("connection refused".into()));
        }
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            script,
            timeout: options.timeout,
            filled: Arc::clone(&self.filled),
        }))
    }
}

struct FakeSession {
    script: PortalScript,
    timeout: Duration,
    filled: Arc<Mutex<Vec<(String, String)>>>,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn goto(&mut self, _url: &str) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn fill(&mut self, selector: &str, value: &str) -> Result<(), BrowserError> {
        self.filled
            .lock()
            .unwrap()
            .push((selector.to_string(), value.to_string()));
        Ok(())
    }

    async fn click(&mut self, _selector: &str) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn wait_for_html(&mut self, selector: &str, _timeout: Duration) -> Result<String, BrowserError> {
        match &self.script {
            PortalScript::Answer(html) => Ok(html.clone()),
            _ => Err(BrowserError::Timeout(format!(
                "{selector} not present after {}s",
                self.timeout.as_secs()
            ))),
        }
    }

    async fn close(self: Box<Self>) -> Result<(), BrowserError> {
        Ok(())
    }
}
