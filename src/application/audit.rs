// src/application/audit.rs
use std::sync::Arc;

use crate::{
    application::{context::RequestContext, ports::time::Clock},
    domain::audit::{
        AuditAction, AuditLog, AuditLogRepository, FieldDiff, Redactor,
        entity::AUDIT_LOG_MODEL,
    },
};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct AuditSettings {
    pub enabled: bool,
    pub redactor: Redactor,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            redactor: Redactor::default(),
        }
    }
}

impl AuditSettings {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub action: AuditAction,
    pub app_label: &'static str,
    pub model: &'static str,
    pub object_pk: String,
    pub changes: FieldDiff,
}

/// Best-effort writer for the audit trail. A failed write is logged and
/// dropped so it never blocks the business operation it describes.
pub struct AuditRecorder {
    repo: Arc<dyn AuditLogRepository>,
    settings: AuditSettings,
    clock: Arc<dyn Clock>,
}

impl AuditRecorder {
    pub fn new(
        repo: Arc<dyn AuditLogRepository>,
        settings: AuditSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            settings,
            clock,
        }
    }

    pub fn redactor(&self) -> &Redactor {
        &self.settings.redactor
    }

    /// Returns the id of the written row, or `None` when nothing was written.
    pub async fn record(&self, ctx: &RequestContext, event: AuditEvent) -> Option<i64> {
        if !self.settings.enabled {
            return None;
        }
        if event.model.eq_ignore_ascii_case(AUDIT_LOG_MODEL) {
            debug!("refusing to audit the audit log");
            return None;
        }
        if event.action == AuditAction::Update && event.changes.is_empty() {
            return None;
        }

        let log = AuditLog {
            id: None,
            actor_id: ctx.actor_id,
            actor_name: ctx.actor_name.clone(),
            action: event.action,
            app_label: event.app_label.to_string(),
            model: event.model.to_string(),
            object_pk: event.object_pk,
            changes: event.changes,
            path: ctx.path.clone(),
            method: ctx.method.clone(),
            ip_address: ctx.ip_address.clone(),
            user_agent: ctx.user_agent.clone(),
            created_at: self.clock.now(),
        };
        let model = log.model.clone();
        let action = log.action;

        match self.repo.insert(log).await {
            Ok(id) => {
                debug!(audit_id = id, %model, %action, "audit row written");
                Some(id)
            }
            Err(err) => {
                warn!(error = %err, %model, %action, "failed to insert audit log");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        audit::{AuditLogCursor, AuditLogFilter},
        errors::{DomainError, DomainResult},
    };
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorded {
        rows: Mutex<Vec<AuditLog>>,
        broken: bool,
    }

    #[async_trait]
    impl AuditLogRepository for Recorded {
        async fn insert(&self, log: AuditLog) -> DomainResult<i64> {
            if self.broken {
                return Err(DomainError::Persistence("connection reset".into()));
            }
            let mut rows = self.rows.lock().unwrap();
            rows.push(log);
            Ok(rows.len() as i64)
        }

        async fn list(
            &self,
            _filter: &AuditLogFilter,
            _limit: u32,
            _cursor: Option<AuditLogCursor>,
        ) -> DomainResult<(Vec<AuditLog>, Option<String>)> {
            Ok((self.rows.lock().unwrap().clone(), None))
        }
    }

    struct Fixed;

    impl Clock for Fixed {
        fn now(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
        }
    }

    fn recorder(repo: Arc<Recorded>) -> AuditRecorder {
        AuditRecorder::new(repo, AuditSettings::default(), Arc::new(Fixed))
    }

    fn event(model: &'static str, action: AuditAction) -> AuditEvent {
        AuditEvent {
            action,
            app_label: "cabinet",
            model,
            object_pk: "7".into(),
            changes: FieldDiff::single("reference", json!(null), json!("CAB-7")),
        }
    }

    #[tokio::test]
    async fn audit_log_rows_are_never_audited() {
        let repo = Arc::new(Recorded::default());
        let audit = recorder(repo.clone());
        let ctx = RequestContext::system("test");

        assert_eq!(audit.record(&ctx, event(AUDIT_LOG_MODEL, AuditAction::Create)).await, None);
        assert_eq!(audit.record(&ctx, event("AuditLog", AuditAction::Delete)).await, None);
        assert!(repo.rows.lock().unwrap().is_empty());

        assert_eq!(audit.record(&ctx, event("affaire", AuditAction::Create)).await, Some(1));
        assert_eq!(repo.rows.lock().unwrap()[0].model, "affaire");
    }

    #[tokio::test]
    async fn failed_write_yields_no_id() {
        let repo = Arc::new(Recorded {
            broken: true,
            ..Recorded::default()
        });
        let audit = recorder(repo);
        let id = audit
            .record(&RequestContext::system("test"), event("affaire", AuditAction::Update))
            .await;
        assert_eq!(id, None);
    }
}
