// src/application/context.rs
use crate::domain::user::UserId;

/// Who is acting and through which request. Passed explicitly into every
/// audited mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub actor_id: Option<UserId>,
    pub actor_name: Option<String>,
    pub path: Option<String>,
    pub method: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestContext {
    /// Context for batch commands and background jobs.
    pub fn system(job: &str) -> Self {
        Self {
            actor_name: Some(format!("system:{job}")),
            ..Self::default()
        }
    }

    pub fn with_actor(mut self, id: UserId, name: impl Into<String>) -> Self {
        self.actor_id = Some(id);
        self.actor_name = Some(name.into());
        self
    }
}
