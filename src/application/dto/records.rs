use crate::{
    application::commands::records::Mutation,
    domain::{
        audit::FieldDiff,
        record::{RecordData, Stored},
    },
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::serde_time;

/// Wire form of a stored record: lifecycle columns next to the flattened
/// payload.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "D: Serialize")]
pub struct RecordDto<D> {
    pub id: i64,
    #[serde(flatten)]
    pub data: D,
    pub is_deleted: bool,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "serde_time")]
    pub updated_at: DateTime<Utc>,
}

impl<D: RecordData> From<Stored<D>> for RecordDto<D> {
    fn from(record: Stored<D>) -> Self {
        Self {
            id: record.id,
            is_deleted: record.lifecycle.is_deleted,
            created_at: record.lifecycle.created_at,
            updated_at: record.lifecycle.updated_at,
            data: record.data,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(bound = "D: Serialize")]
pub struct MutationDto<D> {
    pub record: RecordDto<D>,
    pub action: String,
    pub changes: FieldDiff,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_id: Option<i64>,
}

impl<D: RecordData> From<Mutation<D>> for MutationDto<D> {
    fn from(m: Mutation<D>) -> Self {
        Self {
            record: m.record.into(),
            action: m.action.as_str().to_string(),
            changes: m.changes,
            audit_id: m.audit_id,
        }
    }
}
