// src/domain/audit/diff.rs
use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashSet};

pub type FieldMap = BTreeMap<String, Value>;

pub const REDACTED: &str = "***";

pub const DEFAULT_SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "password_hash",
    "token",
    "token_hash",
    "secret",
    "api_key",
];

/// Serialize a payload into its audited field map.
pub fn snapshot<T: Serialize>(value: &T) -> DomainResult<FieldMap> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map.into_iter().collect()),
        Ok(_) => Err(DomainError::Validation(
            "audited payload must serialize to an object".into(),
        )),
        Err(err) => Err(DomainError::Persistence(format!(
            "failed to snapshot payload: {err}"
        ))),
    }
}

#[derive(Debug, Clone)]
pub struct Redactor {
    fields: HashSet<String>,
}

impl Redactor {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|f| f.as_ref().trim().to_lowercase())
                .filter(|f| !f.is_empty())
                .collect(),
        }
    }

    pub fn is_sensitive(&self, field: &str) -> bool {
        self.fields.contains(&field.to_lowercase())
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(DEFAULT_SENSITIVE_FIELDS.iter().copied())
    }
}

/// Field-level change set, serialized as `{"field": [old, new]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldDiff(BTreeMap<String, (Value, Value)>);

impl FieldDiff {
    /// Compare two snapshots. A missing side (create or delete) reads as
    /// `null` for every field. Only fields whose serialized value differs
    /// end up in the diff.
    pub fn between(
        before: Option<&FieldMap>,
        after: Option<&FieldMap>,
        redactor: &Redactor,
    ) -> Self {
        let keys: BTreeSet<&String> = before
            .into_iter()
            .flat_map(BTreeMap::keys)
            .chain(after.into_iter().flat_map(BTreeMap::keys))
            .collect();

        let mut changes = BTreeMap::new();
        for key in keys {
            let old = before
                .and_then(|m| m.get(key))
                .cloned()
                .unwrap_or(Value::Null);
            let new = after
                .and_then(|m| m.get(key))
                .cloned()
                .unwrap_or(Value::Null);
            if old == new {
                continue;
            }
            let entry = if redactor.is_sensitive(key) {
                (Value::from(REDACTED), Value::from(REDACTED))
            } else {
                (old, new)
            };
            changes.insert(key.clone(), entry);
        }
        Self(changes)
    }

    pub fn single(field: impl Into<String>, old: Value, new: Value) -> Self {
        Self(BTreeMap::from([(field.into(), (old, new))]))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&(Value, Value)> {
        self.0.get(field)
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn from_json(value: Value) -> DomainResult<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value)
            .map_err(|err| DomainError::Persistence(format!("malformed audit changes: {err}")))
    }
}
