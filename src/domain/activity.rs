use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    AdminAction,
    PageView,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: String,
    pub action: ActivityAction,
    pub description: String,
    pub details: Value,
    pub created_at: DateTime<Utc>,
}

impl ActivityLog {
    pub fn new(action: ActivityAction, description: impl Into<String>, details: Value) -> Self {
        Self {
            id: super::new_id(),
            action,
            description: description.into(),
            details,
            created_at: Utc::now(),
        }
    }
}
