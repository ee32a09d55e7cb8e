use crate::domain::activity::{ActivityAction, ActivityLog};
use crate::domain::ports::SharedActivityStore;
use crate::error::Result;
use serde_json::{Value, json};
use tracing::warn;

/// Default number of entries the admin activity view shows.
pub const DEFAULT_RECENT_LIMIT: usize = 50;

/// Best-effort writer for the activity log.
///
/// A failed write is logged and swallowed; it never fails the operation being recorded.
#[derive(Clone)]
pub struct ActivityRecorder {
    store: SharedActivityStore,
}

impl ActivityRecorder {
    pub fn new(store: SharedActivityStore) -> Self {
        Self { store }
    }

    /// Records an admin mutation. `actor` is the admin's email when known.
    pub async fn admin_action(&self, actor: Option<&str>, description: impl Into<String>, details: Value) {
        let details = match (actor, details) {
            (Some(email), Value::Object(mut map)) => {
                map.insert("adminEmail".to_string(), json!(email));
                Value::Object(map)
            }
            (_, details) => details,
        };
        self.record(ActivityLog::new(ActivityAction::AdminAction, description, details))
            .await;
    }

    /// Records a storefront page view. Admin paths are not tracked.
    pub async fn page_view(&self, path: &str) {
        if is_admin_path(path) {
            return;
        }
        self.record(ActivityLog::new(
            ActivityAction::PageView,
            format!("Visited {path}"),
            json!({ "path": path }),
        ))
        .await;
    }

    /// The most recent `limit` entries, newest first.
    pub async fn recent(&self, limit: usize) -> Result<Vec<ActivityLog>> {
        self.store.recent_activity(limit).await
    }

    async fn record(&self, log: ActivityLog) {
        if let Err(e) = self.store.record_activity(log).await {
            warn!(error = %e, "Failed to record activity");
        }
    }
}

fn is_admin_path(path: &str) -> bool {
    path == "/admin" || path.starts_with("/admin/")
}
