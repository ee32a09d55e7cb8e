use super::activity::ActivityRecorder;
use crate::domain::ports::SharedSettingsStore;
use crate::domain::settings::{PublicSettings, Settings, SettingsUpdate};
use crate::error::{AppError, Result};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::info;

#[derive(Clone)]
pub struct SettingsService {
    store: SharedSettingsStore,
    activity: ActivityRecorder,
}

impl SettingsService {
    pub fn new(store: SharedSettingsStore, activity: ActivityRecorder) -> Self {
        Self { store, activity }
    }

    /// Full document, secrets included. Admin only.
    pub async fn settings(&self) -> Result<Settings> {
        self.store.get_settings().await
    }

    pub async fn public_settings(&self) -> Result<PublicSettings> {
        Ok(self.store.get_settings().await?.public_view())
    }

    /// Merges `update` into the stored document. Absent fields are left alone.
    pub async fn update(&self, update: SettingsUpdate, actor: Option<&str>) -> Result<Settings> {
        if update.delivery_fee.is_some_and(|fee| fee < Decimal::ZERO) {
            return Err(AppError::ValidationError(
                "Delivery fee cannot be negative.".to_string(),
            ));
        }

        let mut settings = self.store.get_settings().await?;
        let changed = update.apply(&mut settings);
        if changed.is_empty() {
            return Ok(settings);
        }
        self.store.save_settings(settings.clone()).await?;

        // Field names only; values may be credentials.
        info!(fields = ?changed, "Settings updated");
        self.activity
            .admin_action(actor, "Updated settings", json!({ "fields": changed }))
            .await;
        Ok(settings)
    }
}
