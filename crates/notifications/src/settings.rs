//! Reading and updating a user's notification preferences.

use std::sync::Arc;

use metal_detector_core::error::CoreError;
use metal_detector_core::notification_config::{NotificationConfig, UpdateNotificationConfig};
use metal_detector_core::traits::NotificationConfigStore;
use metal_detector_core::types::DbId;

pub struct NotificationSettings {
    store: Arc<dyn NotificationConfigStore>,
}

impl NotificationSettings {
    pub fn new(store: Arc<dyn NotificationConfigStore>) -> Self {
        Self { store }
    }

    /// The stored config of `user_id`.
    pub async fn get(&self, user_id: DbId) -> Result<NotificationConfig, CoreError> {
        self.store
            .find_by_user_id(user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "NotificationConfig",
                id: user_id,
            })
    }

    /// Apply `update` to the stored config of `user_id` and persist it.
    ///
    /// The last notification date is left as stored.
    pub async fn update(
        &self,
        user_id: DbId,
        update: &UpdateNotificationConfig,
    ) -> Result<NotificationConfig, CoreError> {
        let mut config = self.get(user_id).await?;
        config.apply(update)?;

        let saved = self.store.save(&config).await?;
        tracing::info!(
            user_id,
            notify = saved.notify,
            weeks = saved.frequency.weeks(),
            "Notification config updated"
        );
        Ok(saved)
    }
}
