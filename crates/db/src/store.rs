//! PostgreSQL-backed implementations of the engine's collaborator traits.

use async_trait::async_trait;
use metal_detector_core::error::CoreError;
use metal_detector_core::notification_config::NotificationConfig;
use metal_detector_core::recipient::Recipient;
use metal_detector_core::traits::{FollowGraph, NotificationConfigStore, RecipientDirectory};
use metal_detector_core::types::{Date, DbId};

use crate::repositories::{ArtistRepo, NotificationConfigRepo, UserRepo};
use crate::DbPool;

/// Service name reported in [`CoreError::ExternalService`].
const SERVICE: &str = "database";

/// Store backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn db_error(err: sqlx::Error) -> CoreError {
    CoreError::external(SERVICE, err)
}

#[async_trait]
impl NotificationConfigStore for PgStore {
    async fn find_all_enabled_configs(&self) -> Result<Vec<NotificationConfig>, CoreError> {
        let rows = NotificationConfigRepo::list_for_enabled_users(&self.pool)
            .await
            .map_err(db_error)?;
        rows.into_iter().map(NotificationConfig::try_from).collect()
    }

    async fn find_by_user_id(
        &self,
        user_id: DbId,
    ) -> Result<Option<NotificationConfig>, CoreError> {
        NotificationConfigRepo::find_by_user_id(&self.pool, user_id)
            .await
            .map_err(db_error)?
            .map(NotificationConfig::try_from)
            .transpose()
    }

    async fn save(&self, config: &NotificationConfig) -> Result<NotificationConfig, CoreError> {
        match NotificationConfigRepo::update(&self.pool, config)
            .await
            .map_err(db_error)?
        {
            Some(row) => NotificationConfig::try_from(row),
            None => {
                tracing::debug!(
                    config_id = config.id,
                    version = config.version,
                    "Stale notification config write rejected"
                );
                Err(CoreError::Conflict(format!(
                    "Notification config {} was modified concurrently or no longer exists",
                    config.id
                )))
            }
        }
    }

    async fn mark_notified(
        &self,
        config_id: DbId,
        date: Date,
    ) -> Result<NotificationConfig, CoreError> {
        NotificationConfigRepo::mark_notified(&self.pool, config_id, date)
            .await
            .map_err(db_error)?
            .ok_or(CoreError::NotFound {
                entity: "NotificationConfig",
                id: config_id,
            })
            .and_then(NotificationConfig::try_from)
    }
}

#[async_trait]
impl FollowGraph for PgStore {
    async fn followed_artist_names(&self, user_id: DbId) -> Result<Vec<String>, CoreError> {
        ArtistRepo::followed_artist_names(&self.pool, user_id)
            .await
            .map_err(db_error)
    }
}

#[async_trait]
impl RecipientDirectory for PgStore {
    async fn find_recipient(&self, user_id: DbId) -> Result<Option<Recipient>, CoreError> {
        Ok(UserRepo::find_recipient(&self.pool, user_id)
            .await
            .map_err(db_error)?
            .map(Recipient::from))
    }
}
