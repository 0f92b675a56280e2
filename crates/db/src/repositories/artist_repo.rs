//! Repository for the `artists` and `follow_actions` tables.

use metal_detector_core::types::DbId;
use sqlx::PgPool;

use crate::models::artist::{Artist, CreateArtist};

/// Column list for `artists` queries.
const COLUMNS: &str = "id, external_id, artist_name, source, created_at";

/// Provides artist and follow operations.
pub struct ArtistRepo;

impl ArtistRepo {
    /// Insert an artist, or return the existing row for the same
    /// `(external_id, source)`.
    pub async fn upsert(pool: &PgPool, input: &CreateArtist) -> Result<Artist, sqlx::Error> {
        let query = format!(
            "INSERT INTO artists (external_id, artist_name, source) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (external_id, source) DO UPDATE SET \
                artist_name = EXCLUDED.artist_name \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Artist>(&query)
            .bind(&input.external_id)
            .bind(&input.artist_name)
            .bind(&input.source)
            .fetch_one(pool)
            .await
    }

    /// Record that `user_id` follows `artist_id`. Following twice is a no-op.
    pub async fn follow(pool: &PgPool, user_id: DbId, artist_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO follow_actions (user_id, artist_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, artist_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(artist_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Names of all artists followed by a user, alphabetically.
    pub async fn followed_artist_names(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT a.artist_name FROM follow_actions f \
             JOIN artists a ON a.id = f.artist_id \
             WHERE f.user_id = $1 \
             ORDER BY a.artist_name",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
