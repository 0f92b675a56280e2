//! Artist and follow models.

use metal_detector_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `artists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Artist {
    pub id: DbId,
    pub external_id: String,
    pub artist_name: String,
    pub source: String,
    pub created_at: Timestamp,
}

/// DTO for inserting an artist.
#[derive(Debug, Deserialize)]
pub struct CreateArtist {
    pub external_id: String,
    pub artist_name: String,
    pub source: String,
}
