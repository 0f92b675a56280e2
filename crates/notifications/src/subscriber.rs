//! Loading the per-user inputs shared by all notifiers.

use metal_detector_core::error::CoreError;
use metal_detector_core::filtering::FollowedArtists;
use metal_detector_core::recipient::Recipient;
use metal_detector_core::traits::{FollowGraph, RecipientDirectory};
use metal_detector_core::types::DbId;

/// A user that can be notified and follows at least one artist.
pub(crate) struct Subscriber {
    pub recipient: Recipient,
    pub followed: FollowedArtists,
}

/// Resolve the recipient and followed artists for `user_id`.
///
/// Returns `Ok(None)` when there is nothing to do for this user: the account
/// no longer exists, is disabled, or follows nobody. Lookup failures are
/// returned as errors for the caller to isolate.
pub(crate) async fn load(
    recipients: &dyn RecipientDirectory,
    follows: &dyn FollowGraph,
    user_id: DbId,
) -> Result<Option<Subscriber>, CoreError> {
    let Some(recipient) = recipients.find_recipient(user_id).await? else {
        tracing::warn!(user_id, "Notification config references a missing user, skipping");
        return Ok(None);
    };

    if !recipient.enabled {
        tracing::debug!(user_id, "User is disabled, skipping");
        return Ok(None);
    }

    let followed = FollowedArtists::from(follows.followed_artist_names(user_id).await?);
    if followed.is_empty() {
        tracing::debug!(user_id, "User follows no artists, skipping");
        return Ok(None);
    }

    Ok(Some(Subscriber {
        recipient,
        followed,
    }))
}
