//! The deliverable side of a user account.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::channels::ChannelKind;
use crate::types::DbId;

/// Everything a channel needs to reach a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub user_id: DbId,
    pub public_id: Uuid,
    pub username: String,
    pub email: String,
    pub enabled: bool,
    /// Set once the user has linked a Telegram chat with the bot.
    pub telegram_chat_id: Option<i64>,
}

impl Recipient {
    /// Channels this recipient can be reached on, in delivery order.
    ///
    /// Email is always configured; Telegram only after a chat was linked.
    pub fn channels(&self) -> Vec<ChannelKind> {
        let mut channels = vec![ChannelKind::Email];
        if self.telegram_chat_id.is_some() {
            channels.push(ChannelKind::Telegram);
        }
        channels
    }
}
