//! Voice state - where a user is connected for voice within a guild

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Latest-value record keyed by (guild_id, user_id): a user occupies at most
/// one voice channel per guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceState {
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
    pub session_id: String,
    pub self_mute: bool,
    pub self_deaf: bool,
    /// Set when the user first connects; moving channels keeps it
    pub joined_at: DateTime<Utc>,
}

impl VoiceState {
    pub fn new(
        guild_id: Snowflake,
        user_id: Snowflake,
        channel_id: Snowflake,
        session_id: String,
    ) -> Self {
        Self {
            guild_id,
            user_id,
            channel_id,
            session_id,
            self_mute: false,
            self_deaf: false,
            joined_at: Utc::now(),
        }
    }
}
