//! Voice state database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for voice_states table
#[derive(Debug, Clone, FromRow)]
pub struct VoiceStateModel {
    pub guild_id: i64,
    pub user_id: i64,
    pub channel_id: i64,
    pub session_id: String,
    pub self_mute: bool,
    pub self_deaf: bool,
    pub joined_at: DateTime<Utc>,
}
