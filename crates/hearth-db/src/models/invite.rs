//! Invite database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for invites table
#[derive(Debug, Clone, FromRow)]
pub struct InviteModel {
    pub code: String,
    pub guild_id: i64,
    pub channel_id: Option<i64>,
    pub creator_id: i64,
    /// NULL means unlimited
    pub max_uses: Option<i32>,
    pub uses: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
