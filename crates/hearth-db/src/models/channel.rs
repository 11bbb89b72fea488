//! Channel database models

use sqlx::FromRow;

/// Database model for channels table
#[derive(Debug, Clone, FromRow)]
pub struct ChannelModel {
    pub id: i64,
    pub guild_id: i64,
    pub name: String,
    /// 0 text, 2 voice, 4 category
    #[sqlx(rename = "type")]
    pub channel_type: i16,
    pub position: i32,
    pub topic: Option<String>,
    pub parent_id: Option<i64>,
}

/// Database model for channel_overrides table
#[derive(Debug, Clone, FromRow)]
pub struct ChannelOverrideModel {
    pub channel_id: i64,
    pub role_id: i64,
    pub allow_perms: i64,
    pub deny_perms: i64,
}
