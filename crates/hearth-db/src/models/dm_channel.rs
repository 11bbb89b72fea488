//! Direct message channel database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for dm_channels table
#[derive(Debug, Clone, FromRow)]
pub struct DmChannelModel {
    pub id: i64,
    #[sqlx(rename = "type")]
    pub channel_type: i16,
    pub owner_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// A dm_recipients row joined with the recipient's user row
#[derive(Debug, Clone, FromRow)]
pub struct DmRecipientModel {
    pub channel_id: i64,
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}
