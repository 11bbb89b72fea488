//! Guild database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for guilds table
#[derive(Debug, Clone, FromRow)]
pub struct GuildModel {
    pub id: i64,
    pub name: String,
    pub icon: Option<String>,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}
