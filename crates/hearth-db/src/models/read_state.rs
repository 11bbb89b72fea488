//! Read state database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for read_states table
#[derive(Debug, Clone, FromRow)]
pub struct ReadStateModel {
    pub user_id: i64,
    pub channel_id: i64,
    pub last_message_id: Option<i64>,
    pub mention_count: i32,
    pub updated_at: DateTime<Utc>,
}
