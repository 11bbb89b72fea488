//! Member database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A guild_members row with its member_roles aggregated into an array
#[derive(Debug, Clone, FromRow)]
pub struct MemberModel {
    pub guild_id: i64,
    pub user_id: i64,
    pub nickname: Option<String>,
    pub joined_at: DateTime<Utc>,
    #[sqlx(default)]
    pub role_ids: Vec<i64>,
}
