//! Ban entity - a user barred from a guild

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Ban, keyed by (guild_id, user_id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ban {
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    pub reason: Option<String>,
    /// The moderator who issued the ban
    pub banned_by: Snowflake,
    pub created_at: DateTime<Utc>,
}

impl Ban {
    pub fn new(guild_id: Snowflake, user_id: Snowflake, banned_by: Snowflake) -> Self {
        Self {
            guild_id,
            user_id,
            reason: None,
            banned_by,
            created_at: Utc::now(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}
