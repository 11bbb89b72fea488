//! Reaction entity - an emoji placed on a message by a user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Reaction, keyed by (message_id, user_id, emoji)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub message_id: Snowflake,
    pub user_id: Snowflake,
    pub emoji: String,
    pub created_at: DateTime<Utc>,
}

/// Per-emoji aggregate for one message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCount {
    pub emoji: String,
    pub count: i64,
    /// Whether the requesting user is among the reactors
    pub me: bool,
}

impl ReactionCount {
    pub fn new(emoji: String, count: i64, me: bool) -> Self {
        Self { emoji, count, me }
    }
}
