//! Read state - how far a user has read in a channel

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Latest-value record keyed by (user_id, channel_id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadState {
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
    /// `None` until the user acknowledges a message; a mention can arrive first
    pub last_message_id: Option<Snowflake>,
    /// Mentions received since the pointer last moved
    pub mention_count: i32,
    pub updated_at: DateTime<Utc>,
}

impl ReadState {
    /// Whether `message_id` lies past the read pointer
    pub fn is_unread(&self, message_id: Snowflake) -> bool {
        self.last_message_id.is_none_or(|last| message_id > last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_unread() {
        let mut state = ReadState {
            user_id: Snowflake::new(1),
            channel_id: Snowflake::new(2),
            last_message_id: None,
            mention_count: 1,
            updated_at: Utc::now(),
        };
        assert!(state.is_unread(Snowflake::new(5)));

        state.last_message_id = Some(Snowflake::new(10));
        assert!(!state.is_unread(Snowflake::new(10)));
        assert!(state.is_unread(Snowflake::new(11)));
    }
}
