//! Message entity and its author-enriched read view

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Message entity
///
/// Ids are time-sortable, so ordering by id is ordering by send time; history
/// pagination relies on this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub author_id: Snowflake,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
}

impl Message {
    pub fn new(id: Snowflake, channel_id: Snowflake, author_id: Snowflake, content: String) -> Self {
        Self {
            id,
            channel_id,
            author_id,
            content,
            created_at: Utc::now(),
            edited_at: None,
        }
    }

    #[inline]
    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }

    /// Replace the content and stamp the edit time
    pub fn edit(&mut self, content: String) {
        self.content = content;
        self.edited_at = Some(Utc::now());
    }
}

/// Author fields joined onto a message at read time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAuthor {
    pub username: String,
    pub display_name: String,
    pub avatar: Option<String>,
}

/// A message together with its author's public profile. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageWithAuthor {
    #[serde(flatten)]
    pub message: Message,
    pub author: MessageAuthor,
}
