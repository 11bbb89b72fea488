//! User entity - a chat account
//!
//! The credential hash is stored alongside the account row but never loaded
//! into this type; it is only reachable through
//! [`UserRepository::get_password_hash`](crate::traits::UserRepository::get_password_hash).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// User entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Snowflake,
    /// Globally unique login name
    pub username: String,
    pub display_name: String,
    /// Avatar content hash, if one was uploaded
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new User whose display name starts out as the username
    pub fn new(id: Snowflake, username: String) -> Self {
        Self {
            id,
            display_name: username.clone(),
            username,
            avatar: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}
