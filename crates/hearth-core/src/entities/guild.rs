//! Guild entity - a community containing channels, roles and members

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Guild entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    pub id: Snowflake,
    pub name: String,
    pub icon: Option<String>,
    pub owner_id: Snowflake,
    pub created_at: DateTime<Utc>,
}

impl Guild {
    pub fn new(id: Snowflake, name: String, owner_id: Snowflake) -> Self {
        Self {
            id,
            name,
            icon: None,
            owner_id,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_owner(&self, user_id: Snowflake) -> bool {
        self.owner_id == user_id
    }

    /// Hand the guild to another user
    pub fn transfer_ownership(&mut self, new_owner_id: Snowflake) {
        self.owner_id = new_owner_id;
    }
}
