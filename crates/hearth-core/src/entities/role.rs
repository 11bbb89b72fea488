//! Role entity - a named, positioned permission set within a guild

use serde::{Deserialize, Serialize};

use crate::value_objects::{Permissions, Snowflake};

/// Role entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub name: String,
    /// RGB packed into the low 24 bits
    pub color: i32,
    pub permissions: Permissions,
    /// Display and hierarchy order, ascending
    pub position: i32,
    /// The role every member implicitly holds
    pub is_default: bool,
}

impl Role {
    pub fn new(id: Snowflake, guild_id: Snowflake, name: String, permissions: Permissions) -> Self {
        Self {
            id,
            guild_id,
            name,
            color: 0,
            permissions,
            position: 0,
            is_default: false,
        }
    }

    /// The guild's default role at position 0
    pub fn default_for(id: Snowflake, guild_id: Snowflake) -> Self {
        Self {
            id,
            guild_id,
            name: "@everyone".to_string(),
            color: 0,
            permissions: Permissions::DEFAULT,
            position: 0,
            is_default: true,
        }
    }

    pub fn with_position(mut self, position: i32) -> Self {
        self.position = position;
        self
    }

    /// Color as a hex string (without #)
    pub fn color_hex(&self) -> String {
        format!("{:06x}", self.color & 0x00FF_FFFF)
    }
}
