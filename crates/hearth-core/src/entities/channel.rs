//! Channel entity - a text channel, voice channel, or category inside a guild

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Guild channel kind, stored as SMALLINT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum ChannelType {
    #[default]
    Text = 0,
    Voice = 2,
    /// Groups other channels via their `parent_id`
    Category = 4,
}

impl ChannelType {
    #[inline]
    #[must_use]
    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

impl From<i16> for ChannelType {
    fn from(value: i16) -> Self {
        match value {
            2 => Self::Voice,
            4 => Self::Category,
            _ => Self::Text,
        }
    }
}

impl From<ChannelType> for i16 {
    fn from(ct: ChannelType) -> Self {
        ct.as_i16()
    }
}

/// Channel entity. Names are unique within a guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub name: String,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    pub position: i32,
    pub topic: Option<String>,
    pub parent_id: Option<Snowflake>,
}

impl Channel {
    #[must_use]
    pub fn new(id: Snowflake, guild_id: Snowflake, name: String, channel_type: ChannelType) -> Self {
        Self {
            id,
            guild_id,
            name,
            channel_type,
            position: 0,
            topic: None,
            parent_id: None,
        }
    }

    #[must_use]
    pub fn new_text(id: Snowflake, guild_id: Snowflake, name: String) -> Self {
        Self::new(id, guild_id, name, ChannelType::Text)
    }

    #[must_use]
    pub fn new_voice(id: Snowflake, guild_id: Snowflake, name: String) -> Self {
        Self::new(id, guild_id, name, ChannelType::Voice)
    }

    #[must_use]
    pub fn new_category(id: Snowflake, guild_id: Snowflake, name: String) -> Self {
        Self::new(id, guild_id, name, ChannelType::Category)
    }

    #[inline]
    #[must_use]
    pub fn is_category(&self) -> bool {
        matches!(self.channel_type, ChannelType::Category)
    }

    #[inline]
    #[must_use]
    pub fn is_voice(&self) -> bool {
        matches!(self.channel_type, ChannelType::Voice)
    }
}
