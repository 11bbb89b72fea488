//! Direct-message channels - conversations outside any guild
//!
//! A 1:1 channel exists at most once per unordered pair of users. Its pair
//! is stored canonicalized (lower id first) so the database can enforce that.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::User;
use crate::value_objects::Snowflake;

/// DM channel kind, stored as SMALLINT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum DmChannelType {
    /// Exactly two recipients
    #[default]
    Dm = 1,
    GroupDm = 3,
}

impl DmChannelType {
    #[inline]
    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

impl From<i16> for DmChannelType {
    fn from(value: i16) -> Self {
        match value {
            3 => Self::GroupDm,
            _ => Self::Dm,
        }
    }
}

/// DM channel row. Recipients live in a junction and are attached on reads
/// via [`DmChannelWithRecipients`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmChannel {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub channel_type: DmChannelType,
    /// Group owner; 1:1 channels have none
    pub owner_id: Option<Snowflake>,
    pub created_at: DateTime<Utc>,
}

impl DmChannel {
    pub fn new_dm(id: Snowflake) -> Self {
        Self {
            id,
            channel_type: DmChannelType::Dm,
            owner_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn new_group(id: Snowflake, owner_id: Snowflake) -> Self {
        Self {
            id,
            channel_type: DmChannelType::GroupDm,
            owner_id: Some(owner_id),
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_group(&self) -> bool {
        matches!(self.channel_type, DmChannelType::GroupDm)
    }
}

/// A DM channel with its recipients, ordered by user id. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmChannelWithRecipients {
    #[serde(flatten)]
    pub channel: DmChannel,
    pub recipients: Vec<User>,
}

impl DmChannelWithRecipients {
    pub fn has_recipient(&self, user_id: Snowflake) -> bool {
        self.recipients.iter().any(|u| u.id == user_id)
    }

    /// For a 1:1 channel, the recipient who is not `user_id`
    pub fn other_recipient(&self, user_id: Snowflake) -> Option<&User> {
        if self.channel.is_group() {
            return None;
        }
        self.recipients.iter().find(|u| u.id != user_id)
    }
}

/// Order a user pair as (low, high) so (A, B) and (B, A) map to one key
#[inline]
pub fn canonical_pair(a: Snowflake, b: Snowflake) -> (Snowflake, Snowflake) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
