//! Invite entity - a shareable code granting entry to a guild

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const CODE_LEN: usize = 8;

/// Invite entity, keyed by `code`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invite {
    pub code: String,
    pub guild_id: Snowflake,
    /// Channel the invitee lands in, if any
    pub channel_id: Option<Snowflake>,
    pub creator_id: Snowflake,
    /// `None` means unlimited
    pub max_uses: Option<i32>,
    pub uses: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Invite {
    pub fn new(code: String, guild_id: Snowflake, creator_id: Snowflake) -> Self {
        Self {
            code,
            guild_id,
            channel_id: None,
            creator_id,
            max_uses: None,
            uses: 0,
            expires_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_channel(mut self, channel_id: Snowflake) -> Self {
        self.channel_id = Some(channel_id);
        self
    }

    /// Expire `max_age_seconds` after creation; zero or less means never
    pub fn with_expiration(mut self, max_age_seconds: i64) -> Self {
        self.expires_at =
            (max_age_seconds > 0).then(|| self.created_at + Duration::seconds(max_age_seconds));
        self
    }

    /// Cap the number of uses; zero or less means unlimited
    pub fn with_max_uses(mut self, max_uses: i32) -> Self {
        self.max_uses = (max_uses > 0).then_some(max_uses);
        self
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_exhausted(&self) -> bool {
        self.max_uses.is_some_and(|max| self.uses >= max)
    }

    pub fn is_valid(&self) -> bool {
        !self.is_expired() && !self.is_exhausted()
    }

    /// Remaining uses, `None` if unlimited
    pub fn remaining_uses(&self) -> Option<i32> {
        self.max_uses.map(|max| (max - self.uses).max(0))
    }
}

/// Generate a random alphanumeric invite code
pub fn generate_invite_code() -> String {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CODE_CHARSET[rng.gen_range(0..CODE_CHARSET.len())] as char)
        .collect()
}
