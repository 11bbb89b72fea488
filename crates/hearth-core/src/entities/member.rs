//! Member entity - a user's membership in a guild

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Guild member, keyed by (guild_id, user_id)
///
/// `role_ids` is hydrated from the member-role junction on reads and is
/// ignored on writes; assignments go through
/// [`MemberRepository::add_role`](crate::traits::MemberRepository::add_role).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    pub nickname: Option<String>,
    pub joined_at: DateTime<Utc>,
    pub role_ids: Vec<Snowflake>,
}

impl Member {
    pub fn new(guild_id: Snowflake, user_id: Snowflake) -> Self {
        Self {
            guild_id,
            user_id,
            nickname: None,
            joined_at: Utc::now(),
            role_ids: Vec::new(),
        }
    }

    /// Nickname if set, otherwise the given fallback
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.nickname.as_deref().unwrap_or(fallback)
    }

    #[inline]
    pub fn has_role(&self, role_id: Snowflake) -> bool {
        self.role_ids.contains(&role_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_creation() {
        let member = Member::new(Snowflake::new(100), Snowflake::new(200));
        assert_eq!(member.guild_id, Snowflake::new(100));
        assert_eq!(member.user_id, Snowflake::new(200));
        assert!(member.nickname.is_none());
        assert!(member.role_ids.is_empty());
    }

    #[test]
    fn test_display_name() {
        let mut member = Member::new(Snowflake::new(1), Snowflake::new(2));
        assert_eq!(member.display_name("Display"), "Display");

        member.nickname = Some("Nick".to_string());
        assert_eq!(member.display_name("Display"), "Nick");
    }

    #[test]
    fn test_has_role() {
        let mut member = Member::new(Snowflake::new(1), Snowflake::new(2));
        member.role_ids = vec![Snowflake::new(7)];
        assert!(member.has_role(Snowflake::new(7)));
        assert!(!member.has_role(Snowflake::new(8)));
    }
}
