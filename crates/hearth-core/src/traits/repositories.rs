//! Repository traits (ports) - the data-access contract of every store
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Conventions shared by every trait:
//!
//! - point lookups return `Ok(None)` when nothing matches
//! - listings return an empty `Vec` rather than an error
//! - `update`/`delete` return whether a row was touched
//! - uniqueness violations surface as a conflict [`DomainError`]
//!
//! Every method is a future; dropping it cancels the operation and rolls
//! back any transaction it had open.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    Attachment, Ban, Channel, ChannelOverride, DmChannel, DmChannelWithRecipients, Guild, Invite,
    Member, Message, MessageWithAuthor, Reaction, ReactionCount, ReadState, Role, User,
    VoiceState,
};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Upper bound on one page of message history or search results
pub const MAX_MESSAGE_PAGE: i64 = 100;

/// Upper bound on one page of a guild's member list
pub const MAX_MEMBER_PAGE: i64 = 1000;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user. Fails with `UsernameTaken` if the name is in use.
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Replace username, display name and avatar
    async fn update(&self, user: &User) -> RepoResult<bool>;

    async fn delete(&self, id: Snowflake) -> RepoResult<bool>;

    /// Stored credential hash, for the authentication layer only
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;

    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<bool>;
}

// ============================================================================
// Guild Repository
// ============================================================================

#[async_trait]
pub trait GuildRepository: Send + Sync {
    async fn create(&self, guild: &Guild) -> RepoResult<()>;

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Guild>>;

    /// Guilds the user is a member of, ordered by guild id
    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<Guild>>;

    /// Replace name, icon and owner
    async fn update(&self, guild: &Guild) -> RepoResult<bool>;

    /// Delete the guild along with its channels, roles, members, invites and bans
    async fn delete(&self, id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Member Repository
// ============================================================================

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Fails with `AlreadyMember` if the user already belongs to the guild
    async fn create(&self, member: &Member) -> RepoResult<()>;

    /// Member with `role_ids` ordered by role position
    async fn find(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Member>>;

    /// Page through a guild's members ordered by user id, starting after `after`
    async fn find_by_guild(
        &self,
        guild_id: Snowflake,
        limit: i64,
        after: Option<Snowflake>,
    ) -> RepoResult<Vec<Member>>;

    async fn is_member(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;

    /// Replace the nickname
    async fn update(&self, member: &Member) -> RepoResult<bool>;

    async fn delete(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;

    /// Assign a role; assigning a held role is a no-op
    async fn add_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> RepoResult<()>;

    /// Unassign a role; unassigning a missing role is a no-op
    async fn remove_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> RepoResult<()>;
}

// ============================================================================
// Role Repository
// ============================================================================

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn create(&self, role: &Role) -> RepoResult<()>;

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Role>>;

    /// All roles in a guild, ordered by position ascending
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Role>>;

    /// Roles held by a member, ordered by position ascending
    async fn find_by_member(&self, guild_id: Snowflake, user_id: Snowflake)
        -> RepoResult<Vec<Role>>;

    async fn find_default(&self, guild_id: Snowflake) -> RepoResult<Option<Role>>;

    /// Replace name, color, permissions and position
    async fn update(&self, role: &Role) -> RepoResult<bool>;

    async fn delete(&self, id: Snowflake) -> RepoResult<bool>;

    /// Move several roles at once; either every position changes or none does
    async fn update_positions(
        &self,
        guild_id: Snowflake,
        positions: &[(Snowflake, i32)],
    ) -> RepoResult<()>;
}

// ============================================================================
// Channel Repository
// ============================================================================

#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// Fails with `ChannelNameTaken` if the guild already has a channel by that name
    async fn create(&self, channel: &Channel) -> RepoResult<()>;

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Channel>>;

    /// All channels in a guild, ordered by position then id
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Channel>>;

    /// Replace name, position, topic and parent
    async fn update(&self, channel: &Channel) -> RepoResult<bool>;

    async fn delete(&self, id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Channel Override Repository
// ============================================================================

#[async_trait]
pub trait ChannelOverrideRepository: Send + Sync {
    /// Insert or replace the override for (channel, role). Both bit sets are
    /// overwritten; nothing from the previous row survives.
    async fn set(&self, channel_override: &ChannelOverride) -> RepoResult<()>;

    async fn find_by_channel(&self, channel_id: Snowflake) -> RepoResult<Vec<ChannelOverride>>;

    /// Removing a missing override is a no-op
    async fn delete(&self, channel_id: Snowflake, role_id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Message Repository
// ============================================================================

/// Keyset window over a channel's history
///
/// Results are always newest first. `before` and `after` are exclusive id
/// bounds; to fetch the next older page pass the last id of the current page
/// as `before`. With only `after` set the page holds the messages directly
/// following the cursor, so catching up never skips history. A limit of zero
/// or less yields an empty page.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageQuery {
    pub before: Option<Snowflake>,
    pub after: Option<Snowflake>,
    pub limit: i64,
}

impl MessageQuery {
    pub fn latest(limit: i64) -> Self {
        Self {
            before: None,
            after: None,
            limit,
        }
    }

    pub fn before(cursor: Snowflake, limit: i64) -> Self {
        Self {
            before: Some(cursor),
            after: None,
            limit,
        }
    }

    pub fn after(cursor: Snowflake, limit: i64) -> Self {
        Self {
            before: None,
            after: Some(cursor),
            limit,
        }
    }
}

/// Text search over a guild's messages
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub text: String,
    pub author_id: Option<Snowflake>,
    /// Only messages created strictly before this instant
    pub before: Option<DateTime<Utc>>,
    /// Only messages created strictly after this instant
    pub after: Option<DateTime<Utc>>,
    pub limit: i64,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, limit: i64) -> Self {
        Self {
            text: text.into(),
            limit,
            ..Self::default()
        }
    }
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Insert with the caller's id and timestamps
    async fn create(&self, message: &Message) -> RepoResult<()>;

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<MessageWithAuthor>>;

    /// One page of history, newest first, at most `query.limit` (capped at
    /// [`MAX_MESSAGE_PAGE`]) messages
    async fn find_by_channel(
        &self,
        channel_id: Snowflake,
        query: MessageQuery,
    ) -> RepoResult<Vec<MessageWithAuthor>>;

    /// Replace content and set `edited_at`. Authorship is the caller's concern.
    async fn update(&self, message: &Message) -> RepoResult<bool>;

    /// Hard delete; attachments and reactions go with it
    async fn delete(&self, id: Snowflake) -> RepoResult<bool>;

    /// Messages in the guild's channels matching `query.text`, newest first.
    /// Results are filtered, not ranked.
    async fn search(
        &self,
        guild_id: Snowflake,
        query: &SearchQuery,
    ) -> RepoResult<Vec<MessageWithAuthor>>;
}

// ============================================================================
// Attachment Repository
// ============================================================================

#[async_trait]
pub trait AttachmentRepository: Send + Sync {
    async fn create(&self, attachment: &Attachment) -> RepoResult<()>;

    /// Attachments of a message, ordered by id
    async fn find_by_message(&self, message_id: Snowflake) -> RepoResult<Vec<Attachment>>;

    async fn delete(&self, id: Snowflake) -> RepoResult<bool>;

    /// Returns the number of attachments removed
    async fn delete_by_message(&self, message_id: Snowflake) -> RepoResult<u64>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Adding a reaction the user already placed is a no-op
    async fn add(&self, message_id: Snowflake, user_id: Snowflake, emoji: &str) -> RepoResult<()>;

    /// Removing a reaction that is not there is a no-op
    async fn remove(&self, message_id: Snowflake, user_id: Snowflake, emoji: &str)
        -> RepoResult<()>;

    /// All reactions on a message, oldest first
    async fn find_by_message(&self, message_id: Snowflake) -> RepoResult<Vec<Reaction>>;

    /// One entry per emoji, ordered by when the emoji was first used.
    /// `me` reports whether `current_user_id` reacted with it.
    async fn find_counts_by_message(
        &self,
        message_id: Snowflake,
        current_user_id: Snowflake,
    ) -> RepoResult<Vec<ReactionCount>>;

    /// First `limit` users who reacted with `emoji`, in reaction order
    async fn find_users_by_reaction(
        &self,
        message_id: Snowflake,
        emoji: &str,
        limit: i64,
    ) -> RepoResult<Vec<Snowflake>>;

    /// Clear every reaction on a message; returns the number removed
    async fn remove_all(&self, message_id: Snowflake) -> RepoResult<u64>;

    /// Clear one emoji from a message; returns the number removed
    async fn remove_emoji(&self, message_id: Snowflake, emoji: &str) -> RepoResult<u64>;
}

// ============================================================================
// DM Channel Repository
// ============================================================================

#[async_trait]
pub trait DmChannelRepository: Send + Sync {
    /// Create the channel and its recipient rows atomically
    ///
    /// A 1:1 channel needs exactly two distinct recipients. A repeated
    /// recipient fails with `DuplicateRecipient`, and an existing 1:1
    /// channel for the same pair fails with `DmChannelExists`. On any
    /// failure nothing is written.
    async fn create(&self, channel: &DmChannel, recipient_ids: &[Snowflake]) -> RepoResult<()>;

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<DmChannelWithRecipients>>;

    /// Every DM channel the user is in, newest first
    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<DmChannelWithRecipients>>;

    /// The 1:1 channel between two users, created with `new_id` if absent.
    /// Argument order does not matter and concurrent callers converge on the
    /// same channel.
    async fn get_or_create_dm(
        &self,
        user1_id: Snowflake,
        user2_id: Snowflake,
        new_id: Snowflake,
    ) -> RepoResult<DmChannelWithRecipients>;

    /// Adding an existing recipient is a no-op. Only group channels grow;
    /// a new recipient on a 1:1 channel is a validation error.
    async fn add_recipient(&self, channel_id: Snowflake, user_id: Snowflake) -> RepoResult<()>;

    async fn is_recipient(&self, channel_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Read State Repository
// ============================================================================

#[async_trait]
pub trait ReadStateRepository: Send + Sync {
    /// Move the read pointer and clear the mention counter
    async fn upsert(
        &self,
        user_id: Snowflake,
        channel_id: Snowflake,
        last_message_id: Snowflake,
    ) -> RepoResult<()>;

    /// Bump the mention counter by one without touching the read pointer,
    /// creating the row if needed. Returns the new count.
    async fn increment_mention_count(
        &self,
        user_id: Snowflake,
        channel_id: Snowflake,
    ) -> RepoResult<i32>;

    async fn find(&self, user_id: Snowflake, channel_id: Snowflake)
        -> RepoResult<Option<ReadState>>;

    /// All of a user's read states, ordered by channel id
    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<ReadState>>;

    /// Every user's read state in a channel, ordered by user id
    async fn find_by_channel(&self, channel_id: Snowflake) -> RepoResult<Vec<ReadState>>;
}

// ============================================================================
// Voice State Repository
// ============================================================================

#[async_trait]
pub trait VoiceStateRepository: Send + Sync {
    /// Record where the user is connected. Replaces channel, session and
    /// mute/deaf flags; `joined_at` is kept from the first connection.
    async fn upsert(&self, state: &VoiceState) -> RepoResult<()>;

    async fn delete(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;

    async fn find(&self, guild_id: Snowflake, user_id: Snowflake)
        -> RepoResult<Option<VoiceState>>;

    /// Users in a voice channel, by join time
    async fn find_by_channel(&self, channel_id: Snowflake) -> RepoResult<Vec<VoiceState>>;

    /// Users in any voice channel of the guild, by join time
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<VoiceState>>;
}

// ============================================================================
// Invite Repository
// ============================================================================

#[async_trait]
pub trait InviteRepository: Send + Sync {
    /// Fails with `InviteCodeExists` on a code collision
    async fn create(&self, invite: &Invite) -> RepoResult<()>;

    async fn find_by_code(&self, code: &str) -> RepoResult<Option<Invite>>;

    /// A guild's invites, newest first
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Invite>>;

    /// Atomically add one use. Returns the new count, or `None` for an
    /// unknown code.
    async fn increment_uses(&self, code: &str) -> RepoResult<Option<i32>>;

    async fn delete(&self, code: &str) -> RepoResult<bool>;
}

// ============================================================================
// Ban Repository
// ============================================================================

#[async_trait]
pub trait BanRepository: Send + Sync {
    /// Fails with `AlreadyBanned` if the user is already banned
    async fn create(&self, ban: &Ban) -> RepoResult<()>;

    async fn find(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Ban>>;

    /// A guild's bans, newest first
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Ban>>;

    async fn is_banned(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;

    async fn delete(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_query_constructors() {
        let q = MessageQuery::latest(50);
        assert!(q.before.is_none() && q.after.is_none());
        assert_eq!(q.limit, 50);

        let q = MessageQuery::before(Snowflake::new(10), 25);
        assert_eq!(q.before, Some(Snowflake::new(10)));

        let q = MessageQuery::after(Snowflake::new(10), 25);
        assert!(q.before.is_none());
        assert_eq!(q.after, Some(Snowflake::new(10)));
    }

    #[test]
    fn test_search_query_defaults() {
        let q = SearchQuery::new("deploy", 20);
        assert_eq!(q.text, "deploy");
        assert!(q.author_id.is_none());
        assert!(q.before.is_none() && q.after.is_none());
    }

    #[test]
    fn test_traits_are_object_safe() {
        fn assert_object_safe(
            _: Option<&dyn UserRepository>,
            _: Option<&dyn DmChannelRepository>,
            _: Option<&dyn ReadStateRepository>,
            _: Option<&dyn ChannelOverrideRepository>,
        ) {
        }
        assert_object_safe(None, None, None, None);
    }
}
