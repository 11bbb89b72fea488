//! # hearth-core
//!
//! Domain layer of the chat persistence core: entities, value objects,
//! repository traits and the error taxonomy they share.
//! This crate has zero dependencies on infrastructure (database, runtime, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    canonical_pair, generate_invite_code, Attachment, Ban, Channel, ChannelOverride, ChannelType,
    DmChannel, DmChannelType, DmChannelWithRecipients, Guild, Invite, Member, Message,
    MessageAuthor, MessageWithAuthor, Reaction, ReactionCount, ReadState, Role, User, VoiceState,
};
pub use error::DomainError;
pub use traits::{
    AttachmentRepository, BanRepository, ChannelOverrideRepository, ChannelRepository,
    DmChannelRepository, GuildRepository, InviteRepository, MemberRepository, MessageQuery,
    MessageRepository, ReactionRepository, ReadStateRepository, RepoResult, RoleRepository,
    SearchQuery, UserRepository, VoiceStateRepository,
};
pub use value_objects::{Permissions, Snowflake, SnowflakeGenerator, SnowflakeParseError};
