//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in hearth-core.
//! Each repository owns a cloned pool handle and is cheap to clone.

mod attachment;
mod ban;
mod channel;
mod channel_override;
mod dm_channel;
mod error;
mod guild;
mod invite;
mod member;
mod message;
mod reaction;
mod read_state;
mod role;
mod user;
mod voice_state;

pub use attachment::PgAttachmentRepository;
pub use ban::PgBanRepository;
pub use channel::PgChannelRepository;
pub use channel_override::PgChannelOverrideRepository;
pub use dm_channel::PgDmChannelRepository;
pub use error::{map_db_error, map_unique_violation};
pub use guild::PgGuildRepository;
pub use invite::PgInviteRepository;
pub use member::PgMemberRepository;
pub use message::PgMessageRepository;
pub use reaction::PgReactionRepository;
pub use read_state::PgReadStateRepository;
pub use role::PgRoleRepository;
pub use user::PgUserRepository;
pub use voice_state::PgVoiceStateRepository;
