//! Database models - SQLx-compatible structs for PostgreSQL tables

mod ban;
mod channel;
mod dm_channel;
mod guild;
mod invite;
mod member;
mod message;
mod reaction;
mod read_state;
mod role;
mod user;
mod voice_state;

pub use ban::BanModel;
pub use channel::{ChannelModel, ChannelOverrideModel};
pub use dm_channel::{DmChannelModel, DmRecipientModel};
pub use guild::GuildModel;
pub use invite::InviteModel;
pub use member::MemberModel;
pub use message::{AttachmentModel, MessageWithAuthorModel};
pub use reaction::{ReactionCountModel, ReactionModel};
pub use read_state::ReadStateModel;
pub use role::RoleModel;
pub use user::UserModel;
pub use voice_state::VoiceStateModel;
