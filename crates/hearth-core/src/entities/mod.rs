//! Domain entities - core business objects

mod attachment;
mod ban;
mod channel;
mod channel_override;
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

pub use attachment::Attachment;
pub use ban::Ban;
pub use channel::{Channel, ChannelType};
pub use channel_override::ChannelOverride;
pub use dm_channel::{canonical_pair, DmChannel, DmChannelType, DmChannelWithRecipients};
pub use guild::Guild;
pub use invite::{generate_invite_code, Invite};
pub use member::Member;
pub use message::{Message, MessageAuthor, MessageWithAuthor};
pub use reaction::{Reaction, ReactionCount};
pub use read_state::ReadState;
pub use role::Role;
pub use user::User;
pub use voice_state::VoiceState;
