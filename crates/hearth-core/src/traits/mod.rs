//! Repository traits (ports)

mod repositories;

pub use repositories::{
    AttachmentRepository, BanRepository, ChannelOverrideRepository, ChannelRepository,
    DmChannelRepository, GuildRepository, InviteRepository, MemberRepository, MessageQuery,
    MessageRepository, ReactionRepository, ReadStateRepository, RepoResult, RoleRepository,
    SearchQuery, UserRepository, VoiceStateRepository, MAX_MEMBER_PAGE, MAX_MESSAGE_PAGE,
};
