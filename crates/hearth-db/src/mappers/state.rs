//! Read state, voice state and invite entity <- model mappers

use hearth_core::entities::{Invite, ReadState, VoiceState};
use hearth_core::value_objects::Snowflake;

use crate::models::{InviteModel, ReadStateModel, VoiceStateModel};

impl From<ReadStateModel> for ReadState {
    fn from(model: ReadStateModel) -> Self {
        ReadState {
            user_id: Snowflake::new(model.user_id),
            channel_id: Snowflake::new(model.channel_id),
            last_message_id: model.last_message_id.map(Snowflake::new),
            mention_count: model.mention_count,
            updated_at: model.updated_at,
        }
    }
}

impl From<VoiceStateModel> for VoiceState {
    fn from(model: VoiceStateModel) -> Self {
        VoiceState {
            guild_id: Snowflake::new(model.guild_id),
            user_id: Snowflake::new(model.user_id),
            channel_id: Snowflake::new(model.channel_id),
            session_id: model.session_id,
            self_mute: model.self_mute,
            self_deaf: model.self_deaf,
            joined_at: model.joined_at,
        }
    }
}

impl From<InviteModel> for Invite {
    fn from(model: InviteModel) -> Self {
        Invite {
            code: model.code,
            guild_id: Snowflake::new(model.guild_id),
            channel_id: model.channel_id.map(Snowflake::new),
            creator_id: Snowflake::new(model.creator_id),
            max_uses: model.max_uses,
            uses: model.uses,
            expires_at: model.expires_at,
            created_at: model.created_at,
        }
    }
}
