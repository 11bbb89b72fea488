//! Member entity <- model mapper

use hearth_core::entities::Member;
use hearth_core::value_objects::Snowflake;

use crate::models::MemberModel;

impl From<MemberModel> for Member {
    fn from(model: MemberModel) -> Self {
        Member {
            guild_id: Snowflake::new(model.guild_id),
            user_id: Snowflake::new(model.user_id),
            nickname: model.nickname,
            joined_at: model.joined_at,
            role_ids: model.role_ids.into_iter().map(Snowflake::new).collect(),
        }
    }
}
