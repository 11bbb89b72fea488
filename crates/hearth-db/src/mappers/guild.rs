//! Guild and ban entity <- model mappers

use hearth_core::entities::{Ban, Guild};
use hearth_core::value_objects::Snowflake;

use crate::models::{BanModel, GuildModel};

impl From<GuildModel> for Guild {
    fn from(model: GuildModel) -> Self {
        Guild {
            id: Snowflake::new(model.id),
            name: model.name,
            icon: model.icon,
            owner_id: Snowflake::new(model.owner_id),
            created_at: model.created_at,
        }
    }
}

impl From<BanModel> for Ban {
    fn from(model: BanModel) -> Self {
        Ban {
            guild_id: Snowflake::new(model.guild_id),
            user_id: Snowflake::new(model.user_id),
            reason: model.reason,
            banned_by: Snowflake::new(model.banned_by),
            created_at: model.created_at,
        }
    }
}
