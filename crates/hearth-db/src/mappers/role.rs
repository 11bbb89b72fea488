//! Role entity <- model mapper

use hearth_core::entities::Role;
use hearth_core::value_objects::{Permissions, Snowflake};

use crate::models::RoleModel;

impl From<RoleModel> for Role {
    fn from(model: RoleModel) -> Self {
        Role {
            id: Snowflake::new(model.id),
            guild_id: Snowflake::new(model.guild_id),
            name: model.name,
            color: model.color,
            permissions: Permissions::from_i64(model.permissions),
            position: model.position,
            is_default: model.is_default,
        }
    }
}
