//! Channel and override entity <- model mappers

use hearth_core::entities::{Channel, ChannelOverride, ChannelType};
use hearth_core::value_objects::{Permissions, Snowflake};

use crate::models::{ChannelModel, ChannelOverrideModel};

impl From<ChannelModel> for Channel {
    fn from(model: ChannelModel) -> Self {
        Channel {
            id: Snowflake::new(model.id),
            guild_id: Snowflake::new(model.guild_id),
            name: model.name,
            channel_type: ChannelType::from(model.channel_type),
            position: model.position,
            topic: model.topic,
            parent_id: model.parent_id.map(Snowflake::new),
        }
    }
}

impl From<ChannelOverrideModel> for ChannelOverride {
    fn from(model: ChannelOverrideModel) -> Self {
        ChannelOverride::new(
            Snowflake::new(model.channel_id),
            Snowflake::new(model.role_id),
            Permissions::from_i64(model.allow_perms),
            Permissions::from_i64(model.deny_perms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_channel_type_reads_as_text() {
        let channel = Channel::from(ChannelModel {
            id: 1,
            guild_id: 2,
            name: "general".to_string(),
            channel_type: 9,
            position: 0,
            topic: None,
            parent_id: None,
        });
        assert_eq!(channel.channel_type, ChannelType::Text);
    }

    #[test]
    fn test_override_keeps_unknown_bits() {
        let high_bit = 1_i64 << 40;
        let ov = ChannelOverride::from(ChannelOverrideModel {
            channel_id: 1,
            role_id: 2,
            allow_perms: high_bit | 0x10,
            deny_perms: 0x20,
        });
        assert_eq!(ov.allow.to_i64(), high_bit | 0x10);
        assert_eq!(ov.deny, Permissions::from_i64(0x20));
    }
}
