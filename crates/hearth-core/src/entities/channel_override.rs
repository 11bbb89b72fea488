//! Channel permission override - per-(channel, role) allow/deny bits

use serde::{Deserialize, Serialize};

use crate::value_objects::{Permissions, Snowflake};

/// Latest-value record keyed by (channel_id, role_id)
///
/// Writing an override replaces both sets wholesale; the previous bits are
/// never merged into the new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelOverride {
    pub channel_id: Snowflake,
    pub role_id: Snowflake,
    pub allow: Permissions,
    pub deny: Permissions,
}

impl ChannelOverride {
    pub fn new(
        channel_id: Snowflake,
        role_id: Snowflake,
        allow: Permissions,
        deny: Permissions,
    ) -> Self {
        Self {
            channel_id,
            role_id,
            allow,
            deny,
        }
    }

    /// True when the override neither grants nor revokes anything
    pub fn is_neutral(&self) -> bool {
        self.allow.is_empty() && self.deny.is_empty()
    }
}
