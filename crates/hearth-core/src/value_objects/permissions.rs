//! Permission bitfield
//!
//! Roles carry a permission set; channel overrides carry an allow set and a
//! deny set. The storage layer only stores and returns these bits. Resolving
//! effective permissions from roles and overrides belongs to callers.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Permission flags
    ///
    /// Stored as BIGINT in database, serialized as string in JSON.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u64 {
        const VIEW_CHANNEL         = 1 << 0;
        const SEND_MESSAGES        = 1 << 1;
        const MANAGE_MESSAGES      = 1 << 2;
        const MANAGE_CHANNELS      = 1 << 3;
        const MANAGE_ROLES         = 1 << 4;
        const KICK_MEMBERS         = 1 << 5;
        const BAN_MEMBERS          = 1 << 6;
        const MANAGE_GUILD         = 1 << 7;
        /// Join voice channels
        const CONNECT              = 1 << 8;
        const SPEAK                = 1 << 9;
        const MUTE_MEMBERS         = 1 << 10;
        const DEAFEN_MEMBERS       = 1 << 11;
        const MOVE_MEMBERS         = 1 << 12;
        const MENTION_EVERYONE     = 1 << 13;
        const ATTACH_FILES         = 1 << 14;
        const READ_MESSAGE_HISTORY = 1 << 15;
        const CREATE_INVITE        = 1 << 16;
        const CHANGE_NICKNAME      = 1 << 17;
        const MANAGE_NICKNAMES     = 1 << 18;
        const ADMINISTRATOR        = 1 << 31;

        /// Default permissions for the guild's default role
        const DEFAULT = Self::VIEW_CHANNEL.bits()
            | Self::SEND_MESSAGES.bits()
            | Self::CONNECT.bits()
            | Self::SPEAK.bits()
            | Self::ATTACH_FILES.bits()
            | Self::READ_MESSAGE_HISTORY.bits()
            | Self::CREATE_INVITE.bits()
            | Self::CHANGE_NICKNAME.bits();
    }
}

impl Permissions {
    /// Raw bits as i64 (for database storage)
    #[inline]
    pub fn to_i64(self) -> i64 {
        self.bits() as i64
    }

    /// Bits read back from the database. Unknown bits are kept so a value
    /// written by a newer schema survives a round trip untouched.
    #[inline]
    pub fn from_i64(bits: i64) -> Self {
        Permissions::from_bits_retain(bits as u64)
    }

    /// Parse from string representation (decimal number)
    pub fn parse(s: &str) -> Result<Self, std::num::ParseIntError> {
        s.trim().parse::<u64>().map(Permissions::from_bits_retain)
    }

    /// Names of the known flags that are set
    pub fn names(&self) -> Vec<&'static str> {
        self.iter_names()
            .filter(|(name, _)| *name != "DEFAULT")
            .map(|(name, _)| name)
            .collect()
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Permissions::empty()
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

impl Serialize for Permissions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.bits())
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct PermissionsVisitor;

        impl Visitor<'_> for PermissionsVisitor {
            type Value = Permissions;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer representing permission bits")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Permissions, E> {
                Ok(Permissions::from_i64(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Permissions, E> {
                Ok(Permissions::from_bits_retain(value))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Permissions, E> {
                Permissions::parse(value).map_err(|_| E::custom("invalid permissions string"))
            }
        }

        deserializer.deserialize_any(PermissionsVisitor)
    }
}

impl From<i64> for Permissions {
    fn from(bits: i64) -> Self {
        Permissions::from_i64(bits)
    }
}

impl From<Permissions> for i64 {
    fn from(perms: Permissions) -> Self {
        perms.to_i64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_layout() {
        assert_eq!(Permissions::VIEW_CHANNEL.bits(), 0x1);
        assert_eq!(Permissions::MANAGE_ROLES.bits(), 0x10);
        assert_eq!(Permissions::KICK_MEMBERS.bits(), 0x20);
        assert_eq!(Permissions::CONNECT.bits(), 1 << 8);
        assert_eq!(Permissions::MANAGE_NICKNAMES.bits(), 1 << 18);
        assert_eq!(Permissions::ADMINISTRATOR.bits(), 0x8000_0000);
    }

    #[test]
    fn test_i64_round_trip_keeps_unknown_bits() {
        let raw = (1_i64 << 40) | 0x30;
        let perms = Permissions::from_i64(raw);
        assert_eq!(perms.to_i64(), raw);
        assert!(perms.contains(Permissions::MANAGE_ROLES | Permissions::KICK_MEMBERS));
    }

    #[test]
    fn test_administrator_fits_in_positive_i64() {
        assert!(Permissions::all().to_i64() > 0);
    }

    #[test]
    fn test_serialize_json() {
        let perms = Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES;
        assert_eq!(serde_json::to_string(&perms).unwrap(), "\"3\"");
    }

    #[test]
    fn test_deserialize_string_or_number() {
        let a: Permissions = serde_json::from_str("\"48\"").unwrap();
        let b: Permissions = serde_json::from_str("48").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, Permissions::MANAGE_ROLES | Permissions::KICK_MEMBERS);
    }

    #[test]
    fn test_names() {
        let perms = Permissions::VIEW_CHANNEL | Permissions::ADMINISTRATOR;
        assert_eq!(perms.names(), vec!["VIEW_CHANNEL", "ADMINISTRATOR"]);
        assert!(Permissions::empty().names().is_empty());
    }

    #[test]
    fn test_parse() {
        let perms = Permissions::parse("7").unwrap();
        assert!(perms.contains(Permissions::VIEW_CHANNEL));
        assert!(perms.contains(Permissions::SEND_MESSAGES));
        assert!(perms.contains(Permissions::MANAGE_MESSAGES));
        assert!(Permissions::parse("-1").is_err());
    }

    #[test]
    fn test_display() {
        let perms = Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES;
        assert_eq!(perms.to_string(), "3");
    }
}
