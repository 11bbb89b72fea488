//! Value objects - identifiers and bitfields shared by every entity

mod permissions;
mod snowflake;

pub use permissions::Permissions;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
