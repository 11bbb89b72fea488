//! Model to entity mappers
//!
//! `From<Model> for Entity` impls turning database rows into domain objects.
//! Writes bind entity fields directly, so there is no reverse direction.

mod channel;
mod dm_channel;
mod guild;
mod member;
mod message;
mod reaction;
mod role;
mod state;
mod user;

pub use dm_channel::group_recipients;
