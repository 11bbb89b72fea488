//! Reaction entity <- model mappers

use hearth_core::entities::{Reaction, ReactionCount};
use hearth_core::value_objects::Snowflake;

use crate::models::{ReactionCountModel, ReactionModel};

impl From<ReactionModel> for Reaction {
    fn from(model: ReactionModel) -> Self {
        Reaction {
            message_id: Snowflake::new(model.message_id),
            user_id: Snowflake::new(model.user_id),
            emoji: model.emoji,
            created_at: model.created_at,
        }
    }
}

impl From<ReactionCountModel> for ReactionCount {
    fn from(model: ReactionCountModel) -> Self {
        ReactionCount::new(model.emoji, model.count, model.me)
    }
}
