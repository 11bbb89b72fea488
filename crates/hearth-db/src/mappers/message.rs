//! Message and attachment entity <- model mappers

use hearth_core::entities::{Attachment, Message, MessageAuthor, MessageWithAuthor};
use hearth_core::value_objects::Snowflake;

use crate::models::{AttachmentModel, MessageWithAuthorModel};

impl From<MessageWithAuthorModel> for MessageWithAuthor {
    fn from(model: MessageWithAuthorModel) -> Self {
        MessageWithAuthor {
            message: Message {
                id: Snowflake::new(model.id),
                channel_id: Snowflake::new(model.channel_id),
                author_id: Snowflake::new(model.author_id),
                content: model.content,
                created_at: model.created_at,
                edited_at: model.edited_at,
            },
            author: MessageAuthor {
                username: model.author_username,
                display_name: model.author_display_name,
                avatar: model.author_avatar,
            },
        }
    }
}

impl From<AttachmentModel> for Attachment {
    fn from(model: AttachmentModel) -> Self {
        Attachment {
            id: Snowflake::new(model.id),
            message_id: Snowflake::new(model.message_id),
            filename: model.filename,
            content_type: model.content_type,
            size: model.size,
            storage_key: model.storage_key,
        }
    }
}
