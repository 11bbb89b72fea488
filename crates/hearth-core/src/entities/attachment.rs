//! Attachment entity - a file attached to a message

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Attachment metadata. The file body lives in object storage under
/// `storage_key`, which is internal and never serialized outward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: Snowflake,
    pub message_id: Snowflake,
    pub filename: String,
    pub content_type: String,
    /// Size in bytes
    pub size: i64,
    #[serde(skip_serializing, default)]
    pub storage_key: String,
}

impl Attachment {
    pub fn new(
        id: Snowflake,
        message_id: Snowflake,
        filename: String,
        content_type: String,
        size: i64,
        storage_key: String,
    ) -> Self {
        Self {
            id,
            message_id,
            filename,
            content_type,
            size,
            storage_key,
        }
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}
