//! Message database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A messages row joined with the author's public profile
#[derive(Debug, Clone, FromRow)]
pub struct MessageWithAuthorModel {
    pub id: i64,
    pub channel_id: i64,
    pub author_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
    pub author_username: String,
    pub author_display_name: String,
    pub author_avatar: Option<String>,
}

/// Database model for attachments table
#[derive(Debug, Clone, FromRow)]
pub struct AttachmentModel {
    pub id: i64,
    pub message_id: i64,
    pub filename: String,
    pub content_type: String,
    pub size: i64,
    pub storage_key: String,
}
