//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use hearth_core::entities::{Message, MessageWithAuthor};
use hearth_core::traits::{
    MessageQuery, MessageRepository, RepoResult, SearchQuery, MAX_MESSAGE_PAGE,
};
use hearth_core::value_objects::Snowflake;

use crate::models::MessageWithAuthorModel;

use super::error::map_db_error;

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self, message), fields(message_id = %message.id, channel_id = %message.channel_id))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, channel_id, author_id, content, created_at, edited_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id.into_inner())
        .bind(message.channel_id.into_inner())
        .bind(message.author_id.into_inner())
        .bind(&message.content)
        .bind(message.created_at)
        .bind(message.edited_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<MessageWithAuthor>> {
        let result = sqlx::query_as::<_, MessageWithAuthorModel>(
            r#"
            SELECT m.id, m.channel_id, m.author_id, m.content, m.created_at, m.edited_at,
                   u.username AS author_username,
                   u.display_name AS author_display_name,
                   u.avatar AS author_avatar
            FROM messages m
            INNER JOIN users u ON u.id = m.author_id
            WHERE m.id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(MessageWithAuthor::from))
    }

    #[instrument(skip(self))]
    async fn find_by_channel(
        &self,
        channel_id: Snowflake,
        query: MessageQuery,
    ) -> RepoResult<Vec<MessageWithAuthor>> {
        if query.limit <= 0 {
            return Ok(Vec::new());
        }
        let limit = query.limit.min(MAX_MESSAGE_PAGE);

        // Catching up from `after` alone reads the oldest rows past the cursor
        let forward = query.before.is_none() && query.after.is_some();
        let order = if forward { "ASC" } else { "DESC" };

        let sql = format!(
            r"
            SELECT m.id, m.channel_id, m.author_id, m.content, m.created_at, m.edited_at,
                   u.username AS author_username,
                   u.display_name AS author_display_name,
                   u.avatar AS author_avatar
            FROM messages m
            INNER JOIN users u ON u.id = m.author_id
            WHERE m.channel_id = $1
              AND ($2::BIGINT IS NULL OR m.id < $2)
              AND ($3::BIGINT IS NULL OR m.id > $3)
            ORDER BY m.id {order}
            LIMIT $4
            "
        );

        let results = sqlx::query_as::<_, MessageWithAuthorModel>(&sql)
            .bind(channel_id.into_inner())
            .bind(query.before.map(Snowflake::into_inner))
            .bind(query.after.map(Snowflake::into_inner))
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        let mut messages: Vec<MessageWithAuthor> =
            results.into_iter().map(MessageWithAuthor::from).collect();
        if forward {
            messages.reverse();
        }

        Ok(messages)
    }

    #[instrument(skip(self, message), fields(message_id = %message.id))]
    async fn update(&self, message: &Message) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET content = $2, edited_at = COALESCE($3, NOW())
            WHERE id = $1
            "#,
        )
        .bind(message.id.into_inner())
        .bind(&message.content)
        .bind(message.edited_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, query), fields(author_id = ?query.author_id, limit = query.limit))]
    async fn search(
        &self,
        guild_id: Snowflake,
        query: &SearchQuery,
    ) -> RepoResult<Vec<MessageWithAuthor>> {
        if query.limit <= 0 {
            return Ok(Vec::new());
        }
        let limit = query.limit.min(MAX_MESSAGE_PAGE);

        let results = sqlx::query_as::<_, MessageWithAuthorModel>(
            r#"
            SELECT m.id, m.channel_id, m.author_id, m.content, m.created_at, m.edited_at,
                   u.username AS author_username,
                   u.display_name AS author_display_name,
                   u.avatar AS author_avatar
            FROM messages m
            INNER JOIN channels c ON c.id = m.channel_id
            INNER JOIN users u ON u.id = m.author_id
            WHERE c.guild_id = $1
              AND m.search_vector @@ plainto_tsquery('english', $2)
              AND ($3::BIGINT IS NULL OR m.author_id = $3)
              AND ($4::TIMESTAMPTZ IS NULL OR m.created_at < $4)
              AND ($5::TIMESTAMPTZ IS NULL OR m.created_at > $5)
            ORDER BY m.id DESC
            LIMIT $6
            "#,
        )
        .bind(guild_id.into_inner())
        .bind(&query.text)
        .bind(query.author_id.map(Snowflake::into_inner))
        .bind(query.before)
        .bind(query.after)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(MessageWithAuthor::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgMessageRepository>();
    }
}
