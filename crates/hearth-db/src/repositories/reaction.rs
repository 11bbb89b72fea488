//! PostgreSQL implementation of ReactionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use hearth_core::entities::{Reaction, ReactionCount};
use hearth_core::traits::{ReactionRepository, RepoResult, MAX_MESSAGE_PAGE};
use hearth_core::value_objects::Snowflake;

use crate::models::{ReactionCountModel, ReactionModel};

use super::error::map_db_error;

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    /// Create a new PgReactionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn add(&self, message_id: Snowflake, user_id: Snowflake, emoji: &str) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reactions (message_id, user_id, emoji)
            VALUES ($1, $2, $3)
            ON CONFLICT (message_id, user_id, emoji) DO NOTHING
            "#,
        )
        .bind(message_id.into_inner())
        .bind(user_id.into_inner())
        .bind(emoji)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
        emoji: &str,
    ) -> RepoResult<()> {
        sqlx::query(
            r#"
            DELETE FROM reactions
            WHERE message_id = $1 AND user_id = $2 AND emoji = $3
            "#,
        )
        .bind(message_id.into_inner())
        .bind(user_id.into_inner())
        .bind(emoji)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_message(&self, message_id: Snowflake) -> RepoResult<Vec<Reaction>> {
        let results = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT message_id, user_id, emoji, created_at
            FROM reactions
            WHERE message_id = $1
            ORDER BY created_at, user_id
            "#,
        )
        .bind(message_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Reaction::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_counts_by_message(
        &self,
        message_id: Snowflake,
        current_user_id: Snowflake,
    ) -> RepoResult<Vec<ReactionCount>> {
        let results = sqlx::query_as::<_, ReactionCountModel>(
            r#"
            SELECT emoji,
                   COUNT(*) AS count,
                   BOOL_OR(user_id = $2) AS me
            FROM reactions
            WHERE message_id = $1
            GROUP BY emoji
            ORDER BY MIN(created_at), emoji
            "#,
        )
        .bind(message_id.into_inner())
        .bind(current_user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(ReactionCount::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_users_by_reaction(
        &self,
        message_id: Snowflake,
        emoji: &str,
        limit: i64,
    ) -> RepoResult<Vec<Snowflake>> {
        if limit <= 0 {
            return Ok(Vec::new());
        }
        let limit = limit.min(MAX_MESSAGE_PAGE);

        let user_ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT user_id
            FROM reactions
            WHERE message_id = $1 AND emoji = $2
            ORDER BY created_at, user_id
            LIMIT $3
            "#,
        )
        .bind(message_id.into_inner())
        .bind(emoji)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(user_ids.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self))]
    async fn remove_all(&self, message_id: Snowflake) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM reactions WHERE message_id = $1")
            .bind(message_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn remove_emoji(&self, message_id: Snowflake, emoji: &str) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM reactions WHERE message_id = $1 AND emoji = $2")
            .bind(message_id.into_inner())
            .bind(emoji)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
