//! PostgreSQL implementation of ChannelRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use hearth_core::entities::Channel;
use hearth_core::error::DomainError;
use hearth_core::traits::{ChannelRepository, RepoResult};
use hearth_core::value_objects::Snowflake;

use crate::models::ChannelModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of ChannelRepository
#[derive(Clone)]
pub struct PgChannelRepository {
    pool: PgPool,
}

impl PgChannelRepository {
    /// Create a new PgChannelRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChannelRepository for PgChannelRepository {
    #[instrument(skip(self, channel), fields(channel_id = %channel.id, guild_id = %channel.guild_id))]
    async fn create(&self, channel: &Channel) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO channels (id, guild_id, name, type, position, topic, parent_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(channel.id.into_inner())
        .bind(channel.guild_id.into_inner())
        .bind(&channel.name)
        .bind(channel.channel_type.as_i16())
        .bind(channel.position)
        .bind(&channel.topic)
        .bind(channel.parent_id.map(Snowflake::into_inner))
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ChannelNameTaken(channel.name.clone())))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Channel>> {
        let result = sqlx::query_as::<_, ChannelModel>(
            r#"
            SELECT id, guild_id, name, type, position, topic, parent_id
            FROM channels
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Channel::from))
    }

    #[instrument(skip(self))]
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Channel>> {
        let results = sqlx::query_as::<_, ChannelModel>(
            r#"
            SELECT id, guild_id, name, type, position, topic, parent_id
            FROM channels
            WHERE guild_id = $1
            ORDER BY position, id
            "#,
        )
        .bind(guild_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Channel::from).collect())
    }

    #[instrument(skip(self, channel), fields(channel_id = %channel.id))]
    async fn update(&self, channel: &Channel) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE channels
            SET name = $2, position = $3, topic = $4, parent_id = $5
            WHERE id = $1
            "#,
        )
        .bind(channel.id.into_inner())
        .bind(&channel.name)
        .bind(channel.position)
        .bind(&channel.topic)
        .bind(channel.parent_id.map(Snowflake::into_inner))
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ChannelNameTaken(channel.name.clone())))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<bool> {
        // Messages and read states point at channels without a foreign key
        // (DM channels share the id space), so they are removed here.
        // Overrides, voice states and invites follow via the schema.
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let removed = sqlx::query("DELETE FROM messages WHERE channel_id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        sqlx::query("DELETE FROM read_states WHERE channel_id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let result = sqlx::query("DELETE FROM channels WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        tracing::debug!(messages = removed.rows_affected(), "Channel history removed");

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgChannelRepository>();
    }
}
