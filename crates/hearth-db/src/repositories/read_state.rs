//! PostgreSQL implementation of ReadStateRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use hearth_core::entities::ReadState;
use hearth_core::traits::{ReadStateRepository, RepoResult};
use hearth_core::value_objects::Snowflake;

use crate::models::ReadStateModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ReadStateRepository
#[derive(Clone)]
pub struct PgReadStateRepository {
    pool: PgPool,
}

impl PgReadStateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadStateRepository for PgReadStateRepository {
    #[instrument(skip(self))]
    async fn upsert(
        &self,
        user_id: Snowflake,
        channel_id: Snowflake,
        last_message_id: Snowflake,
    ) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO read_states (user_id, channel_id, last_message_id, mention_count, updated_at)
            VALUES ($1, $2, $3, 0, NOW())
            ON CONFLICT (user_id, channel_id) DO UPDATE
            SET last_message_id = EXCLUDED.last_message_id,
                mention_count = 0,
                updated_at = NOW()
            ",
        )
        .bind(user_id.into_inner())
        .bind(channel_id.into_inner())
        .bind(last_message_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn increment_mention_count(
        &self,
        user_id: Snowflake,
        channel_id: Snowflake,
    ) -> RepoResult<i32> {
        let count = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO read_states (user_id, channel_id, last_message_id, mention_count, updated_at)
            VALUES ($1, $2, NULL, 1, NOW())
            ON CONFLICT (user_id, channel_id) DO UPDATE
            SET mention_count = read_states.mention_count + 1,
                updated_at = NOW()
            RETURNING mention_count
            ",
        )
        .bind(user_id.into_inner())
        .bind(channel_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn find(
        &self,
        user_id: Snowflake,
        channel_id: Snowflake,
    ) -> RepoResult<Option<ReadState>> {
        let result = sqlx::query_as::<_, ReadStateModel>(
            r"
            SELECT user_id, channel_id, last_message_id, mention_count, updated_at
            FROM read_states
            WHERE user_id = $1 AND channel_id = $2
            ",
        )
        .bind(user_id.into_inner())
        .bind(channel_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ReadState::from))
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<ReadState>> {
        let results = sqlx::query_as::<_, ReadStateModel>(
            r"
            SELECT user_id, channel_id, last_message_id, mention_count, updated_at
            FROM read_states
            WHERE user_id = $1
            ORDER BY channel_id
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(ReadState::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_channel(&self, channel_id: Snowflake) -> RepoResult<Vec<ReadState>> {
        let results = sqlx::query_as::<_, ReadStateModel>(
            r"
            SELECT user_id, channel_id, last_message_id, mention_count, updated_at
            FROM read_states
            WHERE channel_id = $1
            ORDER BY user_id
            ",
        )
        .bind(channel_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(ReadState::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgReadStateRepository>();
    }
}
