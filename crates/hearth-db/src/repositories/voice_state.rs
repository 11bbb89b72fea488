//! PostgreSQL implementation of VoiceStateRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use hearth_core::entities::VoiceState;
use hearth_core::traits::{RepoResult, VoiceStateRepository};
use hearth_core::value_objects::Snowflake;

use crate::models::VoiceStateModel;

use super::error::map_db_error;

/// PostgreSQL implementation of VoiceStateRepository
#[derive(Clone)]
pub struct PgVoiceStateRepository {
    pool: PgPool,
}

impl PgVoiceStateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoiceStateRepository for PgVoiceStateRepository {
    #[instrument(skip(self, state), fields(guild_id = %state.guild_id, user_id = %state.user_id, channel_id = %state.channel_id))]
    async fn upsert(&self, state: &VoiceState) -> RepoResult<()> {
        // joined_at keeps its first value
        sqlx::query(
            r"
            INSERT INTO voice_states (guild_id, user_id, channel_id, session_id,
                                      self_mute, self_deaf, joined_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (guild_id, user_id) DO UPDATE
            SET channel_id = EXCLUDED.channel_id,
                session_id = EXCLUDED.session_id,
                self_mute = EXCLUDED.self_mute,
                self_deaf = EXCLUDED.self_deaf
            ",
        )
        .bind(state.guild_id.into_inner())
        .bind(state.user_id.into_inner())
        .bind(state.channel_id.into_inner())
        .bind(&state.session_id)
        .bind(state.self_mute)
        .bind(state.self_deaf)
        .bind(state.joined_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM voice_states WHERE guild_id = $1 AND user_id = $2")
            .bind(guild_id.into_inner())
            .bind(user_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn find(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<VoiceState>> {
        let result = sqlx::query_as::<_, VoiceStateModel>(
            r"
            SELECT guild_id, user_id, channel_id, session_id, self_mute, self_deaf, joined_at
            FROM voice_states
            WHERE guild_id = $1 AND user_id = $2
            ",
        )
        .bind(guild_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(VoiceState::from))
    }

    #[instrument(skip(self))]
    async fn find_by_channel(&self, channel_id: Snowflake) -> RepoResult<Vec<VoiceState>> {
        let results = sqlx::query_as::<_, VoiceStateModel>(
            r"
            SELECT guild_id, user_id, channel_id, session_id, self_mute, self_deaf, joined_at
            FROM voice_states
            WHERE channel_id = $1
            ORDER BY joined_at, user_id
            ",
        )
        .bind(channel_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(VoiceState::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<VoiceState>> {
        let results = sqlx::query_as::<_, VoiceStateModel>(
            r"
            SELECT guild_id, user_id, channel_id, session_id, self_mute, self_deaf, joined_at
            FROM voice_states
            WHERE guild_id = $1
            ORDER BY joined_at, user_id
            ",
        )
        .bind(guild_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(VoiceState::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgVoiceStateRepository>();
    }
}
