//! PostgreSQL implementation of ChannelOverrideRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use hearth_core::entities::ChannelOverride;
use hearth_core::traits::{ChannelOverrideRepository, RepoResult};
use hearth_core::value_objects::Snowflake;

use crate::models::ChannelOverrideModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ChannelOverrideRepository
#[derive(Clone)]
pub struct PgChannelOverrideRepository {
    pool: PgPool,
}

impl PgChannelOverrideRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChannelOverrideRepository for PgChannelOverrideRepository {
    #[instrument(skip(self))]
    async fn set(&self, channel_override: &ChannelOverride) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO channel_overrides (channel_id, role_id, allow_perms, deny_perms)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (channel_id, role_id) DO UPDATE
            SET allow_perms = EXCLUDED.allow_perms,
                deny_perms = EXCLUDED.deny_perms
            ",
        )
        .bind(channel_override.channel_id.into_inner())
        .bind(channel_override.role_id.into_inner())
        .bind(channel_override.allow.to_i64())
        .bind(channel_override.deny.to_i64())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_channel(&self, channel_id: Snowflake) -> RepoResult<Vec<ChannelOverride>> {
        let results = sqlx::query_as::<_, ChannelOverrideModel>(
            r"
            SELECT channel_id, role_id, allow_perms, deny_perms
            FROM channel_overrides
            WHERE channel_id = $1
            ORDER BY role_id
            ",
        )
        .bind(channel_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(ChannelOverride::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete(&self, channel_id: Snowflake, role_id: Snowflake) -> RepoResult<()> {
        sqlx::query("DELETE FROM channel_overrides WHERE channel_id = $1 AND role_id = $2")
            .bind(channel_id.into_inner())
            .bind(role_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }
}
