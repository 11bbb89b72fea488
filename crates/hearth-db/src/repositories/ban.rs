//! PostgreSQL implementation of BanRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use hearth_core::entities::Ban;
use hearth_core::error::DomainError;
use hearth_core::traits::{BanRepository, RepoResult};
use hearth_core::value_objects::Snowflake;

use crate::models::BanModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of BanRepository
#[derive(Clone)]
pub struct PgBanRepository {
    pool: PgPool,
}

impl PgBanRepository {
    /// Create a new PgBanRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BanRepository for PgBanRepository {
    #[instrument(skip(self, ban), fields(guild_id = %ban.guild_id, user_id = %ban.user_id))]
    async fn create(&self, ban: &Ban) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO bans (guild_id, user_id, reason, banned_by, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(ban.guild_id.into_inner())
        .bind(ban.user_id.into_inner())
        .bind(&ban.reason)
        .bind(ban.banned_by.into_inner())
        .bind(ban.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyBanned))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Ban>> {
        let result = sqlx::query_as::<_, BanModel>(
            r#"
            SELECT guild_id, user_id, reason, banned_by, created_at
            FROM bans
            WHERE guild_id = $1 AND user_id = $2
            "#,
        )
        .bind(guild_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Ban::from))
    }

    #[instrument(skip(self))]
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Ban>> {
        let results = sqlx::query_as::<_, BanModel>(
            r#"
            SELECT guild_id, user_id, reason, banned_by, created_at
            FROM bans
            WHERE guild_id = $1
            ORDER BY created_at DESC, user_id
            "#,
        )
        .bind(guild_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Ban::from).collect())
    }

    #[instrument(skip(self))]
    async fn is_banned(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM bans WHERE guild_id = $1 AND user_id = $2)
            "#,
        )
        .bind(guild_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn delete(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM bans WHERE guild_id = $1 AND user_id = $2")
            .bind(guild_id.into_inner())
            .bind(user_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
