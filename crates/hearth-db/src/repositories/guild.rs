//! PostgreSQL implementation of GuildRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use hearth_core::entities::Guild;
use hearth_core::traits::{GuildRepository, RepoResult};
use hearth_core::value_objects::Snowflake;

use crate::models::GuildModel;

use super::error::map_db_error;

/// PostgreSQL implementation of GuildRepository
#[derive(Clone)]
pub struct PgGuildRepository {
    pool: PgPool,
}

impl PgGuildRepository {
    /// Create a new PgGuildRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuildRepository for PgGuildRepository {
    #[instrument(skip(self, guild), fields(guild_id = %guild.id))]
    async fn create(&self, guild: &Guild) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO guilds (id, name, icon, owner_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(guild.id.into_inner())
        .bind(&guild.name)
        .bind(&guild.icon)
        .bind(guild.owner_id.into_inner())
        .bind(guild.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Guild>> {
        let result = sqlx::query_as::<_, GuildModel>(
            r"
            SELECT id, name, icon, owner_id, created_at
            FROM guilds
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Guild::from))
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<Guild>> {
        let results = sqlx::query_as::<_, GuildModel>(
            r"
            SELECT g.id, g.name, g.icon, g.owner_id, g.created_at
            FROM guilds g
            INNER JOIN guild_members gm ON gm.guild_id = g.id
            WHERE gm.user_id = $1
            ORDER BY g.id
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Guild::from).collect())
    }

    #[instrument(skip(self, guild), fields(guild_id = %guild.id))]
    async fn update(&self, guild: &Guild) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE guilds
            SET name = $2, icon = $3, owner_id = $4
            WHERE id = $1
            ",
        )
        .bind(guild.id.into_inner())
        .bind(&guild.name)
        .bind(&guild.icon)
        .bind(guild.owner_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<bool> {
        // Guild channels own their messages but messages carry no foreign
        // key, so clear them before the cascade removes the channels.
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            DELETE FROM messages
            WHERE channel_id IN (SELECT id FROM channels WHERE guild_id = $1)
            ",
        )
        .bind(id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r"
            DELETE FROM read_states
            WHERE channel_id IN (SELECT id FROM channels WHERE guild_id = $1)
            ",
        )
        .bind(id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let result = sqlx::query("DELETE FROM guilds WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
