//! PostgreSQL implementation of InviteRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use hearth_core::entities::Invite;
use hearth_core::error::DomainError;
use hearth_core::traits::{InviteRepository, RepoResult};
use hearth_core::value_objects::Snowflake;

use crate::models::InviteModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of InviteRepository
#[derive(Clone)]
pub struct PgInviteRepository {
    pool: PgPool,
}

impl PgInviteRepository {
    /// Create a new PgInviteRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InviteRepository for PgInviteRepository {
    #[instrument(skip(self, invite), fields(code = %invite.code, guild_id = %invite.guild_id))]
    async fn create(&self, invite: &Invite) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO invites (code, guild_id, channel_id, creator_id, max_uses, uses,
                                 expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&invite.code)
        .bind(invite.guild_id.into_inner())
        .bind(invite.channel_id.map(Snowflake::into_inner))
        .bind(invite.creator_id.into_inner())
        .bind(invite.max_uses)
        .bind(invite.uses)
        .bind(invite.expires_at)
        .bind(invite.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::InviteCodeExists(invite.code.clone())))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_code(&self, code: &str) -> RepoResult<Option<Invite>> {
        let result = sqlx::query_as::<_, InviteModel>(
            r#"
            SELECT code, guild_id, channel_id, creator_id, max_uses, uses, expires_at, created_at
            FROM invites
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Invite::from))
    }

    #[instrument(skip(self))]
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Invite>> {
        let results = sqlx::query_as::<_, InviteModel>(
            r#"
            SELECT code, guild_id, channel_id, creator_id, max_uses, uses, expires_at, created_at
            FROM invites
            WHERE guild_id = $1
            ORDER BY created_at DESC, code
            "#,
        )
        .bind(guild_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Invite::from).collect())
    }

    #[instrument(skip(self))]
    async fn increment_uses(&self, code: &str) -> RepoResult<Option<i32>> {
        let uses = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE invites
            SET uses = uses + 1
            WHERE code = $1
            RETURNING uses
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(uses)
    }

    #[instrument(skip(self))]
    async fn delete(&self, code: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM invites WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgInviteRepository>();
    }
}
