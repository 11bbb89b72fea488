//! PostgreSQL implementation of RoleRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use hearth_core::entities::Role;
use hearth_core::traits::{RepoResult, RoleRepository};
use hearth_core::value_objects::Snowflake;

use crate::models::RoleModel;

use super::error::map_db_error;

/// PostgreSQL implementation of RoleRepository
#[derive(Clone)]
pub struct PgRoleRepository {
    pool: PgPool,
}

impl PgRoleRepository {
    /// Create a new PgRoleRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PgRoleRepository {
    #[instrument(skip(self, role), fields(role_id = %role.id, guild_id = %role.guild_id))]
    async fn create(&self, role: &Role) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO roles (id, guild_id, name, color, permissions, position, is_default)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(role.id.into_inner())
        .bind(role.guild_id.into_inner())
        .bind(&role.name)
        .bind(role.color)
        .bind(role.permissions.to_i64())
        .bind(role.position)
        .bind(role.is_default)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Role>> {
        let result = sqlx::query_as::<_, RoleModel>(
            r#"
            SELECT id, guild_id, name, color, permissions, position, is_default
            FROM roles
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Role::from))
    }

    #[instrument(skip(self))]
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Role>> {
        let results = sqlx::query_as::<_, RoleModel>(
            r#"
            SELECT id, guild_id, name, color, permissions, position, is_default
            FROM roles
            WHERE guild_id = $1
            ORDER BY position, id
            "#,
        )
        .bind(guild_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Role::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Vec<Role>> {
        let results = sqlx::query_as::<_, RoleModel>(
            r#"
            SELECT r.id, r.guild_id, r.name, r.color, r.permissions, r.position, r.is_default
            FROM roles r
            INNER JOIN member_roles mr ON mr.role_id = r.id
            WHERE mr.guild_id = $1 AND mr.user_id = $2
            ORDER BY r.position, r.id
            "#,
        )
        .bind(guild_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Role::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_default(&self, guild_id: Snowflake) -> RepoResult<Option<Role>> {
        let result = sqlx::query_as::<_, RoleModel>(
            r#"
            SELECT id, guild_id, name, color, permissions, position, is_default
            FROM roles
            WHERE guild_id = $1 AND is_default
            "#,
        )
        .bind(guild_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Role::from))
    }

    #[instrument(skip(self, role), fields(role_id = %role.id))]
    async fn update(&self, role: &Role) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE roles
            SET name = $2, color = $3, permissions = $4, position = $5
            WHERE id = $1
            "#,
        )
        .bind(role.id.into_inner())
        .bind(&role.name)
        .bind(role.color)
        .bind(role.permissions.to_i64())
        .bind(role.position)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<bool> {
        // Assignments and channel overrides cascade
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, positions), fields(count = positions.len()))]
    async fn update_positions(
        &self,
        guild_id: Snowflake,
        positions: &[(Snowflake, i32)],
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        for (role_id, position) in positions {
            sqlx::query(
                r#"
                UPDATE roles
                SET position = $3
                WHERE id = $1 AND guild_id = $2
                "#,
            )
            .bind(role_id.into_inner())
            .bind(guild_id.into_inner())
            .bind(position)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}
