//! PostgreSQL implementation of MemberRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use hearth_core::entities::Member;
use hearth_core::error::DomainError;
use hearth_core::traits::{MemberRepository, RepoResult, MAX_MEMBER_PAGE};
use hearth_core::value_objects::Snowflake;

use crate::models::MemberModel;

use super::error::{map_db_error, map_unique_violation};

/// Member columns plus the held role ids, ordered the way roles are listed
const MEMBER_SELECT: &str = r"
    SELECT gm.guild_id, gm.user_id, gm.nickname, gm.joined_at,
           COALESCE(
               ARRAY_AGG(r.id ORDER BY r.position, r.id) FILTER (WHERE r.id IS NOT NULL),
               '{}'
           ) AS role_ids
    FROM guild_members gm
    LEFT JOIN member_roles mr ON mr.guild_id = gm.guild_id AND mr.user_id = gm.user_id
    LEFT JOIN roles r ON r.id = mr.role_id
";

/// PostgreSQL implementation of MemberRepository
#[derive(Clone)]
pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    /// Create a new PgMemberRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    #[instrument(skip(self, member), fields(guild_id = %member.guild_id, user_id = %member.user_id))]
    async fn create(&self, member: &Member) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO guild_members (guild_id, user_id, nickname, joined_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(member.guild_id.into_inner())
        .bind(member.user_id.into_inner())
        .bind(&member.nickname)
        .bind(member.joined_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyMember))?;

        if !member.role_ids.is_empty() {
            let role_ids: Vec<i64> = member
                .role_ids
                .iter()
                .copied()
                .map(Snowflake::into_inner)
                .collect();

            sqlx::query(
                r"
                INSERT INTO member_roles (guild_id, user_id, role_id)
                SELECT $1, $2, UNNEST($3::BIGINT[])
                ON CONFLICT DO NOTHING
                ",
            )
            .bind(member.guild_id.into_inner())
            .bind(member.user_id.into_inner())
            .bind(&role_ids)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Member>> {
        let sql = format!(
            "{MEMBER_SELECT} WHERE gm.guild_id = $1 AND gm.user_id = $2 \
             GROUP BY gm.guild_id, gm.user_id"
        );

        let result = sqlx::query_as::<_, MemberModel>(&sql)
            .bind(guild_id.into_inner())
            .bind(user_id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(Member::from))
    }

    #[instrument(skip(self))]
    async fn find_by_guild(
        &self,
        guild_id: Snowflake,
        limit: i64,
        after: Option<Snowflake>,
    ) -> RepoResult<Vec<Member>> {
        if limit <= 0 {
            return Ok(Vec::new());
        }
        let limit = limit.min(MAX_MEMBER_PAGE);
        let sql = format!(
            "{MEMBER_SELECT} WHERE gm.guild_id = $1 AND ($2::BIGINT IS NULL OR gm.user_id > $2) \
             GROUP BY gm.guild_id, gm.user_id \
             ORDER BY gm.user_id \
             LIMIT $3"
        );

        let results = sqlx::query_as::<_, MemberModel>(&sql)
            .bind(guild_id.into_inner())
            .bind(after.map(Snowflake::into_inner))
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(Member::from).collect())
    }

    #[instrument(skip(self))]
    async fn is_member(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM guild_members WHERE guild_id = $1 AND user_id = $2)
            ",
        )
        .bind(guild_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }

    #[instrument(skip(self, member), fields(guild_id = %member.guild_id, user_id = %member.user_id))]
    async fn update(&self, member: &Member) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE guild_members
            SET nickname = $3
            WHERE guild_id = $1 AND user_id = $2
            ",
        )
        .bind(member.guild_id.into_inner())
        .bind(member.user_id.into_inner())
        .bind(&member.nickname)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        // member_roles rows go with the member via cascade
        let result = sqlx::query("DELETE FROM guild_members WHERE guild_id = $1 AND user_id = $2")
            .bind(guild_id.into_inner())
            .bind(user_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn add_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO member_roles (guild_id, user_id, role_id)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(guild_id.into_inner())
        .bind(user_id.into_inner())
        .bind(role_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> RepoResult<()> {
        sqlx::query(
            r"
            DELETE FROM member_roles
            WHERE guild_id = $1 AND user_id = $2 AND role_id = $3
            ",
        )
        .bind(guild_id.into_inner())
        .bind(user_id.into_inner())
        .bind(role_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
