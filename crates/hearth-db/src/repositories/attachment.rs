//! PostgreSQL implementation of AttachmentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use hearth_core::entities::Attachment;
use hearth_core::traits::{AttachmentRepository, RepoResult};
use hearth_core::value_objects::Snowflake;

use crate::models::AttachmentModel;

use super::error::map_db_error;

/// PostgreSQL implementation of AttachmentRepository
#[derive(Clone)]
pub struct PgAttachmentRepository {
    pool: PgPool,
}

impl PgAttachmentRepository {
    /// Create a new PgAttachmentRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttachmentRepository for PgAttachmentRepository {
    #[instrument(skip(self, attachment), fields(attachment_id = %attachment.id, message_id = %attachment.message_id))]
    async fn create(&self, attachment: &Attachment) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO attachments (id, message_id, filename, content_type, size, storage_key)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(attachment.id.into_inner())
        .bind(attachment.message_id.into_inner())
        .bind(&attachment.filename)
        .bind(&attachment.content_type)
        .bind(attachment.size)
        .bind(&attachment.storage_key)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_message(&self, message_id: Snowflake) -> RepoResult<Vec<Attachment>> {
        let results = sqlx::query_as::<_, AttachmentModel>(
            r"
            SELECT id, message_id, filename, content_type, size, storage_key
            FROM attachments
            WHERE message_id = $1
            ORDER BY id
            ",
        )
        .bind(message_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Attachment::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM attachments WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete_by_message(&self, message_id: Snowflake) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM attachments WHERE message_id = $1")
            .bind(message_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgAttachmentRepository>();
    }
}
