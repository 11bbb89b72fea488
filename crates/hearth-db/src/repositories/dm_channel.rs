//! PostgreSQL implementation of DmChannelRepository

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use hearth_core::entities::{canonical_pair, DmChannel, DmChannelType, DmChannelWithRecipients};
use hearth_core::error::DomainError;
use hearth_core::traits::{DmChannelRepository, RepoResult};
use hearth_core::value_objects::Snowflake;

use crate::mappers::group_recipients;
use crate::models::{DmChannelModel, DmRecipientModel};

use super::error::{map_db_error, map_unique_violation, violated_constraint};

/// Partial unique index over the canonical pair of 1:1 channels
const PAIR_CONSTRAINT: &str = "dm_channels_pair_key";

/// The canonical user pair a channel must be stored under. Group channels
/// have none; 1:1 channels need exactly two distinct recipients.
fn dm_pair(
    channel: &DmChannel,
    recipient_ids: &[Snowflake],
) -> RepoResult<Option<(Snowflake, Snowflake)>> {
    if channel.is_group() {
        return Ok(None);
    }

    match recipient_ids {
        [a, b] if a != b => Ok(Some(canonical_pair(*a, *b))),
        [_, _] => Err(DomainError::ValidationError(
            "a direct message needs two different users".to_string(),
        )),
        _ => Err(DomainError::ValidationError(format!(
            "a direct message has exactly 2 recipients, got {}",
            recipient_ids.len()
        ))),
    }
}

/// PostgreSQL implementation of DmChannelRepository
#[derive(Clone)]
pub struct PgDmChannelRepository {
    pool: PgPool,
}

impl PgDmChannelRepository {
    /// Create a new PgDmChannelRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Channel row followed by one junction row per recipient
    async fn insert_channel(
        conn: &mut PgConnection,
        channel: &DmChannel,
        pair: Option<(Snowflake, Snowflake)>,
        recipient_ids: &[Snowflake],
    ) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO dm_channels (id, type, owner_id, dm_user_low, dm_user_high, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(channel.id.into_inner())
        .bind(channel.channel_type.as_i16())
        .bind(channel.owner_id.map(Snowflake::into_inner))
        .bind(pair.map(|(low, _)| low.into_inner()))
        .bind(pair.map(|(_, high)| high.into_inner()))
        .bind(channel.created_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            if violated_constraint(&e) == Some(PAIR_CONSTRAINT) {
                DomainError::DmChannelExists
            } else {
                map_db_error(e)
            }
        })?;

        for user_id in recipient_ids {
            sqlx::query("INSERT INTO dm_recipients (channel_id, user_id) VALUES ($1, $2)")
                .bind(channel.id.into_inner())
                .bind(user_id.into_inner())
                .execute(&mut *conn)
                .await
                .map_err(|e| map_unique_violation(e, || DomainError::DuplicateRecipient))?;
        }

        Ok(())
    }

    /// Attach recipients to channels with a single query
    async fn with_recipients(
        &self,
        channels: Vec<DmChannelModel>,
    ) -> RepoResult<Vec<DmChannelWithRecipients>> {
        if channels.is_empty() {
            return Ok(Vec::new());
        }

        let channel_ids: Vec<i64> = channels.iter().map(|c| c.id).collect();

        let recipients = sqlx::query_as::<_, DmRecipientModel>(
            r"
            SELECT dr.channel_id, u.id, u.username, u.display_name, u.avatar, u.created_at
            FROM dm_recipients dr
            INNER JOIN users u ON u.id = dr.user_id
            WHERE dr.channel_id = ANY($1)
            ORDER BY dr.channel_id, u.id
            ",
        )
        .bind(&channel_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(group_recipients(channels, recipients))
    }

    async fn find_by_pair(
        &self,
        low: Snowflake,
        high: Snowflake,
    ) -> RepoResult<Option<DmChannelWithRecipients>> {
        let channel = sqlx::query_as::<_, DmChannelModel>(
            r"
            SELECT id, type, owner_id, created_at
            FROM dm_channels
            WHERE type = 1 AND dm_user_low = $1 AND dm_user_high = $2
            ",
        )
        .bind(low.into_inner())
        .bind(high.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        match channel {
            Some(model) => Ok(self.with_recipients(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl DmChannelRepository for PgDmChannelRepository {
    #[instrument(skip(self, channel), fields(channel_id = %channel.id))]
    async fn create(&self, channel: &DmChannel, recipient_ids: &[Snowflake]) -> RepoResult<()> {
        let pair = dm_pair(channel, recipient_ids)?;

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        if let Err(e) = Self::insert_channel(&mut *tx, channel, pair, recipient_ids).await {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "DM channel rollback failed");
            }
            return Err(e);
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<DmChannelWithRecipients>> {
        let channel = sqlx::query_as::<_, DmChannelModel>(
            r"
            SELECT id, type, owner_id, created_at
            FROM dm_channels
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        match channel {
            Some(model) => Ok(self.with_recipients(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<DmChannelWithRecipients>> {
        let channels = sqlx::query_as::<_, DmChannelModel>(
            r"
            SELECT d.id, d.type, d.owner_id, d.created_at
            FROM dm_channels d
            INNER JOIN dm_recipients dr ON dr.channel_id = d.id
            WHERE dr.user_id = $1
            ORDER BY d.created_at DESC, d.id DESC
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        self.with_recipients(channels).await
    }

    #[instrument(skip(self))]
    async fn get_or_create_dm(
        &self,
        user1_id: Snowflake,
        user2_id: Snowflake,
        new_id: Snowflake,
    ) -> RepoResult<DmChannelWithRecipients> {
        if user1_id == user2_id {
            return Err(DomainError::ValidationError(
                "cannot open a direct message with yourself".to_string(),
            ));
        }

        let (low, high) = canonical_pair(user1_id, user2_id);

        if let Some(existing) = self.find_by_pair(low, high).await? {
            return Ok(existing);
        }

        match self.create(&DmChannel::new_dm(new_id), &[low, high]).await {
            Ok(()) => tracing::debug!(channel_id = %new_id, "Created DM channel"),
            // Lost the race to a concurrent caller; theirs is the channel
            Err(DomainError::DmChannelExists) => {
                tracing::debug!("DM channel created concurrently, re-fetching");
            }
            Err(e) => return Err(e),
        }

        self.find_by_pair(low, high).await?.ok_or_else(|| {
            DomainError::InternalError(format!("DM channel for {low}/{high} vanished after create"))
        })
    }

    #[instrument(skip(self))]
    async fn add_recipient(&self, channel_id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        // Only group channels take new recipients; a 1:1 channel stays a pair
        let inserted = sqlx::query(
            r"
            INSERT INTO dm_recipients (channel_id, user_id)
            SELECT id, $2 FROM dm_channels WHERE id = $1 AND type = $3
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(channel_id.into_inner())
        .bind(user_id.into_inner())
        .bind(DmChannelType::GroupDm.as_i16())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        if inserted > 0 {
            return Ok(());
        }

        let channel_type = sqlx::query_scalar::<_, i16>("SELECT type FROM dm_channels WHERE id = $1")
            .bind(channel_id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        match channel_type.map(DmChannelType::from) {
            None => Err(DomainError::InvalidReference(format!(
                "dm channel {channel_id} does not exist"
            ))),
            Some(DmChannelType::GroupDm) => Ok(()),
            Some(DmChannelType::Dm) => {
                if self.is_recipient(channel_id, user_id).await? {
                    Ok(())
                } else {
                    Err(DomainError::ValidationError(
                        "a direct message has exactly 2 recipients".to_string(),
                    ))
                }
            }
        }
    }

    #[instrument(skip(self))]
    async fn is_recipient(&self, channel_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM dm_recipients WHERE channel_id = $1 AND user_id = $2)
            ",
        )
        .bind(channel_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgDmChannelRepository>();
    }

    #[test]
    fn test_dm_pair_is_canonical() {
        let dm = DmChannel::new_dm(Snowflake::new(1));
        let pair = dm_pair(&dm, &[Snowflake::new(9), Snowflake::new(4)]).unwrap();
        assert_eq!(pair, Some((Snowflake::new(4), Snowflake::new(9))));
    }

    #[test]
    fn test_dm_pair_rejects_bad_recipient_sets() {
        let dm = DmChannel::new_dm(Snowflake::new(1));
        let same = dm_pair(&dm, &[Snowflake::new(4), Snowflake::new(4)]);
        assert!(matches!(same, Err(DomainError::ValidationError(_))));

        let three = dm_pair(&dm, &[Snowflake::new(1), Snowflake::new(2), Snowflake::new(3)]);
        assert!(matches!(three, Err(DomainError::ValidationError(_))));

        assert!(dm_pair(&dm, &[]).is_err());
    }

    #[test]
    fn test_group_has_no_pair() {
        let group = DmChannel::new_group(Snowflake::new(1), Snowflake::new(2));
        let ids = [Snowflake::new(2), Snowflake::new(3), Snowflake::new(4)];
        assert_eq!(dm_pair(&group, &ids).unwrap(), None);
    }
}
