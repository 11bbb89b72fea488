//! Direct messages, read states and voice states against PostgreSQL

mod common;

use chrono::Duration;

use hearth_core::entities::{DmChannel, VoiceState};
use hearth_core::error::DomainError;
use hearth_core::traits::{DmChannelRepository, ReadStateRepository, VoiceStateRepository};
use hearth_core::value_objects::Snowflake;
use hearth_db::{PgDmChannelRepository, PgReadStateRepository, PgVoiceStateRepository};

use common::{get_test_pool, next_id, seed_channel, seed_guild, seed_user};

#[tokio::test]
async fn test_get_or_create_dm_ignores_argument_order() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    let dms = PgDmChannelRepository::new(pool.clone());

    let a = seed_user(&pool).await;
    let b = seed_user(&pool).await;

    let first_id = next_id();
    let first = dms.get_or_create_dm(a.id, b.id, first_id).await.unwrap();
    assert_eq!(first.channel.id, first_id);

    let second = dms.get_or_create_dm(b.id, a.id, next_id()).await.unwrap();
    assert_eq!(second.channel.id, first_id);

    let recipient_ids: Vec<Snowflake> = second.recipients.iter().map(|u| u.id).collect();
    assert_eq!(recipient_ids, vec![a.id, b.id]);
    assert_eq!(second.other_recipient(a.id).map(|u| u.id), Some(b.id));
}

#[tokio::test]
async fn test_concurrent_get_or_create_converges() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    let dms = PgDmChannelRepository::new(pool.clone());

    let a = seed_user(&pool).await;
    let b = seed_user(&pool).await;

    let (left, right) = tokio::join!(
        dms.get_or_create_dm(a.id, b.id, next_id()),
        dms.get_or_create_dm(b.id, a.id, next_id()),
    );
    assert_eq!(left.unwrap().channel.id, right.unwrap().channel.id);

    let channels = dms.find_by_user(a.id).await.unwrap();
    assert_eq!(channels.len(), 1);
}

#[tokio::test]
async fn test_dm_with_self_is_rejected() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    let dms = PgDmChannelRepository::new(pool.clone());
    let a = seed_user(&pool).await;

    let err = dms.get_or_create_dm(a.id, a.id, next_id()).await.unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_second_dm_for_pair_conflicts() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    let dms = PgDmChannelRepository::new(pool.clone());

    let a = seed_user(&pool).await;
    let b = seed_user(&pool).await;
    dms.create(&DmChannel::new_dm(next_id()), &[a.id, b.id])
        .await
        .unwrap();

    let duplicate = DmChannel::new_dm(next_id());
    let err = dms.create(&duplicate, &[b.id, a.id]).await.unwrap_err();
    assert!(matches!(err, DomainError::DmChannelExists));
    assert!(dms.find_by_id(duplicate.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_one_to_one_dm_takes_no_third_recipient() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    let dms = PgDmChannelRepository::new(pool.clone());

    let a = seed_user(&pool).await;
    let b = seed_user(&pool).await;
    let c = seed_user(&pool).await;
    let dm = dms.get_or_create_dm(a.id, b.id, next_id()).await.unwrap();

    let err = dms.add_recipient(dm.channel.id, c.id).await.unwrap_err();
    assert!(err.is_validation());
    assert!(!dms.is_recipient(dm.channel.id, c.id).await.unwrap());

    // Re-adding a current recipient stays a no-op
    dms.add_recipient(dm.channel.id, b.id).await.unwrap();

    let found = dms.find_by_id(dm.channel.id).await.unwrap().unwrap();
    assert_eq!(found.recipients.len(), 2);

    let other = dms.get_or_create_dm(a.id, c.id, next_id()).await.unwrap();
    assert_ne!(other.channel.id, dm.channel.id);
    assert_eq!(other.recipients.len(), 2);
}

#[tokio::test]
async fn test_add_recipient_to_missing_channel_is_invalid_reference() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    let dms = PgDmChannelRepository::new(pool.clone());
    let a = seed_user(&pool).await;

    let err = dms.add_recipient(next_id(), a.id).await.unwrap_err();
    assert!(err.is_invalid_reference());
}

#[tokio::test]
async fn test_group_dm_duplicate_recipient_rolls_back() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    let dms = PgDmChannelRepository::new(pool.clone());

    let owner = seed_user(&pool).await;
    let friend = seed_user(&pool).await;
    let group = DmChannel::new_group(next_id(), owner.id);

    let err = dms
        .create(&group, &[owner.id, friend.id, owner.id])
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::DuplicateRecipient));

    // Neither the channel nor the recipients that went in first survive
    assert!(dms.find_by_id(group.id).await.unwrap().is_none());
    assert!(!dms.is_recipient(group.id, owner.id).await.unwrap());
}

#[tokio::test]
async fn test_group_dm_recipients() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    let dms = PgDmChannelRepository::new(pool.clone());

    let owner = seed_user(&pool).await;
    let friend = seed_user(&pool).await;
    let late = seed_user(&pool).await;

    let group = DmChannel::new_group(next_id(), owner.id);
    dms.create(&group, &[friend.id, owner.id]).await.unwrap();
    let dm = dms.get_or_create_dm(owner.id, friend.id, next_id()).await.unwrap();

    dms.add_recipient(group.id, late.id).await.unwrap();
    dms.add_recipient(group.id, late.id).await.unwrap();
    assert!(dms.is_recipient(group.id, late.id).await.unwrap());

    let found = dms.find_by_id(group.id).await.unwrap().unwrap();
    assert!(found.channel.is_group());
    assert_eq!(found.channel.owner_id, Some(owner.id));
    let ids: Vec<Snowflake> = found.recipients.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![owner.id, friend.id, late.id]);

    // Newest channel first
    let listed: Vec<Snowflake> = dms
        .find_by_user(owner.id)
        .await
        .unwrap()
        .iter()
        .map(|c| c.channel.id)
        .collect();
    assert_eq!(listed, vec![dm.channel.id, group.id]);

    assert!(dms.find_by_user(next_id()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_read_state_upsert_and_mentions() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    let states = PgReadStateRepository::new(pool.clone());

    let user = seed_user(&pool).await;
    let channel_id = next_id();
    let first = next_id();
    let later = next_id();

    states.upsert(user.id, channel_id, first).await.unwrap();
    let state = states.find(user.id, channel_id).await.unwrap().unwrap();
    assert_eq!(state.last_message_id, Some(first));
    assert_eq!(state.mention_count, 0);

    assert_eq!(states.increment_mention_count(user.id, channel_id).await.unwrap(), 1);
    assert_eq!(states.increment_mention_count(user.id, channel_id).await.unwrap(), 2);
    let state = states.find(user.id, channel_id).await.unwrap().unwrap();
    assert_eq!(state.last_message_id, Some(first));
    assert_eq!(state.mention_count, 2);
    assert!(state.is_unread(later));

    states.upsert(user.id, channel_id, later).await.unwrap();
    let state = states.find(user.id, channel_id).await.unwrap().unwrap();
    assert_eq!(state.last_message_id, Some(later));
    assert_eq!(state.mention_count, 0);
}

#[tokio::test]
async fn test_mention_before_any_read_creates_row() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    let states = PgReadStateRepository::new(pool.clone());

    let user = seed_user(&pool).await;
    let other = seed_user(&pool).await;
    let channel_a = next_id();
    let channel_b = next_id();

    assert!(states.find(user.id, channel_a).await.unwrap().is_none());
    assert_eq!(states.increment_mention_count(user.id, channel_a).await.unwrap(), 1);
    let state = states.find(user.id, channel_a).await.unwrap().unwrap();
    assert_eq!(state.last_message_id, None);

    states.upsert(user.id, channel_b, next_id()).await.unwrap();
    states.upsert(other.id, channel_a, next_id()).await.unwrap();

    let mine: Vec<Snowflake> = states
        .find_by_user(user.id)
        .await
        .unwrap()
        .iter()
        .map(|s| s.channel_id)
        .collect();
    assert_eq!(mine, vec![channel_a, channel_b]);

    let readers: Vec<Snowflake> = states
        .find_by_channel(channel_a)
        .await
        .unwrap()
        .iter()
        .map(|s| s.user_id)
        .collect();
    assert_eq!(readers, vec![user.id, other.id]);
}

#[tokio::test]
async fn test_voice_state_keeps_join_time() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    let voice = PgVoiceStateRepository::new(pool.clone());

    let (owner, guild) = seed_guild(&pool).await;
    let lobby = seed_channel(&pool, guild.id).await;
    let stage = seed_channel(&pool, guild.id).await;

    voice
        .upsert(&VoiceState::new(guild.id, owner.id, lobby.id, "session-1".to_string()))
        .await
        .unwrap();
    let joined = voice.find(guild.id, owner.id).await.unwrap().unwrap();

    let mut moved = VoiceState::new(guild.id, owner.id, stage.id, "session-2".to_string());
    moved.self_mute = true;
    moved.joined_at = joined.joined_at + Duration::hours(1);
    voice.upsert(&moved).await.unwrap();

    let state = voice.find(guild.id, owner.id).await.unwrap().unwrap();
    assert_eq!(state.channel_id, stage.id);
    assert_eq!(state.session_id, "session-2");
    assert!(state.self_mute);
    assert!(!state.self_deaf);
    assert_eq!(state.joined_at, joined.joined_at);

    assert!(voice.find_by_channel(lobby.id).await.unwrap().is_empty());
    assert_eq!(voice.find_by_channel(stage.id).await.unwrap().len(), 1);
    assert_eq!(voice.find_by_guild(guild.id).await.unwrap().len(), 1);

    assert!(voice.delete(guild.id, owner.id).await.unwrap());
    assert!(voice.find(guild.id, owner.id).await.unwrap().is_none());
    assert!(!voice.delete(guild.id, owner.id).await.unwrap());
}
