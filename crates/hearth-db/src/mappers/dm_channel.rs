//! DM channel entity <- model mappers

use std::collections::HashMap;

use hearth_core::entities::{DmChannel, DmChannelType, DmChannelWithRecipients, User};
use hearth_core::value_objects::Snowflake;

use crate::models::{DmChannelModel, DmRecipientModel};

impl From<DmChannelModel> for DmChannel {
    fn from(model: DmChannelModel) -> Self {
        DmChannel {
            id: Snowflake::new(model.id),
            channel_type: DmChannelType::from(model.channel_type),
            owner_id: model.owner_id.map(Snowflake::new),
            created_at: model.created_at,
        }
    }
}

impl From<DmRecipientModel> for User {
    fn from(model: DmRecipientModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            username: model.username,
            display_name: model.display_name,
            avatar: model.avatar,
            created_at: model.created_at,
        }
    }
}

/// Attach recipient rows to their channels, keeping channel order.
/// Recipients keep the order they arrive in.
pub fn group_recipients(
    channels: Vec<DmChannelModel>,
    recipients: Vec<DmRecipientModel>,
) -> Vec<DmChannelWithRecipients> {
    let mut by_channel: HashMap<i64, Vec<User>> = HashMap::new();
    for row in recipients {
        by_channel.entry(row.channel_id).or_default().push(User::from(row));
    }

    channels
        .into_iter()
        .map(|model| {
            let recipients = by_channel.remove(&model.id).unwrap_or_default();
            DmChannelWithRecipients {
                channel: DmChannel::from(model),
                recipients,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn channel(id: i64) -> DmChannelModel {
        DmChannelModel {
            id,
            channel_type: 1,
            owner_id: None,
            created_at: Utc::now(),
        }
    }

    fn recipient(channel_id: i64, user_id: i64) -> DmRecipientModel {
        DmRecipientModel {
            channel_id,
            id: user_id,
            username: format!("user{user_id}"),
            display_name: format!("User {user_id}"),
            avatar: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_group_recipients_by_channel() {
        let grouped = group_recipients(
            vec![channel(20), channel(10), channel(30)],
            vec![recipient(10, 1), recipient(20, 1), recipient(10, 2), recipient(20, 3)],
        );

        let ids: Vec<i64> = grouped.iter().map(|c| c.channel.id.into_inner()).collect();
        assert_eq!(ids, vec![20, 10, 30]);

        let users: Vec<i64> = grouped[1]
            .recipients
            .iter()
            .map(|u| u.id.into_inner())
            .collect();
        assert_eq!(users, vec![1, 2]);
        assert!(grouped[2].recipients.is_empty());
    }

    #[test]
    fn test_group_type_maps() {
        let mut model = channel(1);
        model.channel_type = 3;
        model.owner_id = Some(7);
        let dm = DmChannel::from(model);
        assert!(dm.is_group());
        assert_eq!(dm.owner_id, Some(Snowflake::new(7)));
    }
}
