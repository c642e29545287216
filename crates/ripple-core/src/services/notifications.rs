//! Notification inbox: listing, explicit creation and read marking.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use uuid::Uuid;

use super::views::{load_summaries, summary_for};
use crate::domain::{Notification, NotificationKind, NotificationView};
use crate::error::DomainError;
use crate::ports::{NotificationRepository, PostRepository, UserRepository};

#[derive(Clone)]
pub struct NotificationInbox {
    notifications: Arc<dyn NotificationRepository>,
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
}

impl NotificationInbox {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
    ) -> Self {
        Self {
            notifications,
            users,
            posts,
        }
    }

    /// Notifications for `user_id`, newest first, with actor and post
    /// preview resolved. Deleted posts resolve to no preview.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<NotificationView>, DomainError> {
        let notifications = self.notifications.list_for(user_id).await?;

        let summaries =
            load_summaries(self.users.as_ref(), notifications.iter().map(|n| n.actor_id)).await?;

        let post_ids: Vec<Uuid> = notifications
            .iter()
            .filter_map(|n| n.kind.post_id())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let previews: HashMap<Uuid, _> = if post_ids.is_empty() {
            HashMap::new()
        } else {
            self.posts
                .list_by_ids(&post_ids)
                .await?
                .iter()
                .map(|p| (p.id, p.preview()))
                .collect()
        };

        Ok(notifications
            .into_iter()
            .map(|n| NotificationView {
                id: n.id,
                notification_type: n.kind.notification_type(),
                from: summary_for(&summaries, n.actor_id),
                post: n.kind.post_id().and_then(|id| previews.get(&id).cloned()),
                comment: n.kind.comment_id(),
                read: n.read,
                created_at: n.created_at,
            })
            .collect())
    }

    /// Explicitly create a notification. Unlike engagement fan-out, a
    /// storage failure here is the caller's failure. Self-notifications are
    /// skipped and reported as `None`.
    pub async fn create(
        &self,
        recipient: Uuid,
        actor: Uuid,
        kind: NotificationKind,
    ) -> Result<Option<Notification>, DomainError> {
        if recipient == actor {
            return Ok(None);
        }

        let notification = self
            .notifications
            .create(Notification::new(recipient, actor, kind))
            .await?;
        Ok(Some(notification))
    }

    pub async fn mark_read(&self, user_id: Uuid, id: Uuid) -> Result<(), DomainError> {
        if self.notifications.mark_read(user_id, id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("Notification", id))
        }
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, DomainError> {
        Ok(self.notifications.mark_all_read(user_id).await?)
    }
}
