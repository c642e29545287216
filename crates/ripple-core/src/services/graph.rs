//! Follow graph mutations.

use std::sync::Arc;

use uuid::Uuid;

use super::Notifier;
use crate::domain::NotificationKind;
use crate::error::DomainError;
use crate::ports::UserRepository;

#[derive(Clone)]
pub struct SocialGraph {
    users: Arc<dyn UserRepository>,
    notifier: Notifier,
}

impl SocialGraph {
    pub fn new(users: Arc<dyn UserRepository>, notifier: Notifier) -> Self {
        Self { users, notifier }
    }

    /// `actor` starts following `target` and notifies the target.
    ///
    /// Membership has set semantics, so following twice keeps one edge but
    /// notifies each time. Unknown ids make this a silent no-op. Returns
    /// whether a new edge was created.
    pub async fn follow(&self, actor: Uuid, target: Uuid) -> Result<bool, DomainError> {
        if actor == target {
            return Err(DomainError::validation("Users cannot follow themselves"));
        }

        if !self.exists(actor).await? || !self.exists(target).await? {
            tracing::debug!(follower = %actor, followee = %target, "Follow of unknown user ignored");
            return Ok(false);
        }

        let created = self.users.add_follow(actor, target).await?;
        self.notifier
            .notify(target, actor, NotificationKind::Follow)
            .await;

        tracing::debug!(follower = %actor, followee = %target, created, "Follow processed");
        Ok(created)
    }

    /// `actor` stops following `target`. Earlier follow notifications stay.
    pub async fn unfollow(&self, actor: Uuid, target: Uuid) -> Result<bool, DomainError> {
        let removed = self.users.remove_follow(actor, target).await?;
        tracing::debug!(follower = %actor, followee = %target, removed, "Unfollow processed");
        Ok(removed)
    }

    async fn exists(&self, user_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.users.find_by_id(user_id).await?.is_some())
    }
}
