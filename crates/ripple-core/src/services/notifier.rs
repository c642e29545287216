//! Notification fan-out.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Notification, NotificationKind};
use crate::ports::NotificationRepository;

/// Best-effort notification writer used by every engagement action.
#[derive(Clone)]
pub struct Notifier {
    notifications: Arc<dyn NotificationRepository>,
}

impl Notifier {
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }

    /// Notify `recipient` that `actor` did something.
    ///
    /// Self-actions are suppressed. A failed write is logged and swallowed:
    /// the caller's primary mutation has already happened and stays
    /// successful. Returns the stored notification, if any.
    pub async fn notify(
        &self,
        recipient: Uuid,
        actor: Uuid,
        kind: NotificationKind,
    ) -> Option<Notification> {
        let notification_type = kind.notification_type().as_str();

        if recipient == actor {
            tracing::debug!(user_id = %actor, notification_type, "Self-action, notification suppressed");
            return None;
        }

        match self
            .notifications
            .create(Notification::new(recipient, actor, kind))
            .await
        {
            Ok(notification) => {
                tracing::info!(
                    notification_id = %notification.id,
                    recipient = %recipient,
                    actor = %actor,
                    notification_type,
                    "Notification created"
                );
                Some(notification)
            }
            Err(e) => {
                tracing::warn!(
                    recipient = %recipient,
                    actor = %actor,
                    notification_type,
                    error = %e,
                    "Notification write failed"
                );
                None
            }
        }
    }
}
