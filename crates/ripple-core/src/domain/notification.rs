use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PostPreview, UserSummary};
use crate::error::DomainError;

/// Closed set of notification types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Like,
    Follow,
    Comment,
    Message,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Like => "like",
            NotificationType::Follow => "follow",
            NotificationType::Comment => "comment",
            NotificationType::Message => "message",
        }
    }
}

impl FromStr for NotificationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(NotificationType::Like),
            "follow" => Ok(NotificationType::Follow),
            "comment" => Ok(NotificationType::Comment),
            "message" => Ok(NotificationType::Message),
            other => Err(DomainError::Validation(format!(
                "Unknown notification type: {other}"
            ))),
        }
    }
}

/// A notification's type together with the references that type requires.
///
/// Likes and comments always point at a post, comments also at the
/// comment itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Like { post_id: Uuid },
    Follow,
    Comment { post_id: Uuid, comment_id: Uuid },
    Message,
}

impl NotificationKind {
    /// Rebuild a kind from loosely stored parts, enforcing the reference rules.
    pub fn from_parts(
        notification_type: NotificationType,
        post_id: Option<Uuid>,
        comment_id: Option<Uuid>,
    ) -> Result<Self, DomainError> {
        match (notification_type, post_id, comment_id) {
            (NotificationType::Like, Some(post_id), _) => Ok(Self::Like { post_id }),
            (NotificationType::Comment, Some(post_id), Some(comment_id)) => Ok(Self::Comment {
                post_id,
                comment_id,
            }),
            (NotificationType::Follow, _, _) => Ok(Self::Follow),
            (NotificationType::Message, _, _) => Ok(Self::Message),
            (NotificationType::Like, None, _) => Err(DomainError::Validation(
                "Like notifications require a post".to_string(),
            )),
            (NotificationType::Comment, None, _) => Err(DomainError::Validation(
                "Comment notifications require a post".to_string(),
            )),
            (NotificationType::Comment, Some(_), None) => Err(DomainError::Validation(
                "Comment notifications require a comment".to_string(),
            )),
        }
    }

    pub fn notification_type(&self) -> NotificationType {
        match self {
            Self::Like { .. } => NotificationType::Like,
            Self::Follow => NotificationType::Follow,
            Self::Comment { .. } => NotificationType::Comment,
            Self::Message => NotificationType::Message,
        }
    }

    pub fn post_id(&self) -> Option<Uuid> {
        match self {
            Self::Like { post_id } | Self::Comment { post_id, .. } => Some(*post_id),
            Self::Follow | Self::Message => None,
        }
    }

    pub fn comment_id(&self) -> Option<Uuid> {
        match self {
            Self::Comment { comment_id, .. } => Some(*comment_id),
            _ => None,
        }
    }
}

/// Notification entity - an engagement event addressed to `recipient_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "NotificationRecord", try_from = "NotificationRecord")]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub actor_id: Uuid,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(recipient_id: Uuid, actor_id: Uuid, kind: NotificationKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient_id,
            actor_id,
            kind,
            read: false,
            created_at: Utc::now(),
        }
    }
}

/// Flat wire shape of a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotificationRecord {
    id: Uuid,
    user: Uuid,
    from: Uuid,
    #[serde(rename = "type")]
    notification_type: NotificationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    post: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<Uuid>,
    read: bool,
    created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationRecord {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            user: n.recipient_id,
            from: n.actor_id,
            notification_type: n.kind.notification_type(),
            post: n.kind.post_id(),
            comment: n.kind.comment_id(),
            read: n.read,
            created_at: n.created_at,
        }
    }
}

impl TryFrom<NotificationRecord> for Notification {
    type Error = DomainError;

    fn try_from(r: NotificationRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            recipient_id: r.user,
            actor_id: r.from,
            kind: NotificationKind::from_parts(r.notification_type, r.post, r.comment)?,
            read: r.read,
            created_at: r.created_at,
        })
    }
}

/// Notification with the actor and post resolved for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub from: UserSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<PostPreview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_requires_post() {
        let result = NotificationKind::from_parts(NotificationType::Like, None, None);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_comment_requires_comment_reference() {
        let post = Uuid::new_v4();
        let result = NotificationKind::from_parts(NotificationType::Comment, Some(post), None);
        assert!(result.is_err());

        let comment = Uuid::new_v4();
        let kind =
            NotificationKind::from_parts(NotificationType::Comment, Some(post), Some(comment))
                .unwrap();
        assert_eq!(kind.post_id(), Some(post));
        assert_eq!(kind.comment_id(), Some(comment));
    }

    #[test]
    fn test_follow_drops_stray_references() {
        let kind =
            NotificationKind::from_parts(NotificationType::Follow, Some(Uuid::new_v4()), None)
                .unwrap();
        assert_eq!(kind, NotificationKind::Follow);
        assert_eq!(kind.post_id(), None);
    }

    #[test]
    fn test_wire_shape() {
        let post_id = Uuid::new_v4();
        let n = Notification::new(Uuid::new_v4(), Uuid::new_v4(), NotificationKind::Like {
            post_id,
        });

        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "like");
        assert_eq!(json["post"], post_id.to_string());
        assert!(json.get("comment").is_none());
        assert_eq!(json["user"], n.recipient_id.to_string());

        let back: Notification = serde_json::from_value(json).unwrap();
        assert_eq!(back, n);
    }
}
