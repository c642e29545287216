//! Notification entity. The kind is flattened into a type column plus
//! nullable post and comment references.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use ripple_core::domain::{Notification, NotificationKind, NotificationType};
use ripple_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub actor_id: Uuid,
    pub kind: String,
    pub post_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RecipientId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Recipient,
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Notification {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let notification_type: NotificationType = model
            .kind
            .parse()
            .map_err(|_| RepoError::Query(format!("Unknown notification type: {}", model.kind)))?;
        let kind = NotificationKind::from_parts(notification_type, model.post_id, model.comment_id)
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(Self {
            id: model.id,
            recipient_id: model.recipient_id,
            actor_id: model.actor_id,
            kind,
            read: model.read,
            created_at: model.created_at.into(),
        })
    }
}

impl From<Notification> for ActiveModel {
    fn from(notification: Notification) -> Self {
        Self {
            id: Set(notification.id),
            recipient_id: Set(notification.recipient_id),
            actor_id: Set(notification.actor_id),
            kind: Set(notification.kind.notification_type().as_str().to_string()),
            post_id: Set(notification.kind.post_id()),
            comment_id: Set(notification.kind.comment_id()),
            read: Set(notification.read),
            created_at: Set(notification.created_at.into()),
        }
    }
}
