//! Direct message entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use ripple_core::domain::Message;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    pub read: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SenderId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Sender,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReceiverId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Receiver,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Message {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            sender_id: model.sender_id,
            receiver_id: model.receiver_id,
            text: model.text,
            read: model.read,
            created_at: model.created_at.into(),
        }
    }
}

impl From<Message> for ActiveModel {
    fn from(message: Message) -> Self {
        Self {
            id: Set(message.id),
            sender_id: Set(message.sender_id),
            receiver_id: Set(message.receiver_id),
            text: Set(message.text),
            read: Set(message.read),
            created_at: Set(message.created_at.into()),
        }
    }
}
