use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbConn, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use ripple_core::domain::Message;
use ripple_core::error::RepoError;
use ripple_core::ports::MessageRepository;

use super::{repo_err, txn_err};
use crate::database::entity::message;

pub struct PostgresMessageRepository {
    db: DbConn,
}

impl PostgresMessageRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

/// Flip every unread `sender -> receiver` message to read.
async fn mark_read_on<C: ConnectionTrait>(
    conn: &C,
    receiver: Uuid,
    sender: Uuid,
) -> Result<u64, DbErr> {
    let result = message::Entity::update_many()
        .col_expr(message::Column::Read, Expr::value(true))
        .filter(message::Column::SenderId.eq(sender))
        .filter(message::Column::ReceiverId.eq(receiver))
        .filter(message::Column::Read.eq(false))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

fn between(a: Uuid, b: Uuid) -> Condition {
    Condition::any()
        .add(
            Condition::all()
                .add(message::Column::SenderId.eq(a))
                .add(message::Column::ReceiverId.eq(b)),
        )
        .add(
            Condition::all()
                .add(message::Column::SenderId.eq(b))
                .add(message::Column::ReceiverId.eq(a)),
        )
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn create(&self, message: Message) -> Result<Message, RepoError> {
        let model = message::ActiveModel::from(message)
            .insert(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(model.into())
    }

    async fn read_thread(
        &self,
        requester: Uuid,
        counterpart: Uuid,
    ) -> Result<Vec<Message>, RepoError> {
        let models = self
            .db
            .transaction::<_, Vec<message::Model>, DbErr>(|txn| {
                Box::pin(async move {
                    mark_read_on(txn, requester, counterpart).await?;
                    message::Entity::find()
                        .filter(between(requester, counterpart))
                        .order_by_asc(message::Column::CreatedAt)
                        .all(txn)
                        .await
                })
            })
            .await
            .map_err(txn_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn mark_read(&self, receiver: Uuid, sender: Uuid) -> Result<u64, RepoError> {
        mark_read_on(&self.db, receiver, sender)
            .await
            .map_err(repo_err)
    }

    async fn involving(&self, user_id: Uuid) -> Result<Vec<Message>, RepoError> {
        let models = message::Entity::find()
            .filter(
                Condition::any()
                    .add(message::Column::SenderId.eq(user_id))
                    .add(message::Column::ReceiverId.eq(user_id)),
            )
            .order_by_desc(message::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn unread_count(&self, receiver: Uuid) -> Result<u64, RepoError> {
        message::Entity::find()
            .filter(message::Column::ReceiverId.eq(receiver))
            .filter(message::Column::Read.eq(false))
            .count(&self.db)
            .await
            .map_err(repo_err)
    }
}
