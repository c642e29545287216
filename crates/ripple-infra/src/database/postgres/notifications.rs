use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use ripple_core::domain::Notification;
use ripple_core::error::RepoError;
use ripple_core::ports::NotificationRepository;

use super::repo_err;
use crate::database::entity::notification;

pub struct PostgresNotificationRepository {
    db: DbConn,
}

impl PostgresNotificationRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn create(&self, notification: Notification) -> Result<Notification, RepoError> {
        let model = notification::ActiveModel::from(notification)
            .insert(&self.db)
            .await
            .map_err(repo_err)?;
        Notification::try_from(model)
    }

    async fn list_for(&self, recipient_id: Uuid) -> Result<Vec<Notification>, RepoError> {
        let models = notification::Entity::find()
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .order_by_desc(notification::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        models.into_iter().map(Notification::try_from).collect()
    }

    async fn mark_read(&self, recipient_id: Uuid, id: Uuid) -> Result<bool, RepoError> {
        // Postgres reports matched rows, so an already-read row still counts.
        let result = notification::Entity::update_many()
            .col_expr(notification::Column::Read, Expr::value(true))
            .filter(notification::Column::Id.eq(id))
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn mark_all_read(&self, recipient_id: Uuid) -> Result<u64, RepoError> {
        let result = notification::Entity::update_many()
            .col_expr(notification::Column::Read, Expr::value(true))
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .filter(notification::Column::Read.eq(false))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(result.rows_affected)
    }
}
