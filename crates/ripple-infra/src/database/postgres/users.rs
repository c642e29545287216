use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbBackend, DbConn, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, Statement,
};
use uuid::Uuid;

use ripple_core::domain::{ProfileUpdate, User, UserSummary};
use ripple_core::error::RepoError;
use ripple_core::ports::UserRepository;

use super::repo_err;
use crate::database::entity::{follow, saved_post, user};

/// Inserts the edge only when both endpoints exist; a repeat is a no-op.
const INSERT_FOLLOW: &str = r#"
INSERT INTO follows (follower_id, followee_id, created_at)
SELECT $1::uuid, $2::uuid, $3::timestamptz
WHERE EXISTS (SELECT 1 FROM users WHERE id = $1::uuid)
  AND EXISTS (SELECT 1 FROM users WHERE id = $2::uuid)
ON CONFLICT DO NOTHING
"#;

/// PostgreSQL user repository. Follower, following and saved-post sets are
/// read from the `follows` and `saved_posts` tables.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    async fn hydrate_one(&self, model: user::Model) -> Result<User, RepoError> {
        let mut users = self.hydrate(vec![model]).await?;
        users
            .pop()
            .ok_or_else(|| RepoError::Query("hydration dropped a user".to_string()))
    }

    /// Attach graph sets to a batch of rows with two queries.
    async fn hydrate(&self, models: Vec<user::Model>) -> Result<Vec<User>, RepoError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();

        let edges = follow::Entity::find()
            .filter(
                follow::Column::FollowerId
                    .is_in(ids.clone())
                    .or(follow::Column::FolloweeId.is_in(ids.clone())),
            )
            .order_by_asc(follow::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        let saved = saved_post::Entity::find()
            .filter(saved_post::Column::UserId.is_in(ids))
            .order_by_asc(saved_post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        let mut followers: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        let mut following: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for edge in edges {
            followers
                .entry(edge.followee_id)
                .or_default()
                .push(edge.follower_id);
            following
                .entry(edge.follower_id)
                .or_default()
                .push(edge.followee_id);
        }
        let mut saved_by: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for row in saved {
            saved_by.entry(row.user_id).or_default().push(row.post_id);
        }

        Ok(models
            .into_iter()
            .map(|m| {
                let id = m.id;
                m.into_domain(
                    followers.remove(&id).unwrap_or_default(),
                    following.remove(&id).unwrap_or_default(),
                    saved_by.remove(&id).unwrap_or_default(),
                )
            })
            .collect())
    }

    async fn find_one(&self, filter: Condition) -> Result<Option<User>, RepoError> {
        let model = user::Entity::find()
            .filter(filter)
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        match model {
            Some(model) => Ok(Some(self.hydrate_one(model).await?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        self.find_one(Condition::all().add(user::Column::Id.eq(id))).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        self.find_one(Condition::all().add(user::Column::Username.eq(username)))
            .await
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!("Finding user by login");
        self.find_one(
            Condition::any()
                .add(user::Column::Email.eq(login))
                .add(user::Column::Username.eq(login)),
        )
        .await
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let model = user::ActiveModel::from(user)
            .insert(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(model.into_domain(Vec::new(), Vec::new(), Vec::new()))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Option<User>, RepoError> {
        let Some(mut user) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        user.apply(&update);

        user::ActiveModel::from(user.clone())
            .update(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(Some(user))
    }

    async fn search(&self, query: &str, limit: u64) -> Result<Vec<User>, RepoError> {
        let pattern = format!("%{}%", query.to_lowercase());
        let models = user::Entity::find()
            .filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(user::Column::Username))).like(&pattern))
                    .add(
                        Expr::expr(Func::lower(Expr::col(user::Column::DisplayName)))
                            .like(&pattern),
                    ),
            )
            .order_by_asc(user::Column::Username)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        self.hydrate(models).await
    }

    async fn summaries(&self, ids: &[Uuid]) -> Result<Vec<UserSummary>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = user::Entity::find()
            .filter(user::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(models
            .into_iter()
            .map(|m| UserSummary {
                id: m.id,
                username: m.username,
                display_name: m.display_name,
                avatar: m.avatar,
            })
            .collect())
    }

    async fn add_follow(&self, follower: Uuid, followee: Uuid) -> Result<bool, RepoError> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            INSERT_FOLLOW,
            [follower.into(), followee.into(), Utc::now().into()],
        );
        let result = self.db.execute(stmt).await.map_err(repo_err)?;
        Ok(result.rows_affected() == 1)
    }

    async fn remove_follow(&self, follower: Uuid, followee: Uuid) -> Result<bool, RepoError> {
        let result = follow::Entity::delete_many()
            .filter(follow::Column::FollowerId.eq(follower))
            .filter(follow::Column::FolloweeId.eq(followee))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn add_saved_post(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        let row = saved_post::ActiveModel {
            user_id: Set(user_id),
            post_id: Set(post_id),
            created_at: Set(Utc::now().into()),
        };
        let inserted = saved_post::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([saved_post::Column::UserId, saved_post::Column::PostId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(inserted > 0)
    }

    async fn remove_saved_post(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        let result = saved_post::Entity::delete_many()
            .filter(saved_post::Column::UserId.eq(user_id))
            .filter(saved_post::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(result.rows_affected > 0)
    }
}
