use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Select, Set,
};
use uuid::Uuid;

use ripple_core::domain::{Comment, Post};
use ripple_core::error::RepoError;
use ripple_core::ports::PostRepository;

use super::repo_err;
use crate::database::entity::{comment, post, post_like};

/// PostgreSQL post repository. Likes and comments live in `post_likes`
/// and `comments`, keyed by post.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Run a post query newest first and attach likes and comments in batch.
    async fn load(&self, query: Select<post::Entity>) -> Result<Vec<Post>, RepoError> {
        let models = query
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(repo_err)?;
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();

        let likes = post_like::Entity::find()
            .filter(post_like::Column::PostId.is_in(ids.clone()))
            .order_by_asc(post_like::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(repo_err)?;
        let comments = comment::Entity::find()
            .filter(comment::Column::PostId.is_in(ids))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        let mut likes_by: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for like in likes {
            likes_by.entry(like.post_id).or_default().push(like.user_id);
        }
        let mut comments_by: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        for row in comments {
            comments_by.entry(row.post_id).or_default().push(row.into());
        }

        models
            .into_iter()
            .map(|m| {
                let id = m.id;
                m.into_domain(
                    likes_by.remove(&id).unwrap_or_default(),
                    comments_by.remove(&id).unwrap_or_default(),
                )
            })
            .collect()
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: Post) -> Result<Post, RepoError> {
        let model = post::ActiveModel::from(post)
            .insert(&self.db)
            .await
            .map_err(repo_err)?;
        model.into_domain(Vec::new(), Vec::new())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let mut posts = self
            .load(post::Entity::find().filter(post::Column::Id.eq(id)))
            .await?;
        Ok(posts.pop())
    }

    async fn list_recent(&self) -> Result<Vec<Post>, RepoError> {
        self.load(post::Entity::find()).await
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        self.load(post::Entity::find().filter(post::Column::AuthorId.eq(author_id)))
            .await
    }

    async fn list_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Post>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.load(post::Entity::find().filter(post::Column::Id.is_in(ids.to_vec())))
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = post::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let row = post_like::ActiveModel {
            post_id: Set(post_id),
            user_id: Set(user_id),
            created_at: Set(Utc::now().into()),
        };
        let inserted = post_like::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([post_like::Column::PostId, post_like::Column::UserId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(inserted > 0)
    }

    async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let result = post_like::Entity::delete_many()
            .filter(post_like::Column::PostId.eq(post_id))
            .filter(post_like::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn like_count(&self, post_id: Uuid) -> Result<u64, RepoError> {
        post_like::Entity::find()
            .filter(post_like::Column::PostId.eq(post_id))
            .count(&self.db)
            .await
            .map_err(repo_err)
    }

    async fn append_comment(&self, post_id: Uuid, comment: Comment) -> Result<(), RepoError> {
        comment::ActiveModel::for_post(post_id, comment)
            .insert(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(())
    }

    async fn comments(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let rows = comment::Entity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
