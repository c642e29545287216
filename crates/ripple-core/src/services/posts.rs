//! Post creation, listing and deletion.

use std::sync::Arc;

use uuid::Uuid;

use super::views::post_views;
use crate::domain::{Post, PostKind, PostView};
use crate::error::DomainError;
use crate::ports::{MediaError, MediaStore, MediaUpload, PostRepository, UserRepository};

/// Input for a new post.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub caption: Option<String>,
    pub location: Option<String>,
    pub upload: Option<MediaUpload>,
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    media: Arc<dyn MediaStore>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            posts,
            users,
            media,
        }
    }

    /// Create a post. Images become photos, videos become reels.
    ///
    /// The file is stored before the record; a failed insert leaves the
    /// file behind.
    pub async fn create(&self, author_id: Uuid, input: NewPost) -> Result<Post, DomainError> {
        if self.users.find_by_id(author_id).await?.is_none() {
            return Err(DomainError::not_found("User", author_id));
        }

        let (kind, media) = match input.upload {
            Some(upload) => {
                let kind = if upload.is_video() {
                    PostKind::Reel
                } else if upload.is_image() {
                    PostKind::Photo
                } else {
                    return Err(MediaError::UnsupportedType(upload.content_type).into());
                };
                (kind, Some(self.media.store(upload).await?))
            }
            None => (PostKind::Photo, None),
        };

        let post = Post::new(author_id, kind, media, input.caption, input.location);
        let post = self.posts.create(post).await?;

        tracing::info!(post_id = %post.id, author_id = %author_id, kind = post.kind.as_str(), "Post created");
        Ok(post)
    }

    /// Every post, newest first.
    pub async fn feed(&self) -> Result<Vec<PostView>, DomainError> {
        let posts = self.posts.list_recent().await?;
        Ok(post_views(self.users.as_ref(), posts).await?)
    }

    pub async fn by_author(&self, author_id: Uuid) -> Result<Vec<PostView>, DomainError> {
        let posts = self.posts.list_by_author(author_id).await?;
        Ok(post_views(self.users.as_ref(), posts).await?)
    }

    pub async fn saved(&self, user_id: Uuid) -> Result<Vec<PostView>, DomainError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))?;

        let posts = self.posts.list_by_ids(&user.saved_posts).await?;
        Ok(post_views(self.users.as_ref(), posts).await?)
    }

    /// Delete a post. Only its author may do so.
    pub async fn delete(&self, actor: Uuid, post_id: Uuid) -> Result<(), DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;

        if post.author_id != actor {
            return Err(DomainError::Forbidden(
                "Only the author can delete this post".to_string(),
            ));
        }

        if !self.posts.delete(post_id).await? {
            return Err(DomainError::not_found("Post", post_id));
        }

        tracing::info!(post_id = %post_id, "Post deleted");
        Ok(())
    }
}
