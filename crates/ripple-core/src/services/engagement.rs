//! Post engagement: likes, comments and saved posts.

use std::sync::Arc;

use uuid::Uuid;

use super::Notifier;
use super::views::{comment_view, load_summaries};
use crate::domain::{Comment, CommentView, NotificationKind, Post};
use crate::error::DomainError;
use crate::ports::{PostRepository, UserRepository};

/// Result of a like or unlike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeOutcome {
    /// Whether the liker set actually changed.
    pub changed: bool,
    pub likes_count: u64,
}

#[derive(Clone)]
pub struct Engagement {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    notifier: Notifier,
}

impl Engagement {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        notifier: Notifier,
    ) -> Self {
        Self {
            posts,
            users,
            notifier,
        }
    }

    async fn post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))
    }

    /// Like a post. Only a first-time like by someone other than the author
    /// notifies; liking again is a silent no-op.
    pub async fn like(&self, actor: Uuid, post_id: Uuid) -> Result<LikeOutcome, DomainError> {
        let post = self.post(post_id).await?;

        let changed = self.posts.add_like(post_id, actor).await?;
        if changed {
            self.notifier
                .notify(post.author_id, actor, NotificationKind::Like { post_id })
                .await;
        }

        let likes_count = self.posts.like_count(post_id).await?;
        tracing::debug!(post_id = %post_id, user_id = %actor, changed, likes_count, "Like processed");

        Ok(LikeOutcome {
            changed,
            likes_count,
        })
    }

    /// Remove a like. Never retracts the notification it produced.
    pub async fn unlike(&self, actor: Uuid, post_id: Uuid) -> Result<LikeOutcome, DomainError> {
        self.post(post_id).await?;

        let changed = self.posts.remove_like(post_id, actor).await?;
        let likes_count = self.posts.like_count(post_id).await?;
        tracing::debug!(post_id = %post_id, user_id = %actor, changed, likes_count, "Unlike processed");

        Ok(LikeOutcome {
            changed,
            likes_count,
        })
    }

    /// Append a comment and return it as stored, with its author resolved.
    pub async fn comment(
        &self,
        actor: Uuid,
        post_id: Uuid,
        text: &str,
    ) -> Result<CommentView, DomainError> {
        let comment = Comment::new(actor, text)?;
        let post = self.post(post_id).await?;

        let comment_id = comment.id;
        self.posts.append_comment(post_id, comment).await?;

        self.notifier
            .notify(post.author_id, actor, NotificationKind::Comment {
                post_id,
                comment_id,
            })
            .await;

        let stored = self
            .posts
            .comments(post_id)
            .await?
            .into_iter()
            .rev()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| DomainError::Internal("Appended comment not found".to_string()))?;

        let summaries = load_summaries(self.users.as_ref(), [stored.author_id]).await?;
        tracing::info!(post_id = %post_id, comment_id = %comment_id, user_id = %actor, "Comment added");

        Ok(comment_view(&summaries, stored))
    }

    /// Add a post to the user's saved set.
    pub async fn save(&self, actor: Uuid, post_id: Uuid) -> Result<bool, DomainError> {
        self.ensure_user(actor).await?;
        self.post(post_id).await?;
        Ok(self.users.add_saved_post(actor, post_id).await?)
    }

    pub async fn unsave(&self, actor: Uuid, post_id: Uuid) -> Result<bool, DomainError> {
        self.ensure_user(actor).await?;
        Ok(self.users.remove_saved_post(actor, post_id).await?)
    }

    async fn ensure_user(&self, user_id: Uuid) -> Result<(), DomainError> {
        match self.users.find_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("User", user_id)),
        }
    }
}
