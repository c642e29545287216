use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use ripple_core::domain::{Comment, Post};
use ripple_core::error::RepoError;
use ripple_core::ports::PostRepository;

use super::{set_insert, set_remove};

pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    async fn collect(&self, keep: impl Fn(&Post) -> bool) -> Vec<Post> {
        let store = self.store.read().await;
        let mut posts: Vec<Post> = store.values().filter(|p| keep(p)).cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&post.id) {
            return Err(RepoError::Constraint("post already exists".to_string()));
        }
        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn list_recent(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.collect(|_| true).await)
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        Ok(self.collect(|p| p.author_id == author_id).await)
    }

    async fn list_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Post>, RepoError> {
        Ok(self.collect(|p| ids.contains(&p.id)).await)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        Ok(self.store.write().await.remove(&id).is_some())
    }

    async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let mut store = self.store.write().await;
        let post = store.get_mut(&post_id).ok_or(RepoError::NotFound)?;
        Ok(set_insert(&mut post.likes, user_id))
    }

    async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let mut store = self.store.write().await;
        Ok(store
            .get_mut(&post_id)
            .is_some_and(|p| set_remove(&mut p.likes, user_id)))
    }

    async fn like_count(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let store = self.store.read().await;
        Ok(store.get(&post_id).map_or(0, |p| p.likes.len() as u64))
    }

    async fn append_comment(&self, post_id: Uuid, comment: Comment) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let post = store.get_mut(&post_id).ok_or(RepoError::NotFound)?;
        post.comments.push(comment);
        Ok(())
    }

    async fn comments(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .get(&post_id)
            .map(|p| p.comments.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use ripple_core::domain::PostKind;

    use super::*;

    #[tokio::test]
    async fn test_like_is_set_semantics() {
        let repo = InMemoryPostRepository::new();
        let post = repo
            .create(Post::new(Uuid::new_v4(), PostKind::Photo, None, None, None))
            .await
            .unwrap();
        let fan = Uuid::new_v4();

        assert!(repo.add_like(post.id, fan).await.unwrap());
        assert!(!repo.add_like(post.id, fan).await.unwrap());
        assert_eq!(repo.like_count(post.id).await.unwrap(), 1);

        assert!(repo.remove_like(post.id, fan).await.unwrap());
        assert!(!repo.remove_like(post.id, fan).await.unwrap());
        assert_eq!(repo.like_count(post.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_comments_keep_append_order() {
        let repo = InMemoryPostRepository::new();
        let post = repo
            .create(Post::new(Uuid::new_v4(), PostKind::Photo, None, None, None))
            .await
            .unwrap();
        let author = Uuid::new_v4();

        for text in ["first", "second", "third"] {
            repo.append_comment(post.id, Comment::new(author, text).unwrap())
                .await
                .unwrap();
        }

        let texts: Vec<String> = repo
            .comments(post.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(texts, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_comment_on_missing_post_fails() {
        let repo = InMemoryPostRepository::new();
        let comment = Comment::new(Uuid::new_v4(), "hi").unwrap();
        assert!(matches!(
            repo.append_comment(Uuid::new_v4(), comment).await,
            Err(RepoError::NotFound)
        ));
    }
}
