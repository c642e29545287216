//! Storage ports, one per store.
//!
//! Set-valued fields (followers, likes, saved posts) are mutated through
//! insert-if-absent / remove operations that report whether anything
//! changed, so callers can tell a first-time action from a repeat.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Message, Notification, Post, ProfileUpdate, User, UserSummary};
use crate::error::RepoError;

/// Identity store.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by id, with follower, following and saved-post sets loaded.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Find a user whose email or username equals `login`.
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, RepoError>;

    /// Insert a new user. Fails with `RepoError::Constraint` on a taken
    /// username or email.
    async fn create(&self, user: User) -> Result<User, RepoError>;

    /// Apply a partial update. Returns `None` when the user does not exist.
    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Option<User>, RepoError>;

    /// Case-insensitive substring match on username or display name.
    async fn search(&self, query: &str, limit: u64) -> Result<Vec<User>, RepoError>;

    /// Display fields for the given ids. Unknown ids are skipped.
    async fn summaries(&self, ids: &[Uuid]) -> Result<Vec<UserSummary>, RepoError>;

    /// Record `follower -> followee`. Both sides of the relationship come
    /// from this one edge. Returns `true` when the edge is new, `false` when
    /// it already existed or either user is unknown.
    async fn add_follow(&self, follower: Uuid, followee: Uuid) -> Result<bool, RepoError>;

    /// Remove `follower -> followee`. Returns `true` when an edge was removed.
    async fn remove_follow(&self, follower: Uuid, followee: Uuid) -> Result<bool, RepoError>;

    async fn add_saved_post(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError>;

    async fn remove_saved_post(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError>;
}

/// Content store.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: Post) -> Result<Post, RepoError>;

    /// Find a post with its likes and comments (comments in append order).
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// All posts, newest first.
    async fn list_recent(&self) -> Result<Vec<Post>, RepoError>;

    /// Posts by one author, newest first.
    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Posts with the given ids, newest first. Unknown ids are skipped.
    async fn list_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Post>, RepoError>;

    /// Returns `false` when there was nothing to delete.
    async fn delete(&self, id: Uuid) -> Result<bool, RepoError>;

    /// Add `user_id` to the liker set. Returns `true` on a first-time like.
    async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError>;

    /// Remove `user_id` from the liker set. Returns `true` if it was present.
    async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError>;

    async fn like_count(&self, post_id: Uuid) -> Result<u64, RepoError>;

    async fn append_comment(&self, post_id: Uuid, comment: Comment) -> Result<(), RepoError>;

    /// The post's comments in append order.
    async fn comments(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}

/// Messaging store.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: Message) -> Result<Message, RepoError>;

    /// Mark every unread `counterpart -> requester` message as read and
    /// return the full history between the two, oldest first, in one
    /// operation.
    async fn read_thread(&self, requester: Uuid, counterpart: Uuid)
    -> Result<Vec<Message>, RepoError>;

    /// Mark every unread `sender -> receiver` message as read.
    /// Returns how many flags changed.
    async fn mark_read(&self, receiver: Uuid, sender: Uuid) -> Result<u64, RepoError>;

    /// Every message sent or received by `user_id`, newest first.
    async fn involving(&self, user_id: Uuid) -> Result<Vec<Message>, RepoError>;

    async fn unread_count(&self, receiver: Uuid) -> Result<u64, RepoError>;
}

/// Notification store.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: Notification) -> Result<Notification, RepoError>;

    /// Notifications addressed to `recipient_id`, newest first.
    async fn list_for(&self, recipient_id: Uuid) -> Result<Vec<Notification>, RepoError>;

    /// Returns `false` when no such notification belongs to the recipient.
    async fn mark_read(&self, recipient_id: Uuid, id: Uuid) -> Result<bool, RepoError>;

    async fn mark_all_read(&self, recipient_id: Uuid) -> Result<u64, RepoError>;
}
