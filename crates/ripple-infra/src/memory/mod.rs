//! In-memory repositories - used when no database is configured, and by
//! tests. Data is lost on process restart.
//!
//! Each store sits behind a single async `RwLock`, so every set mutation
//! (follow edges on both users, likes, read flags) happens under one write
//! guard.

mod messages;
mod notifications;
mod posts;
mod users;

pub use messages::InMemoryMessageRepository;
pub use notifications::InMemoryNotificationRepository;
pub use posts::InMemoryPostRepository;
pub use users::InMemoryUserRepository;

use uuid::Uuid;

/// Insert `id` unless present. Returns `true` when the set grew.
fn set_insert(set: &mut Vec<Uuid>, id: Uuid) -> bool {
    if set.contains(&id) {
        false
    } else {
        set.push(id);
        true
    }
}

/// Remove `id` if present. Returns `true` when the set shrank.
fn set_remove(set: &mut Vec<Uuid>, id: Uuid) -> bool {
    let before = set.len();
    set.retain(|x| *x != id);
    set.len() != before
}
