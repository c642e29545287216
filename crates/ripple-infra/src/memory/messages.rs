use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use ripple_core::domain::Message;
use ripple_core::error::RepoError;
use ripple_core::ports::MessageRepository;

/// Messages kept in send order.
pub struct InMemoryMessageRepository {
    store: RwLock<Vec<Message>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn mark(store: &mut [Message], receiver: Uuid, sender: Uuid) -> u64 {
    let mut updated = 0;
    for m in store
        .iter_mut()
        .filter(|m| m.sender_id == sender && m.receiver_id == receiver && !m.read)
    {
        m.read = true;
        updated += 1;
    }
    updated
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create(&self, message: Message) -> Result<Message, RepoError> {
        self.store.write().await.push(message.clone());
        Ok(message)
    }

    async fn read_thread(
        &self,
        requester: Uuid,
        counterpart: Uuid,
    ) -> Result<Vec<Message>, RepoError> {
        let mut store = self.store.write().await;
        mark(&mut store, requester, counterpart);

        let mut thread: Vec<Message> = store
            .iter()
            .filter(|m| m.involves(requester) && m.counterpart(requester) == counterpart)
            .cloned()
            .collect();
        thread.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(thread)
    }

    async fn mark_read(&self, receiver: Uuid, sender: Uuid) -> Result<u64, RepoError> {
        Ok(mark(&mut self.store.write().await, receiver, sender))
    }

    async fn involving(&self, user_id: Uuid) -> Result<Vec<Message>, RepoError> {
        let store = self.store.read().await;
        let mut found: Vec<Message> = store
            .iter()
            .rev()
            .filter(|m| m.involves(user_id))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn unread_count(&self, receiver: Uuid) -> Result<u64, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .iter()
            .filter(|m| m.receiver_id == receiver && !m.read)
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_thread_marks_only_incoming() {
        let repo = InMemoryMessageRepository::new();
        let (ana, bob) = (Uuid::new_v4(), Uuid::new_v4());

        repo.create(Message::new(bob, ana, "hi".into())).await.unwrap();
        repo.create(Message::new(ana, bob, "hey".into())).await.unwrap();

        let thread = repo.read_thread(ana, bob).await.unwrap();
        assert_eq!(thread.len(), 2);
        assert!(thread.iter().filter(|m| m.sender_id == bob).all(|m| m.read));
        assert!(thread.iter().filter(|m| m.sender_id == ana).all(|m| !m.read));
        assert_eq!(repo.unread_count(bob).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_self_thread_is_not_mixed_with_others() {
        let repo = InMemoryMessageRepository::new();
        let (ana, bob, cy) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        repo.create(Message::new(ana, bob, "to bob".into())).await.unwrap();
        repo.create(Message::new(cy, ana, "from cy".into())).await.unwrap();

        let thread = repo.read_thread(ana, bob).await.unwrap();
        assert_eq!(thread.len(), 1);
        assert_eq!(repo.unread_count(ana).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_mark_read_is_idempotent() {
        let repo = InMemoryMessageRepository::new();
        let (ana, bob) = (Uuid::new_v4(), Uuid::new_v4());
        repo.create(Message::new(bob, ana, "1".into())).await.unwrap();
        repo.create(Message::new(bob, ana, "2".into())).await.unwrap();

        assert_eq!(repo.mark_read(ana, bob).await.unwrap(), 2);
        assert_eq!(repo.mark_read(ana, bob).await.unwrap(), 0);
    }
}
