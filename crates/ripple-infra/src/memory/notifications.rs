use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use ripple_core::domain::Notification;
use ripple_core::error::RepoError;
use ripple_core::ports::NotificationRepository;

pub struct InMemoryNotificationRepository {
    store: RwLock<Vec<Notification>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryNotificationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn create(&self, notification: Notification) -> Result<Notification, RepoError> {
        self.store.write().await.push(notification.clone());
        Ok(notification)
    }

    async fn list_for(&self, recipient_id: Uuid) -> Result<Vec<Notification>, RepoError> {
        let store = self.store.read().await;
        let mut found: Vec<Notification> = store
            .iter()
            .rev()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn mark_read(&self, recipient_id: Uuid, id: Uuid) -> Result<bool, RepoError> {
        let mut store = self.store.write().await;
        match store
            .iter_mut()
            .find(|n| n.id == id && n.recipient_id == recipient_id)
        {
            Some(n) => {
                n.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, recipient_id: Uuid) -> Result<u64, RepoError> {
        let mut store = self.store.write().await;
        let mut updated = 0;
        for n in store
            .iter_mut()
            .filter(|n| n.recipient_id == recipient_id && !n.read)
        {
            n.read = true;
            updated += 1;
        }
        Ok(updated)
    }
}
