use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use ripple_core::domain::{ProfileUpdate, User, UserSummary};
use ripple_core::error::RepoError;
use ripple_core::ports::UserRepository;

use super::{set_insert, set_remove};

pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn taken(store: &HashMap<Uuid, User>, skip: Uuid, username: &str, email: &str) -> Option<String> {
    store.values().filter(|u| u.id != skip).find_map(|u| {
        if u.username == username {
            Some("username already exists".to_string())
        } else if u.email == email {
            Some("email already exists".to_string())
        } else {
            None
        }
    })
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .values()
            .find(|u| u.email == login || u.username == login)
            .cloned())
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;
        if let Some(msg) = taken(&store, user.id, &user.username, &user.email) {
            return Err(RepoError::Constraint(msg));
        }
        store.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Option<User>, RepoError> {
        let mut store = self.store.write().await;
        let Some(mut user) = store.get(&id).cloned() else {
            return Ok(None);
        };
        user.apply(&update);
        if let Some(msg) = taken(&store, id, &user.username, &user.email) {
            return Err(RepoError::Constraint(msg));
        }
        store.insert(id, user.clone());
        Ok(Some(user))
    }

    async fn search(&self, query: &str, limit: u64) -> Result<Vec<User>, RepoError> {
        let needle = query.to_lowercase();
        let store = self.store.read().await;
        let mut found: Vec<User> = store
            .values()
            .filter(|u| {
                u.username.to_lowercase().contains(&needle)
                    || u.display_name
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.username.cmp(&b.username));
        found.truncate(limit as usize);
        Ok(found)
    }

    async fn summaries(&self, ids: &[Uuid]) -> Result<Vec<UserSummary>, RepoError> {
        let store = self.store.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| store.get(id).map(User::summary))
            .collect())
    }

    async fn add_follow(&self, follower: Uuid, followee: Uuid) -> Result<bool, RepoError> {
        let mut store = self.store.write().await;
        if !store.contains_key(&follower) || !store.contains_key(&followee) {
            return Ok(false);
        }

        let added = store
            .get_mut(&follower)
            .is_some_and(|u| set_insert(&mut u.following, followee));
        if let Some(u) = store.get_mut(&followee) {
            set_insert(&mut u.followers, follower);
        }
        Ok(added)
    }

    async fn remove_follow(&self, follower: Uuid, followee: Uuid) -> Result<bool, RepoError> {
        let mut store = self.store.write().await;
        let removed = store
            .get_mut(&follower)
            .is_some_and(|u| set_remove(&mut u.following, followee));
        if let Some(u) = store.get_mut(&followee) {
            set_remove(&mut u.followers, follower);
        }
        Ok(removed)
    }

    async fn add_saved_post(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        let mut store = self.store.write().await;
        Ok(store
            .get_mut(&user_id)
            .is_some_and(|u| set_insert(&mut u.saved_posts, post_id)))
    }

    async fn remove_saved_post(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        let mut store = self.store.write().await;
        Ok(store
            .get_mut(&user_id)
            .is_some_and(|u| set_remove(&mut u.saved_posts, post_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded(names: &[&str]) -> (InMemoryUserRepository, Vec<Uuid>) {
        let repo = InMemoryUserRepository::new();
        let mut ids = Vec::new();
        for name in names {
            let user = User::new(
                name.to_string(),
                format!("{name}@example.com"),
                "hash".to_string(),
            );
            ids.push(repo.create(user).await.unwrap().id);
        }
        (repo, ids)
    }

    #[tokio::test]
    async fn test_follow_updates_both_sides_once() {
        let (repo, ids) = seeded(&["ana", "bob"]).await;
        let (ana, bob) = (ids[0], ids[1]);

        assert!(repo.add_follow(ana, bob).await.unwrap());
        assert!(!repo.add_follow(ana, bob).await.unwrap());

        let ana_user = repo.find_by_id(ana).await.unwrap().unwrap();
        let bob_user = repo.find_by_id(bob).await.unwrap().unwrap();
        assert_eq!(ana_user.following, vec![bob]);
        assert_eq!(bob_user.followers, vec![ana]);
    }

    #[tokio::test]
    async fn test_follow_unknown_user_changes_nothing() {
        let (repo, ids) = seeded(&["ana"]).await;
        let ghost = Uuid::new_v4();

        assert!(!repo.add_follow(ids[0], ghost).await.unwrap());
        let ana = repo.find_by_id(ids[0]).await.unwrap().unwrap();
        assert!(ana.following.is_empty());
    }

    #[tokio::test]
    async fn test_unfollow_removes_both_sides() {
        let (repo, ids) = seeded(&["ana", "bob"]).await;
        repo.add_follow(ids[0], ids[1]).await.unwrap();

        assert!(repo.remove_follow(ids[0], ids[1]).await.unwrap());
        assert!(!repo.remove_follow(ids[0], ids[1]).await.unwrap());

        let bob = repo.find_by_id(ids[1]).await.unwrap().unwrap();
        assert!(bob.followers.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_a_constraint_error() {
        let (repo, _) = seeded(&["ana"]).await;
        let dup = User::new(
            "ana".to_string(),
            "other@example.com".to_string(),
            "hash".to_string(),
        );
        assert!(matches!(
            repo.create(dup).await,
            Err(RepoError::Constraint(_))
        ));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_limited() {
        let (repo, _) = seeded(&["Anna", "annie", "bob"]).await;

        let found = repo.search("ANN", 20).await.unwrap();
        assert_eq!(found.len(), 2);

        let limited = repo.search("ann", 1).await.unwrap();
        assert_eq!(limited.len(), 1);
    }
}
