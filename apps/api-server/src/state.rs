//! Application state - shared across all handlers.

use std::sync::Arc;

use ripple_core::ports::{
    MediaStore, MessageRepository, NotificationRepository, PasswordService, PostRepository,
    TokenService, UserRepository,
};
use ripple_core::services::{
    Accounts, Engagement, Messaging, NotificationInbox, Notifier, PostService, SocialGraph,
};
use ripple_infra::{
    Argon2PasswordService, InMemoryMessageRepository, InMemoryNotificationRepository,
    InMemoryPostRepository, InMemoryUserRepository, JwtTokenService, LocalMediaStore,
};

use crate::config::AppConfig;

/// One handle per store.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            messages: Arc::new(InMemoryMessageRepository::new()),
            notifications: Arc::new(InMemoryNotificationRepository::new()),
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(db: ripple_infra::database::DbConn) -> Self {
        use ripple_infra::{
            PostgresMessageRepository, PostgresNotificationRepository, PostgresPostRepository,
            PostgresUserRepository,
        };

        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            messages: Arc::new(PostgresMessageRepository::new(db.clone())),
            notifications: Arc::new(PostgresNotificationRepository::new(db)),
        }
    }
}

/// Shared application state: the services every handler calls into.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Accounts,
    pub graph: SocialGraph,
    pub engagement: Engagement,
    pub posts: PostService,
    pub messaging: Messaging,
    pub inbox: NotificationInbox,
    pub tokens: Arc<dyn TokenService>,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let repos = Self::repositories(config).await;

        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let media: Arc<dyn MediaStore> = Arc::new(LocalMediaStore::new(
            &config.upload_dir,
            config.max_upload_bytes,
        ));

        tracing::info!("Application state initialized");
        Self::from_parts(
            repos,
            Arc::new(Argon2PasswordService::new()),
            tokens,
            media,
            config.max_upload_bytes,
        )
    }

    /// Wire every service over the given stores.
    pub fn from_parts(
        repos: Repositories,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
        media: Arc<dyn MediaStore>,
        max_upload_bytes: usize,
    ) -> Self {
        let notifier = Notifier::new(repos.notifications.clone());

        Self {
            accounts: Accounts::new(
                repos.users.clone(),
                passwords,
                tokens.clone(),
                media.clone(),
            ),
            graph: SocialGraph::new(repos.users.clone(), notifier.clone()),
            engagement: Engagement::new(repos.posts.clone(), repos.users.clone(), notifier.clone()),
            posts: PostService::new(repos.posts.clone(), repos.users.clone(), media),
            messaging: Messaging::new(repos.messages, repos.users.clone(), notifier),
            inbox: NotificationInbox::new(repos.notifications, repos.users, repos.posts),
            tokens,
            max_upload_bytes,
        }
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> Repositories {
        use migration::{Migrator, MigratorTrait};

        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running with in-memory stores.");
            return Repositories::in_memory();
        };

        let db = match ripple_infra::connect(db_config).await {
            Ok(db) => db,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to database. Using in-memory stores.");
                return Repositories::in_memory();
            }
        };

        if config.auto_migrate {
            if let Err(e) = Migrator::up(&db, None).await {
                tracing::error!(error = %e, "Migrations failed. Using in-memory stores.");
                return Repositories::in_memory();
            }
            tracing::info!("Database schema up to date");
        }

        Repositories::postgres(db)
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(_config: &AppConfig) -> Repositories {
        tracing::info!("Running without postgres feature - using in-memory stores");
        Repositories::in_memory()
    }
}
