//! # Ripple Infrastructure
//!
//! Concrete implementations of the ports defined in `ripple-core`:
//! PostgreSQL and in-memory repositories, JWT + Argon2 auth, and local
//! disk media storage.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM

pub mod auth;
pub mod database;
pub mod media;
pub mod memory;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::DatabaseConfig;
pub use media::LocalMediaStore;
pub use memory::{
    InMemoryMessageRepository, InMemoryNotificationRepository, InMemoryPostRepository,
    InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
pub use database::{
    PostgresMessageRepository, PostgresNotificationRepository, PostgresPostRepository,
    PostgresUserRepository, connect,
};
