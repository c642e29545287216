//! PostgreSQL repository implementations.

mod messages;
mod notifications;
mod posts;
mod users;

use sea_orm::{DbErr, SqlErr, TransactionError};

use ripple_core::error::RepoError;

pub use messages::PostgresMessageRepository;
pub use notifications::PostgresNotificationRepository;
pub use posts::PostgresPostRepository;
pub use users::PostgresUserRepository;

/// Classify a SeaORM error. Unique violations become `Constraint`, a
/// dangling foreign key becomes `NotFound`.
pub(crate) fn repo_err(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => RepoError::Constraint(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => RepoError::NotFound,
        _ => match err {
            DbErr::Conn(e) => RepoError::Connection(e.to_string()),
            DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
            other => {
                let msg = other.to_string();
                if msg.contains("duplicate") || msg.contains("unique") {
                    RepoError::Constraint(msg)
                } else {
                    RepoError::Query(msg)
                }
            }
        },
    }
}

pub(crate) fn txn_err(err: TransactionError<DbErr>) -> RepoError {
    match err {
        TransactionError::Connection(e) | TransactionError::Transaction(e) => repo_err(e),
    }
}
