mod business;
mod rows;
mod staff;

pub use business::PostgresBusinessRepository;
pub use staff::PostgresStaffRepository;

use std::{future::Future, time::Duration};

use sqlx::{Postgres, Transaction};

use crate::domain::ports::outbound::RepositoryError;

pub type PgTx = Transaction<'static, Postgres>;

/// Runs work that owns its own connection, failing with `Timeout` once `limit` elapses.
async fn bounded<T, F>(limit: Duration, work: F) -> Result<T, RepositoryError>
where
    F: Future<Output = Result<T, RepositoryError>>,
{
    tokio::time::timeout(limit, work)
        .await
        .map_err(|_| RepositoryError::Timeout(limit))?
}

/// Unique and foreign key violations become `Conflict`; everything else stays opaque.
fn classify(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() || db.is_foreign_key_violation() {
            return RepositoryError::Conflict(db.message().to_string());
        }
    }
    RepositoryError::DatabaseError(err)
}
