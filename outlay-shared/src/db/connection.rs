//! Shared storage-connection management
//!
//! The process owns exactly one MongoDB client. The manager is constructed
//! in `main` and injected into everything that needs storage access; the
//! first call to [`ConnectionManager::database`] performs the connect +
//! ping sequence while any concurrent callers block, and every later call
//! is a cheap read of the cached result.
//!
//! Failure semantics are deliberate: if establishing the connection fails,
//! that error is recorded and returned to every caller for the rest of the
//! process lifetime. There is no reconnect path; the server refuses to
//! start when the first attempt fails.
//!
//! # Example
//!
//! ```no_run
//! use outlay_shared::db::{ConnectionManager, StoreConfig};
//!
//! # async fn example() -> Result<(), outlay_shared::db::DbError> {
//! let config = StoreConfig {
//!     uri: "mongodb://localhost:27017".to_string(),
//!     database: "outlay".to_string(),
//! };
//!
//! let manager = ConnectionManager::new(config);
//! let db = manager.database().await?;
//! println!("connected to {}", db.name());
//! # Ok(())
//! # }
//! ```

use crate::db::DbError;
use mongodb::bson::doc;
use mongodb::{Client, Database};
use std::future::Future;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Connection settings for the document store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// MongoDB connection URI (e.g. `mongodb://localhost:27017`)
    pub uri: String,

    /// Name of the logical database holding all collections
    pub database: String,
}

/// One-time async initialization shared by concurrent callers.
///
/// Wraps [`tokio::sync::OnceCell`] so that the init future runs exactly
/// once no matter how many tasks race on the first call, and so that a
/// recorded `Err` stays recorded: `OnceCell::get_or_init` never re-runs
/// after the first completion, success or failure.
pub(crate) struct SharedInit<T: Clone> {
    cell: OnceCell<Result<T, DbError>>,
}

impl<T: Clone> SharedInit<T> {
    pub(crate) fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Runs `init` at most once; every caller gets a clone of the stored
    /// result.
    pub(crate) async fn get_or_init<F, Fut>(&self, init: F) -> Result<T, DbError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, DbError>>,
    {
        self.cell.get_or_init(init).await.clone()
    }
}

/// Owner of the single shared storage connection.
///
/// Cheap to share behind the application state; [`Database`] handles cloned
/// out of it are themselves cheap reference-counted handles, so per-request
/// use involves no locking after initialization.
pub struct ConnectionManager {
    config: StoreConfig,
    init: SharedInit<Database>,
}

impl ConnectionManager {
    /// Creates a manager without connecting. The connection is established
    /// by the first [`Self::database`] call.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            init: SharedInit::new(),
        }
    }

    /// Returns the shared database handle, connecting on first use.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Connection`] when the initial connect or the
    /// follow-up `ping` fails. Once recorded, the same error is returned
    /// on every subsequent call.
    pub async fn database(&self) -> Result<Database, DbError> {
        self.init
            .get_or_init(|| connect(self.config.clone()))
            .await
    }
}

/// Connects to the store and verifies it is reachable with a `ping`.
async fn connect(config: StoreConfig) -> Result<Database, DbError> {
    info!(database = %config.database, "connecting to document store");

    let client = Client::with_uri_str(&config.uri)
        .await
        .map_err(DbError::Connection)?;
    let database = client.database(&config.database);

    // A successful connect only means the URI parsed; the ping proves the
    // server is actually reachable and accepting commands.
    database
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(DbError::Connection)?;

    debug!(database = %config.database, "store ping succeeded");
    Ok(database)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn init_runs_exactly_once_across_concurrent_callers() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let shared: Arc<SharedInit<u64>> = Arc::new(SharedInit::new());

        let mut handles = Vec::new();
        for _ in 0..50 {
            let shared = Arc::clone(&shared);
            let attempts = Arc::clone(&attempts);
            handles.push(tokio::spawn(async move {
                shared
                    .get_or_init(|| async move {
                        attempts.fetch_add(1, Ordering::SeqCst);
                        // Widen the race window so callers actually overlap.
                        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                        Ok(42u64)
                    })
                    .await
            }));
        }

        for handle in handles {
            let value = handle.await.unwrap().unwrap();
            assert_eq!(value, 42);
        }
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_init_is_sticky_and_never_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let shared: SharedInit<u64> = SharedInit::new();

        let first = shared
            .get_or_init(|| {
                let attempts = Arc::clone(&attempts);
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(DbError::NotFound)
                }
            })
            .await;
        assert!(matches!(first, Err(DbError::NotFound)));

        // The second caller must see the recorded failure without the init
        // closure ever running again.
        let second = shared
            .get_or_init(|| {
                let attempts = Arc::clone(&attempts);
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Ok(7u64)
                }
            })
            .await;
        assert!(matches!(second, Err(DbError::NotFound)));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
