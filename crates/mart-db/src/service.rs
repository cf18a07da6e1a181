//! Service layer hosting every repository method.
//!
//! `MartService` wraps `MartDb` (raw database access). All repo methods are
//! implemented as `impl MartService` blocks in `repos/*`, and the
//! cross-collection sequences in `workflow`.

use mart_config::MartConfig;
use mart_core::enums::Collection;

use crate::MartDb;
use crate::error::DatabaseError;

pub struct MartService {
    db: MartDb,
    default_limit: u32,
}

impl MartService {
    /// Create a service over a local database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = MartDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create a service from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the configured database cannot be opened.
    pub async fn from_config(config: &MartConfig) -> Result<Self, DatabaseError> {
        let db = MartDb::open(&config.database).await?;
        Ok(Self {
            db,
            default_limit: config.general.default_limit,
        })
    }

    /// Create from an existing `MartDb`.
    #[must_use]
    pub fn from_db(db: MartDb) -> Self {
        Self {
            db,
            default_limit: mart_config::GeneralConfig::default().default_limit,
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &MartDb {
        &self.db
    }

    /// Result limit used when a caller passes no explicit limit.
    #[must_use]
    pub const fn default_limit(&self) -> u32 {
        self.default_limit
    }

    /// Connectivity check for one collection.
    pub async fn ping(&self, collection: Collection) -> bool {
        self.db.ping(collection).await
    }
}
