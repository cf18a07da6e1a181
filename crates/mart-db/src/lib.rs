//! # mart-db
//!
//! libSQL record store for Mart.
//!
//! Holds the four collections (users, projects, surveys, transactions) as
//! tables with JSON text columns for list-valued fields. Repository methods
//! live on [`service::MartService`]; cross-collection sequences live in
//! [`workflow`].

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod workflow;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;
use mart_config::DatabaseConfig;
use mart_core::enums::Collection;

/// Central database handle for all Mart record operations.
pub struct MartDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl MartDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        let mart_db = Self { db, conn };
        mart_db.run_migrations().await?;
        tracing::debug!(path, "opened local database");
        Ok(mart_db)
    }

    /// Open a remote libSQL database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection or migrations fail.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        let conn = db.connect()?;
        let mart_db = Self { db, conn };
        mart_db.run_migrations().await?;
        tracing::debug!(url, "opened remote database");
        Ok(mart_db)
    }

    /// Open whichever database the config selects.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` for an unusable config, or any
    /// error from [`Self::open_local`] / [`Self::open_remote`].
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        config
            .validate()
            .map_err(|e| DatabaseError::InvalidState(e.to_string()))?;
        if config.is_remote() {
            Self::open_remote(&config.url, &config.auth_token).await
        } else {
            Self::open_local(&config.path).await
        }
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"usr-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }

    /// Connectivity check for one collection.
    ///
    /// Returns `false` (and logs) instead of erroring so callers can probe freely.
    pub async fn ping(&self, collection: Collection) -> bool {
        let sql = format!("SELECT count(*) FROM {}", collection.as_str());
        match self.conn.query(&sql, ()).await {
            Ok(mut rows) => match rows.next().await {
                Ok(Some(_)) => true,
                Ok(None) => false,
                Err(e) => {
                    tracing::warn!(%collection, "ping failed: {e}");
                    false
                }
            },
            Err(e) => {
                tracing::warn!(%collection, "ping failed: {e}");
                false
            }
        }
    }
}
