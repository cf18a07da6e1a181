//! Database connection configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_path() -> String {
    "mart.db".to_string()
}

/// Where the record store lives.
///
/// A non-empty `url` selects a remote libSQL server and requires `auth_token`.
/// Otherwise `path` names a local database file (`:memory:` for a throwaway store).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Local database file.
    #[serde(default = "default_path")]
    pub path: String,

    /// Remote database URL (e.g., `libsql://mart-prod.turso.io`).
    #[serde(default)]
    pub url: String,

    /// Auth token for the remote database.
    #[serde(default)]
    pub auth_token: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            url: String::new(),
            auth_token: String::new(),
        }
    }
}

impl DatabaseConfig {
    /// Whether a remote database is selected.
    pub fn is_remote(&self) -> bool {
        !self.url.is_empty()
    }

    pub fn is_in_memory(&self) -> bool {
        !self.is_remote() && self.path == ":memory:"
    }

    /// Reject combinations that cannot be opened.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when a remote URL has no token, or
    /// when neither a URL nor a local path is set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.is_remote() && self.auth_token.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.auth_token".into(),
                reason: "required when database.url is set".into(),
            });
        }
        if !self.is_remote() && self.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty without database.url".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_local_file() {
        let config = DatabaseConfig::default();
        assert!(!config.is_remote());
        assert!(!config.is_in_memory());
        assert_eq!(config.path, "mart.db");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn remote_requires_token() {
        let config = DatabaseConfig {
            url: "libsql://mart.turso.io".into(),
            ..Default::default()
        };
        assert!(config.is_remote());
        assert!(config.validate().is_err());

        let config = DatabaseConfig {
            auth_token: "token123".into(),
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn in_memory_detection() {
        let config = DatabaseConfig {
            path: ":memory:".into(),
            ..Default::default()
        };
        assert!(config.is_in_memory());
    }

    #[test]
    fn blank_path_is_invalid() {
        let config = DatabaseConfig {
            path: "  ".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
