//! Store location and connection settings.

use std::path::PathBuf;
use std::time::Duration;

/// File name used when no explicit location is configured.
pub const DEFAULT_DATABASE_FILE: &str = "transaction_demo.db";

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the relational store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    InMemory,
}

/// Connection settings for the single store connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub location: StoreLocation,
    pub busy_timeout: Duration,
}

impl StoreConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::File(path.into()),
            ..Self::default()
        }
    }

    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::InMemory,
            ..Self::default()
        }
    }

    /// Short label used in log events.
    pub(crate) fn mode(&self) -> &'static str {
        match self.location {
            StoreLocation::File(_) => "file",
            StoreLocation::InMemory => "memory",
        }
    }
}

impl Default for StoreConfig {
    /// Points at `transaction_demo.db` in the working directory.
    fn default() -> Self {
        Self {
            location: StoreLocation::File(PathBuf::from(DEFAULT_DATABASE_FILE)),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StoreConfig, StoreLocation, DEFAULT_DATABASE_FILE};
    use std::path::PathBuf;

    #[test]
    fn default_points_at_local_file() {
        let config = StoreConfig::default();
        assert_eq!(
            config.location,
            StoreLocation::File(PathBuf::from(DEFAULT_DATABASE_FILE))
        );
        assert_eq!(config.mode(), "file");
        assert_eq!(StoreConfig::in_memory().mode(), "memory");
    }
}
