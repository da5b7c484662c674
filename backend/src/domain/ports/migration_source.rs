//! Port abstraction for reading migration files.
//!
//! Sources list `.sql` file names (without directory components) and return
//! their contents. Ordering is the runner's concern, not the source's.

use std::collections::BTreeMap;

use super::define_port_error;

define_port_error! {
    /// Errors raised by migration source adapters.
    pub enum MigrationSourceError {
        /// The named migration file does not exist.
        NotFound { name: String } => "migration file not found: {name}",
        /// The migrations directory could not be read.
        Io { message: String } => "failed to read migrations: {message}",
    }
}

/// Port for enumerating and reading migration files.
#[cfg_attr(test, mockall::automock)]
pub trait MigrationSource: Send + Sync {
    /// File names of every `.sql` migration, in no particular order.
    fn list_migrations(&self) -> Result<Vec<String>, MigrationSourceError>;

    /// Full text of the migration named `name`.
    fn read_migration(&self, name: &str) -> Result<String, MigrationSourceError>;
}

/// In-memory migration source keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct FixtureMigrationSource {
    files: BTreeMap<String, String>,
}

impl FixtureMigrationSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a migration file.
    pub fn with_file(mut self, name: impl Into<String>, contents: impl Into<String>) -> Self {
        self.files.insert(name.into(), contents.into());
        self
    }
}

impl MigrationSource for FixtureMigrationSource {
    fn list_migrations(&self) -> Result<Vec<String>, MigrationSourceError> {
        Ok(self
            .files
            .keys()
            .filter(|name| name.ends_with(".sql"))
            .cloned()
            .collect())
    }

    fn read_migration(&self, name: &str) -> Result<String, MigrationSourceError> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| MigrationSourceError::not_found(name))
    }
}
