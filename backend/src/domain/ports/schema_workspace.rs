//! Port abstraction for the model and migration directories.
//!
//! The generator reads model sources and writes new model templates and
//! migration files through this port. Adapters must never overwrite an
//! existing file: a name collision surfaces as
//! [`SchemaWorkspaceError::Conflict`].

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};

use super::define_port_error;

define_port_error! {
    /// Errors raised by schema workspace adapters.
    pub enum SchemaWorkspaceError {
        /// The requested file does not exist.
        NotFound { path: String } => "file not found: {path}",
        /// The target file already exists.
        Conflict { path: String } => "file already exists: {path}",
        /// Reading or writing failed.
        Io { path: String, message: String } => "filesystem error at {path}: {message}",
    }
}

/// Port for reading model sources and writing generated files.
#[cfg_attr(test, mockall::automock)]
pub trait SchemaWorkspace: Send + Sync {
    /// Whether a model source file exists for `table`.
    fn model_exists(&self, table: &str) -> Result<bool, SchemaWorkspaceError>;

    /// Source text of the model for `table`.
    fn read_model(&self, table: &str) -> Result<String, SchemaWorkspaceError>;

    /// Create the model source for `table`, returning its path.
    fn create_model(&self, table: &str, contents: &str)
    -> Result<Utf8PathBuf, SchemaWorkspaceError>;

    /// Create a migration file named `file_name`, returning its path.
    fn create_migration(
        &self,
        file_name: &str,
        contents: &str,
    ) -> Result<Utf8PathBuf, SchemaWorkspaceError>;
}

/// File name of the model source for `table`.
pub fn model_file_name(table: &str) -> String {
    format!("{table}.rs")
}

/// In-memory workspace mirroring the on-disk layout under `models/` and
/// `migrations/`.
#[derive(Debug, Default)]
pub struct FixtureSchemaWorkspace {
    files: Mutex<BTreeMap<Utf8PathBuf, String>>,
}

impl FixtureSchemaWorkspace {
    const MODELS: &'static str = "models";
    const MIGRATIONS: &'static str = "migrations";

    /// Create an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a model source for `table`.
    pub fn with_model(self, table: &str, contents: impl Into<String>) -> Self {
        self.lock()
            .insert(Self::model_path(table), contents.into());
        self
    }

    /// Contents of the file at `path`, if present.
    pub fn file(&self, path: &Utf8Path) -> Option<String> {
        self.lock().get(path).cloned()
    }

    /// Migration file names in lexicographic order.
    pub fn migration_names(&self) -> Vec<String> {
        self.lock()
            .keys()
            .filter(|path| path.parent() == Some(Utf8Path::new(Self::MIGRATIONS)))
            .filter_map(|path| path.file_name().map(str::to_owned))
            .collect()
    }

    fn model_path(table: &str) -> Utf8PathBuf {
        Utf8Path::new(Self::MODELS).join(model_file_name(table))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<Utf8PathBuf, String>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn create(&self, path: Utf8PathBuf, contents: &str) -> Result<Utf8PathBuf, SchemaWorkspaceError> {
        let mut files = self.lock();
        if files.contains_key(&path) {
            return Err(SchemaWorkspaceError::conflict(path.as_str()));
        }
        files.insert(path.clone(), contents.to_owned());
        Ok(path)
    }
}

impl SchemaWorkspace for FixtureSchemaWorkspace {
    fn model_exists(&self, table: &str) -> Result<bool, SchemaWorkspaceError> {
        Ok(self.lock().contains_key(&Self::model_path(table)))
    }

    fn read_model(&self, table: &str) -> Result<String, SchemaWorkspaceError> {
        let path = Self::model_path(table);
        self.lock()
            .get(&path)
            .cloned()
            .ok_or_else(|| SchemaWorkspaceError::not_found(path.as_str()))
    }

    fn create_model(
        &self,
        table: &str,
        contents: &str,
    ) -> Result<Utf8PathBuf, SchemaWorkspaceError> {
        self.create(Self::model_path(table), contents)
    }

    fn create_migration(
        &self,
        file_name: &str,
        contents: &str,
    ) -> Result<Utf8PathBuf, SchemaWorkspaceError> {
        self.create(Utf8Path::new(Self::MIGRATIONS).join(file_name), contents)
    }
}
