//! `cap-std` implementation of the migration source and schema workspace.
//!
//! Every access goes through a [`Dir`] opened on the configured migrations
//! or models directory, so generated names can never escape it. New files
//! are opened with `create_new`, leaving existing files untouched.

use std::io::{self, Write};

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use tracing::debug;

use crate::domain::ports::{
    MigrationSource, MigrationSourceError, SchemaWorkspace, SchemaWorkspaceError, model_file_name,
};

/// Migrations and models directories on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapStdWorkspace {
    migrations_dir: Utf8PathBuf,
    models_dir: Utf8PathBuf,
}

impl CapStdWorkspace {
    /// Create a workspace over `migrations_dir` and `models_dir`.
    ///
    /// Neither directory needs to exist yet; writers create them on demand.
    ///
    /// # Examples
    ///
    /// ```
    /// use fleetify::outbound::filesystem::CapStdWorkspace;
    ///
    /// let workspace = CapStdWorkspace::new("backend/migrations", "backend/src/models");
    /// assert_eq!(workspace.migrations_dir(), "backend/migrations");
    /// ```
    pub fn new(migrations_dir: impl Into<Utf8PathBuf>, models_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            migrations_dir: migrations_dir.into(),
            models_dir: models_dir.into(),
        }
    }

    /// Directory holding migration files.
    pub fn migrations_dir(&self) -> &Utf8Path {
        &self.migrations_dir
    }

    /// Directory holding model sources.
    pub fn models_dir(&self) -> &Utf8Path {
        &self.models_dir
    }
}

fn open_dir(path: &Utf8Path) -> io::Result<Dir> {
    Dir::open_ambient_dir(path, ambient_authority())
}

fn workspace_io(path: &Utf8Path, error: &io::Error) -> SchemaWorkspaceError {
    SchemaWorkspaceError::io(path.as_str(), error.to_string())
}

/// Reject names that are not a single plain file name.
fn plain_file_name<'a>(root: &Utf8Path, name: &'a str) -> Result<&'a str, SchemaWorkspaceError> {
    let mut components = Utf8Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Utf8Component::Normal(file_name)), None) => Ok(file_name),
        _ => Err(SchemaWorkspaceError::io(
            root.join(name).as_str(),
            "file name must not contain directory components",
        )),
    }
}

fn create_file(
    root: &Utf8Path,
    file_name: &str,
    contents: &str,
) -> Result<Utf8PathBuf, SchemaWorkspaceError> {
    let file_name = plain_file_name(root, file_name)?;
    let target = root.join(file_name);

    Dir::create_ambient_dir_all(root, ambient_authority())
        .map_err(|error| workspace_io(root, &error))?;
    let dir = open_dir(root).map_err(|error| workspace_io(root, &error))?;

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(file_name, &options).map_err(|error| {
        if error.kind() == io::ErrorKind::AlreadyExists {
            SchemaWorkspaceError::conflict(target.as_str())
        } else {
            workspace_io(&target, &error)
        }
    })?;

    if let Err(error) = file.write_all(contents.as_bytes()).and_then(|()| file.sync_all()) {
        drop(file);
        drop(dir.remove_file(file_name));
        return Err(workspace_io(&target, &error));
    }

    debug!(path = %target, bytes = contents.len(), "created file");
    Ok(target)
}

impl MigrationSource for CapStdWorkspace {
    fn list_migrations(&self) -> Result<Vec<String>, MigrationSourceError> {
        let to_error = |error: io::Error| {
            MigrationSourceError::io(format!("{}: {error}", self.migrations_dir))
        };
        let dir = open_dir(&self.migrations_dir).map_err(to_error)?;

        let mut names = Vec::new();
        for entry in dir.entries().map_err(to_error)? {
            let entry = entry.map_err(to_error)?;
            if !entry.file_type().map_err(to_error)?.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                debug!("skipping non UTF-8 migration file name");
                continue;
            };
            if name.ends_with(".sql") {
                names.push(name);
            }
        }
        Ok(names)
    }

    fn read_migration(&self, name: &str) -> Result<String, MigrationSourceError> {
        if plain_file_name(&self.migrations_dir, name).is_err() {
            return Err(MigrationSourceError::not_found(name));
        }
        let dir = open_dir(&self.migrations_dir).map_err(|error| {
            MigrationSourceError::io(format!("{}: {error}", self.migrations_dir))
        })?;
        dir.read_to_string(name).map_err(|error| {
            if error.kind() == io::ErrorKind::NotFound {
                MigrationSourceError::not_found(name)
            } else {
                MigrationSourceError::io(format!("{}: {error}", self.migrations_dir.join(name)))
            }
        })
    }
}

impl SchemaWorkspace for CapStdWorkspace {
    fn model_exists(&self, table: &str) -> Result<bool, SchemaWorkspaceError> {
        let file_name = model_file_name(table);
        let dir = match open_dir(&self.models_dir) {
            Ok(dir) => dir,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(error) => return Err(workspace_io(&self.models_dir, &error)),
        };
        dir.try_exists(&file_name)
            .map_err(|error| workspace_io(&self.models_dir.join(&file_name), &error))
    }

    fn read_model(&self, table: &str) -> Result<String, SchemaWorkspaceError> {
        let file_name = model_file_name(table);
        let path = self.models_dir.join(&file_name);
        let not_found_or_io = |error: io::Error| {
            if error.kind() == io::ErrorKind::NotFound {
                SchemaWorkspaceError::not_found(path.as_str())
            } else {
                workspace_io(&path, &error)
            }
        };
        let dir = open_dir(&self.models_dir).map_err(not_found_or_io)?;
        dir.read_to_string(&file_name).map_err(not_found_or_io)
    }

    fn create_model(
        &self,
        table: &str,
        contents: &str,
    ) -> Result<Utf8PathBuf, SchemaWorkspaceError> {
        create_file(&self.models_dir, &model_file_name(table), contents)
    }

    fn create_migration(
        &self,
        file_name: &str,
        contents: &str,
    ) -> Result<Utf8PathBuf, SchemaWorkspaceError> {
        create_file(&self.migrations_dir, file_name, contents)
    }
}
