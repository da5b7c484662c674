//! Generation of model templates and migration files.
//!
//! The generator validates the table name, renders text with
//! [`super::migration_templates`] and writes it through the
//! [`SchemaWorkspace`] port. Column extraction happens before any write, so
//! a model that fails to parse leaves the workspace untouched.

use std::sync::Arc;

use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use fleetify_schema::{ModelDescriptor, SchemaError, extract_descriptor, validate_identifier};
use mockable::Clock;
use thiserror::Error;
use tracing::{info, warn};

use super::migration_templates::{
    MigrationKind, migration_file_name, render_alter_from_model, render_create_from_model,
    render_create_placeholder, render_model,
};
use super::ports::{SchemaWorkspace, SchemaWorkspaceError};

/// Errors raised while generating files.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    /// The table name is not a plain SQL identifier.
    #[error("invalid table name: {0}")]
    InvalidTableName(#[source] SchemaError),
    /// A model source already exists for the table.
    #[error("model already exists: {path}")]
    ModelAlreadyExists { path: String },
    /// No model source exists for the table.
    #[error("model file for '{table}' not found. Create the model first with: createtable {table}")]
    ModelNotFound { table: String },
    /// The model source could not be turned into a column list.
    #[error("failed to generate SQL from model: {0}")]
    Extraction(#[from] SchemaError),
    /// The model declares no columns to add.
    #[error("model for '{table}' declares no columns to add")]
    NoColumns { table: String },
    /// Reading or writing the workspace failed.
    #[error(transparent)]
    Workspace(#[from] SchemaWorkspaceError),
}

/// Files written by [`MigrationGenerator::generate_table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableScaffold {
    /// Normalised table name.
    pub table: String,
    /// Path of the new model source.
    pub model_path: Utf8PathBuf,
    /// Path of the companion create migration.
    pub migration_path: Utf8PathBuf,
}

/// Migration written from an existing model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMigration {
    /// Normalised table name.
    pub table: String,
    /// Path of the new migration file.
    pub path: Utf8PathBuf,
    /// Number of columns extracted from the model.
    pub column_count: usize,
}

/// Service that writes model templates and migration files.
#[derive(Clone)]
pub struct MigrationGenerator<W> {
    workspace: Arc<W>,
    clock: Arc<dyn Clock>,
}

impl<W> MigrationGenerator<W> {
    /// Create a generator over `workspace`, stamping files with `clock`.
    pub fn new(workspace: Arc<W>, clock: Arc<dyn Clock>) -> Self {
        Self { workspace, clock }
    }
}

fn normalise_table(table: &str) -> Result<String, GeneratorError> {
    validate_identifier(table).map_err(GeneratorError::InvalidTableName)?;
    Ok(table.to_lowercase())
}

impl<W> MigrationGenerator<W>
where
    W: SchemaWorkspace,
{
    /// Write a model template and a placeholder create migration.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::ModelAlreadyExists`] when the model source is
    /// present, and [`GeneratorError::Workspace`] when writing fails.
    pub fn generate_table(
        &self,
        table: &str,
        with_seed: bool,
    ) -> Result<TableScaffold, GeneratorError> {
        let table = normalise_table(table)?;
        let model_source = render_model(&table, with_seed);

        let model_path = match self.workspace.create_model(&table, &model_source) {
            Ok(path) => path,
            Err(SchemaWorkspaceError::Conflict { path }) => {
                warn!(table = %table, path = %path, "model template already exists");
                return Err(GeneratorError::ModelAlreadyExists { path });
            }
            Err(err) => return Err(err.into()),
        };

        let now = self.clock.utc();
        let file_name = migration_file_name(now, &table, MigrationKind::Create);
        let migration_path = self
            .workspace
            .create_migration(&file_name, &render_create_placeholder(&table, now))?;

        info!(
            table = %table,
            model = %model_path,
            migration = %migration_path,
            with_seed,
            "generated model template"
        );
        Ok(TableScaffold {
            table,
            model_path,
            migration_path,
        })
    }

    /// Write a create migration from the table's model source.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::ModelNotFound`] when no model exists and
    /// [`GeneratorError::Extraction`] when it cannot be parsed.
    pub fn generate_sql_from_model(&self, table: &str) -> Result<GeneratedMigration, GeneratorError> {
        let descriptor = self.load_descriptor(table)?;
        let now = self.clock.utc();
        let contents = render_create_from_model(&descriptor, now);
        self.write_migration(&descriptor, MigrationKind::Create, now, &contents)
    }

    /// Write an alter migration adding every column of the table's model.
    ///
    /// # Errors
    ///
    /// As [`MigrationGenerator::generate_sql_from_model`], plus
    /// [`GeneratorError::NoColumns`] when the model has nothing to add.
    pub fn generate_alter_table(&self, table: &str) -> Result<GeneratedMigration, GeneratorError> {
        let descriptor = self.load_descriptor(table)?;
        if descriptor.is_empty() {
            return Err(GeneratorError::NoColumns {
                table: descriptor.table().to_owned(),
            });
        }
        let now = self.clock.utc();
        let contents = render_alter_from_model(&descriptor, now);
        self.write_migration(&descriptor, MigrationKind::Alter, now, &contents)
    }

    fn load_descriptor(&self, table: &str) -> Result<ModelDescriptor, GeneratorError> {
        let table = normalise_table(table)?;
        if !self.workspace.model_exists(&table)? {
            return Err(GeneratorError::ModelNotFound { table });
        }
        let source = self.workspace.read_model(&table)?;
        extract_descriptor(&source, &table).map_err(|err| {
            warn!(table = %table, error = %err, "model extraction failed");
            GeneratorError::Extraction(err)
        })
    }

    fn write_migration(
        &self,
        descriptor: &ModelDescriptor,
        kind: MigrationKind,
        at: DateTime<Utc>,
        contents: &str,
    ) -> Result<GeneratedMigration, GeneratorError> {
        let table = descriptor.table().to_owned();
        let file_name = migration_file_name(at, &table, kind);
        let path = self.workspace.create_migration(&file_name, contents)?;
        info!(
            table = %table,
            migration = %path,
            columns = descriptor.columns().len(),
            kind = kind.as_str(),
            "generated migration from model"
        );
        Ok(GeneratedMigration {
            table,
            path,
            column_count: descriptor.columns().len(),
        })
    }
}
