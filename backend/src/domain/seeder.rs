//! Table seeding from registered generators.
//!
//! The seeder resolves a table's generator in a [`SeedRegistry`], completes
//! each row (identifier, audit timestamps, password hashes) and inserts it
//! through the [`SeedRowRepository`] port with conflict-ignoring semantics.
//! Rows are inserted one by one; a failed insert stops the run and leaves
//! earlier rows committed.

use std::sync::Arc;

use fleetify_schema::{
    AUDIT_COLUMNS, SchemaError, SeedRegistry, SeedRow, SeedValue, id_column_for,
    model_name_for_table, validate_identifier,
};
use mockable::Clock;
use thiserror::Error;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::ports::{
    InsertOutcome, PasswordHashError, PasswordHasher, SeedRowRepository, SeedRowRepositoryError,
};

const PASSWORD_MARKER: &str = "password";

/// Errors raised while seeding a table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeederError {
    /// The table or a column name is not a plain SQL identifier.
    #[error("invalid identifier in seed data: {0}")]
    InvalidIdentifier(#[from] SchemaError),
    /// No generator is registered for the table.
    #[error("seed function for {model} not found; register it in models::register_seeders")]
    SeedFunctionNotFound { model: String },
    /// Hashing a password column failed.
    #[error("failed to hash column {column} of record {record}: {source}")]
    PasswordHash {
        column: String,
        record: usize,
        #[source]
        source: PasswordHashError,
    },
    /// An insert failed; earlier records remain committed.
    #[error("failed to insert record {record} into {table} ({inserted} inserted before it): {source}")]
    Insert {
        table: String,
        record: usize,
        inserted: usize,
        #[source]
        source: SeedRowRepositoryError,
    },
}

/// Outcome of seeding one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    /// Normalised table name.
    pub table: String,
    /// Records produced by the generator and processed.
    pub processed: usize,
    /// Records written.
    pub inserted: usize,
    /// Records skipped because of a conflict.
    pub skipped: usize,
}

/// Service seeding tables from registered generators.
#[derive(Clone)]
pub struct Seeder<R, H> {
    repository: Arc<R>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<R, H> Seeder<R, H> {
    /// Create a seeder.
    pub fn new(repository: Arc<R>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            hasher,
            clock,
        }
    }
}

fn is_password_column(column: &str) -> bool {
    column.to_lowercase().contains(PASSWORD_MARKER)
}

impl<R, H> Seeder<R, H>
where
    R: SeedRowRepository,
    H: PasswordHasher,
{
    /// Seed `table` from the generator registered in `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`SeederError::SeedFunctionNotFound`] for unregistered
    /// tables and [`SeederError::Insert`] for the first failing insert.
    pub async fn run(
        &self,
        registry: &SeedRegistry,
        table: &str,
    ) -> Result<SeedReport, SeederError> {
        let table = validate_identifier(table)?.to_lowercase();
        let model = model_name_for_table(&table);
        let generator = registry
            .resolve(&model)
            .ok_or_else(|| SeederError::SeedFunctionNotFound { model: model.clone() })?;

        let rows = generator();
        let mut report = SeedReport {
            table: table.clone(),
            processed: 0,
            inserted: 0,
            skipped: 0,
        };
        if rows.is_empty() {
            info!(table = %table, model = %model, "no seed data");
            return Ok(report);
        }
        info!(table = %table, records = rows.len(), "seeding table");

        let id_column = id_column_for(&table);
        for (index, row) in rows.into_iter().enumerate() {
            let record = index + 1;
            let row = self.prepare_row(row, &id_column, record)?;
            let outcome = self
                .repository
                .insert_ignoring_conflicts(&table, &row)
                .await
                .map_err(|source| {
                    error!(table = %table, record, error = %source, "seed insert failed");
                    SeederError::Insert {
                        table: table.clone(),
                        record,
                        inserted: report.inserted,
                        source,
                    }
                })?;

            report.processed += 1;
            match outcome {
                InsertOutcome::Inserted => report.inserted += 1,
                InsertOutcome::Skipped => report.skipped += 1,
            }
            debug!(table = %table, record, ?outcome, "seed record processed");
        }

        info!(
            table = %table,
            processed = report.processed,
            inserted = report.inserted,
            skipped = report.skipped,
            "seeded table"
        );
        Ok(report)
    }

    fn prepare_row(
        &self,
        mut row: SeedRow,
        id_column: &str,
        record: usize,
    ) -> Result<SeedRow, SeederError> {
        for column in row.columns() {
            validate_identifier(column)?;
        }

        let id = match row.get(id_column) {
            Some(SeedValue::Text(text)) if !text.is_empty() => Uuid::parse_str(text)
                .map_or_else(|_| SeedValue::Text(text.clone()), SeedValue::Uuid),
            Some(value) if !value.is_missing() => value.clone(),
            _ => SeedValue::Uuid(Uuid::new_v4()),
        };
        row.insert(id_column, id);

        let now = self.clock.utc();
        for column in AUDIT_COLUMNS {
            if row.is_missing(column) {
                row.insert(column, SeedValue::Timestamp(now));
            }
        }

        for (column, value) in row.iter_mut() {
            if !is_password_column(column) {
                continue;
            }
            let Some(plaintext) = value.as_text().filter(|text| !text.is_empty()) else {
                continue;
            };
            let hashed = self
                .hasher
                .hash(plaintext)
                .map_err(|source| SeederError::PasswordHash {
                    column: column.to_owned(),
                    record,
                    source,
                })?;
            *value = SeedValue::Text(hashed);
        }
        Ok(row)
    }
}
