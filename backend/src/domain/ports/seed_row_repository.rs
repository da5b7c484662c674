//! Port abstraction for idempotent seed inserts.
//!
//! Each call inserts one row with `ON CONFLICT DO NOTHING` semantics and
//! commits on its own. A conflicting row is reported as
//! [`InsertOutcome::Skipped`], never as an error.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use fleetify_schema::{SeedRow, SeedValue, id_column_for};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by seed row repository adapters.
    pub enum SeedRowRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "seed insert connection failed: {message}",
        /// The insert was rejected for a reason other than a conflict.
        Query { message: String } => "seed insert failed: {message}",
    }
}

/// Result of a single idempotent insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The row was written.
    Inserted,
    /// A conflicting row already existed; nothing was written.
    Skipped,
}

/// Port for inserting seed rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeedRowRepository: Send + Sync {
    /// Insert `row` into `table`, ignoring conflicts.
    ///
    /// `Null` values are omitted so column defaults apply.
    async fn insert_ignoring_conflicts(
        &self,
        table: &str,
        row: &SeedRow,
    ) -> Result<InsertOutcome, SeedRowRepositoryError>;
}

#[derive(Debug, Default)]
struct FixtureTables {
    rows: BTreeMap<String, Vec<SeedRow>>,
    unique_columns: BTreeMap<String, BTreeSet<String>>,
    calls: usize,
    failing_call: Option<usize>,
}

/// In-memory seed row store.
///
/// A row conflicts when it shares a non-null value with an existing row in
/// the table's identifier column (`<table>_id`) or in any column declared
/// with [`FixtureSeedRowRepository::with_unique_column`].
#[derive(Debug, Default)]
pub struct FixtureSeedRowRepository {
    tables: Mutex<FixtureTables>,
}

impl FixtureSeedRowRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat `column` of `table` as unique.
    pub fn with_unique_column(self, table: &str, column: &str) -> Self {
        self.lock()
            .unique_columns
            .entry(table.to_owned())
            .or_default()
            .insert(column.to_owned());
        self
    }

    /// Make the `call`-th insert (1-based) fail with a query error.
    pub fn fail_on_call(&self, call: usize) {
        self.lock().failing_call = Some(call);
    }

    /// Rows stored for `table`, in insertion order.
    pub fn rows(&self, table: &str) -> Vec<SeedRow> {
        self.lock().rows.get(table).cloned().unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FixtureTables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn conflicts(existing: &SeedRow, candidate: &SeedRow, keys: &BTreeSet<String>) -> bool {
    keys.iter().any(|key| match (existing.get(key), candidate.get(key)) {
        (Some(left), Some(right)) => *left != SeedValue::Null && left == right,
        _ => false,
    })
}

#[async_trait]
impl SeedRowRepository for FixtureSeedRowRepository {
    async fn insert_ignoring_conflicts(
        &self,
        table: &str,
        row: &SeedRow,
    ) -> Result<InsertOutcome, SeedRowRepositoryError> {
        let mut tables = self.lock();
        tables.calls += 1;
        if tables.failing_call == Some(tables.calls) {
            return Err(SeedRowRepositoryError::query(format!(
                "injected failure inserting into {table}"
            )));
        }

        let mut keys = tables.unique_columns.get(table).cloned().unwrap_or_default();
        keys.insert(id_column_for(table));

        let stored = tables.rows.entry(table.to_owned()).or_default();
        if stored.iter().any(|existing| conflicts(existing, row, &keys)) {
            return Ok(InsertOutcome::Skipped);
        }
        stored.push(row.clone());
        Ok(InsertOutcome::Inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_skips_rows_with_duplicate_unique_values() {
        let repository = FixtureSeedRowRepository::new().with_unique_column("roles", "role_name");
        let first = SeedRow::new()
            .with("roles_id", "a")
            .with("role_name", "ADMIN");
        let second = SeedRow::new()
            .with("roles_id", "b")
            .with("role_name", "ADMIN");

        let outcomes = (
            repository.insert_ignoring_conflicts("roles", &first).await,
            repository.insert_ignoring_conflicts("roles", &second).await,
        );

        assert_eq!(
            outcomes,
            (Ok(InsertOutcome::Inserted), Ok(InsertOutcome::Skipped))
        );
        assert_eq!(repository.rows("roles"), vec![first]);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_injects_failures_by_call() {
        let repository = FixtureSeedRowRepository::new();
        repository.fail_on_call(1);

        let result = repository
            .insert_ignoring_conflicts("items", &SeedRow::new().with("item_name", "Tyre"))
            .await;

        assert!(matches!(result, Err(SeedRowRepositoryError::Query { .. })));
        assert!(repository.rows("items").is_empty());
    }
}
