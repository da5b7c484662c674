//! PostgreSQL-backed seed row inserts.
//!
//! Seed tables are only known at runtime, so inserts are built as raw SQL
//! with one typed bind per non-null column:
//! `INSERT INTO <table> (<columns>) VALUES ($1, ...) ON CONFLICT DO NOTHING`.
//! Identifiers are re-checked against the allow-list before they reach the
//! query text.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::sql_types::{BigInt, Bool, Double, Jsonb, Text, Timestamptz, Uuid as SqlUuid};
use diesel_async::RunQueryDsl;
use fleetify_schema::{SeedRow, SeedValue, is_valid_identifier};
use tracing::debug;

use crate::domain::ports::{InsertOutcome, SeedRowRepository, SeedRowRepositoryError};

use super::error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::pool::{DbPool, PoolError};

/// Diesel-backed implementation of [`SeedRowRepository`].
#[derive(Clone)]
pub struct DieselSeedRowRepository {
    pool: DbPool,
}

impl DieselSeedRowRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SeedRowRepositoryError {
    map_basic_pool_error(error, SeedRowRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> SeedRowRepositoryError {
    map_basic_diesel_error(
        error,
        "insert seed row",
        SeedRowRepositoryError::query,
        SeedRowRepositoryError::connection,
    )
}

/// Insert statement text for `columns` of `table`.
///
/// # Examples
///
/// ```
/// use fleetify::outbound::persistence::insert_statement;
///
/// assert_eq!(
///     insert_statement("roles", &["roles_id", "role_name"]),
///     "INSERT INTO roles (roles_id, role_name) VALUES ($1, $2) ON CONFLICT DO NOTHING"
/// );
/// assert_eq!(
///     insert_statement("roles", &[]),
///     "INSERT INTO roles DEFAULT VALUES ON CONFLICT DO NOTHING"
/// );
/// ```
pub fn insert_statement(table: &str, columns: &[&str]) -> String {
    if columns.is_empty() {
        return format!("INSERT INTO {table} DEFAULT VALUES ON CONFLICT DO NOTHING");
    }
    let placeholders = (1..=columns.len())
        .map(|position| format!("${position}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders}) ON CONFLICT DO NOTHING",
        columns.join(", ")
    )
}

fn bound_columns(
    table: &str,
    row: &SeedRow,
) -> Result<Vec<(String, SeedValue)>, SeedRowRepositoryError> {
    if !is_valid_identifier(table) {
        return Err(SeedRowRepositoryError::query(format!(
            "invalid table name '{table}'"
        )));
    }
    let mut columns = Vec::with_capacity(row.len());
    for (column, value) in row.iter() {
        if !is_valid_identifier(column) {
            return Err(SeedRowRepositoryError::query(format!(
                "invalid column name '{column}'"
            )));
        }
        if *value != SeedValue::Null {
            columns.push((column.to_owned(), value.clone()));
        }
    }
    Ok(columns)
}

#[async_trait]
impl SeedRowRepository for DieselSeedRowRepository {
    async fn insert_ignoring_conflicts(
        &self,
        table: &str,
        row: &SeedRow,
    ) -> Result<InsertOutcome, SeedRowRepositoryError> {
        let columns = bound_columns(table, row)?;
        let names: Vec<&str> = columns.iter().map(|(name, _)| name.as_str()).collect();
        let sql = insert_statement(table, &names);
        debug!(%table, columns = names.len(), "inserting seed row");

        let mut query = diesel::sql_query(sql).into_boxed::<Pg>();
        for (_, value) in columns {
            query = match value {
                SeedValue::Null => query,
                SeedValue::Text(text) => query.bind::<Text, _>(text),
                SeedValue::Integer(number) => query.bind::<BigInt, _>(number),
                SeedValue::Numeric(number) => query.bind::<Double, _>(number),
                SeedValue::Bool(flag) => query.bind::<Bool, _>(flag),
                SeedValue::Timestamp(at) => query.bind::<Timestamptz, _>(at),
                SeedValue::Json(document) => query.bind::<Jsonb, _>(document),
                SeedValue::Uuid(id) => query.bind::<SqlUuid, _>(id),
            };
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = query.execute(&mut conn).await.map_err(map_diesel_error)?;
        Ok(if affected == 0 {
            InsertOutcome::Skipped
        } else {
            InsertOutcome::Inserted
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn null_values_are_left_to_column_defaults() {
        let row = SeedRow::new()
            .with("roles_id", SeedValue::Null)
            .with("role_name", "ADMIN");
        let columns = bound_columns("roles", &row).expect("valid identifiers");
        assert_eq!(
            columns,
            vec![("role_name".to_owned(), SeedValue::Text("ADMIN".to_owned()))]
        );
    }

    #[rstest]
    #[case("roles; DROP TABLE users", "role_name")]
    #[case("roles", "role name")]
    fn unsafe_identifiers_are_rejected(#[case] table: &str, #[case] column: &str) {
        let row = SeedRow::new().with(column, "ADMIN");
        assert!(matches!(
            bound_columns(table, &row),
            Err(SeedRowRepositoryError::Query { .. })
        ));
    }
}
