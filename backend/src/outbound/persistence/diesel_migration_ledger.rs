//! PostgreSQL-backed migration ledger.
//!
//! Each migration (or rollback) runs inside one Diesel transaction: every
//! statement is sent with `batch_execute`, then the ledger row is inserted
//! (or deleted). Any error rolls the whole transaction back.

use std::collections::BTreeSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl, SimpleAsyncConnection};
use tracing::debug;

use crate::domain::ports::{MigrationLedger, MigrationLedgerError};

use super::error_mapping::{
    diesel_error_message, is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::pool::{DbPool, PoolError};
use super::schema::schema_migrations;

/// DDL creating the ledger table.
pub const LEDGER_DDL: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    id SERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL UNIQUE,
    executed_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);";

/// Diesel-backed implementation of [`MigrationLedger`].
#[derive(Clone)]
pub struct DieselMigrationLedger {
    pool: DbPool,
}

impl DieselMigrationLedger {
    /// Create a ledger over `pool`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use fleetify::outbound::persistence::{DbPool, DieselMigrationLedger, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::for_cli("postgres://localhost/fleetify")).await?;
    /// let ledger = DieselMigrationLedger::new(pool);
    /// # let _ = ledger;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a migration transaction.
#[derive(Debug)]
enum TransactionError {
    /// The statement at `index` (1-based) failed.
    Statement {
        index: usize,
        source: diesel::result::Error,
    },
    /// Ledger bookkeeping or the transaction itself failed.
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for TransactionError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn map_pool_error(error: PoolError) -> MigrationLedgerError {
    map_basic_pool_error(error, MigrationLedgerError::connection)
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> MigrationLedgerError {
    map_basic_diesel_error(
        error,
        operation,
        MigrationLedgerError::query,
        MigrationLedgerError::connection,
    )
}

fn map_transaction_error(migration: &str, error: TransactionError) -> MigrationLedgerError {
    match error {
        TransactionError::Statement { index, source } => {
            let message = diesel_error_message(&source, "execute migration statement");
            MigrationLedgerError::statement(migration, index, message)
        }
        TransactionError::Diesel(source) if is_unique_violation(&source) => {
            debug!(%migration, "ledger row already present");
            MigrationLedgerError::already_applied(migration)
        }
        TransactionError::Diesel(source) => map_diesel_error(source, "update migration ledger"),
    }
}

async fn execute_statements(
    conn: &mut diesel_async::AsyncPgConnection,
    migration: &str,
    statements: &[String],
) -> Result<(), TransactionError> {
    for (position, statement) in statements.iter().enumerate() {
        let index = position + 1;
        debug!(%migration, statement = index, "executing statement");
        conn.batch_execute(statement)
            .await
            .map_err(|source| TransactionError::Statement { index, source })?;
    }
    Ok(())
}

#[async_trait]
impl MigrationLedger for DieselMigrationLedger {
    async fn ensure_ledger(&self) -> Result<(), MigrationLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.batch_execute(LEDGER_DDL)
            .await
            .map_err(|err| map_diesel_error(err, "create migration ledger"))
    }

    async fn applied_migrations(&self) -> Result<BTreeSet<String>, MigrationLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let names: Vec<String> = schema_migrations::table
            .select(schema_migrations::name)
            .order(schema_migrations::name.asc())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list applied migrations"))?;
        Ok(names.into_iter().collect())
    }

    async fn apply(
        &self,
        migration: &str,
        statements: &[String],
    ) -> Result<(), MigrationLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction::<_, TransactionError, _>(|conn| {
            async move {
                execute_statements(conn, migration, statements).await?;
                diesel::insert_into(schema_migrations::table)
                    .values(schema_migrations::name.eq(migration))
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_transaction_error(migration, err))
    }

    async fn revert(
        &self,
        migration: &str,
        statements: &[String],
    ) -> Result<bool, MigrationLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = conn
            .transaction::<_, TransactionError, _>(|conn| {
                async move {
                    execute_statements(conn, migration, statements).await?;
                    let removed = diesel::delete(
                        schema_migrations::table.filter(schema_migrations::name.eq(migration)),
                    )
                    .execute(conn)
                    .await?;
                    Ok(removed)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_transaction_error(migration, err))?;
        Ok(removed > 0)
    }
}
