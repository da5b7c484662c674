//! Applies pending migrations and rolls back single migrations.
//!
//! Pending files are the `.sql` names reported by the [`MigrationSource`]
//! minus those recorded in the [`MigrationLedger`], applied in lexicographic
//! order. Each file runs in its own transaction inside the ledger adapter;
//! the first failure stops the run and later files are never attempted.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::migration_script::{forward_statements, rollback_statements};
use super::ports::{MigrationLedger, MigrationLedgerError, MigrationSource, MigrationSourceError};

/// Errors raised by the migration runner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunnerError {
    /// Migration files could not be listed or read.
    #[error(transparent)]
    Source(#[from] MigrationSourceError),
    /// The ledger could not be created or queried.
    #[error("migration ledger unavailable: {0}")]
    Ledger(#[from] MigrationLedgerError),
    /// A migration failed and was rolled back; the run stopped.
    #[error("failed to run migration {name}: {source}")]
    MigrationFailed {
        name: String,
        #[source]
        source: MigrationLedgerError,
    },
    /// The migration has no executable rollback block.
    #[error("no rollback SQL found in migration file {name}")]
    NoRollbackSql { name: String },
    /// Rollback statements failed; nothing was changed.
    #[error("failed to roll back migration {name}: {source}")]
    RollbackFailed {
        name: String,
        #[source]
        source: MigrationLedgerError,
    },
}

/// A migration applied during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    /// Migration file name.
    pub name: String,
    /// Number of forward statements executed.
    pub statement_count: usize,
}

/// Outcome of [`MigrationRunner::run_migrations`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationRunReport {
    /// Migrations applied, in order.
    pub applied: Vec<AppliedMigration>,
}

impl MigrationRunReport {
    /// `true` when nothing was pending.
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Outcome of [`MigrationRunner::rollback_migration`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackReport {
    /// Migration file name.
    pub name: String,
    /// Number of rollback statements executed.
    pub statement_count: usize,
    /// Whether the ledger held a row for the migration.
    pub ledger_row_removed: bool,
}

/// Service applying migrations from a source against a ledger.
#[derive(Clone)]
pub struct MigrationRunner<S, L> {
    source: Arc<S>,
    ledger: Arc<L>,
}

impl<S, L> MigrationRunner<S, L> {
    /// Create a runner.
    pub fn new(source: Arc<S>, ledger: Arc<L>) -> Self {
        Self { source, ledger }
    }
}

impl<S, L> MigrationRunner<S, L>
where
    S: MigrationSource,
    L: MigrationLedger,
{
    /// Pending migration names in application order.
    ///
    /// Creates the ledger table when missing.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Source`] or [`RunnerError::Ledger`] when either
    /// side cannot be read.
    pub async fn pending_migrations(&self) -> Result<Vec<String>, RunnerError> {
        self.ledger.ensure_ledger().await?;
        let applied = self.ledger.applied_migrations().await?;
        let mut pending: Vec<String> = self
            .source
            .list_migrations()?
            .into_iter()
            .filter(|name| name.ends_with(".sql") && !applied.contains(name))
            .collect();
        pending.sort();
        pending.dedup();
        Ok(pending)
    }

    /// Apply every pending migration in order.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::MigrationFailed`] for the first migration whose
    /// transaction fails. Migrations applied before it stay applied.
    pub async fn run_migrations(&self) -> Result<MigrationRunReport, RunnerError> {
        let pending = self.pending_migrations().await?;
        if pending.is_empty() {
            info!("no pending migrations");
            return Ok(MigrationRunReport::default());
        }
        info!(count = pending.len(), "found pending migrations");

        let mut report = MigrationRunReport::default();
        for name in pending {
            let contents = self.source.read_migration(&name)?;
            let statements = forward_statements(&contents);
            for (index, statement) in statements.iter().enumerate() {
                debug!(migration = %name, statement = index + 1, sql = %statement, "queued statement");
            }

            if let Err(source) = self.ledger.apply(&name, &statements).await {
                error!(migration = %name, error = %source, "migration failed; run aborted");
                return Err(RunnerError::MigrationFailed { name, source });
            }
            info!(migration = %name, statements = statements.len(), "executed migration");
            report.applied.push(AppliedMigration {
                name,
                statement_count: statements.len(),
            });
        }
        Ok(report)
    }

    /// Execute the rollback block of `name` and remove its ledger row.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Source`] when the file is missing,
    /// [`RunnerError::NoRollbackSql`] when it has no executable rollback
    /// block, and [`RunnerError::RollbackFailed`] when execution fails.
    pub async fn rollback_migration(&self, name: &str) -> Result<RollbackReport, RunnerError> {
        let contents = self.source.read_migration(name)?;
        let statements = rollback_statements(&contents);
        if statements.is_empty() {
            warn!(migration = %name, "no rollback SQL found");
            return Err(RunnerError::NoRollbackSql {
                name: name.to_owned(),
            });
        }

        self.ledger.ensure_ledger().await?;
        let ledger_row_removed = self
            .ledger
            .revert(name, &statements)
            .await
            .map_err(|source| {
                error!(migration = %name, error = %source, "rollback failed");
                RunnerError::RollbackFailed {
                    name: name.to_owned(),
                    source,
                }
            })?;
        if !ledger_row_removed {
            warn!(migration = %name, "rolled back a migration the ledger did not record");
        }
        info!(migration = %name, statements = statements.len(), "rolled back migration");

        Ok(RollbackReport {
            name: name.to_owned(),
            statement_count: statements.len(),
            ledger_row_removed,
        })
    }
}
