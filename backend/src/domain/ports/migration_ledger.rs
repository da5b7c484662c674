//! Port abstraction for the applied-migrations ledger.
//!
//! The ledger records every migration file that has been fully applied.
//! Adapters own the transaction boundary: a migration's statements and its
//! ledger insert commit together or not at all, and the same holds for a
//! rollback's statements and its ledger delete.

use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by migration ledger adapters.
    pub enum MigrationLedgerError {
        /// Database connection could not be established.
        Connection { message: String } => "migration ledger connection failed: {message}",
        /// Ledger query or mutation failed.
        Query { message: String } => "migration ledger query failed: {message}",
        /// A migration statement failed; the transaction was rolled back.
        Statement { migration: String, index: usize, message: String } =>
            "statement {index} of {migration} failed: {message}",
        /// The ledger already holds this migration (for example a lost race
        /// against a concurrent run).
        AlreadyApplied { migration: String } =>
            "migration {migration} is already recorded in the ledger",
    }
}

/// Port for the `schema_migrations` ledger and transactional execution.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MigrationLedger: Send + Sync {
    /// Create the ledger table when it does not exist yet.
    async fn ensure_ledger(&self) -> Result<(), MigrationLedgerError>;

    /// Names of every migration recorded in the ledger.
    async fn applied_migrations(&self) -> Result<BTreeSet<String>, MigrationLedgerError>;

    /// Execute `statements` in order and record `migration`, atomically.
    ///
    /// On any failure nothing is committed.
    async fn apply(&self, migration: &str, statements: &[String])
    -> Result<(), MigrationLedgerError>;

    /// Execute rollback `statements` and delete the ledger row for
    /// `migration`, atomically.
    ///
    /// Returns `true` when a ledger row was removed.
    async fn revert(
        &self,
        migration: &str,
        statements: &[String],
    ) -> Result<bool, MigrationLedgerError>;
}

#[derive(Debug, Default)]
struct FixtureLedgerState {
    ensured: bool,
    applied: BTreeSet<String>,
    committed_statements: Vec<String>,
    failing_fragments: Vec<String>,
}

/// In-memory ledger for tests.
///
/// Statements are never interpreted; they are recorded when their migration
/// commits. A statement containing a fragment registered with
/// [`FixtureMigrationLedger::fail_on_statement`] fails and discards the
/// whole migration, mirroring a rolled-back transaction.
#[derive(Debug, Default)]
pub struct FixtureMigrationLedger {
    state: Mutex<FixtureLedgerState>,
}

impl FixtureMigrationLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger that already records `names`.
    pub fn with_applied<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ledger = Self::new();
        ledger.lock().applied = names.into_iter().map(Into::into).collect();
        ledger
    }

    /// Make any statement containing `fragment` fail.
    pub fn fail_on_statement(&self, fragment: impl Into<String>) {
        self.lock().failing_fragments.push(fragment.into());
    }

    /// Recorded migration names in ledger order.
    pub fn applied(&self) -> Vec<String> {
        self.lock().applied.iter().cloned().collect()
    }

    /// Statements from committed migrations and rollbacks, in order.
    pub fn committed_statements(&self) -> Vec<String> {
        self.lock().committed_statements.clone()
    }

    /// Whether [`MigrationLedger::ensure_ledger`] has been called.
    pub fn is_ensured(&self) -> bool {
        self.lock().ensured
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FixtureLedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn check_statements(
    state: &FixtureLedgerState,
    migration: &str,
    statements: &[String],
) -> Result<(), MigrationLedgerError> {
    for (position, statement) in statements.iter().enumerate() {
        if state
            .failing_fragments
            .iter()
            .any(|fragment| statement.contains(fragment.as_str()))
        {
            return Err(MigrationLedgerError::statement(
                migration,
                position + 1,
                "injected statement failure",
            ));
        }
    }
    Ok(())
}

#[async_trait]
impl MigrationLedger for FixtureMigrationLedger {
    async fn ensure_ledger(&self) -> Result<(), MigrationLedgerError> {
        self.lock().ensured = true;
        Ok(())
    }

    async fn applied_migrations(&self) -> Result<BTreeSet<String>, MigrationLedgerError> {
        Ok(self.lock().applied.clone())
    }

    async fn apply(
        &self,
        migration: &str,
        statements: &[String],
    ) -> Result<(), MigrationLedgerError> {
        let mut state = self.lock();
        check_statements(&state, migration, statements)?;
        if state.applied.contains(migration) {
            return Err(MigrationLedgerError::already_applied(migration));
        }
        state.committed_statements.extend_from_slice(statements);
        state.applied.insert(migration.to_owned());
        Ok(())
    }

    async fn revert(
        &self,
        migration: &str,
        statements: &[String],
    ) -> Result<bool, MigrationLedgerError> {
        let mut state = self.lock();
        check_statements(&state, migration, statements)?;
        state.committed_statements.extend_from_slice(statements);
        Ok(state.applied.remove(migration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn statements(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| (*item).to_owned()).collect()
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_records_committed_migrations() {
        let ledger = FixtureMigrationLedger::new();
        ledger.ensure_ledger().await.expect("ensure ledger");
        ledger
            .apply("a.sql", &statements(&["CREATE TABLE a (id INT);"]))
            .await
            .expect("apply a");

        assert!(ledger.is_ensured());
        assert_eq!(ledger.applied(), vec!["a.sql".to_owned()]);
        assert_eq!(
            ledger.committed_statements(),
            statements(&["CREATE TABLE a (id INT);"])
        );
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_failure_discards_the_whole_migration() {
        let ledger = FixtureMigrationLedger::new();
        ledger.fail_on_statement("broken");

        let result = ledger
            .apply("b.sql", &statements(&["SELECT 1;", "SELECT broken;"]))
            .await;

        assert_eq!(
            result,
            Err(MigrationLedgerError::statement(
                "b.sql",
                2_usize,
                "injected statement failure"
            ))
        );
        assert!(ledger.applied().is_empty());
        assert!(ledger.committed_statements().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_rejects_duplicate_ledger_rows() {
        let ledger = FixtureMigrationLedger::with_applied(["a.sql"]);
        let result = ledger.apply("a.sql", &[]).await;
        assert_eq!(result, Err(MigrationLedgerError::already_applied("a.sql")));
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_revert_reports_removed_rows() {
        let ledger = FixtureMigrationLedger::with_applied(["a.sql"]);
        let removed = ledger
            .revert("a.sql", &statements(&["DROP TABLE a;"]))
            .await
            .expect("revert a");
        let removed_again = ledger.revert("a.sql", &[]).await.expect("revert again");

        assert!(removed);
        assert!(!removed_again);
        assert!(ledger.applied().is_empty());
    }
}
