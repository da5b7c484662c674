//! Behavioural tests for applying and rolling back migrations.
//!
//! Scenarios run the migration runner against in-memory fixtures for the
//! migration source and the ledger.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::future::Future;
use std::sync::Arc;

use fleetify::domain::ports::{FixtureMigrationLedger, FixtureMigrationSource};
use fleetify::domain::{MigrationRunReport, MigrationRunner, RollbackReport, RunnerError};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};

const ITEMS_MIGRATION: &str = "-- Migration: Create table items
CREATE TABLE IF NOT EXISTS items (
    items_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name TEXT NOT NULL
);
COMMENT ON TABLE items IS 'Table for items';

-- Rollback
DROP TABLE IF EXISTS items;
";

const ROLES_MIGRATION: &str = "-- Migration: Create table roles
CREATE TABLE IF NOT EXISTS roles (
    roles_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    role_name TEXT NOT NULL
);

-- Rollback
-- DROP TABLE IF EXISTS roles;
";

const SUPPLIERS_MIGRATION: &str = "-- Migration: Create table suppliers
CREATE TABLE IF NOT EXISTS suppliers (
    suppliers_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name TEXT NOT NULL
);

-- Rollback
DROP TABLE IF EXISTS suppliers;
";

#[derive(Default, ScenarioState)]
struct World {
    source: Slot<FixtureMigrationSource>,
    ledger: Slot<Arc<FixtureMigrationLedger>>,
    run_result: Slot<Result<MigrationRunReport, RunnerError>>,
    rollback_result: Slot<Result<RollbackReport, RunnerError>>,
}

impl World {
    fn ledger(&self) -> Arc<FixtureMigrationLedger> {
        if let Some(ledger) = self.ledger.get() {
            return ledger;
        }
        let ledger = Arc::new(FixtureMigrationLedger::new());
        self.ledger.set(Arc::clone(&ledger));
        ledger
    }

    fn runner(&self) -> MigrationRunner<FixtureMigrationSource, FixtureMigrationLedger> {
        let source = self.source.get().expect("migrations should be set");
        MigrationRunner::new(Arc::new(source), self.ledger())
    }

    fn report(&self) -> MigrationRunReport {
        self.run_result
            .get()
            .expect("migrations should have run")
            .expect("run should succeed")
    }
}

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime")
        .block_on(future)
}

#[fixture]
fn world() -> World {
    World::default()
}

// ============================================================================
// Given steps
// ============================================================================

#[given("a migrations directory with three create migrations")]
fn a_migrations_directory_with_three_create_migrations(world: &World) {
    world.source.set(
        FixtureMigrationSource::new()
            .with_file("20240103000000_suppliers_create.sql", SUPPLIERS_MIGRATION)
            .with_file("20240101000000_items_create.sql", ITEMS_MIGRATION)
            .with_file("20240102000000_roles_create.sql", ROLES_MIGRATION),
    );
}

#[given("the ledger already records {name}")]
fn the_ledger_already_records(world: &World, name: String) {
    world.ledger.set(Arc::new(FixtureMigrationLedger::with_applied([
        name.trim_matches('"'),
    ])));
}

#[given("statements mentioning {fragment} fail")]
fn statements_mentioning_fail(world: &World, fragment: String) {
    world.ledger().fail_on_statement(fragment.trim_matches('"'));
}

// ============================================================================
// When steps
// ============================================================================

#[when("the migrations run")]
fn the_migrations_run(world: &World) {
    let result = block_on(world.runner().run_migrations());
    world.run_result.set(result);
}

#[when("the migrations are run a second time")]
fn the_migrations_are_run_a_second_time(world: &World) {
    the_migrations_run(world);
}

#[when("migration {name} is rolled back")]
fn migration_is_rolled_back(world: &World, name: String) {
    let result = block_on(world.runner().rollback_migration(name.trim_matches('"')));
    world.rollback_result.set(result);
}

// ============================================================================
// Then steps
// ============================================================================

#[then("the run applies {count} migrations")]
fn the_run_applies_migrations(world: &World, count: usize) {
    assert_eq!(world.report().applied.len(), count);
}

#[then("the first applied migration is {name}")]
fn the_first_applied_migration_is(world: &World, name: String) {
    let report = world.report();
    let first = report.applied.first().expect("a migration should apply");
    assert_eq!(first.name, name.trim_matches('"'));
}

#[then("the ledger records {count} migrations")]
fn the_ledger_records_migrations(world: &World, count: usize) {
    assert!(world.ledger().is_ensured());
    assert_eq!(world.ledger().applied().len(), count);
}

#[then("the run fails on migration {name}")]
fn the_run_fails_on_migration(world: &World, name: String) {
    match world.run_result.get().expect("migrations should have run") {
        Err(RunnerError::MigrationFailed { name: failed, .. }) => {
            assert_eq!(failed, name.trim_matches('"'));
        }
        other => panic!("Expected MigrationFailed error, got: {other:?}"),
    }
}

#[then("the ledger records only {name}")]
fn the_ledger_records_only(world: &World, name: String) {
    assert_eq!(world.ledger().applied(), vec![name.trim_matches('"').to_owned()]);
}

#[then("the rollback executes {count} statement")]
fn the_rollback_executes_statement(world: &World, count: usize) {
    let report = world
        .rollback_result
        .get()
        .expect("rollback should have run")
        .expect("rollback should succeed");
    assert_eq!(report.statement_count, count);
    assert!(report.ledger_row_removed);
}

#[then("the ledger no longer records {name}")]
fn the_ledger_no_longer_records(world: &World, name: String) {
    let name = name.trim_matches('"');
    assert!(!world.ledger().applied().iter().any(|applied| applied == name));
    assert!(
        world
            .ledger()
            .committed_statements()
            .iter()
            .any(|statement| statement.contains("DROP TABLE IF EXISTS items"))
    );
}

#[then("the rollback fails with {message}")]
fn the_rollback_fails_with(world: &World, message: String) {
    let error = world
        .rollback_result
        .get()
        .expect("rollback should have run")
        .expect_err("rollback should fail");
    assert_eq!(error.to_string(), message.trim_matches('"'));
}

// ============================================================================
// Scenario bindings
// ============================================================================

#[scenario(
    path = "tests/features/migration_runner.feature",
    name = "Pending migrations apply in file name order"
)]
fn pending_migrations_apply_in_file_name_order(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/migration_runner.feature",
    name = "Re-running applies nothing"
)]
fn re_running_applies_nothing(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/migration_runner.feature",
    name = "Previously recorded migrations are skipped"
)]
fn previously_recorded_migrations_are_skipped(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/migration_runner.feature",
    name = "A failing statement aborts the run"
)]
fn a_failing_statement_aborts_the_run(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/migration_runner.feature",
    name = "Rollback executes the rollback block"
)]
fn rollback_executes_the_rollback_block(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/migration_runner.feature",
    name = "Migrations without a rollback block cannot be rolled back"
)]
fn migrations_without_a_rollback_block_cannot_be_rolled_back(world: World) {
    let _ = world;
}
