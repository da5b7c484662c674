//! Behavioural tests for model template and migration generation.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::sync::Arc;

use camino::Utf8Path;
use fleetify::domain::ports::FixtureSchemaWorkspace;
use fleetify::domain::{GeneratorError, MigrationGenerator};
use fleetify::test_support::FixtureClock;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};

const ITEMS_MODEL: &str = include_str!("../src/models/items.rs");

#[derive(Default, ScenarioState)]
struct World {
    workspace: Slot<Arc<FixtureSchemaWorkspace>>,
    error: Slot<GeneratorError>,
}

impl World {
    fn workspace(&self) -> Arc<FixtureSchemaWorkspace> {
        self.workspace.get().expect("workspace should be set")
    }

    fn generator(&self) -> MigrationGenerator<FixtureSchemaWorkspace> {
        MigrationGenerator::new(
            self.workspace(),
            Arc::new(FixtureClock::at(2024, 5, 6, 7, 8, 9)),
        )
    }

    fn record<T>(&self, result: Result<T, GeneratorError>) {
        if let Err(err) = result {
            self.error.set(err);
        }
    }

    fn migration(&self, name: &str) -> String {
        let path = Utf8Path::new("migrations").join(name);
        self.workspace()
            .file(&path)
            .unwrap_or_else(|| panic!("migration {name} should be written"))
    }

    fn error(&self) -> GeneratorError {
        self.error.get().expect("generation should have failed")
    }
}

#[fixture]
fn world() -> World {
    World::default()
}

// ============================================================================
// Given steps
// ============================================================================

#[given("an empty schema workspace")]
fn an_empty_schema_workspace(world: &World) {
    world.workspace.set(Arc::new(FixtureSchemaWorkspace::new()));
}

#[given("a schema workspace with the items model")]
fn a_schema_workspace_with_the_items_model(world: &World) {
    world.workspace.set(Arc::new(
        FixtureSchemaWorkspace::new().with_model("items", ITEMS_MODEL),
    ));
}

// ============================================================================
// When steps
// ============================================================================

#[when("table {table} is created with seed data")]
fn table_is_created_with_seed_data(world: &World, table: String) {
    world.record(world.generator().generate_table(table.trim_matches('"'), true));
}

#[when("table {table} is created without seed data")]
fn table_is_created_without_seed_data(world: &World, table: String) {
    world.record(world.generator().generate_table(table.trim_matches('"'), false));
}

#[when("SQL is generated for table {table}")]
fn sql_is_generated_for_table(world: &World, table: String) {
    world.record(world.generator().generate_sql_from_model(table.trim_matches('"')));
}

#[when("an alter migration is generated for table {table}")]
fn an_alter_migration_is_generated_for_table(world: &World, table: String) {
    world.record(world.generator().generate_alter_table(table.trim_matches('"')));
}

// ============================================================================
// Then steps
// ============================================================================

#[then("the model file {path} declares a seed generator")]
fn the_model_file_declares_a_seed_generator(world: &World, path: String) {
    let source = world
        .workspace()
        .file(Utf8Path::new(path.trim_matches('"')))
        .expect("model should be written");
    assert!(source.contains("#[model(table = \"fleets\")]"));
    assert!(source.contains("pub fn seed_fleets()"));
    assert!(source.contains("registry.register_model(seed_fleets)"));
}

#[then("the migration {name} is written")]
fn the_migration_is_written(world: &World, name: String) {
    let name = name.trim_matches('"');
    assert_eq!(world.workspace().migration_names(), vec![name.to_owned()]);
    let contents = world.migration(name);
    assert!(contents.contains("-- Generated at: 2024-05-06T07:08:09Z"));
    assert!(contents.contains("-- DROP TABLE IF EXISTS fleets;"));
}

#[then("the migration {name} contains {fragment}")]
fn the_migration_contains(world: &World, name: String, fragment: String) {
    let contents = world.migration(name.trim_matches('"'));
    let fragment = fragment.trim_matches('"');
    assert!(
        contents.contains(fragment),
        "expected {fragment:?} in:\n{contents}"
    );
}

#[then("generation fails because the model already exists")]
fn generation_fails_because_the_model_already_exists(world: &World) {
    match world.error() {
        GeneratorError::ModelAlreadyExists { path } => assert_eq!(path, "models/items.rs"),
        other => panic!("Expected ModelAlreadyExists error, got: {other:?}"),
    }
}

#[then("generation fails with a message containing {fragment}")]
fn generation_fails_with_a_message_containing(world: &World, fragment: String) {
    let message = world.error().to_string();
    assert!(message.contains(fragment.trim_matches('"')), "message: {message}");
}

#[then("generation fails because the table name is invalid")]
fn generation_fails_because_the_table_name_is_invalid(world: &World) {
    assert!(matches!(world.error(), GeneratorError::InvalidTableName(_)));
}

#[then("no migration is written")]
fn no_migration_is_written(world: &World) {
    assert!(world.workspace().migration_names().is_empty());
}

// ============================================================================
// Scenario bindings
// ============================================================================

#[scenario(
    path = "tests/features/migration_generator.feature",
    name = "Creating a table writes a model and a create migration"
)]
fn creating_a_table_writes_a_model_and_a_create_migration(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/migration_generator.feature",
    name = "Creating an existing table is refused"
)]
fn creating_an_existing_table_is_refused(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/migration_generator.feature",
    name = "SQL generated from a model creates every column"
)]
fn sql_generated_from_a_model_creates_every_column(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/migration_generator.feature",
    name = "Alter migrations add every column idempotently"
)]
fn alter_migrations_add_every_column_idempotently(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/migration_generator.feature",
    name = "Generating SQL without a model suggests createtable"
)]
fn generating_sql_without_a_model_suggests_createtable(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/migration_generator.feature",
    name = "Table names must be plain identifiers"
)]
fn table_names_must_be_plain_identifiers(world: World) {
    let _ = world;
}
