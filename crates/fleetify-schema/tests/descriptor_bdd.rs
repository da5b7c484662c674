//! Behavioural tests for model descriptor extraction and the seed registry.
//!
//! These scenarios cover column DDL rendering from annotated model source
//! and registration/resolution of seed generators by table name.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::sync::Arc;

use fleetify_schema::{
    Model, ModelDescriptor, SchemaError, SeedRegistry, SeedRow, extract_descriptor,
};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};

// ============================================================================
// Test fixtures and constants
// ============================================================================

const ITEMS_SOURCE: &str = r#"
    use fleetify_schema_derive::Model;

    #[derive(Debug, Clone, Model)]
    #[model(table = "items")]
    pub struct Item {
        #[column("items_id")]
        pub items_id: Option<uuid::Uuid>,
        #[column("item_name", not_null, unique)]
        pub item_name: String,
        #[column("unit_price", not_null)]
        pub unit_price: f64,
        #[column("stock", not_null)]
        pub stock: i32,
        #[column("created_timestamp")]
        pub created_timestamp: Option<chrono::DateTime<chrono::Utc>>,
        #[column("updated_timestamp")]
        pub updated_timestamp: Option<chrono::DateTime<chrono::Utc>>,
    }
"#;

const LEDGER_SOURCE: &str = r#"
    #[derive(Model)]
    #[model(table = "ledger")]
    pub struct Ledger {
        #[column("amount", not_null, unique)]
        pub amount: f64,
    }
"#;

const SETTINGS_SOURCE: &str = r#"
    #[derive(Model)]
    #[model(table = "settings")]
    pub struct Setting {
        #[column("preferences")]
        pub preferences: std::collections::HashMap<String, serde_json::Value>,
    }
"#;

struct Role {
    name: &'static str,
}

impl Model for Role {
    const TABLE: &'static str = "roles";

    fn to_row(&self) -> SeedRow {
        SeedRow::new().with("role_name", self.name)
    }
}

fn seed_roles() -> Vec<Role> {
    vec![Role { name: "ADMIN" }, Role { name: "MANAGER" }]
}

#[derive(Default, ScenarioState)]
struct World {
    source: Slot<String>,
    result: Slot<Result<ModelDescriptor, SchemaError>>,
    registry: Slot<Arc<SeedRegistry>>,
}

impl World {
    fn descriptor(&self) -> ModelDescriptor {
        self.result
            .get()
            .expect("extraction should have run")
            .expect("extraction should succeed")
    }

    fn definitions(&self) -> Vec<String> {
        self.descriptor()
            .columns()
            .iter()
            .map(|column| column.definition())
            .collect()
    }

    fn registry(&self) -> Arc<SeedRegistry> {
        self.registry.get().expect("registry should be set")
    }
}

#[fixture]
fn world() -> World {
    World::default()
}

// ============================================================================
// Given steps
// ============================================================================

#[given("the items model source")]
fn the_items_model_source(world: &World) {
    world.source.set(ITEMS_SOURCE.to_owned());
}

#[given("a model with a not-null unique floating-point field")]
fn a_model_with_a_not_null_unique_floating_point_field(world: &World) {
    world.source.set(LEDGER_SOURCE.to_owned());
}

#[given("a model with a map field")]
fn a_model_with_a_map_field(world: &World) {
    world.source.set(SETTINGS_SOURCE.to_owned());
}

#[given("model source that is not valid Rust")]
fn model_source_that_is_not_valid_rust(world: &World) {
    world.source.set("pub struct Item { #[column(".to_owned());
}

#[given("an empty seed registry")]
fn an_empty_seed_registry(world: &World) {
    world.registry.set(Arc::new(SeedRegistry::new()));
}

// ============================================================================
// When steps
// ============================================================================

#[when("the descriptor is extracted for table {table}")]
fn the_descriptor_is_extracted_for_table(world: &World, table: String) {
    let source = world.source.get().expect("source should be set");
    let result = extract_descriptor(&source, table.trim_matches('"'));
    world.result.set(result);
}

#[when("the roles model registers its seed generator")]
fn the_roles_model_registers_its_seed_generator(world: &World) {
    world.registry().register_model(seed_roles);
}

// ============================================================================
// Then steps
// ============================================================================

#[then("extraction succeeds")]
fn extraction_succeeds(world: &World) {
    let result = world.result.get().expect("extraction should have run");
    assert!(result.is_ok(), "expected extraction to succeed: {result:?}");
}

#[then("the column definitions are rendered in declaration order")]
fn the_column_definitions_are_rendered_in_declaration_order(world: &World) {
    assert_eq!(
        world.definitions(),
        vec![
            "item_name TEXT NOT NULL UNIQUE",
            "unit_price NUMERIC(10, 2) NOT NULL",
            "stock INTEGER NOT NULL",
        ]
    );
}

#[then("the only column definition is {expected}")]
fn the_only_column_definition_is(world: &World, expected: String) {
    assert_eq!(world.definitions(), vec![expected.trim_matches('"').to_owned()]);
}

#[then("extraction fails with a parse error")]
fn extraction_fails_with_a_parse_error(world: &World) {
    match world.result.get().expect("extraction should have run") {
        Err(SchemaError::Parse { .. }) => {}
        other => panic!("Expected Parse error, got: {other:?}"),
    }
}

#[then("resolving table {table} yields {count:usize} rows")]
fn resolving_table_yields_rows(world: &World, table: String, count: usize) {
    let generator = world
        .registry()
        .resolve_table(table.trim_matches('"'))
        .expect("generator should be registered");
    assert_eq!(generator().len(), count);
}

#[then("resolving table {table} yields nothing")]
fn resolving_table_yields_nothing(world: &World, table: String) {
    assert!(
        world
            .registry()
            .resolve_table(table.trim_matches('"'))
            .is_none()
    );
}

// ============================================================================
// Scenario bindings
// ============================================================================

#[scenario(
    path = "tests/features/descriptor_extraction.feature",
    name = "Annotated fields become column definitions"
)]
fn annotated_fields_become_column_definitions(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/descriptor_extraction.feature",
    name = "Floating-point field with both markers"
)]
fn floating_point_field_with_both_markers(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/descriptor_extraction.feature",
    name = "Map fields become JSONB"
)]
fn map_fields_become_jsonb(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/descriptor_extraction.feature",
    name = "Unparseable source is rejected"
)]
fn unparseable_source_is_rejected(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/seed_registry.feature",
    name = "Registered model resolves by table name"
)]
fn registered_model_resolves_by_table_name(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/seed_registry.feature",
    name = "Unregistered model is absent"
)]
fn unregistered_model_is_absent(world: World) {
    let _ = world;
}
