//! Text templates for generated model sources and migration files.
//!
//! Renderers are pure: callers supply the table name, the extracted
//! descriptor and the generation timestamp. Table names must already have
//! passed identifier validation.

use chrono::{DateTime, SecondsFormat, Utc};
use fleetify_schema::{
    CREATED_TIMESTAMP_COLUMN, ModelDescriptor, UPDATED_TIMESTAMP_COLUMN, id_column_for,
    model_name_for_table,
};

use super::ports::model_file_name;

/// Kind of migration file, used as the file name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationKind {
    /// `CREATE TABLE` migration.
    Create,
    /// `ALTER TABLE` migration.
    Alter,
}

impl MigrationKind {
    /// File name suffix for this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Alter => "alter",
        }
    }
}

/// Migration file name: `<YYYYMMDDHHMMSS>_<table>_<kind>.sql`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use fleetify::domain::{MigrationKind, migration_file_name};
///
/// let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
/// assert_eq!(
///     migration_file_name(at, "items", MigrationKind::Create),
///     "20240309070501_items_create.sql"
/// );
/// ```
pub fn migration_file_name(at: DateTime<Utc>, table: &str, kind: MigrationKind) -> String {
    format!("{}_{table}_{}.sql", at.format("%Y%m%d%H%M%S"), kind.as_str())
}

fn generated_at(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Rust source for a new model definition.
///
/// With `with_seed`, the source also declares `seed_<table>()` and a
/// `register` function adding it to a [`fleetify_schema::SeedRegistry`].
pub fn render_model(table: &str, with_seed: bool) -> String {
    let model = model_name_for_table(table);
    let id_column = id_column_for(table);
    let seed_import = if with_seed {
        "use fleetify_schema::SeedRegistry;\n"
    } else {
        ""
    };

    let mut source = format!(
        r#"//! Model for the `{table}` table.

use chrono::{{DateTime, Utc}};
{seed_import}use fleetify_schema_derive::Model;
use uuid::Uuid;

/// Row of the `{table}` table.
#[derive(Debug, Clone, Model)]
#[model(table = "{table}")]
pub struct {model} {{
    /// Primary key, UUID v4.
    #[column("{id_column}")]
    pub {id_column}: Option<Uuid>,

    // Add columns here. Only fields carrying #[column] are persisted.
    //
    // Text field (nullable):
    // #[column("field_name")]
    // pub field_name: Option<String>,
    //
    // Text field (NOT NULL):
    // #[column("field_name", not_null)]
    // pub field_name: String,
    //
    // Text field (UNIQUE):
    // #[column("field_name", unique)]
    // pub field_name: String,
    //
    // JSONB field:
    // #[column("data")]
    // pub data: HashMap<String, serde_json::Value>,
    //
    // Numeric field:
    // #[column("amount")]
    // pub amount: f64,
    //
    // Boolean field:
    // #[column("is_active")]
    // pub is_active: bool,
    //
    // Timestamp field:
    // #[column("event_date")]
    // pub event_date: DateTime<Utc>,
    //
    // Foreign key:
    // #[column("users_id")]
    // pub users_id: Option<Uuid>,

    #[column("{CREATED_TIMESTAMP_COLUMN}")]
    pub {CREATED_TIMESTAMP_COLUMN}: Option<DateTime<Utc>>,
    #[column("{UPDATED_TIMESTAMP_COLUMN}")]
    pub {UPDATED_TIMESTAMP_COLUMN}: Option<DateTime<Utc>>,
}}
"#
    );

    if with_seed {
        source.push_str(&format!(
            r#"
/// Seed rows for the `{table}` table.
pub fn seed_{table}() -> Vec<{model}> {{
    vec![
        // {model} {{
        //     {id_column}: None,
        //     field_name: "value".to_owned(),
        //     {CREATED_TIMESTAMP_COLUMN}: None,
        //     {UPDATED_TIMESTAMP_COLUMN}: None,
        // }},
    ]
}}

/// Registers [`seed_{table}`] with `registry`.
pub fn register(registry: &SeedRegistry) {{
    registry.register_model(seed_{table});
}}
"#
        ));
    }
    source
}

fn table_comments(table: &str, id_column: &str) -> String {
    format!(
        "-- Table and column comments\n\
         COMMENT ON TABLE {table} IS 'Table for {table}';\n\
         COMMENT ON COLUMN {table}.{id_column} IS 'Primary key UUID';\n\
         COMMENT ON COLUMN {table}.{CREATED_TIMESTAMP_COLUMN} IS 'Record creation timestamp';\n\
         COMMENT ON COLUMN {table}.{UPDATED_TIMESTAMP_COLUMN} IS 'Record update timestamp';\n"
    )
}

/// `CREATE TABLE` migration with a commented placeholder region for
/// developer-authored columns.
pub fn render_create_placeholder(table: &str, at: DateTime<Utc>) -> String {
    let id_column = id_column_for(table);
    let comments = table_comments(table, &id_column);
    let generated = generated_at(at);
    format!(
        r#"-- Migration: Create table {table}
-- Generated at: {generated}

CREATE EXTENSION IF NOT EXISTS "uuid-ossp";

CREATE TABLE IF NOT EXISTS {table} (
    {id_column} UUID PRIMARY KEY DEFAULT gen_random_uuid(),

    -- Text columns:
    -- name TEXT NOT NULL,
    -- email TEXT UNIQUE,
    -- status TEXT DEFAULT 'active' NOT NULL,
    --
    -- Numeric columns:
    -- amount NUMERIC(10, 2) NOT NULL,
    -- quantity INTEGER NOT NULL DEFAULT 0,
    --
    -- JSONB columns:
    -- data JSONB DEFAULT '{{}}'::jsonb,
    --
    -- Boolean columns:
    -- is_active BOOLEAN NOT NULL DEFAULT false,
    --
    -- Timestamp columns:
    -- event_date TIMESTAMPTZ,
    --
    -- Foreign keys:
    -- users_id UUID REFERENCES users(users_id),
    -- categories_id UUID REFERENCES categories(categories_id) ON DELETE CASCADE,

    {CREATED_TIMESTAMP_COLUMN} TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    {UPDATED_TIMESTAMP_COLUMN} TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Indexes (customise as needed)
-- CREATE INDEX IF NOT EXISTS idx_{table}_created ON {table}({CREATED_TIMESTAMP_COLUMN});

{comments}
-- Rollback
-- DROP TABLE IF EXISTS {table};
"#
    )
}

/// `CREATE TABLE` migration built from an extracted model descriptor.
///
/// The rollback block holds a live `DROP TABLE` statement.
pub fn render_create_from_model(descriptor: &ModelDescriptor, at: DateTime<Utc>) -> String {
    let table = descriptor.table();
    let id_column = id_column_for(table);
    let comments = table_comments(table, &id_column);
    let generated = generated_at(at);
    let model_file = model_file_name(table);

    let mut columns = vec![format!(
        "    {id_column} UUID PRIMARY KEY DEFAULT gen_random_uuid()"
    )];
    columns.extend(
        descriptor
            .columns()
            .iter()
            .map(|column| format!("    {}", column.definition())),
    );
    columns.push(format!(
        "    {CREATED_TIMESTAMP_COLUMN} TIMESTAMPTZ NOT NULL DEFAULT NOW()"
    ));
    columns.push(format!(
        "    {UPDATED_TIMESTAMP_COLUMN} TIMESTAMPTZ NOT NULL DEFAULT NOW()"
    ));
    let body = columns.join(",\n");

    format!(
        r#"-- Migration: Create table {table}
-- Generated at: {generated}
-- Generated from model: {model_file}

CREATE EXTENSION IF NOT EXISTS "uuid-ossp";

CREATE TABLE IF NOT EXISTS {table} (
{body}
);

{comments}
-- Rollback
DROP TABLE IF EXISTS {table};
"#
    )
}

/// `ALTER TABLE` migration adding every extracted column.
pub fn render_alter_from_model(descriptor: &ModelDescriptor, at: DateTime<Utc>) -> String {
    let table = descriptor.table();
    let generated = generated_at(at);
    let model_file = model_file_name(table);
    let statements = descriptor
        .columns()
        .iter()
        .map(|column| {
            format!(
                "ALTER TABLE {table} ADD COLUMN IF NOT EXISTS {};",
                column.definition()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"-- Migration: Alter table {table}
-- Generated at: {generated}
-- Generated from model: {model_file}

{statements}

-- Further changes (uncomment and adapt):
--
-- Rename a column:
-- ALTER TABLE {table} RENAME COLUMN old_name TO new_name;
--
-- Drop a column:
-- ALTER TABLE {table} DROP COLUMN IF EXISTS column_name;
--
-- Change a column type:
-- ALTER TABLE {table} ALTER COLUMN column_name TYPE INTEGER USING column_name::integer;
--
-- Set or drop NOT NULL:
-- ALTER TABLE {table} ALTER COLUMN column_name SET NOT NULL;
-- ALTER TABLE {table} ALTER COLUMN column_name DROP NOT NULL;
--
-- Add or drop a unique constraint:
-- ALTER TABLE {table} ADD CONSTRAINT unique_column_name UNIQUE (column_name);
-- ALTER TABLE {table} DROP CONSTRAINT IF EXISTS unique_column_name;
--
-- Add a foreign key:
-- ALTER TABLE {table} ADD CONSTRAINT fk_column_name FOREIGN KEY (column_name) REFERENCES other_table(other_id) ON DELETE CASCADE;
--
-- Create an index:
-- CREATE INDEX IF NOT EXISTS idx_{table}_column_name ON {table}(column_name);

-- Rollback
-- Reverse the changes above before uncommenting:
-- ALTER TABLE {table} DROP COLUMN IF EXISTS column_name;
"#
    )
}
