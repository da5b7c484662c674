//! Model descriptors, seed rows and the seed registry for Fleetify.
//!
//! This crate holds the parts of the migration tool that do not touch a
//! database or the filesystem:
//!
//! - Parsing a model's Rust source into an ordered list of column
//!   descriptors used to render `CREATE TABLE` and `ALTER TABLE` DDL
//! - The [`Model`] trait implemented by `#[derive(Model)]`, flattening a
//!   record into a [`SeedRow`]
//! - The process-wide [`SeedRegistry`] mapping logical model names to seed
//!   generators
//! - Identifier validation for table names composed into SQL text
//!
//! # Example
//!
//! ```
//! use fleetify_schema::extract_descriptor;
//!
//! let source = r#"
//!     #[derive(Model)]
//!     #[model(table = "items")]
//!     pub struct Item {
//!         #[column("items_id")]
//!         pub items_id: Option<uuid::Uuid>,
//!         #[column("price", not_null, unique)]
//!         pub price: f64,
//!         #[column("metadata")]
//!         pub metadata: serde_json::Value,
//!     }
//! "#;
//!
//! let descriptor = extract_descriptor(source, "items").expect("model parses");
//! let definitions: Vec<String> = descriptor
//!     .columns()
//!     .iter()
//!     .map(|column| column.definition())
//!     .collect();
//!
//! assert_eq!(
//!     definitions,
//!     vec!["price NUMERIC(10, 2) NOT NULL UNIQUE", "metadata JSONB"]
//! );
//! ```

pub mod attributes;
mod descriptor;
mod error;
mod registry;
mod seed;
mod sql_type;
mod validation;

pub use descriptor::{
    AUDIT_COLUMNS, CREATED_TIMESTAMP_COLUMN, ColumnDescriptor, ModelDescriptor,
    UPDATED_TIMESTAMP_COLUMN, extract_descriptor, id_column_for,
};
pub use error::SchemaError;
pub use registry::{SeedFn, SeedRegistry, model_name_for_table};
pub use seed::{Model, SeedRow, SeedValue, ToSeedValue};
pub use sql_type::SqlType;
pub use validation::{IDENTIFIER_MAX_LEN, is_valid_identifier, validate_identifier};
