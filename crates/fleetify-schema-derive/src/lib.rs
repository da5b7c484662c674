//! `#[derive(Model)]` for Fleetify models.
//!
//! The derive reads the same annotations that descriptor extraction parses
//! from model source:
//!
//! ```text
//! #[derive(Model)]
//! #[model(table = "roles")]
//! pub struct Role {
//!     #[column("roles_id")]
//!     pub roles_id: Option<Uuid>,
//!     #[column("role_name", not_null, unique)]
//!     pub role_name: String,
//! }
//! ```
//!
//! and implements `fleetify_schema::Model`, flattening every annotated
//! field with a non-empty column name into the seed row in declaration
//! order. Without `#[model(table)]` the table is the snake_case struct name.

use proc_macro::TokenStream;

mod expand;

/// Implements `fleetify_schema::Model` for a struct with named fields.
#[proc_macro_derive(Model, attributes(model, column))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    match expand::model(input.into()) {
        Ok(output) => output.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
