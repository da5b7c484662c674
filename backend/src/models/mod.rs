//! Procurement tables and their seed data.
//!
//! Each submodule declares one table with `#[derive(Model)]` and a
//! `register` function adding its seed generator to a [`SeedRegistry`].
//! Model sources are also read back by descriptor extraction, so the
//! `#[column]` annotations here are the source of truth for generated DDL.
//!
//! Seed rows carry deterministic UUID v5 identifiers derived from
//! [`SEED_NAMESPACE`], which keeps re-seeding idempotent and lets rows
//! reference each other across tables.

use fleetify_schema::SeedRegistry;
use uuid::Uuid;

pub mod items;
pub mod purchasing_details;
pub mod purchasings;
pub mod roles;
pub mod suppliers;
pub mod users;

/// Namespace for deterministic seed identifiers.
pub const SEED_NAMESPACE: Uuid = Uuid::from_u128(0x3c5b_9f0e_7d1a_4e26_8b4f_a1d2_e6c7_5f90);

/// Deterministic identifier for the seed row of `table` identified by `key`.
///
/// # Examples
///
/// ```
/// use fleetify::models::seed_id;
///
/// assert_eq!(seed_id("roles", "ADMIN"), seed_id("roles", "ADMIN"));
/// assert_ne!(seed_id("roles", "ADMIN"), seed_id("users", "ADMIN"));
/// ```
pub fn seed_id(table: &str, key: &str) -> Uuid {
    Uuid::new_v5(&SEED_NAMESPACE, format!("{table}/{key}").as_bytes())
}

/// Register every model's seed generator with `registry`.
///
/// Called once at startup, before any `seed` command resolves a generator.
pub fn register_seeders(registry: &SeedRegistry) {
    users::register(registry);
    roles::register(registry);
    items::register(registry);
    suppliers::register(registry);
    purchasings::register(registry);
    purchasing_details::register(registry);
}
