//! Model for the `roles` table.

use chrono::{DateTime, Utc};
use fleetify_schema::SeedRegistry;
use fleetify_schema_derive::Model;
use uuid::Uuid;

use super::seed_id;

/// Row of the `roles` table.
#[derive(Debug, Clone, Model)]
#[model(table = "roles")]
pub struct Roles {
    /// Primary key, UUID v4.
    #[column("roles_id")]
    pub roles_id: Option<Uuid>,
    /// Stable role code referenced by `users.role`.
    #[column("role_oid", not_null, unique)]
    pub role_oid: String,
    #[column("role_name", not_null)]
    pub role_name: String,
    #[column("role_description")]
    pub role_description: Option<String>,

    #[column("created_timestamp")]
    pub created_timestamp: Option<DateTime<Utc>>,
    #[column("updated_timestamp")]
    pub updated_timestamp: Option<DateTime<Utc>>,
}

fn role(oid: &str, name: &str, description: &str) -> Roles {
    Roles {
        roles_id: Some(seed_id("roles", oid)),
        role_oid: oid.to_owned(),
        role_name: name.to_owned(),
        role_description: Some(description.to_owned()),
        created_timestamp: None,
        updated_timestamp: None,
    }
}

/// Seed rows for the `roles` table.
pub fn seed_roles() -> Vec<Roles> {
    vec![
        role("ADMIN", "Admin", "Administrator role with full permissions."),
        role("MANAGER", "Manager", "Manager role with extended permissions."),
        role("SUPPLIERS", "Suppliers", "Supplier users."),
        role("MITRA", "Mitra", "Mitra users."),
    ]
}

/// Registers [`seed_roles`] with `registry`.
pub fn register(registry: &SeedRegistry) {
    registry.register_model(seed_roles);
}
