//! Model for the `users` table.

use chrono::{DateTime, Utc};
use fleetify_schema::SeedRegistry;
use fleetify_schema_derive::Model;
use uuid::Uuid;

use super::seed_id;

/// Row of the `users` table.
///
/// `password` holds plaintext in seed data; the seeder hashes it before
/// insertion.
#[derive(Debug, Clone, Model)]
#[model(table = "users")]
pub struct Users {
    /// Primary key, UUID v4.
    #[column("users_id")]
    pub users_id: Option<Uuid>,
    #[column("username", not_null, unique)]
    pub username: String,
    #[column("password", not_null)]
    pub password: String,
    /// Role code, one of the `roles.role_oid` values.
    #[column("role", not_null)]
    pub role: String,
    #[column("full_name", not_null)]
    pub full_name: String,
    #[column("email")]
    pub email: Option<String>,
    #[column("phone")]
    pub phone: Option<String>,
    #[column("is_active")]
    pub is_active: bool,

    #[column("created_timestamp")]
    pub created_timestamp: Option<DateTime<Utc>>,
    #[column("updated_timestamp")]
    pub updated_timestamp: Option<DateTime<Utc>>,
}

/// Deterministic identifier of the seeded user named `username`.
pub fn user_id(username: &str) -> Uuid {
    seed_id("users", username)
}

fn user(username: &str, password: &str, role: &str, full_name: &str, phone: &str) -> Users {
    Users {
        users_id: Some(user_id(username)),
        username: username.to_owned(),
        password: password.to_owned(),
        role: role.to_owned(),
        full_name: full_name.to_owned(),
        email: Some(format!("{username}@fleetify.com")),
        phone: Some(phone.to_owned()),
        is_active: true,
        created_timestamp: None,
        updated_timestamp: None,
    }
}

/// Seed rows for the `users` table.
pub fn seed_users() -> Vec<Users> {
    vec![
        user("admin", "admin123", "ADMIN", "Administrator", "081234567890"),
        user("manager1", "manager123", "MANAGER", "Manager One", "081234567891"),
        user("manager2", "manager123", "MANAGER", "Manager Two", "081234567892"),
        user("purchaser1", "purchaser123", "MANAGER", "Purchaser One", "081234567893"),
        user("purchaser2", "purchaser123", "MANAGER", "Purchaser Two", "081234567894"),
    ]
}

/// Registers [`seed_users`] with `registry`.
pub fn register(registry: &SeedRegistry) {
    registry.register_model(seed_users);
}
