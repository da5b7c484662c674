//! Model for the `suppliers` table.

use chrono::{DateTime, Utc};
use fleetify_schema::SeedRegistry;
use fleetify_schema_derive::Model;
use uuid::Uuid;

use super::seed_id;

/// Row of the `suppliers` table.
#[derive(Debug, Clone, Model)]
#[model(table = "suppliers")]
pub struct Suppliers {
    /// Primary key, UUID v4.
    #[column("suppliers_id")]
    pub suppliers_id: Option<Uuid>,
    #[column("name", not_null)]
    pub name: String,
    #[column("email")]
    pub email: Option<String>,
    #[column("address")]
    pub address: Option<String>,
    #[column("phone")]
    pub phone: Option<String>,
    /// `parts`, `tire` or `service`.
    #[column("supplier_type")]
    pub supplier_type: Option<String>,
    #[column("is_active")]
    pub is_active: bool,

    #[column("created_timestamp")]
    pub created_timestamp: Option<DateTime<Utc>>,
    #[column("updated_timestamp")]
    pub updated_timestamp: Option<DateTime<Utc>>,
}

/// Seeded supplier names, in registration order.
pub const SUPPLIER_NAMES: [&str; 8] = [
    "PT Auto Parts Indonesia",
    "CV Tire Center",
    "PT Oil Distributor",
    "Battery Pro Indonesia",
    "CV Service Equipment",
    "PT Motor Parts",
    "Tire Master Jakarta",
    "PT Lubricant Supply",
];

/// Deterministic identifier of the seeded supplier named `name`.
pub fn supplier_id(name: &str) -> Uuid {
    seed_id("suppliers", name)
}

fn supplier(name: &str, email: &str, address: &str, phone: &str, supplier_type: &str) -> Suppliers {
    Suppliers {
        suppliers_id: Some(supplier_id(name)),
        name: name.to_owned(),
        email: Some(email.to_owned()),
        address: Some(address.to_owned()),
        phone: Some(phone.to_owned()),
        supplier_type: Some(supplier_type.to_owned()),
        is_active: true,
        created_timestamp: None,
        updated_timestamp: None,
    }
}

/// Seed rows for the `suppliers` table.
pub fn seed_suppliers() -> Vec<Suppliers> {
    vec![
        supplier(
            SUPPLIER_NAMES[0],
            "contact@autoparts.id",
            "Jl. Sudirman No. 123, Jakarta",
            "021-12345678",
            "parts",
        ),
        supplier(
            SUPPLIER_NAMES[1],
            "info@tirecenter.co.id",
            "Jl. Gatot Subroto No. 456, Jakarta",
            "021-23456789",
            "tire",
        ),
        supplier(
            SUPPLIER_NAMES[2],
            "sales@oildist.com",
            "Jl. Thamrin No. 789, Jakarta",
            "021-34567890",
            "parts",
        ),
        supplier(
            SUPPLIER_NAMES[3],
            "order@batterypro.id",
            "Jl. HR Rasuna Said No. 321, Jakarta",
            "021-45678901",
            "parts",
        ),
        supplier(
            SUPPLIER_NAMES[4],
            "info@serviceequip.co.id",
            "Jl. Kebon Jeruk No. 654, Jakarta",
            "021-56789012",
            "service",
        ),
        supplier(
            SUPPLIER_NAMES[5],
            "sales@motorparts.id",
            "Jl. Cikini Raya No. 987, Jakarta",
            "021-67890123",
            "parts",
        ),
        supplier(
            SUPPLIER_NAMES[6],
            "contact@tiremaster.id",
            "Jl. Kemang Raya No. 147, Jakarta",
            "021-78901234",
            "tire",
        ),
        supplier(
            SUPPLIER_NAMES[7],
            "order@lubricant.id",
            "Jl. Senopati No. 258, Jakarta",
            "021-89012345",
            "parts",
        ),
    ]
}

/// Registers [`seed_suppliers`] with `registry`.
pub fn register(registry: &SeedRegistry) {
    registry.register_model(seed_suppliers);
}
