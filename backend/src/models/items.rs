//! Model for the `items` table.

use chrono::{DateTime, Utc};
use fleetify_schema::SeedRegistry;
use fleetify_schema_derive::Model;
use uuid::Uuid;

use super::seed_id;

/// Row of the `items` table: one stocked spare part or consumable.
#[derive(Debug, Clone, Model)]
#[model(table = "items")]
pub struct Items {
    /// Primary key, UUID v4.
    #[column("items_id")]
    pub items_id: Option<Uuid>,
    #[column("name", not_null)]
    pub name: String,
    #[column("stock")]
    pub stock: i32,
    /// Unit price.
    #[column("price", not_null)]
    pub price: f64,
    #[column("category")]
    pub category: Option<String>,
    #[column("unit")]
    pub unit: Option<String>,
    /// Reorder threshold.
    #[column("min_stock")]
    pub min_stock: i32,

    #[column("created_timestamp")]
    pub created_timestamp: Option<DateTime<Utc>>,
    #[column("updated_timestamp")]
    pub updated_timestamp: Option<DateTime<Utc>>,
}

/// Seeded item names, in catalogue order.
pub const ITEM_NAMES: [&str; 15] = [
    "Engine Oil 5W-30",
    "Engine Oil 10W-40",
    "Brake Pad Front",
    "Brake Pad Rear",
    "Air Filter",
    "Fuel Filter",
    "Tire 205/55R16",
    "Tire 215/60R16",
    "Battery 12V 60Ah",
    "Battery 12V 70Ah",
    "Spark Plug",
    "Radiator Coolant",
    "Windshield Wiper",
    "Headlight Bulb H4",
    "Brake Fluid",
];

/// Deterministic identifier of the seeded item named `name`.
pub fn item_id(name: &str) -> Uuid {
    seed_id("items", name)
}

fn item(name: &str, stock: i32, price: f64, category: &str, unit: &str, min_stock: i32) -> Items {
    Items {
        items_id: Some(item_id(name)),
        name: name.to_owned(),
        stock,
        price,
        category: Some(category.to_owned()),
        unit: Some(unit.to_owned()),
        min_stock,
        created_timestamp: None,
        updated_timestamp: None,
    }
}

/// Seed rows for the `items` table.
pub fn seed_items() -> Vec<Items> {
    vec![
        item(ITEM_NAMES[0], 50, 150_000.0, "oil", "liter", 10),
        item(ITEM_NAMES[1], 45, 140_000.0, "oil", "liter", 10),
        item(ITEM_NAMES[2], 30, 250_000.0, "parts", "set", 5),
        item(ITEM_NAMES[3], 25, 200_000.0, "parts", "set", 5),
        item(ITEM_NAMES[4], 40, 75_000.0, "parts", "pcs", 10),
        item(ITEM_NAMES[5], 35, 85_000.0, "parts", "pcs", 10),
        item(ITEM_NAMES[6], 20, 800_000.0, "tire", "pcs", 4),
        item(ITEM_NAMES[7], 18, 850_000.0, "tire", "pcs", 4),
        item(ITEM_NAMES[8], 15, 1_200_000.0, "battery", "pcs", 3),
        item(ITEM_NAMES[9], 12, 1_400_000.0, "battery", "pcs", 3),
        item(ITEM_NAMES[10], 60, 45_000.0, "parts", "pcs", 20),
        item(ITEM_NAMES[11], 30, 95_000.0, "oil", "liter", 10),
        item(ITEM_NAMES[12], 25, 55_000.0, "parts", "set", 5),
        item(ITEM_NAMES[13], 20, 125_000.0, "parts", "pcs", 5),
        item(ITEM_NAMES[14], 35, 65_000.0, "oil", "liter", 10),
    ]
}

/// Registers [`seed_items`] with `registry`.
pub fn register(registry: &SeedRegistry) {
    registry.register_model(seed_items);
}
