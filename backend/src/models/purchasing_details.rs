//! Model for the `purchasing_details` table.

use chrono::{DateTime, Utc};
use fleetify_schema::SeedRegistry;
use fleetify_schema_derive::Model;
use uuid::Uuid;

use super::items::{ITEM_NAMES, item_id};
use super::purchasings::purchasing_id;
use super::seed_id;

/// Row of the `purchasing_details` table: one line of a purchase order.
#[derive(Debug, Clone, Model)]
#[model(table = "purchasing_details")]
pub struct PurchasingDetails {
    /// Primary key, UUID v4.
    #[column("purchasing_details_id")]
    pub purchasing_details_id: Option<Uuid>,
    #[column("purchasings_id", not_null)]
    pub purchasings_id: Uuid,
    #[column("items_id", not_null)]
    pub items_id: Uuid,
    #[column("qty", not_null)]
    pub qty: i32,
    #[column("subtotal", not_null)]
    pub subtotal: f64,

    #[column("created_timestamp")]
    pub created_timestamp: Option<DateTime<Utc>>,
    #[column("updated_timestamp")]
    pub updated_timestamp: Option<DateTime<Utc>>,
}

/// `(purchase number, item position, qty, subtotal)`, both 1-based.
const LINES: [(usize, usize, i32, f64); 16] = [
    (1, 1, 30, 4_500_000.0),
    (1, 2, 20, 2_800_000.0),
    (1, 5, 10, 200_000.0),
    (2, 7, 4, 3_200_000.0),
    (3, 1, 20, 3_000_000.0),
    (3, 12, 10, 950_000.0),
    (3, 15, 5, 325_000.0),
    (4, 9, 2, 2_400_000.0),
    (5, 3, 4, 1_000_000.0),
    (5, 4, 4, 800_000.0),
    (6, 11, 10, 450_000.0),
    (6, 13, 5, 275_000.0),
    (6, 14, 2, 250_000.0),
    (7, 6, 10, 850_000.0),
    (7, 10, 1, 500_000.0),
    (8, 8, 2, 1_700_000.0),
];

/// Seed rows for the `purchasing_details` table.
pub fn seed_purchasing_details() -> Vec<PurchasingDetails> {
    LINES
        .iter()
        .enumerate()
        .filter_map(|(position, &(purchase, item, qty, subtotal))| {
            let item_name = ITEM_NAMES.get(item.checked_sub(1)?)?;
            Some(PurchasingDetails {
                purchasing_details_id: Some(seed_id(
                    "purchasing_details",
                    &(position + 1).to_string(),
                )),
                purchasings_id: purchasing_id(purchase),
                items_id: item_id(item_name),
                qty,
                subtotal,
                created_timestamp: None,
                updated_timestamp: None,
            })
        })
        .collect()
}

/// Registers [`seed_purchasing_details`] with `registry`.
pub fn register(registry: &SeedRegistry) {
    registry.register_model(seed_purchasing_details);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn every_line_resolves_its_item() {
        let lines = seed_purchasing_details();
        assert_eq!(lines.len(), LINES.len());
        let tire_line = lines.get(3).expect("fourth line");
        assert_eq!(tire_line.items_id, item_id("Tire 205/55R16"));
        assert_eq!(tire_line.purchasings_id, purchasing_id(2));
    }
}
