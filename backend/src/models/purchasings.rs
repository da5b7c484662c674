//! Model for the `purchasings` table.

use chrono::{DateTime, Days, Utc};
use fleetify_schema::SeedRegistry;
use fleetify_schema_derive::Model;
use mockable::{Clock, DefaultClock};
use uuid::Uuid;

use super::seed_id;
use super::suppliers::{SUPPLIER_NAMES, supplier_id};
use super::users::user_id;

/// Row of the `purchasings` table: one purchase order header.
#[derive(Debug, Clone, Model)]
#[model(table = "purchasings")]
pub struct Purchasings {
    /// Primary key, UUID v4.
    #[column("purchasings_id")]
    pub purchasings_id: Option<Uuid>,
    #[column("date", not_null)]
    pub date: DateTime<Utc>,
    #[column("suppliers_id", not_null)]
    pub suppliers_id: Uuid,
    /// Purchaser who raised the order.
    #[column("users_id", not_null)]
    pub users_id: Uuid,
    #[column("grand_total", not_null)]
    pub grand_total: f64,
    /// `pending`, `approved` or `completed`.
    #[column("status")]
    pub status: Option<String>,
    #[column("notes")]
    pub notes: Option<String>,

    #[column("created_timestamp")]
    pub created_timestamp: Option<DateTime<Utc>>,
    #[column("updated_timestamp")]
    pub updated_timestamp: Option<DateTime<Utc>>,
}

/// Deterministic identifier of the `number`th seeded purchase (1-based).
pub fn purchasing_id(number: usize) -> Uuid {
    seed_id("purchasings", &number.to_string())
}

struct SeedOrder {
    days_ago: u64,
    supplier: &'static str,
    purchaser: &'static str,
    grand_total: f64,
    status: &'static str,
    notes: &'static str,
}

const ORDERS: [SeedOrder; 8] = [
    SeedOrder {
        days_ago: 30,
        supplier: SUPPLIER_NAMES[0],
        purchaser: "manager1",
        grand_total: 7_500_000.0,
        status: "completed",
        notes: "Monthly stock replenishment",
    },
    SeedOrder {
        days_ago: 25,
        supplier: SUPPLIER_NAMES[1],
        purchaser: "manager1",
        grand_total: 3_200_000.0,
        status: "completed",
        notes: "Tire replacement order",
    },
    SeedOrder {
        days_ago: 20,
        supplier: SUPPLIER_NAMES[2],
        purchaser: "manager2",
        grand_total: 4_200_000.0,
        status: "completed",
        notes: "Engine oil bulk order",
    },
    SeedOrder {
        days_ago: 15,
        supplier: SUPPLIER_NAMES[3],
        purchaser: "manager1",
        grand_total: 2_400_000.0,
        status: "approved",
        notes: "Battery stock order",
    },
    SeedOrder {
        days_ago: 10,
        supplier: SUPPLIER_NAMES[0],
        purchaser: "manager2",
        grand_total: 1_800_000.0,
        status: "pending",
        notes: "Spare parts order",
    },
    SeedOrder {
        days_ago: 5,
        supplier: SUPPLIER_NAMES[4],
        purchaser: "manager1",
        grand_total: 950_000.0,
        status: "pending",
        notes: "Service equipment",
    },
    SeedOrder {
        days_ago: 2,
        supplier: SUPPLIER_NAMES[5],
        purchaser: "manager2",
        grand_total: 1_350_000.0,
        status: "approved",
        notes: "Motor parts order",
    },
    SeedOrder {
        days_ago: 0,
        supplier: SUPPLIER_NAMES[6],
        purchaser: "manager1",
        grand_total: 1_600_000.0,
        status: "pending",
        notes: "Tire stock order",
    },
];

/// Purchases dated relative to `now`.
pub fn purchasings_at(now: DateTime<Utc>) -> Vec<Purchasings> {
    ORDERS
        .iter()
        .enumerate()
        .map(|(position, order)| Purchasings {
            purchasings_id: Some(purchasing_id(position + 1)),
            date: now
                .checked_sub_days(Days::new(order.days_ago))
                .unwrap_or(now),
            suppliers_id: supplier_id(order.supplier),
            users_id: user_id(order.purchaser),
            grand_total: order.grand_total,
            status: Some(order.status.to_owned()),
            notes: Some(order.notes.to_owned()),
            created_timestamp: None,
            updated_timestamp: None,
        })
        .collect()
}

/// Seed rows for the `purchasings` table, dated against the wall clock.
pub fn seed_purchasings() -> Vec<Purchasings> {
    purchasings_at(DefaultClock.utc())
}

/// Registers [`seed_purchasings`] with `registry`.
pub fn register(registry: &SeedRegistry) {
    registry.register_model(seed_purchasings);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::items::item_id;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    fn orders_reference_seeded_suppliers_and_purchasers() {
        let now = Utc
            .with_ymd_and_hms(2024, 6, 30, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        let orders = purchasings_at(now);

        let first = orders.first().expect("orders seeded");
        assert_eq!(first.suppliers_id, supplier_id("PT Auto Parts Indonesia"));
        assert_eq!(first.users_id, user_id("manager1"));
        assert_eq!(
            first.date,
            Utc.with_ymd_and_hms(2024, 5, 31, 12, 0, 0)
                .single()
                .expect("valid timestamp")
        );
        assert_eq!(orders.last().map(|order| order.date), Some(now));
    }

    #[rstest]
    fn purchase_ids_are_stable() {
        assert_eq!(purchasing_id(3), purchasing_id(3));
        assert_ne!(purchasing_id(3), item_id("3"));
    }
}
