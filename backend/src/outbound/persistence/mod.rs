//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the migration ledger and seed row ports,
//! backed by PostgreSQL via `diesel-async` and a `bb8` connection pool.
//!
//! - **Thin adapters**: no ordering or seeding rules live here; adapters own
//!   only the transaction boundary and SQL rendering.
//! - **Strongly typed errors**: Diesel and pool errors are mapped to port
//!   error types after being logged at debug level.
//!
//! # Example
//!
//! ```rust,no_run
//! use fleetify::outbound::persistence::{DbPool, DieselMigrationLedger, PoolConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::for_cli("postgres://localhost/fleetify")).await?;
//! let ledger = DieselMigrationLedger::new(pool);
//! # let _ = ledger;
//! # Ok(())
//! # }
//! ```

mod diesel_migration_ledger;
mod diesel_seed_row_repository;
mod error_mapping;
mod pool;
mod schema;

pub use diesel_migration_ledger::{DieselMigrationLedger, LEDGER_DDL};
pub use diesel_seed_row_repository::{DieselSeedRowRepository, insert_statement};
pub use pool::{DbPool, PoolConfig, PoolError};
