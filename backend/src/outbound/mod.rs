//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of domain port traits:
//!
//! - **persistence**: PostgreSQL migration ledger and seed inserts via Diesel
//! - **filesystem**: migration and model files through `cap-std` directories
//! - **security**: bcrypt hashing for password-like seed columns
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod filesystem;
pub mod persistence;
pub mod security;
