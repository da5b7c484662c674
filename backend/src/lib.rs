//! Fleetify schema generation, migration runner and table seeder.
//!
//! The crate is laid out hexagonally:
//!
//! - [`domain`] holds the generator, runner and seeder services together with
//!   the ports they depend on.
//! - [`outbound`] provides the Diesel, `cap-std` and bcrypt adapters.
//! - [`models`] declares the procurement tables and registers their seed
//!   generators.
//! - [`config`] loads database and workspace settings via OrthoConfig.

pub mod config;
pub mod domain;
pub mod models;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
