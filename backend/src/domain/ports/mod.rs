//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod migration_ledger;
mod migration_source;
mod password_hasher;
mod schema_workspace;
mod seed_row_repository;

#[cfg(test)]
pub use migration_ledger::MockMigrationLedger;
pub use migration_ledger::{FixtureMigrationLedger, MigrationLedger, MigrationLedgerError};
#[cfg(test)]
pub use migration_source::MockMigrationSource;
pub use migration_source::{FixtureMigrationSource, MigrationSource, MigrationSourceError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{FixturePasswordHasher, PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use schema_workspace::MockSchemaWorkspace;
pub use schema_workspace::{
    FixtureSchemaWorkspace, SchemaWorkspace, SchemaWorkspaceError, model_file_name,
};
#[cfg(test)]
pub use seed_row_repository::MockSeedRowRepository;
pub use seed_row_repository::{
    FixtureSeedRowRepository, InsertOutcome, SeedRowRepository, SeedRowRepositoryError,
};
