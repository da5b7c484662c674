//! Domain services and ports.
//!
//! Purpose: generate schema files, apply and roll back migrations, and seed
//! tables. Services depend only on the traits in [`ports`]; adapters live in
//! [`crate::outbound`].
//!
//! Public surface:
//! - MigrationGenerator: model templates and create/alter migrations.
//! - MigrationRunner: ordered, transactional application and rollback.
//! - Seeder: idempotent table seeding from the seed registry.
//! - split_statements and friends: migration text parsing.

pub mod migration_generator;
pub mod migration_runner;
pub mod migration_script;
pub mod migration_templates;
pub mod ports;
pub mod seeder;

pub use self::migration_generator::{
    GeneratedMigration, GeneratorError, MigrationGenerator, TableScaffold,
};
pub use self::migration_runner::{
    AppliedMigration, MigrationRunReport, MigrationRunner, RollbackReport, RunnerError,
};
pub use self::migration_script::{
    forward_body, forward_statements, rollback_block, rollback_statements, split_statements,
};
pub use self::migration_templates::{MigrationKind, migration_file_name};
pub use self::seeder::{SeedReport, Seeder, SeederError};
