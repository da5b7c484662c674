//! `fleetify-migrate`: generate schema files, apply migrations and seed tables.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::ffi::OsString;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use fleetify::config::{ConfigError, DatabaseSettings, DatabaseUrlSource, WorkspaceSettings};
use fleetify::domain::{
    GeneratedMigration, GeneratorError, MigrationGenerator, MigrationRunReport, MigrationRunner,
    RollbackReport, RunnerError, SeedReport, Seeder, SeederError, TableScaffold,
};
use fleetify::models::register_seeders;
use fleetify::outbound::filesystem::CapStdWorkspace;
use fleetify::outbound::persistence::{
    DbPool, DieselMigrationLedger, DieselSeedRowRepository, PoolConfig, PoolError,
};
use fleetify::outbound::security::BcryptPasswordHasher;
use fleetify_schema::SeedRegistry;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

const PROGRAM_NAME: &str = "fleetify-migrate";
const LOG_FORMAT_ENV: &str = "FLEETIFY_LOG_FORMAT";

/// `fleetify-migrate` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fleetify-migrate",
    about = "Generate models and migrations, apply or roll back migrations, and seed tables",
    version
)]
struct CliArgs {
    /// Database connection string. Falls back to `DB_URL`, `DATABASE_URL`,
    /// then the `DB_*` parts.
    #[arg(long = "database-url", value_name = "url", global = true)]
    database_url: Option<String>,
    /// Directory holding migration files.
    #[arg(long = "migrations-dir", value_name = "path", global = true)]
    migrations_dir: Option<String>,
    /// Directory holding model sources.
    #[arg(long = "models-dir", value_name = "path", global = true)]
    models_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Create a model template and a placeholder create migration.
    #[command(name = "createtable")]
    CreateTable {
        /// Table name.
        table: String,
        /// Include a seed generator in the model template.
        #[arg(long = "with-seed")]
        with_seed: bool,
    },
    /// Generate a create migration from an existing model.
    #[command(name = "generatesql")]
    GenerateSql {
        /// Table name.
        table: String,
    },
    /// Generate an alter migration adding the model's columns.
    #[command(name = "altertable")]
    AlterTable {
        /// Table name.
        table: String,
    },
    /// Apply every pending migration in file name order.
    #[command(name = "migrate")]
    Migrate,
    /// Roll back one migration using its rollback block.
    #[command(name = "rollback")]
    Rollback {
        /// Migration file name, e.g. `20240101090000_users_create.sql`.
        migration: String,
    },
    /// Seed a table from its registered seed generator.
    #[command(name = "seed")]
    Seed {
        /// Table name.
        table: String,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to load {section} settings: {message}")]
    Settings {
        section: &'static str,
        message: String,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to create database pool: {0}")]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error(transparent)]
    Runner(#[from] RunnerError),
    #[error(transparent)]
    Seeder(#[from] SeederError),
}

fn main() -> ExitCode {
    init_tracing();
    let args = CliArgs::parse();

    let runtime = match Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("ERROR: failed to create Tokio runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(args)) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "command failed");
            eprintln!("ERROR: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let json = env::var(LOG_FORMAT_ENV).is_ok_and(|format| format.eq_ignore_ascii_case("json"));
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

fn program_args() -> [OsString; 1] {
    [OsString::from(PROGRAM_NAME)]
}

fn load_workspace(args: &CliArgs) -> Result<(CapStdWorkspace, WorkspaceSettings), CliError> {
    let mut settings =
        WorkspaceSettings::load_from_iter(program_args()).map_err(|err| CliError::Settings {
            section: "workspace",
            message: err.to_string(),
        })?;
    if let Some(dir) = &args.migrations_dir {
        settings.migrations_dir = Some(dir.clone());
    }
    if let Some(dir) = &args.models_dir {
        settings.models_dir = Some(dir.clone());
    }
    let workspace = CapStdWorkspace::new(settings.migrations_dir(), settings.models_dir());
    Ok((workspace, settings))
}

async fn connect(args: &CliArgs) -> Result<DbPool, CliError> {
    let settings =
        DatabaseSettings::load_from_iter(program_args()).map_err(|err| CliError::Settings {
            section: "database",
            message: err.to_string(),
        })?;
    let (url, source) = settings.resolve_database_url(args.database_url.as_deref())?;
    let origin = match source {
        DatabaseUrlSource::CommandLine => "--database-url",
        DatabaseUrlSource::Settings => "DB_URL",
        DatabaseUrlSource::Environment => "DATABASE_URL",
        DatabaseUrlSource::Parts => "DB_* parts",
    };
    let config = PoolConfig::for_cli(url);
    info!(origin, database = %config.redacted_url(), "connecting to database");
    Ok(DbPool::new(config).await?)
}

async fn run(args: CliArgs) -> Result<Vec<String>, CliError> {
    let (workspace, settings) = load_workspace(&args)?;
    let workspace = Arc::new(workspace);

    match &args.command {
        Command::CreateTable { table, with_seed } => {
            let generator = MigrationGenerator::new(workspace, Arc::new(DefaultClock));
            let scaffold = generator.generate_table(table, *with_seed)?;
            Ok(scaffold_lines(&scaffold, *with_seed))
        }
        Command::GenerateSql { table } => {
            let generator = MigrationGenerator::new(workspace, Arc::new(DefaultClock));
            Ok(migration_lines(&generator.generate_sql_from_model(table)?))
        }
        Command::AlterTable { table } => {
            let generator = MigrationGenerator::new(workspace, Arc::new(DefaultClock));
            Ok(migration_lines(&generator.generate_alter_table(table)?))
        }
        Command::Migrate => {
            let ledger = Arc::new(DieselMigrationLedger::new(connect(&args).await?));
            let report = MigrationRunner::new(workspace, ledger)
                .run_migrations()
                .await?;
            Ok(run_report_lines(&report))
        }
        Command::Rollback { migration } => {
            let ledger = Arc::new(DieselMigrationLedger::new(connect(&args).await?));
            let report = MigrationRunner::new(workspace, ledger)
                .rollback_migration(migration)
                .await?;
            Ok(rollback_lines(&report))
        }
        Command::Seed { table } => {
            let registry = SeedRegistry::global();
            register_seeders(registry);
            let repository = Arc::new(DieselSeedRowRepository::new(connect(&args).await?));
            let hasher = Arc::new(BcryptPasswordHasher::with_cost(settings.password_cost()));
            let seeder = Seeder::new(repository, hasher, Arc::new(DefaultClock));
            Ok(seed_lines(&seeder.run(registry, table).await?))
        }
    }
}

fn scaffold_lines(scaffold: &TableScaffold, with_seed: bool) -> Vec<String> {
    let mut lines = vec![
        format!("SUCCESS: Created model template: {}", scaffold.model_path),
        format!("SUCCESS: Created migration file: {}", scaffold.migration_path),
        format!(
            "NOTE: Declare `pub mod {};` in the models module, add columns, then run: generatesql {}",
            scaffold.table, scaffold.table
        ),
    ];
    if with_seed {
        lines.push(format!(
            "NOTE: Call `{}::register(registry)` from register_seeders, then run: seed {}",
            scaffold.table, scaffold.table
        ));
    }
    lines
}

fn migration_lines(migration: &GeneratedMigration) -> Vec<String> {
    vec![
        format!("SUCCESS: Created migration file: {}", migration.path),
        format!(
            "NOTE: {} column(s) extracted from model {}",
            migration.column_count, migration.table
        ),
    ]
}

fn run_report_lines(report: &MigrationRunReport) -> Vec<String> {
    if report.is_empty() {
        return vec!["SUCCESS: No pending migrations".to_owned()];
    }
    let mut lines: Vec<String> = report
        .applied
        .iter()
        .map(|migration| {
            format!(
                "SUCCESS: Applied {} ({} statements)",
                migration.name, migration.statement_count
            )
        })
        .collect();
    lines.push(format!(
        "SUCCESS: {} migration(s) applied",
        report.applied.len()
    ));
    lines
}

fn rollback_lines(report: &RollbackReport) -> Vec<String> {
    let mut lines = vec![format!(
        "SUCCESS: Rolled back {} ({} statements)",
        report.name, report.statement_count
    )];
    if !report.ledger_row_removed {
        lines.push(format!(
            "NOTE: {} was not recorded as applied",
            report.name
        ));
    }
    lines
}

fn seed_lines(report: &SeedReport) -> Vec<String> {
    vec![format!(
        "SUCCESS: Seeded {}: {} processed, {} inserted, {} skipped",
        report.table, report.processed, report.inserted, report.skipped
    )]
}
