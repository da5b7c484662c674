//! Database and workspace configuration loaded via OrthoConfig.
//!
//! Both settings structs are layered from configuration files and
//! environment variables. Command-line overrides are applied by the
//! binary on top of the loaded values.

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 5432;
const DEFAULT_USER: &str = "postgres";
const DEFAULT_PASSWORD: &str = "postgres";
const DEFAULT_NAME: &str = "fleetify";
const DEFAULT_SSLMODE: &str = "disable";

/// bcrypt cost used when none is configured.
pub const DEFAULT_PASSWORD_COST: u32 = bcrypt::DEFAULT_COST;

/// Environment variable consulted after `DB_URL`.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Errors raised while resolving configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An explicitly supplied value was blank.
    #[error("{source_name} must not be empty when provided")]
    Empty {
        /// Where the blank value came from.
        source_name: String,
    },
}

/// Where the resolved database connection string came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseUrlSource {
    /// `--database-url`.
    CommandLine,
    /// `DB_URL` or the `url` file key.
    Settings,
    /// `DATABASE_URL`.
    Environment,
    /// Composed from host, port, user, password, name and sslmode.
    Parts,
}

/// Connection settings for the target PostgreSQL database.
///
/// `port` always carries a value, so the merged layers deserialize even
/// when no file or variable sets anything.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DB")]
pub struct DatabaseSettings {
    /// Server host name.
    pub host: Option<String>,
    /// Server port.
    #[ortho_config(default = 5432)]
    pub port: u16,
    /// Login role.
    pub user: Option<String>,
    /// Login password.
    pub password: Option<String>,
    /// Database name.
    pub name: Option<String>,
    /// libpq `sslmode`.
    pub sslmode: Option<String>,
    /// Complete connection string; takes precedence over the parts.
    pub url: Option<String>,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            user: None,
            password: None,
            name: None,
            sslmode: None,
            url: None,
        }
    }
}

impl DatabaseSettings {
    /// Configured host, defaulting to `localhost`.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Configured role, defaulting to `postgres`.
    pub fn user(&self) -> &str {
        self.user.as_deref().unwrap_or(DEFAULT_USER)
    }

    /// Configured password, defaulting to `postgres`.
    pub fn password(&self) -> &str {
        self.password.as_deref().unwrap_or(DEFAULT_PASSWORD)
    }

    /// Configured database name, defaulting to `fleetify`.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    /// Configured `sslmode`, defaulting to `disable`.
    pub fn sslmode(&self) -> &str {
        self.sslmode.as_deref().unwrap_or(DEFAULT_SSLMODE)
    }

    /// libpq key/value connection string composed from the individual parts.
    ///
    /// # Examples
    ///
    /// ```
    /// use fleetify::config::DatabaseSettings;
    ///
    /// let settings = DatabaseSettings {
    ///     password: Some("it's secret".to_owned()),
    ///     ..DatabaseSettings::default()
    /// };
    /// assert_eq!(
    ///     settings.composed_url(),
    ///     "host='localhost' port=5432 user='postgres' password='it\\'s secret' \
    ///      dbname='fleetify' sslmode='disable'"
    /// );
    /// ```
    pub fn composed_url(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={} sslmode={}",
            quote_value(self.host()),
            self.port(),
            quote_value(self.user()),
            quote_value(self.password()),
            quote_value(self.name()),
            quote_value(self.sslmode()),
        )
    }

    /// Resolve the connection string.
    ///
    /// The order is `cli_override`, then `DB_URL`, then `DATABASE_URL`, then
    /// the composed parts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Empty`] when a supplied URL is blank.
    pub fn resolve_database_url(
        &self,
        cli_override: Option<&str>,
    ) -> Result<(String, DatabaseUrlSource), ConfigError> {
        let environment = std::env::var(DATABASE_URL_ENV).ok();
        self.resolve_with(cli_override, environment.as_deref())
    }

    fn resolve_with(
        &self,
        cli_override: Option<&str>,
        environment: Option<&str>,
    ) -> Result<(String, DatabaseUrlSource), ConfigError> {
        let candidates = [
            (cli_override, DatabaseUrlSource::CommandLine, "--database-url"),
            (self.url.as_deref(), DatabaseUrlSource::Settings, "DB_URL"),
            (environment, DatabaseUrlSource::Environment, DATABASE_URL_ENV),
        ];
        for (value, source, source_name) in candidates {
            let Some(url) = value else {
                continue;
            };
            if url.trim().is_empty() {
                return Err(ConfigError::Empty {
                    source_name: source_name.to_owned(),
                });
            }
            return Ok((url.to_owned(), source));
        }
        Ok((self.composed_url(), DatabaseUrlSource::Parts))
    }
}

fn quote_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

fn default_migrations_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

fn default_models_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("src")
        .join("models")
}

/// Locations of generated files and seeding parameters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FLEETIFY")]
pub struct WorkspaceSettings {
    /// Directory holding migration files.
    pub migrations_dir: Option<String>,
    /// Directory holding model sources.
    pub models_dir: Option<String>,
    /// bcrypt cost for password-like seed columns.
    #[ortho_config(default = 12)]
    pub password_cost: u32,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            migrations_dir: None,
            models_dir: None,
            password_cost: DEFAULT_PASSWORD_COST,
        }
    }
}

impl WorkspaceSettings {
    /// Migrations directory, defaulting to `backend/migrations`.
    pub fn migrations_dir(&self) -> Utf8PathBuf {
        self.migrations_dir
            .as_deref()
            .map_or_else(default_migrations_dir, Utf8PathBuf::from)
    }

    /// Models directory, defaulting to `backend/src/models`.
    pub fn models_dir(&self) -> Utf8PathBuf {
        self.models_dir
            .as_deref()
            .map_or_else(default_models_dir, Utf8PathBuf::from)
    }

    /// bcrypt cost.
    pub fn password_cost(&self) -> u32 {
        self.password_cost
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for configuration loading and URL resolution.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const DB_VARS: [&str; 7] = [
        "DB_HOST",
        "DB_PORT",
        "DB_USER",
        "DB_PASSWORD",
        "DB_NAME",
        "DB_SSLMODE",
        "DB_URL",
    ];

    fn cleared_db_env() -> Vec<(&'static str, Option<String>)> {
        DB_VARS.iter().map(|name| (*name, None)).collect()
    }

    fn load_database() -> DatabaseSettings {
        DatabaseSettings::load_from_iter([OsString::from("fleetify-migrate")])
            .expect("config should load")
    }

    fn load_workspace() -> WorkspaceSettings {
        WorkspaceSettings::load_from_iter([OsString::from("fleetify-migrate")])
            .expect("config should load")
    }

    #[rstest]
    fn database_defaults_match_local_development() {
        let _guard = lock_env(cleared_db_env());

        let settings = load_database();
        assert_eq!(settings.host(), "localhost");
        assert_eq!(settings.port(), 5432);
        assert_eq!(settings.name(), "fleetify");
        assert_eq!(settings.sslmode(), "disable");
        assert!(settings.url.is_none());
    }

    #[rstest]
    fn database_parts_come_from_the_environment() {
        let mut vars = cleared_db_env();
        vars.retain(|(name, _)| !matches!(*name, "DB_HOST" | "DB_PORT" | "DB_NAME"));
        vars.push(("DB_HOST", Some("db.internal".to_owned())));
        vars.push(("DB_PORT", Some("6543".to_owned())));
        vars.push(("DB_NAME", Some("procurement".to_owned())));
        let _guard = lock_env(vars);

        let settings = load_database();
        assert_eq!(settings.host(), "db.internal");
        assert_eq!(settings.port(), 6543);
        assert_eq!(settings.name(), "procurement");
    }

    #[rstest]
    fn command_line_url_wins() {
        let settings = DatabaseSettings {
            url: Some("postgres://settings".to_owned()),
            ..DatabaseSettings::default()
        };
        let resolved = settings
            .resolve_with(Some("postgres://cli"), Some("postgres://env"))
            .expect("url resolves");
        assert_eq!(
            resolved,
            ("postgres://cli".to_owned(), DatabaseUrlSource::CommandLine)
        );
    }

    #[rstest]
    fn settings_url_precedes_database_url() {
        let settings = DatabaseSettings {
            url: Some("postgres://settings".to_owned()),
            ..DatabaseSettings::default()
        };
        let resolved = settings
            .resolve_with(None, Some("postgres://env"))
            .expect("url resolves");
        assert_eq!(resolved.1, DatabaseUrlSource::Settings);
    }

    #[rstest]
    fn database_url_precedes_parts() {
        let resolved = DatabaseSettings::default()
            .resolve_with(None, Some("postgres://env"))
            .expect("url resolves");
        assert_eq!(
            resolved,
            ("postgres://env".to_owned(), DatabaseUrlSource::Environment)
        );
    }

    #[rstest]
    fn parts_are_the_fallback() {
        let settings = DatabaseSettings {
            host: Some("db".to_owned()),
            port: 5433,
            ..DatabaseSettings::default()
        };
        let (url, source) = settings.resolve_with(None, None).expect("url resolves");
        assert_eq!(source, DatabaseUrlSource::Parts);
        assert!(url.starts_with("host='db' port=5433 "));
    }

    #[rstest]
    #[case(Some("  "), None, "--database-url")]
    #[case(None, Some(""), "DATABASE_URL")]
    fn blank_urls_are_rejected(
        #[case] cli: Option<&str>,
        #[case] environment: Option<&str>,
        #[case] expected_source: &str,
    ) {
        let result = DatabaseSettings::default().resolve_with(cli, environment);
        assert_eq!(
            result,
            Err(ConfigError::Empty {
                source_name: expected_source.to_owned()
            })
        );
    }

    #[rstest]
    fn workspace_defaults_live_under_the_crate() {
        let _guard = lock_env([
            ("FLEETIFY_MIGRATIONS_DIR", None::<String>),
            ("FLEETIFY_MODELS_DIR", None::<String>),
            ("FLEETIFY_PASSWORD_COST", None::<String>),
        ]);

        let settings = load_workspace();
        assert!(settings.migrations_dir().ends_with("migrations"));
        assert!(settings.models_dir().ends_with("src/models"));
        assert_eq!(settings.password_cost(), DEFAULT_PASSWORD_COST);
    }

    #[rstest]
    fn both_sections_load_from_an_empty_environment() {
        let mut vars = cleared_db_env();
        vars.extend([
            (DATABASE_URL_ENV, None),
            ("FLEETIFY_MIGRATIONS_DIR", None),
            ("FLEETIFY_MODELS_DIR", None),
            ("FLEETIFY_PASSWORD_COST", None),
        ]);
        let _guard = lock_env(vars);

        let database = load_database();
        let workspace = load_workspace();
        assert_eq!(database.port, DEFAULT_PORT);
        assert_eq!(
            database.resolve_database_url(None).expect("url resolves").1,
            DatabaseUrlSource::Parts
        );
        assert_eq!(workspace.password_cost, DEFAULT_PASSWORD_COST);
    }

    #[rstest]
    fn workspace_environment_overrides_are_respected() {
        let _guard = lock_env([
            ("FLEETIFY_MIGRATIONS_DIR", Some("/tmp/fleetify/migrations".to_owned())),
            ("FLEETIFY_MODELS_DIR", Some("/tmp/fleetify/models".to_owned())),
            ("FLEETIFY_PASSWORD_COST", Some("4".to_owned())),
        ]);

        let settings = load_workspace();
        assert_eq!(
            settings.migrations_dir(),
            Utf8PathBuf::from("/tmp/fleetify/migrations")
        );
        assert_eq!(settings.models_dir(), Utf8PathBuf::from("/tmp/fleetify/models"));
        assert_eq!(settings.password_cost(), 4);
    }
}
