#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};

pub const DEFAULT_ENDPOINT: &str = "https://v3.football.api-sports.io/players/topscorers";
pub const DEFAULT_API_KEY_HEADER: &str = "X-RapidAPI-Key";
pub const DEFAULT_LEAGUE: u32 = 39;
pub const DEFAULT_SEASON: u32 = 2023;
pub const DEFAULT_TABLE: &str = "top_scorers";

#[derive(Clone, PartialEq, Eq)]
pub struct SourceSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub api_key_header: String,
    pub league: u32,
    pub season: u32,
    pub timeout_seconds: u64,
    pub retry_attempts: u32,
    pub retry_delay_seconds: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            api_key_header: DEFAULT_API_KEY_HEADER.to_string(),
            league: DEFAULT_LEAGUE,
            season: DEFAULT_SEASON,
            timeout_seconds: 30,
            retry_attempts: 2,
            retry_delay_seconds: 1,
        }
    }
}

// Credentials stay out of debug logs.
impl std::fmt::Debug for SourceSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceSettings")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("api_key_header", &self.api_key_header)
            .field("league", &self.league)
            .field("season", &self.season)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_delay_seconds", &self.retry_delay_seconds)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    /// Full `mysql://` URL; wins over the individual fields when set.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 3306,
            name: None,
            user: None,
            password: None,
            max_connections: 5,
        }
    }
}

impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("url", &self.url.as_ref().map(|_| "***"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSettings {
    pub table: String,
    pub output_path: String,
    pub csv_output: Option<String>,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            output_path: "./output".to_string(),
            csv_output: None,
        }
    }
}

/// Fully resolved run configuration (file, then environment, then flags).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub source: SourceSettings,
    pub database: DatabaseSettings,
    pub load: LoadSettings,
    pub dry_run: bool,
    pub monitor: bool,
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        let api_key = validation::validate_required_field("api_key", &self.source.api_key)?;
        if api_key.trim().is_empty() {
            return Err(EtlError::MissingConfigError {
                field: "api_key".to_string(),
            });
        }

        validation::validate_url("source.endpoint", &self.source.endpoint)?;
        validation::validate_non_empty_string("source.api_key_header", &self.source.api_key_header)?;
        validation::validate_range("source.league", self.source.league, 1, u32::MAX)?;
        validation::validate_range("source.season", self.source.season, 1900, 2100)?;
        validation::validate_range("source.timeout_seconds", self.source.timeout_seconds, 1, 600)?;
        validation::validate_range("source.retry_attempts", self.source.retry_attempts, 0, 10)?;

        validation::validate_sql_identifier("load.table", &self.load.table)?;
        if let Some(csv_output) = &self.load.csv_output {
            validation::validate_path("load.output_path", &self.load.output_path)?;
            validation::validate_path("load.csv_output", csv_output)?;
        }

        if self.dry_run {
            return Ok(());
        }

        if let Some(url) = &self.database.url {
            if !url.starts_with("mysql://") && !url.starts_with("mariadb://") {
                return Err(EtlError::InvalidConfigValueError {
                    field: "database.url".to_string(),
                    value: "***".to_string(),
                    reason: "Expected a mysql:// URL".to_string(),
                });
            }
            return Ok(());
        }

        validation::validate_non_empty_string("database.host", &self.database.host)?;
        validation::validate_range("database.max_connections", self.database.max_connections, 1, 100)?;
        validation::validate_required_field("database.name", &self.database.name)?;
        validation::validate_required_field("database.user", &self.database.user)?;
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn api_endpoint(&self) -> &str {
        &self.source.endpoint
    }

    fn league(&self) -> u32 {
        self.source.league
    }

    fn season(&self) -> u32 {
        self.source.season
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn csv_output(&self) -> Option<&str> {
        self.load.csv_output.as_deref()
    }
}
