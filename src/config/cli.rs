use crate::config::toml_config::TomlConfig;
use crate::config::Settings;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "topscorer-etl")]
#[command(about = "Load a league's top scorers from API-Football into MySQL")]
pub struct CliConfig {
    /// Optional TOML configuration file; flags and environment override it
    #[arg(short, long, env = "ETL_CONFIG")]
    pub config: Option<String>,

    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "API_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Header that carries the API key
    #[arg(long, env = "API_KEY_HEADER")]
    pub api_key_header: Option<String>,

    #[arg(long, env = "LEAGUE")]
    pub league: Option<u32>,

    #[arg(long, env = "SEASON")]
    pub season: Option<u32>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long)]
    pub retry_attempts: Option<u32>,

    #[arg(long)]
    pub retry_delay_seconds: Option<u64>,

    /// Full MySQL URL, used instead of the DB_* settings
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    #[arg(long, env = "DB_HOST")]
    pub db_host: Option<String>,

    #[arg(long, env = "DB_PORT")]
    pub db_port: Option<u16>,

    #[arg(long, env = "DB_NAME")]
    pub db_name: Option<String>,

    #[arg(long, env = "DB_USER")]
    pub db_user: Option<String>,

    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    #[arg(long)]
    pub table: Option<String>,

    /// Directory for exported files
    #[arg(long)]
    pub output_path: Option<String>,

    /// Also write the ranked table as CSV to this file under the output path
    #[arg(long)]
    pub csv_output: Option<String>,

    /// Extract and transform only; print the preview and skip loading
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

impl CliConfig {
    /// Resolves the run settings: defaults, then the TOML file, then flags/env.
    pub fn into_settings(self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                TomlConfig::from_file(path)?.into_settings()
            }
            None => Settings::default(),
        };
        self.apply_to(&mut settings);
        Ok(settings)
    }

    fn apply_to(self, settings: &mut Settings) {
        let s = &mut settings.source;
        if let Some(v) = self.endpoint {
            s.endpoint = v;
        }
        if self.api_key.is_some() {
            s.api_key = self.api_key;
        }
        if let Some(v) = self.api_key_header {
            s.api_key_header = v;
        }
        s.league = self.league.unwrap_or(s.league);
        s.season = self.season.unwrap_or(s.season);
        s.timeout_seconds = self.timeout_seconds.unwrap_or(s.timeout_seconds);
        s.retry_attempts = self.retry_attempts.unwrap_or(s.retry_attempts);
        s.retry_delay_seconds = self.retry_delay_seconds.unwrap_or(s.retry_delay_seconds);

        let d = &mut settings.database;
        if self.database_url.is_some() {
            d.url = self.database_url;
        }
        if let Some(v) = self.db_host {
            d.host = v;
        }
        d.port = self.db_port.unwrap_or(d.port);
        if self.db_name.is_some() {
            d.name = self.db_name;
        }
        if self.db_user.is_some() {
            d.user = self.db_user;
        }
        if self.db_password.is_some() {
            d.password = self.db_password;
        }

        let l = &mut settings.load;
        if let Some(v) = self.table {
            l.table = v;
        }
        if let Some(v) = self.output_path {
            l.output_path = v;
        }
        if self.csv_output.is_some() {
            l.csv_output = self.csv_output;
        }

        settings.dry_run = self.dry_run;
        settings.monitor = settings.monitor || self.monitor;
    }
}
