use crate::config::Settings;
use crate::utils::error::{EtlError, Result};
use regex::{Captures, Regex};
use serde::Deserialize;
use std::path::Path;
use std::sync::OnceLock;

/// Optional file configuration. Every table and key may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TomlConfig {
    pub source: SourceConfig,
    pub database: DatabaseConfig,
    pub load: LoadConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub api_key_header: Option<String>,
    pub league: Option<u32>,
    pub season: Option<u32>,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub name: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub max_connections: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadConfig {
    pub table: Option<String>,
    pub output_path: Option<String>,
    pub csv_output: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${API_KEY})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        placeholder_regex()
            .replace_all(content, |caps: &Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// Layers the file values over the built-in defaults.
    pub fn apply_to(self, settings: &mut Settings) {
        let source = self.source;
        let s = &mut settings.source;
        if let Some(v) = resolved(source.endpoint, "source.endpoint") {
            s.endpoint = v;
        }
        if let Some(v) = resolved(source.api_key, "source.api_key") {
            s.api_key = Some(v);
        }
        if let Some(v) = resolved(source.api_key_header, "source.api_key_header") {
            s.api_key_header = v;
        }
        s.league = source.league.unwrap_or(s.league);
        s.season = source.season.unwrap_or(s.season);
        s.timeout_seconds = source.timeout_seconds.unwrap_or(s.timeout_seconds);
        s.retry_attempts = source.retry_attempts.unwrap_or(s.retry_attempts);
        s.retry_delay_seconds = source.retry_delay_seconds.unwrap_or(s.retry_delay_seconds);

        let database = self.database;
        let d = &mut settings.database;
        if let Some(v) = resolved(database.url, "database.url") {
            d.url = Some(v);
        }
        if let Some(v) = resolved(database.host, "database.host") {
            d.host = v;
        }
        d.port = database.port.unwrap_or(d.port);
        if let Some(v) = resolved(database.name, "database.name") {
            d.name = Some(v);
        }
        if let Some(v) = resolved(database.user, "database.user") {
            d.user = Some(v);
        }
        if let Some(v) = resolved(database.password, "database.password") {
            d.password = Some(v);
        }
        d.max_connections = database.max_connections.unwrap_or(d.max_connections);

        let load = self.load;
        let l = &mut settings.load;
        if let Some(v) = resolved(load.table, "load.table") {
            l.table = v;
        }
        if let Some(v) = resolved(load.output_path, "load.output_path") {
            l.output_path = v;
        }
        if let Some(v) = resolved(load.csv_output, "load.csv_output") {
            l.csv_output = Some(v);
        }

        settings.monitor = settings.monitor || self.monitoring.enabled;
    }

    pub fn into_settings(self) -> Settings {
        let mut settings = Settings::default();
        self.apply_to(&mut settings);
        settings
    }
}

/// Drops values whose `${VAR}` placeholder had nothing to substitute.
fn resolved(value: Option<String>, field: &str) -> Option<String> {
    let value = value?;
    if placeholder_regex().is_match(&value) {
        tracing::warn!("⚠️ {} references an unset environment variable, ignoring it", field);
        return None;
    }
    Some(value)
}
