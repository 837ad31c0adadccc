use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("No data available from API for league {league}, season {season}")]
    NoData { league: u32, season: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Database,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit status for a run that ended with an error of this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) | EtlError::HttpStatus { .. } => ErrorCategory::Network,
            EtlError::DatabaseError(_) => ErrorCategory::Database,
            EtlError::TomlError(_)
            | EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::ProcessingError { .. }
            | EtlError::NoData { .. } => ErrorCategory::Data,
            EtlError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::NoData { .. } => ErrorSeverity::Low,
            EtlError::ApiError(_) | EtlError::HttpStatus { .. } => ErrorSeverity::Medium,
            EtlError::DatabaseError(_)
            | EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::ProcessingError { .. }
            | EtlError::TomlError(_)
            | EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            EtlError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// Whether a failed API call is worth sending again.
    pub fn is_retryable(&self) -> bool {
        match self {
            EtlError::ApiError(e) => e.is_timeout() || e.is_connect(),
            EtlError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::ApiError(_) => "Check network connectivity and the API endpoint",
            EtlError::HttpStatus { status, .. } if *status == 401 || *status == 403 => {
                "Check that API_KEY is valid and has access to the endpoint"
            }
            EtlError::HttpStatus { status, .. } if *status == 429 => {
                "Request quota exceeded, wait before running again"
            }
            EtlError::HttpStatus { .. } => "Check the endpoint, league and season parameters",
            EtlError::DatabaseError(_) => {
                "Check DB_HOST, DB_NAME, DB_USER and DB_PASSWORD and that MySQL is reachable"
            }
            EtlError::CsvError(_) | EtlError::IoError(_) => {
                "Check that the output path exists and is writable"
            }
            EtlError::SerializationError(_) => "The API response format may have changed",
            EtlError::TomlError(_) => "Fix the syntax of the configuration file",
            EtlError::ConfigError { .. } | EtlError::InvalidConfigValueError { .. } => {
                "Review the configuration values"
            }
            EtlError::MissingConfigError { .. } => {
                "Set the missing value in .env, the environment or on the command line"
            }
            EtlError::ProcessingError { .. } => "Inspect the API payload for unexpected values",
            EtlError::NoData { .. } => "Verify the league id and season have published statistics",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::MissingConfigError { field } if field == "api_key" => {
                "API_KEY is not set. Please update your .env file.".to_string()
            }
            EtlError::MissingConfigError { field } => format!("{} is not set", field),
            EtlError::ApiError(e) if e.is_timeout() => "The API request timed out".to_string(),
            EtlError::ApiError(e) if e.is_connect() => "Could not connect to the API".to_string(),
            EtlError::DatabaseError(_) => format!("Database operation failed: {}", self),
            EtlError::NoData { .. } => format!(
                "{}. Skipping transformation and loading.",
                self
            ),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
