use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the assessment core.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub embedding: EmbeddingConfig,
    pub catalog: CatalogConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let api_base = env::var("EMBEDDING_API_BASE")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let api_base = api_base.trim_end_matches('/').to_string();
        if api_base.is_empty() {
            return Err(ConfigError::EmptyApiBase);
        }

        let api_key = env::var("EMBEDDING_API_KEY")
            .ok()
            .filter(|value| !value.trim().is_empty());

        let model = env::var("EMBEDDING_MODEL")
            .unwrap_or_else(|_| "text-embedding-3-small".to_string());

        let catalog_path = env::var("OCCUPATION_CATALOG_PATH").ok().map(PathBuf::from);

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            embedding: EmbeddingConfig {
                api_base,
                api_key,
                model,
            },
            catalog: CatalogConfig { path: catalog_path },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Settings for the remote embedding provider.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
}

/// Location of the occupation reference catalog, when file-backed.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub path: Option<PathBuf>,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyApiBase,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyApiBase => {
                write!(f, "EMBEDDING_API_BASE must not be empty")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
