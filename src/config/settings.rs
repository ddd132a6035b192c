use super::Environment;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub environment: Environment,
    pub database: DatabaseSettings,
    pub storage: StorageSettings,
    pub queue: QueueSettings,
    pub llm: LlmSettings,
    pub limits: ProcessingLimits,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageProviderSetting {
    Local,
    Azure,
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub provider: StorageProviderSetting,
    pub local_path: String,
    pub azure_account: Option<String>,
    pub azure_access_key: Option<String>,
    pub azure_container: Option<String>,
}

#[derive(Debug, Clone)]
pub struct QueueSettings {
    pub concurrency: usize,
    pub poll_interval_ms: u64,
    pub max_attempts: i32,
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProcessingLimits {
    pub max_download_bytes: u64,
}

impl Settings {
    /// Load from environment variables. Only `DATABASE_URL` and
    /// `ANTHROPIC_API_KEY` are required; everything else has a default
    /// suitable for local runs.
    pub fn from_env() -> Result<Self, SettingsError> {
        let environment = env_or("APP_ENV", "local");
        let environment = Environment::try_from(environment)
            .map_err(|message| SettingsError::Invalid {
                name: "APP_ENV",
                message,
            })?;

        let provider = match env_or("STORAGE_PROVIDER", "local").to_lowercase().as_str() {
            "local" => StorageProviderSetting::Local,
            "azure" => StorageProviderSetting::Azure,
            other => {
                return Err(SettingsError::Invalid {
                    name: "STORAGE_PROVIDER",
                    message: format!("unknown provider {other}, expected local or azure"),
                })
            }
        };

        Ok(Self {
            environment,
            database: DatabaseSettings {
                url: required("DATABASE_URL")?,
                max_connections: parsed_or("DATABASE_MAX_CONNECTIONS", 10)?,
                acquire_timeout_secs: parsed_or("DATABASE_ACQUIRE_TIMEOUT_SECS", 5)?,
            },
            storage: StorageSettings {
                provider,
                local_path: env_or("STORAGE_LOCAL_PATH", "./data/uploads"),
                azure_account: std::env::var("AZURE_STORAGE_ACCOUNT").ok(),
                azure_access_key: std::env::var("AZURE_STORAGE_ACCESS_KEY").ok(),
                azure_container: std::env::var("AZURE_STORAGE_CONTAINER").ok(),
            },
            queue: QueueSettings {
                concurrency: parsed_or("QUEUE_CONCURRENCY", 4)?,
                poll_interval_ms: parsed_or("QUEUE_POLL_INTERVAL_MS", 500)?,
                max_attempts: parsed_or("QUEUE_MAX_ATTEMPTS", 5)?,
                retry_backoff_ms: parsed_or("QUEUE_RETRY_BACKOFF_MS", 2_000)?,
            },
            llm: LlmSettings {
                api_key: required("ANTHROPIC_API_KEY")?,
                model: env_or("LLM_MODEL", "claude-sonnet-4-5"),
                max_tokens: parsed_or("LLM_MAX_TOKENS", 4_096)?,
                base_url: std::env::var("LLM_BASE_URL").ok(),
            },
            limits: ProcessingLimits {
                max_download_bytes: parsed_or("MAX_DOWNLOAD_BYTES", 20 * 1024 * 1024)?,
            },
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn required(name: &'static str) -> Result<String, SettingsError> {
    std::env::var(name).map_err(|_| SettingsError::Missing(name))
}

fn parsed_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, SettingsError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| SettingsError::Invalid {
            name,
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
