use std::{env, fmt, net::SocketAddr, time::Duration};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_CONTACTS_API_URL: &str = "http://127.0.0.1:9400/api/";
const DEFAULT_CONTACTS_TIMEOUT_MS: u64 = 3_000;

/// Application runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    fn from_str(value: &str) -> Result<Self, ConfigError> {
        match value {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(ConfigError::InvalidEnvironment(other.to_string())),
        }
    }

    /// Returns `true` when the current environment should behave as
    /// development.
    pub fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }

    /// Returns the canonical name used for logging/metrics labels.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

/// Settings for the external contact service used by audience resolution.
#[derive(Debug, Clone)]
pub struct ContactsSettings {
    pub api_url: String,
    pub api_token: Option<String>,
    /// Upper bound on a single count call; resolution falls back to cached
    /// sums when it elapses.
    pub timeout: Duration,
}

/// Runtime configuration resolved from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub environment: Environment,
    pub contacts: ContactsSettings,
}

impl AppConfig {
    /// Constructs the configuration by reading and validating environment
    /// variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_value = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let environment = Environment::from_str(&env_value)?;

        let bind_value =
            env::var("APP_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_value.parse().map_err(ConfigError::BindAddress)?;

        let api_url = env::var("CONTACTS_API_URL")
            .unwrap_or_else(|_| DEFAULT_CONTACTS_API_URL.to_string());
        let api_token = env::var("CONTACTS_API_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());
        let timeout_ms = match env::var("CONTACTS_TIMEOUT_MS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(raw))?,
            Err(_) => DEFAULT_CONTACTS_TIMEOUT_MS,
        };

        Ok(Self {
            bind_addr,
            environment,
            contacts: ContactsSettings {
                api_url,
                api_token,
                timeout: Duration::from_millis(timeout_ms),
            },
        })
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    InvalidEnvironment(String),
    BindAddress(std::net::AddrParseError),
    InvalidTimeout(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnvironment(value) => write!(
                f,
                "APP_ENV must be one of 'development', 'production', or 'test' (got {value})"
            ),
            Self::BindAddress(err) => write!(f, "invalid APP_BIND_ADDR value: {err}"),
            Self::InvalidTimeout(value) => write!(
                f,
                "CONTACTS_TIMEOUT_MS must be a whole number of milliseconds (got {value})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
