use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::valuation::engine::DEFAULT_HOME_STATE;

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

pub const DEFAULT_FALLBACK_BASE_PRICE: f64 = 800_000.0;

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub valuation: ValuationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            valuation: ValuationConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the rate tables come from and how the engine is tuned.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationConfig {
    /// JSON rate tables replacing the built-in calibration.
    pub rates_path: Option<PathBuf>,
    pub home_state: String,
    pub market_sentiment: bool,
    pub fallback_base_price: f64,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            rates_path: None,
            home_state: DEFAULT_HOME_STATE.to_string(),
            market_sentiment: false,
            fallback_base_price: DEFAULT_FALLBACK_BASE_PRICE,
        }
    }
}

impl ValuationConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let rates_path = env::var("OBV_RATES_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let home_state = env::var("OBV_HOME_STATE")
            .ok()
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.home_state);

        let market_sentiment = match env::var("OBV_MARKET_SENTIMENT") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidSentimentFlag { value: raw })?,
            Err(_) => defaults.market_sentiment,
        };

        let fallback_base_price = match env::var("OBV_FALLBACK_BASE_PRICE") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|amount| amount.is_finite() && *amount > 0.0)
                .ok_or(ConfigError::InvalidFallbackPrice { value: raw })?,
            Err(_) => defaults.fallback_base_price,
        };

        Ok(Self {
            rates_path,
            home_state,
            market_sentiment,
            fallback_base_price,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSentimentFlag { value: String },
    InvalidFallbackPrice { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSentimentFlag { value } => {
                write!(f, "OBV_MARKET_SENTIMENT must be true or false (got '{value}')")
            }
            ConfigError::InvalidFallbackPrice { value } => write!(
                f,
                "OBV_FALLBACK_BASE_PRICE must be a positive amount (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidSentimentFlag { .. }
            | ConfigError::InvalidFallbackPrice { .. } => None,
        }
    }
}
