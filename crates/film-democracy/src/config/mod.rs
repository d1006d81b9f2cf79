use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::notifications::DEFAULT_MAX_MESSAGES;
use crate::workflows::ranking::scoring::UnknownPointsTable;
use crate::workflows::ranking::{PointsTable, DEFAULT_MAX_DURATION_MINUTES};

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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub ranking: RankingSettings,
    pub notifications: NotificationSettings,
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

        let points_table = match env::var("RANKING_POINTS_TABLE") {
            Ok(value) => value
                .parse::<PointsTable>()
                .map_err(|source| ConfigError::InvalidPointsTable { source })?,
            Err(_) => PointsTable::default(),
        };
        let max_duration_minutes = match env::var("RANKING_MAX_DURATION") {
            Ok(value) => value
                .trim()
                .parse::<i32>()
                .map_err(|_| ConfigError::InvalidMaxDuration { value })?,
            Err(_) => DEFAULT_MAX_DURATION_MINUTES,
        };
        let max_messages = match env::var("NOTIFICATIONS_MAX_MESSAGES") {
            Ok(value) => value
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidMaxMessages { value })?,
            Err(_) => DEFAULT_MAX_MESSAGES,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            ranking: RankingSettings {
                points_table,
                max_duration_minutes,
            },
            notifications: NotificationSettings { max_messages },
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Defaults applied to every ranking request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingSettings {
    pub points_table: PointsTable,
    /// Applied when a request carries no usable `max_duration`.
    pub max_duration_minutes: i32,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            points_table: PointsTable::default(),
            max_duration_minutes: DEFAULT_MAX_DURATION_MINUTES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationSettings {
    pub max_messages: usize,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            max_messages: DEFAULT_MAX_MESSAGES,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidPointsTable { source: UnknownPointsTable },
    InvalidMaxDuration { value: String },
    InvalidMaxMessages { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidPointsTable { source } => {
                write!(f, "RANKING_POINTS_TABLE is invalid: {source}")
            }
            ConfigError::InvalidMaxDuration { value } => {
                write!(f, "RANKING_MAX_DURATION must be an integer, got '{value}'")
            }
            ConfigError::InvalidMaxMessages { value } => write!(
                f,
                "NOTIFICATIONS_MAX_MESSAGES must be a non-negative integer, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPointsTable { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidMaxDuration { .. }
            | ConfigError::InvalidMaxMessages { .. } => None,
        }
    }
}
