use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub generation: GenerationConfig,
    pub bank_dir: Option<PathBuf>,
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

        let defaults = GenerationConfig::default();
        let generation = GenerationConfig {
            char_budget: positive_setting("COMMENT_CHAR_BUDGET", defaults.char_budget)?,
            batch_row_cap: positive_setting("COMMENT_BATCH_ROW_CAP", defaults.batch_row_cap)?,
            name_max_chars: positive_setting("COMMENT_NAME_MAX_CHARS", defaults.name_max_chars)?,
            addendum_max_chars: positive_setting(
                "COMMENT_ADDENDUM_MAX_CHARS",
                defaults.addendum_max_chars,
            )?,
        };

        let bank_dir = env::var("COMMENT_BANK_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            generation,
            bank_dir,
        })
    }
}

fn positive_setting(key: &'static str, default: usize) -> Result<usize, ConfigError> {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<usize>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(ConfigError::InvalidNumber { key, value: raw }),
        },
        Err(_) => Ok(default),
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

/// Limits applied while assembling comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Maximum length of a finished comment, in characters.
    pub char_budget: usize,
    /// Rows beyond this count in a single batch are dropped and reported.
    pub batch_row_cap: usize,
    pub name_max_chars: usize,
    pub addendum_max_chars: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            char_budget: 499,
            batch_row_cap: 100,
            name_max_chars: 100,
            addendum_max_chars: 300,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a positive integer (got '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "COMMENT_CHAR_BUDGET",
            "COMMENT_BATCH_ROW_CAP",
            "COMMENT_NAME_MAX_CHARS",
            "COMMENT_ADDENDUM_MAX_CHARS",
            "COMMENT_BANK_DIR",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.generation, GenerationConfig::default());
        assert_eq!(config.generation.char_budget, 499);
        assert_eq!(config.generation.batch_row_cap, 100);
        assert!(config.bank_dir.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn generation_limits_come_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("COMMENT_CHAR_BUDGET", "350");
        env::set_var("COMMENT_BATCH_ROW_CAP", "25");
        env::set_var("COMMENT_BANK_DIR", "/srv/banks");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.generation.char_budget, 350);
        assert_eq!(config.generation.batch_row_cap, 25);
        assert_eq!(config.generation.name_max_chars, 100);
        assert_eq!(config.bank_dir, Some(PathBuf::from("/srv/banks")));
        reset_env();
    }

    #[test]
    fn rejects_zero_or_garbage_limits() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("COMMENT_CHAR_BUDGET", "0");
        let error = AppConfig::load().expect_err("zero budget rejected");
        assert!(matches!(
            error,
            ConfigError::InvalidNumber {
                key: "COMMENT_CHAR_BUDGET",
                ..
            }
        ));

        env::set_var("COMMENT_CHAR_BUDGET", "lots");
        let error = AppConfig::load().expect_err("garbage budget rejected");
        assert!(error.to_string().contains("lots"));
        reset_env();
    }
}
