//! Application configuration loaded from environment variables.

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` bind address (default: `"0.0.0.0"`)
/// - `PORT` listen port (default: `3000`)
/// - `RUST_LOG` tracing filter directive (default: `"info"`)
/// - `DATABASE_URL` Postgres connection string; documents stay in memory when unset
/// - `EVENT_QUEUE_CAPACITY` bound of each outbound event queue (default: `1024`)
/// - `BRAND_QUEUE_CAPACITY` bound of the inbound brand message queue (default: `256`)
///
/// Unparsable numbers fall back to their defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub event_queue_capacity: usize,
    pub brand_queue_capacity: usize,
}

const DEFAULT_EVENT_QUEUE_CAPACITY: usize = 1024;
const DEFAULT_BRAND_QUEUE_CAPACITY: usize = 256;

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parsed(&lookup, "PORT").unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            event_queue_capacity: parsed(&lookup, "EVENT_QUEUE_CAPACITY")
                .filter(|capacity| *capacity > 0)
                .unwrap_or(defaults.event_queue_capacity),
            brand_queue_capacity: parsed(&lookup, "BRAND_QUEUE_CAPACITY")
                .filter(|capacity| *capacity > 0)
                .unwrap_or(defaults.brand_queue_capacity),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|value| value.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            database_url: None,
            event_queue_capacity: DEFAULT_EVENT_QUEUE_CAPACITY,
            brand_queue_capacity: DEFAULT_BRAND_QUEUE_CAPACITY,
        }
    }
}
