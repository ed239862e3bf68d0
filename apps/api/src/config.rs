use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every key has a default; malformed values abort startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub backup_dir: PathBuf,
    pub log_cache: LogCacheConfig,
    pub cleanup_interval_secs: u64,
    pub rust_log: String,
}

/// Bounds for the in-memory mirror of recent log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogCacheConfig {
    /// Hard cap enforced on every append (oldest entry dropped).
    pub capacity: usize,
    /// Size above which the periodic cleanup trims the mirror.
    pub trim_threshold: usize,
    /// Number of newest entries kept after a trim.
    pub trim_to: usize,
}

impl Default for LogCacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            trim_threshold: 500,
            trim_to: 300,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = LogCacheConfig::default();
        Ok(Config {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://moodmend.db".to_string()),
            port: parse_env("PORT", 5000)?,
            backup_dir: std::env::var("BACKUP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            log_cache: LogCacheConfig {
                capacity: parse_env("LOG_CACHE_CAPACITY", defaults.capacity)?,
                trim_threshold: parse_env("LOG_CACHE_TRIM_THRESHOLD", defaults.trim_threshold)?,
                trim_to: parse_env("LOG_CACHE_TRIM_TO", defaults.trim_to)?,
            },
            cleanup_interval_secs: parse_env("CLEANUP_INTERVAL_SECS", 3600)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_missing_uses_default() {
        let v: u16 = parse_env("MOODMEND_TEST_UNSET_KEY", 42).unwrap();
        assert_eq!(v, 42);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("MOODMEND_TEST_BAD_PORT", "not-a-port");
        let result: Result<u16> = parse_env("MOODMEND_TEST_BAD_PORT", 5000);
        assert!(result.is_err());
        std::env::remove_var("MOODMEND_TEST_BAD_PORT");
    }

    #[test]
    fn test_log_cache_defaults() {
        let d = LogCacheConfig::default();
        assert_eq!(d.capacity, 1000);
        assert!(d.trim_to < d.trim_threshold);
    }
}
