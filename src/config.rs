use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::attendance::ReconcileOptions;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub db_max_connections: u32,

    pub api_prefix: String,
    pub rate_api_per_min: u32,

    // Report reconciliation
    pub reconcile_max_in_flight: usize,
    pub reconcile_task_timeout_secs: u64,
    pub standard_time_cache_ttl_secs: u64,

    pub log_dir: String,
}

/// Reads `key`, falling back to `default` when unset or unparsable.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, %default, "Unparsable setting, using default");
            default
        }),
        Err(_) => default,
    }
}

impl Config {
    /// Log directory alone, so the subscriber can be installed before the
    /// rest of the settings are read and their fallbacks get logged.
    pub fn log_dir_from_env() -> String {
        dotenv().ok();
        env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string())
    }

    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").context("SERVER_ADDR must be set")?,
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 10),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            rate_api_per_min: env_or("RATE_API_PER_MIN", 1000),

            reconcile_max_in_flight: env_or("RECONCILE_MAX_IN_FLIGHT", 32usize).clamp(1, 4096),
            reconcile_task_timeout_secs: env_or("RECONCILE_TASK_TIMEOUT_SECS", 10),
            standard_time_cache_ttl_secs: env_or("STANDARD_TIME_CACHE_TTL_SECS", 300),

            log_dir: Self::log_dir_from_env(),
        })
    }

    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            max_in_flight: self.reconcile_max_in_flight,
            task_timeout: Duration::from_secs(self.reconcile_task_timeout_secs),
        }
    }

    pub fn standard_time_ttl(&self) -> Duration {
        Duration::from_secs(self.standard_time_cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    // Keys are unique to each test so parallel tests don't race on the
    // process environment.

    #[test]
    fn env_or_uses_default_when_missing() {
        assert_eq!(env_or("ATTENDANCE_TEST_UNSET_KEY", 7u32), 7);
    }

    #[test]
    fn env_or_parses_and_falls_back() {
        unsafe {
            env::set_var("ATTENDANCE_TEST_GOOD", " 42 ");
            env::set_var("ATTENDANCE_TEST_BAD", "forty-two");
        }
        assert_eq!(env_or("ATTENDANCE_TEST_GOOD", 1u64), 42);
        assert_eq!(env_or("ATTENDANCE_TEST_BAD", 1u64), 1);
    }

    #[test]
    fn fallback_is_logged_once_a_subscriber_is_installed() {
        unsafe {
            env::set_var("ATTENDANCE_TEST_LOGGED_BAD", "lots");
        }
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let value = tracing::subscriber::with_default(subscriber, || {
            env_or("ATTENDANCE_TEST_LOGGED_BAD", 32usize)
        });

        assert_eq!(value, 32);
        let out = captured.text();
        assert!(out.contains("Unparsable setting, using default"), "{out}");
        assert!(out.contains("ATTENDANCE_TEST_LOGGED_BAD"), "{out}");
    }

    #[test]
    fn reconcile_options_follow_config() {
        let config = Config {
            database_url: "mysql://localhost/attendance".into(),
            server_addr: "127.0.0.1:8080".into(),
            db_max_connections: 5,
            api_prefix: "/api".into(),
            rate_api_per_min: 60,
            reconcile_max_in_flight: 8,
            reconcile_task_timeout_secs: 3,
            standard_time_cache_ttl_secs: 30,
            log_dir: "logs".into(),
        };

        let options = config.reconcile_options();
        assert_eq!(options.max_in_flight, 8);
        assert_eq!(options.task_timeout, Duration::from_secs(3));
        assert_eq!(config.standard_time_ttl(), Duration::from_secs(30));
    }
}
