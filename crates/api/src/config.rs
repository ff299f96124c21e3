//! Application configuration loaded from environment variables.

use std::time::Duration;

use placement::{BreakerConfig, GuardConfig, RetryConfig};

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `INVENTORY_URL` — inventory service base URL
///   (default: `"http://localhost:8082"`)
/// - `KAFKA_BROKERS` — broker list (default: `"localhost:9092"`)
/// - `ORDER_TOPIC` — fulfillment event topic (default: `"order-topic"`)
/// - `DATABASE_URL` — Postgres connection string; when unset the server
///   runs on the in-memory order store
/// - `INVENTORY_TIMEOUT_MS`, `BREAKER_FAILURE_THRESHOLD`,
///   `BREAKER_COOLDOWN_MS`, `RETRY_MAX_ATTEMPTS` — guard tuning overrides
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub inventory_url: String,
    pub kafka_brokers: String,
    pub order_topic: String,
    pub database_url: Option<String>,
    pub guard: GuardConfig,
}

impl Config {
    /// Loads configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        let mut guard = GuardConfig::default();
        if let Some(timeout) = env_parse::<u64>("INVENTORY_TIMEOUT_MS") {
            guard.call_timeout = Duration::from_millis(timeout);
        }
        if let Some(threshold) = env_parse::<u32>("BREAKER_FAILURE_THRESHOLD") {
            guard.breaker.failure_threshold = threshold;
        }
        if let Some(cooldown) = env_parse::<u64>("BREAKER_COOLDOWN_MS") {
            guard.breaker.cooldown = Duration::from_millis(cooldown);
        }
        if let Some(attempts) = env_parse::<u32>("RETRY_MAX_ATTEMPTS") {
            guard.retry.max_attempts = attempts.max(1);
        }

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_parse("PORT").unwrap_or(3000),
            inventory_url: std::env::var("INVENTORY_URL")
                .unwrap_or_else(|_| "http://localhost:8082".to_string()),
            kafka_brokers: std::env::var("KAFKA_BROKERS")
                .unwrap_or_else(|_| "localhost:9092".to_string()),
            order_topic: std::env::var("ORDER_TOPIC").unwrap_or_else(|_| "order-topic".to_string()),
            database_url: std::env::var("DATABASE_URL").ok(),
            guard,
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            inventory_url: "http://localhost:8082".to_string(),
            kafka_brokers: "localhost:9092".to_string(),
            order_topic: "order-topic".to_string(),
            database_url: None,
            guard: GuardConfig {
                breaker: BreakerConfig::default(),
                retry: RetryConfig::default(),
                call_timeout: Duration::from_secs(3),
            },
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|value| value.parse().ok())
}
