use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};

use crate::screening::question_generator::QuestionStrategy;

/// Where conversation state is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres { database_url: String },
    Redis { redis_url: String },
    Memory,
}

impl StoreBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StoreBackend::Postgres { .. } => "postgres",
            StoreBackend::Redis { .. } => "redis",
            StoreBackend::Memory => "memory",
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if a variable required by the selected backend is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    /// Absent means interview questions come from the static bank only.
    pub anthropic_api_key: Option<String>,
    pub question_strategy: QuestionStrategy,
    pub generation_timeout: Duration,
    pub require_meaningful_answers: bool,
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let store_backend = match get("STORE_BACKEND")
            .unwrap_or_else(|| "postgres".to_string())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" | "postgresql" => StoreBackend::Postgres {
                database_url: require("DATABASE_URL")?,
            },
            "redis" => StoreBackend::Redis {
                redis_url: require("REDIS_URL")?,
            },
            "memory" => StoreBackend::Memory,
            other => bail!("STORE_BACKEND must be postgres, redis or memory (got '{other}')"),
        };

        let question_strategy = match get("QUESTION_STRATEGY") {
            Some(raw) => QuestionStrategy::from_str(&raw).map_err(|e| anyhow!(e))?,
            None => QuestionStrategy::default(),
        };

        let generation_timeout = Duration::from_secs(
            get("GENERATION_TIMEOUT_SECS")
                .unwrap_or_else(|| "20".to_string())
                .parse::<u64>()
                .context("GENERATION_TIMEOUT_SECS must be a whole number of seconds")?,
        );

        let require_meaningful_answers = match get("REQUIRE_MEANINGFUL_ANSWERS") {
            Some(raw) => parse_bool(&raw)
                .context("REQUIRE_MEANINGFUL_ANSWERS must be true or false")?,
            None => true,
        };

        let cors_origins = get("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty() && *o != "*")
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Config {
            store_backend,
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            question_strategy,
            generation_timeout,
            require_meaningful_answers,
            cors_origins,
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_postgres() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/screening")]).unwrap();
        assert_eq!(
            config.store_backend,
            StoreBackend::Postgres {
                database_url: "postgres://localhost/screening".into()
            }
        );
        assert!(config.anthropic_api_key.is_none());
        assert_eq!(config.question_strategy, QuestionStrategy::Batched);
        assert_eq!(config.generation_timeout, Duration::from_secs(20));
        assert!(config.require_meaningful_answers);
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_postgres_requires_database_url() {
        let err = config_from(&[]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_redis_requires_redis_url() {
        assert!(config_from(&[("STORE_BACKEND", "redis")]).is_err());
        let config = config_from(&[
            ("STORE_BACKEND", "Redis"),
            ("REDIS_URL", "redis://127.0.0.1/"),
        ])
        .unwrap();
        assert_eq!(config.store_backend.name(), "redis");
    }

    #[test]
    fn test_memory_backend_needs_no_urls() {
        let config = config_from(&[
            ("STORE_BACKEND", "memory"),
            ("QUESTION_STRATEGY", "per_tech"),
            ("GENERATION_TIMEOUT_SECS", "5"),
            ("REQUIRE_MEANINGFUL_ANSWERS", "off"),
            ("CORS_ORIGINS", "http://localhost:3000, https://talent.example.com"),
            ("ANTHROPIC_API_KEY", "sk-test"),
        ])
        .unwrap();
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.question_strategy, QuestionStrategy::PerTech);
        assert_eq!(config.generation_timeout, Duration::from_secs(5));
        assert!(!config.require_meaningful_answers);
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.anthropic_api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_blank_api_key_counts_as_unset() {
        let config =
            config_from(&[("STORE_BACKEND", "memory"), ("ANTHROPIC_API_KEY", "  ")]).unwrap();
        assert!(config.anthropic_api_key.is_none());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(config_from(&[("STORE_BACKEND", "sqlite")]).is_err());
        assert!(config_from(&[("STORE_BACKEND", "memory"), ("PORT", "http")]).is_err());
        assert!(
            config_from(&[("STORE_BACKEND", "memory"), ("QUESTION_STRATEGY", "random")]).is_err()
        );
        assert!(config_from(&[
            ("STORE_BACKEND", "memory"),
            ("REQUIRE_MEANINGFUL_ANSWERS", "maybe")
        ])
        .is_err());
    }

    #[test]
    fn test_wildcard_origin_means_any() {
        let config = config_from(&[("STORE_BACKEND", "memory"), ("CORS_ORIGINS", "*")]).unwrap();
        assert!(config.cors_origins.is_empty());
    }
}
