use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub cache: CacheConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Grant every seeded user a `full` permission on every seeded menu.
    /// Demo convenience only; the permission filter semantics are unchanged.
    pub grant_full_access: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("MENU_CACHE_ENABLED") {
            self.cache.enabled = v.parse().unwrap_or(self.cache.enabled);
        }
        if let Ok(v) = env::var("MENU_CACHE_TTL_SECS") {
            self.cache.ttl_secs = v.parse().unwrap_or(self.cache.ttl_secs);
        }
        if let Ok(v) = env::var("SEED_GRANT_FULL_ACCESS") {
            self.seed.grant_full_access = v.parse().unwrap_or(self.seed.grant_full_access);
        }
        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            cache: CacheConfig { enabled: true, ttl_secs: 5 },
            seed: SeedConfig { grant_full_access: true },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            cache: CacheConfig { enabled: true, ttl_secs: 30 },
            seed: SeedConfig { grant_full_access: false },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            cache: CacheConfig { enabled: true, ttl_secs: 60 },
            seed: SeedConfig { grant_full_access: false },
        }
    }
}

pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

/// Convenience accessor for the config singleton
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl_secs, 5);
        assert!(config.seed.grant_full_access);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl_secs, 60);
        assert!(!config.seed.grant_full_access);
    }
}
