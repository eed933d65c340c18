//! # evx-config
//!
//! Layered configuration loading for Evidex using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`EVIDEX_*` prefix, `__` as separator)
//! 2. Project-level `.evidex/config.toml`
//! 3. User-level `~/.config/evidex/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `EVIDEX_DATABASE__PATH` -> `database.path`,
//! `EVIDEX_SOURCES__PUBMED__API_KEY` -> `sources.pubmed.api_key`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use evx_config::EvidexConfig;
//!
//! let config = EvidexConfig::load_with_dotenv().expect("config");
//! println!("association index: {}", config.database.path);
//! ```

mod catalogs;
mod database;
mod error;
mod search;
mod sources;

pub use catalogs::CatalogConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use search::{OverrideRuleConfig, SearchConfig};
pub use sources::{CrossrefConfig, FanoutPolicy, PubMedConfig, SourcesConfig, XrxivConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EvidexConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub catalogs: CatalogConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl EvidexConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".evidex/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("EVIDEX_").split("__"))
    }

    /// Reject values the search path cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let search = &self.search;
        if !(0.0..=1.0).contains(&search.precision_quantile) {
            return Err(ConfigError::InvalidValue {
                field: "search.precision_quantile".into(),
                reason: format!("{} is outside [0, 1]", search.precision_quantile),
            });
        }
        if search.max_response_mb <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "search.max_response_mb".into(),
                reason: "must be positive".into(),
            });
        }
        if search.limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search.limit".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("evidex").join("config.toml"))
    }
}
