//! Configuration management for vinlot.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "vinlot";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "inventory.db";

/// Public NHTSA vPIC endpoint.
pub const DEFAULT_DECODER_URL: &str = "https://vpic.nhtsa.dot.gov/api/vehicles";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `VINLOT_`)
/// 2. TOML config file at `~/.config/vinlot/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Remote decoder configuration.
    pub decoder: DecoderConfig,
    /// Inventory rules.
    pub inventory: InventoryConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/vinlot/inventory.db`
    pub database_path: Option<PathBuf>,
}

/// Remote decoder configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Base URL of the vehicle-data API.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// User-Agent header sent with each request.
    pub user_agent: String,
}

/// Inventory rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Reject vehicles whose VIN fails the check digit.
    ///
    /// Wrong length and illegal characters are rejected regardless.
    pub require_valid_vin: bool,
    /// Currency code used when displaying amounts.
    pub currency: String,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DECODER_URL.to_string(),
            timeout_secs: 10,
            user_agent: format!("vinlot/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl DecoderConfig {
    /// Request timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            require_valid_vin: true,
            currency: "USD".to_string(),
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("VINLOT_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.decoder.timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "decoder.timeout_secs must be greater than 0".to_string(),
            });
        }

        let url = self.decoder.base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::ConfigValidation {
                message: format!("decoder.base_url must be an http(s) URL: {url}"),
            });
        }

        if self.inventory.currency.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "inventory.currency cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.decoder.base_url, DEFAULT_DECODER_URL);
        assert_eq!(config.decoder.timeout_secs, 10);
        assert!(config.decoder.user_agent.starts_with("vinlot/"));
        assert!(config.inventory.require_valid_vin);
        assert_eq!(config.inventory.currency, "USD");
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.decoder.timeout_secs = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("timeout_secs"));
    }

    #[test]
    fn test_validate_bad_url() {
        let mut config = Config::default();
        config.decoder.base_url = "ftp://example.com".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("base_url"));
    }

    #[test]
    fn test_validate_empty_currency() {
        let mut config = Config::default();
        config.inventory.currency = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("currency"));
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("inventory.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/lot.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/lot.sqlite")
        );
    }

    #[test]
    fn test_decoder_timeout() {
        assert_eq!(DecoderConfig::default().timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("vinlot"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_with_figment_jail() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "vinlot.toml",
                r#"
                [decoder]
                timeout_secs = 3

                [inventory]
                require_valid_vin = false
                currency = "EUR"
                "#,
            )?;

            let config = Config::load_from(Some(PathBuf::from("vinlot.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.decoder.timeout_secs, 3);
            assert_eq!(config.decoder.base_url, DEFAULT_DECODER_URL);
            assert!(!config.inventory.require_valid_vin);
            assert_eq!(config.inventory.currency, "EUR");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("vinlot.toml", "[decoder]\ntimeout_secs = 3\n")?;
            jail.set_env("VINLOT_DECODER__TIMEOUT_SECS", "7");

            let config = Config::load_from(Some(PathBuf::from("vinlot.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.decoder.timeout_secs, 7);
            Ok(())
        });
    }

    #[test]
    fn test_file_sections_are_read_as_keys() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "vinlot.toml",
                r#"
                [storage]
                database_path = "lot.db"

                [decoder]
                base_url = "http://localhost:8080/api"
                "#,
            )?;

            let config = Config::load_from(Some(PathBuf::from("vinlot.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.database_path(), PathBuf::from("lot.db"));
            assert_eq!(config.decoder.base_url, "http://localhost:8080/api");
            assert_eq!(config.decoder.timeout_secs, 10);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("vinlot.toml", "[decoder]\ntimeout_secs = 0\n")?;

            let result = Config::load_from(Some(PathBuf::from("vinlot.toml")));
            assert!(matches!(result, Err(Error::ConfigValidation { .. })));
            Ok(())
        });
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("require_valid_vin"));
        assert!(json.contains("base_url"));
    }
}
