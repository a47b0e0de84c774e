use crate::models::{OverallWeights, PreferenceWeights, ScoringWeights};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    /// JSON array of listings served by the ranking endpoints
    #[serde(default = "default_catalog_path")]
    pub path: String,
    /// Optional TOML file replacing the built-in lookup tables
    pub tables_path: Option<String>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            tables_path: None,
        }
    }
}

fn default_catalog_path() -> String { "data/listings.json".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_limit() -> usize { crate::core::DEFAULT_MATCH_LIMIT }
fn default_max_limit() -> usize { 100 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_distance_weight")]
    pub distance: f64,
    #[serde(default = "default_price_weight")]
    pub price: f64,
    #[serde(default = "default_housing_type_weight")]
    pub housing_type: f64,
    #[serde(default = "default_amenity_weight")]
    pub amenity: f64,
    #[serde(default = "default_preference_weight")]
    pub preference: f64,
    #[serde(default = "default_trust_weight")]
    pub trust: f64,
    #[serde(default = "default_price_competitiveness_weight")]
    pub price_competitiveness: f64,
    #[serde(default = "default_distance_bonus_weight")]
    pub distance_bonus: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            distance: default_distance_weight(),
            price: default_price_weight(),
            housing_type: default_housing_type_weight(),
            amenity: default_amenity_weight(),
            preference: default_preference_weight(),
            trust: default_trust_weight(),
            price_competitiveness: default_price_competitiveness_weight(),
            distance_bonus: default_distance_bonus_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        ScoringWeights {
            preference: PreferenceWeights {
                distance: config.distance,
                price: config.price,
                housing_type: config.housing_type,
                amenity: config.amenity,
            },
            overall: OverallWeights {
                preference: config.preference,
                trust: config.trust,
                price_competitiveness: config.price_competitiveness,
                distance_bonus: config.distance_bonus,
            },
        }
    }
}

fn default_distance_weight() -> f64 { 0.35 }
fn default_price_weight() -> f64 { 0.30 }
fn default_housing_type_weight() -> f64 { 0.20 }
fn default_amenity_weight() -> f64 { 0.15 }
fn default_preference_weight() -> f64 { 0.4 }
fn default_trust_weight() -> f64 { 0.3 }
fn default_price_competitiveness_weight() -> f64 { 0.2 }
fn default_distance_bonus_weight() -> f64 { 0.1 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_entries")]
    pub max_entries: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl_secs: default_cache_ttl(),
            max_entries: default_cache_entries(),
        }
    }
}

fn default_cache_enabled() -> bool { true }
fn default_cache_ttl() -> u64 { 300 }
fn default_cache_entries() -> u64 { 1000 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with RENTAL__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., RENTAL__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("RENTAL")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = ScoringWeights::from(&WeightsConfig::default());
        assert_eq!(weights, ScoringWeights::default());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings = Config::builder()
            .add_source(config::File::from_str(
                r#"
                [server]
                port = 9000

                [scoring.weights]
                trust = 0.25
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.matching.default_limit, 5);
        assert_eq!(settings.catalog.path, "data/listings.json");
        assert_eq!(settings.scoring.weights.trust, 0.25);
        assert_eq!(settings.scoring.weights.distance, 0.35);
        assert!(settings.cache.enabled);
    }
}
