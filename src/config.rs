//! Engine configuration.
//!
//! The configuration is process-wide and immutable once installed: call
//! [`init`](crate::init) before constructing temporal values, or rely on the
//! defaults, which are installed lazily on first use.

use crate::error::{Result, TemporaError};
use once_cell::sync::OnceCell;
use serde::de::Error;
use std::path::Path;

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Engine settings
///
/// # Example
///
/// ```rust
/// use tempora::Config;
///
/// let config = Config::from_json(r#"{ "epsilon": 1e-9, "normalize": false }"#).unwrap();
/// assert_eq!(config.epsilon, 1e-9);
/// assert!(!config.normalize);
/// assert_eq!(config.max_instants, None);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Tolerance used when testing collinearity and locating segment crossings
    #[serde(default = "Config::default_epsilon")]
    pub epsilon: f64,

    /// Whether constructors remove redundant instants unless told otherwise
    #[serde(default = "Config::default_normalize")]
    pub normalize: bool,

    /// Upper bound on the number of instants a single constructor accepts
    #[serde(default)]
    pub max_instants: Option<usize>,
}

impl Config {
    const fn default_epsilon() -> f64 {
        1.0e-5
    }

    const fn default_normalize() -> bool {
        true
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        assert!(
            epsilon.is_finite() && epsilon > 0.0,
            "Epsilon must be a positive finite number"
        );
        self.epsilon = epsilon;
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_max_instants(mut self, max_instants: usize) -> Self {
        assert!(max_instants > 0, "Max instants must be greater than zero");

        if max_instants > 10_000_000 {
            log::warn!(
                "Max instants of {} is very large; a single sequence of that size \
                is copied in full by every lifted operation.",
                max_instants
            );
        }

        self.max_instants = Some(max_instants);
        self
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(format!(
                "Epsilon must be a positive finite number, got: {}",
                self.epsilon
            ));
        }

        if let Some(max) = self.max_instants
            && max == 0
        {
            return Err("Max instants must be greater than zero".to_string());
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load a configuration file. Files ending in `.toml` need the `toml` feature,
    /// everything else is read as JSON.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            TemporaError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;

        if path.extension().is_some_and(|ext| ext == "toml") {
            #[cfg(feature = "toml")]
            {
                return Self::from_toml(&contents).map_err(|e| TemporaError::Config(e.to_string()));
            }
            #[cfg(not(feature = "toml"))]
            {
                return Err(TemporaError::Config(
                    "TOML configuration requires the `toml` feature".to_string(),
                ));
            }
        }

        Ok(Self::from_json(&contents)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            epsilon: Self::default_epsilon(),
            normalize: Self::default_normalize(),
            max_instants: None,
        }
    }
}

/// Install the process-wide configuration.
///
/// Fails if the configuration is invalid or if one is already in place,
/// including the default one installed by an earlier read.
pub fn install(config: Config) -> Result<()> {
    config.validate().map_err(TemporaError::Config)?;
    CONFIG.set(config).map_err(|_| {
        log::warn!("Configuration already installed, keeping the existing one");
        TemporaError::Config("configuration is already installed".to_string())
    })
}

/// The active configuration.
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}
