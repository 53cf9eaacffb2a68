//! Layered TOML configuration.
//!
//! Sources, later overriding earlier:
//! 1. Bundled defaults (`castscript.toml`, compiled in)
//! 2. `~/.config/castscript/castscript.toml`
//! 3. `./castscript.toml`
//! 4. An explicit file passed by the caller, if any
//! 5. `CASTSCRIPT__<SECTION>__<KEY>` environment variables

use crate::{RetryPolicy, Tier};
use castscript_error::{CastscriptResult, ConfigError};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../castscript.toml");

/// Model-specific rate limit overrides.
///
/// Only the fields that are set override the tier defaults.
///
/// ```toml
/// [providers.gemini.tiers.free.models."gemini-1.5-pro"]
/// rpm = 2
/// rpd = 50
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct ModelTierConfig {
    /// Requests per minute limit (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpm: Option<u32>,

    /// Tokens per minute limit (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tpm: Option<u64>,

    /// Requests per day limit (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpd: Option<u32>,

    /// Maximum concurrent requests (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<u32>,
}

/// Quotas for one API tier; `None` means unlimited.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TierConfig {
    /// Name of the tier (e.g., "Free", "Pay-as-you-go")
    pub name: String,

    /// Requests per minute limit
    #[serde(default)]
    pub rpm: Option<u32>,

    /// Tokens per minute limit
    #[serde(default)]
    pub tpm: Option<u64>,

    /// Requests per day limit
    #[serde(default)]
    pub rpd: Option<u32>,

    /// Maximum concurrent requests
    #[serde(default)]
    pub max_concurrent: Option<u32>,

    /// Model-specific rate limit overrides
    #[serde(default)]
    pub models: HashMap<String, ModelTierConfig>,
}

impl Tier for TierConfig {
    fn rpm(&self) -> Option<u32> {
        self.rpm
    }

    fn tpm(&self) -> Option<u64> {
        self.tpm
    }

    fn rpd(&self) -> Option<u32> {
        self.rpd
    }

    fn max_concurrent(&self) -> Option<u32> {
        self.max_concurrent
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TierConfig {
    /// The tier with a model's overrides applied.
    ///
    /// Returns a copy of the tier defaults when the model has no overrides.
    pub fn for_model(&self, model_name: &str) -> TierConfig {
        match self.models.get(model_name) {
            Some(overrides) => TierConfig {
                name: self.name.clone(),
                rpm: overrides.rpm.or(self.rpm),
                tpm: overrides.tpm.or(self.tpm),
                rpd: overrides.rpd.or(self.rpd),
                max_concurrent: overrides.max_concurrent.or(self.max_concurrent),
                models: HashMap::new(),
            },
            None => self.clone(),
        }
    }

    /// A tier without any limits.
    pub fn unlimited() -> Self {
        Self {
            name: "Unlimited".to_string(),
            rpm: None,
            tpm: None,
            rpd: None,
            max_concurrent: None,
            models: HashMap::new(),
        }
    }
}

/// Tiers offered by one provider.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Name of the default tier for this provider
    pub default_tier: String,

    /// Map of tier name to tier configuration
    pub tiers: HashMap<String, TierConfig>,
}

/// Generation settings for the Gemini client.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GeminiConfig {
    /// Default model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum output tokens per completion
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Tier name to use instead of the provider default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    4096
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            tier: None,
        }
    }
}

/// Upstream-facing configuration: provider quotas, generation settings and
/// the retry policy.
///
/// Other sections of the same file (`history`, `pipeline`, `server`) are read
/// by the crates that own them.
///
/// # Example
///
/// ```no_run
/// use castscript_rate_limit::CastscriptConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CastscriptConfig::load()?;
/// let tier = config.get_tier("gemini", None).unwrap();
/// println!("Gemini {} tier RPM: {:?}", tier.name, tier.rpm);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct CastscriptConfig {
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Gemini generation settings
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Retry policy for upstream calls
    #[serde(default)]
    pub retry: RetryPolicy,
}

/// Configuration builder with every standard source registered.
///
/// Crates that own other sections of the file deserialize from the same
/// builder so all settings share one precedence order.
pub fn layered_sources(explicit: Option<&Path>) -> ConfigBuilder<DefaultState> {
    let mut builder =
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config/castscript/castscript.toml");
        builder = builder.add_source(File::from(home_config).required(false));
    }

    builder = builder.add_source(File::with_name("castscript").required(false));

    if let Some(path) = explicit {
        builder = builder.add_source(File::from(path));
    }

    builder.add_source(
        Environment::with_prefix("CASTSCRIPT")
            .prefix_separator("__")
            .separator("__"),
    )
}

impl CastscriptConfig {
    /// Load configuration from a single file, without the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> CastscriptResult<Self> {
        debug!("Loading configuration from file");

        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                ))
            })?;

        Ok(config
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?)
    }

    /// Load configuration with the standard precedence (see module docs).
    ///
    /// Missing user files are skipped silently.
    #[instrument]
    pub fn load() -> CastscriptResult<Self> {
        debug!("Loading configuration: env > ./castscript.toml > home dir > bundled defaults");
        Self::load_with(None)
    }

    /// Load with the standard precedence plus an explicit file on top.
    #[instrument(skip(explicit))]
    pub fn load_with(explicit: Option<&Path>) -> CastscriptResult<Self> {
        let config = layered_sources(explicit)
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?;

        Ok(config
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?)
    }

    /// Tier configuration for a provider.
    ///
    /// Uses the provider's default tier when `tier_name` is `None`.
    #[instrument(skip(self))]
    pub fn get_tier(&self, provider: &str, tier_name: Option<&str>) -> Option<TierConfig> {
        let provider_config = self.providers.get(provider)?;

        let tier = tier_name.unwrap_or(&provider_config.default_tier);

        debug!(provider, tier, "Looking up tier configuration");

        provider_config.tiers.get(tier).cloned()
    }
}
