use std::fs;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_SWAP_STEPS, MAX_TICK_SPACING, MIN_TICK_SPACING};
use crate::error::{EngineError, EngineResult};

/// Engine configuration loaded from a TOML file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Smallest tick spacing a pool may be initialized with
    pub min_tick_spacing: i32,

    /// Largest tick spacing a pool may be initialized with
    pub max_tick_spacing: i32,

    /// Curve steps allowed per swap execution (base and shadow count separately)
    pub max_swap_steps: u16,

    /// Default tracing filter when RUST_LOG is unset
    pub log_filter: String,
}

impl EngineConfig {
    /// Load configuration from TOML file
    pub fn load(path: &str) -> EngineResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            EngineError::invalid_config("path", format!("failed to read {}: {}", path, e))
        })?;

        let config = Self::from_toml(&content)?;
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(content: &str) -> EngineResult<Self> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| EngineError::invalid_config("toml", e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: &str) -> EngineResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| EngineError::invalid_config("toml", e.to_string()))?;
        fs::write(path, content).map_err(|e| {
            EngineError::invalid_config("path", format!("failed to write {}: {}", path, e))
        })?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> EngineResult<()> {
        if self.min_tick_spacing < MIN_TICK_SPACING {
            return Err(EngineError::invalid_config(
                "min_tick_spacing",
                format!("must be at least {}", MIN_TICK_SPACING),
            ));
        }

        if self.max_tick_spacing > MAX_TICK_SPACING {
            return Err(EngineError::invalid_config(
                "max_tick_spacing",
                format!("must be at most {}", MAX_TICK_SPACING),
            ));
        }

        if self.min_tick_spacing > self.max_tick_spacing {
            return Err(EngineError::invalid_config(
                "min_tick_spacing",
                format!("greater than max_tick_spacing ({})", self.max_tick_spacing),
            ));
        }

        if self.max_swap_steps == 0 {
            return Err(EngineError::invalid_config(
                "max_swap_steps",
                "must be greater than 0",
            ));
        }

        if self.log_filter.trim().is_empty() {
            return Err(EngineError::invalid_config(
                "log_filter",
                "must be a non-empty filter directive",
            ));
        }

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_tick_spacing: MIN_TICK_SPACING,
            max_tick_spacing: MAX_TICK_SPACING,
            max_swap_steps: DEFAULT_MAX_SWAP_STEPS,
            log_filter: "info".to_string(),
        }
    }
}

/// Install a global tracing subscriber honoring RUST_LOG, falling back to the
/// configured filter. Returns false if a subscriber was already installed.
pub fn init_tracing(config: &EngineConfig) -> bool {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
