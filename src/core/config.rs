//! Decision engine configuration with documented constants
//!
//! Every tunable the engine consults is collected here. Defaults are the
//! values the stock scripts were written against; a TOML file may override
//! any section.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{AiError, Result};
use crate::core::types::AiFlags;

/// Limits and scores used while running a decision pass
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum nesting of `call` instructions within one module
    ///
    /// Pushing past this depth is a fatal script fault. Must cover the
    /// deepest legitimate script.
    pub call_stack_depth: usize,

    /// Score pre-seeded into slots flagged by the caller's preset mask
    pub preset_score: i32,

    /// Best score an ally target needs before it is considered at all
    ///
    /// Below this, the ally is demoted to the "no score" sentinel so the
    /// AI only targets its partner when a script rated that deliberately.
    pub ally_score_threshold: i32,

    /// Spread of the per-slot simulated damage roll
    ///
    /// Each slot gets `100 - random % spread` at setup.
    pub simulated_roll_spread: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            call_stack_depth: 8,
            preset_score: 100,
            ally_score_threshold: 100,
            simulated_roll_spread: 16,
        }
    }
}

/// Module sets selected by battle-mode presets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModulePresets {
    pub safari: AiFlags,
    pub roaming: AiFlags,
    pub first_battle: AiFlags,
    /// Used for frontier, e-reader, trainer hill and secret base battles
    pub frontier: AiFlags,
    /// OR-ed in for every double battle
    pub double_battle: AiFlags,
    /// Replaces whatever the battle mode selected (debug battles)
    pub debug_override: Option<AiFlags>,
}

impl Default for ModulePresets {
    fn default() -> Self {
        Self {
            safari: AiFlags::SAFARI,
            roaming: AiFlags::ROAMING,
            first_battle: AiFlags::FIRST_BATTLE,
            frontier: AiFlags::CHECK_BAD_MOVE | AiFlags::CHECK_VIABILITY | AiFlags::TRY_TO_FAINT,
            double_battle: AiFlags::DOUBLE_BATTLE,
            debug_override: None,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub modules: ModulePresets,
}

impl AiConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AiConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!("Loaded AI config from {:?}", path);
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.engine.call_stack_depth == 0 {
            return Err(AiError::Config("call_stack_depth must be at least 1".into()));
        }

        if self.engine.simulated_roll_spread == 0 || self.engine.simulated_roll_spread > 100 {
            return Err(AiError::Config(format!(
                "simulated_roll_spread ({}) must be within 1..=100",
                self.engine.simulated_roll_spread
            )));
        }

        if self.engine.preset_score < 0 || self.engine.ally_score_threshold < 0 {
            return Err(AiError::Config("scores must not be negative".into()));
        }

        Ok(())
    }
}
