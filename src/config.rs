//! Configuration management for minichain

use crate::error::{ChainError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Number of leading `'0'` hex characters a mined block hash must carry.
pub const DEFAULT_DIFFICULTY: usize = 2;

/// Pending transactions that trigger mining a new block.
pub const DEFAULT_FLUSH_THRESHOLD: usize = 5;

/// A SHA-256 digest has 64 hex characters; anything above is unsatisfiable.
pub const MAX_DIFFICULTY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    #[serde(default = "default_difficulty")]
    pub difficulty: usize,
    #[serde(default = "default_flush_threshold")]
    pub flush_threshold: usize,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
        }
    }
}

impl ChainConfig {
    pub fn new(difficulty: usize, flush_threshold: usize) -> Result<Self> {
        let config = Self {
            difficulty,
            flush_threshold,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document. Missing keys fall back to the defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: ChainConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file. An empty file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config_str = fs::read_to_string(path)?;
        if config_str.trim().is_empty() {
            return Ok(Self::default());
        }
        Self::from_toml_str(&config_str)
    }

    pub fn validate(&self) -> Result<()> {
        if self.flush_threshold == 0 {
            return Err(ChainError::Config(
                "flush_threshold must be at least 1".to_string(),
            ));
        }
        if self.difficulty > MAX_DIFFICULTY {
            return Err(ChainError::Config(format!(
                "difficulty must be at most {}, got {}",
                MAX_DIFFICULTY, self.difficulty
            )));
        }
        Ok(())
    }
}

fn default_difficulty() -> usize {
    DEFAULT_DIFFICULTY
}

fn default_flush_threshold() -> usize {
    DEFAULT_FLUSH_THRESHOLD
}
