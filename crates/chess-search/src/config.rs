//! Search configuration, loadable from TOML.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A field holds a value the searcher cannot use.
    #[error("Invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Named playing strengths, as search depths in plies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Newbie,
    Club,
    Grandmaster,
}

impl Strength {
    pub const fn depth(self) -> u32 {
        match self {
            Strength::Newbie => 2,
            Strength::Club => 8,
            Strength::Grandmaster => 16,
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strength::Newbie => write!(f, "newbie"),
            Strength::Club => write!(f, "club"),
            Strength::Grandmaster => write!(f, "grandmaster"),
        }
    }
}

impl FromStr for Strength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "newbie" => Ok(Strength::Newbie),
            "club" => Ok(Strength::Club),
            "grandmaster" => Ok(Strength::Grandmaster),
            other => Err(format!(
                "unknown strength '{other}': expected newbie, club or grandmaster"
            )),
        }
    }
}

/// Tunables for [`Searcher`](crate::Searcher).
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search depth in plies used when no depth is given explicitly.
    pub depth: u32,
    /// Maximum plies of capture-only extension below the depth limit.
    pub quiescence_limit: u32,
    /// Read and write the transposition cache.
    pub use_cache: bool,
    /// Keep cache entries between `best_move` calls.
    pub persist_cache: bool,
    /// Prune with alpha-beta. When false every node is searched with a
    /// full window.
    pub alpha_beta: bool,
    /// Seed for the move shuffle that precedes ordering. `None` keeps
    /// generation order.
    pub shuffle_seed: Option<u64>,
    /// Centipawns a draw costs the searching side.
    pub contempt: i32,
    /// Occurrences of one position on the current line that score as a draw.
    pub repetition_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: 4,
            quiescence_limit: 16,
            use_cache: true,
            persist_cache: false,
            alpha_beta: true,
            shuffle_seed: Some(0x2024_0600),
            contempt: 0,
            repetition_limit: 3,
        }
    }
}

impl SearchConfig {
    /// Config searching `strength`'s depth, other fields at their defaults.
    pub fn with_strength(strength: Strength) -> Self {
        SearchConfig {
            depth: strength.depth(),
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SearchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::Invalid {
                field: "depth",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.repetition_limit < 2 {
            return Err(ConfigError::Invalid {
                field: "repetition_limit",
                reason: format!("must be at least 2, got {}", self.repetition_limit),
            });
        }
        Ok(())
    }
}
