//! Merge Configuration

use serde::{Deserialize, Serialize};

/// Declaration merge options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Expand shorthands in the input blocks before merging
    pub expand_shorthands: bool,

    /// Rebuild shorthands on the merged block
    pub create_shorthands: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            expand_shorthands: true,
            create_shorthands: true,
        }
    }
}

impl Config {
    /// Merge rules property by property, exactly as written
    pub fn literal() -> Self {
        Self {
            expand_shorthands: false,
            create_shorthands: false,
        }
    }
}
