use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Which payload a content record currently serves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentMode {
    /// Reads render only the counter line.
    #[default]
    Counter,
    /// Reads render the counter line followed by the stored text.
    Text,
}

impl fmt::Display for ContentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentMode::Counter => f.write_str("counter"),
            ContentMode::Text => f.write_str("text"),
        }
    }
}

/// What a numeric write does to a record that is already in text mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModePolicy {
    /// Text mode is permanent: a numeric write only updates the counter and
    /// the old text keeps being read back.
    #[default]
    Sticky,
    /// A numeric write drops the text and returns the record to counter mode.
    Revert,
}

impl fmt::Display for ModePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModePolicy::Sticky => f.write_str("sticky"),
            ModePolicy::Revert => f.write_str("revert"),
        }
    }
}

impl FromStr for ModePolicy {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sticky" => Ok(ModePolicy::Sticky),
            "revert" => Ok(ModePolicy::Revert),
            other => Err(TypeError::UnknownModePolicy(other.to_string())),
        }
    }
}
