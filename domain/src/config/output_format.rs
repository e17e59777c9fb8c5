//! Output format value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a finished discussion is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Every role turn followed by the final answer
    Full,
    /// Only the synthesized final answer (default)
    #[default]
    Final,
    /// The discussion record and statistics as JSON
    Json,
}

impl FromStr for OutputFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "final" => Ok(Self::Final),
            "json" => Ok(Self::Json),
            other => Err(DomainError::UnknownOutputFormat(other.to_string())),
        }
    }
}
