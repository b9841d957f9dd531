//! Syntax listing configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FormatConfig {
    /// Indentation added per tree depth. Default: two spaces.
    pub indent: Option<String>,
}

impl FormatConfig {
    pub fn effective_indent(&self) -> &str {
        self.indent.as_deref().unwrap_or("  ")
    }
}
