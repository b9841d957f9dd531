//! Module discovery configuration.

use serde::{Deserialize, Serialize};

/// Configuration for walking the source tree and loading Go packages.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum size of a single source file in bytes. Default: 10 MiB.
    pub max_file_size: Option<u64>,
    /// Worker threads for per-module analysis. 0 = rayon default.
    pub threads: Option<usize>,
    /// Extra gitignore-style patterns to skip.
    #[serde(default)]
    pub extra_ignore: Vec<String>,
    /// Follow symbolic links while walking. Default: false.
    pub follow_symlinks: Option<bool>,
    /// Load `_test.go` files together with the package. Default: false.
    pub include_tests: Option<bool>,
}

impl ScanConfig {
    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(10 * 1024 * 1024)
    }

    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(0)
    }

    pub fn effective_follow_symlinks(&self) -> bool {
        self.follow_symlinks.unwrap_or(false)
    }

    pub fn effective_include_tests(&self) -> bool {
        self.include_tests.unwrap_or(false)
    }
}
