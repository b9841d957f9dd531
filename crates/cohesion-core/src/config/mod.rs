//! Configuration system for cohesion.
//! TOML-based, layered resolution: CLI > env > project file > defaults.

pub mod cohesion_config;
pub mod format_config;
pub mod graph_config;
pub mod scan_config;

pub use cohesion_config::{CliOverrides, CohesionConfig, PROJECT_CONFIG_FILE};
pub use format_config::FormatConfig;
pub use graph_config::GraphConfig;
pub use scan_config::ScanConfig;
