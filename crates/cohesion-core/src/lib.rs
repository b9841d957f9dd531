//! cohesion-core: foundation shared by the analysis engine and the CLI.
//!
//! - `errors`: one `thiserror` enum per subsystem plus error codes
//! - `config`: TOML configuration with layered resolution
//! - `tracing`: subscriber setup and span field names
//! - `traits`: cooperative cancellation
//! - `types`: collection aliases

pub mod config;
pub mod errors;
pub mod tracing;
pub mod traits;
pub mod types;

pub use config::CohesionConfig;
pub use errors::{CohesionErrorCode, PipelineError, PipelineResult};
pub use traits::{Cancellable, CancellationToken};
