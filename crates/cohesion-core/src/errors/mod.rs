//! Error handling for cohesion.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod load_error;
pub mod metric_error;
pub mod pipeline_error;
pub mod render_error;

pub use config_error::ConfigError;
pub use error_code::CohesionErrorCode;
pub use load_error::LoadError;
pub use metric_error::MetricError;
pub use pipeline_error::{PipelineError, PipelineResult};
pub use render_error::RenderError;
