//! CohesionErrorCode trait for the CLI boundary.

/// Every error enum implements this to provide a stable, greppable code
/// that the front end prints next to the message.
pub trait CohesionErrorCode {
    /// Returns the error code string (e.g., "LOAD_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const LOAD_ERROR: &str = "LOAD_ERROR";
pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const PACKAGE_CONFLICT: &str = "PACKAGE_CONFLICT";
pub const ROOT_NOT_FOUND: &str = "ROOT_NOT_FOUND";
pub const DEGENERATE_METRIC: &str = "DEGENERATE_METRIC";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const RENDER_ERROR: &str = "RENDER_ERROR";
pub const CANCELLED: &str = "CANCELLED";
pub const RESOLUTION_FAILURE: &str = "RESOLUTION_FAILURE";
