//! Textual metrics report.

use std::fmt;

use crate::cohesion::CohesionSummary;

/// Three-line metrics text; degenerate values print as `undefined`.
pub struct SummaryText<'a>(pub &'a CohesionSummary);

impl fmt::Display for SummaryText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;
        writeln!(f, "Connected components: {}", summary.connected_components)?;
        writeln!(f, "Average degree: {}", Metric(summary.average_degree))?;
        writeln!(f, "Density: {}", Metric(summary.density))
    }
}

struct Metric(Option<f64>);

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value:.6}"),
            None => f.write_str("undefined"),
        }
    }
}
