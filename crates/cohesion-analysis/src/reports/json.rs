//! Machine-readable run document.

use cohesion_core::errors::{CohesionErrorCode, PipelineResult};
use serde_json::json;

use crate::pipeline::ModuleReport;

/// One JSON document for a whole run: per-module reports plus collected errors.
pub fn run_document(result: &PipelineResult<Vec<ModuleReport>>) -> serde_json::Value {
    let errors: Vec<serde_json::Value> = result
        .errors
        .iter()
        .map(|e| {
            json!({
                "code": e.error_code(),
                "message": e.to_string(),
            })
        })
        .collect();

    json!({
        "module_count": result.data.len(),
        "modules": result.data,
        "error_count": errors.len(),
        "errors": errors,
    })
}

pub fn to_json_string(result: &PipelineResult<Vec<ModuleReport>>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&run_document(result))
}

#[cfg(test)]
mod tests {
    use cohesion_core::errors::{LoadError, PipelineError};

    use super::*;
    use crate::cohesion::CohesionSummary;
    use crate::pipeline::ModuleOutput;

    #[test]
    fn document_carries_modules_and_coded_errors() {
        let mut result = PipelineResult::new(vec![ModuleReport {
            path: "example.com/m".to_string(),
            name: "m".to_string(),
            syntax_errors: 0,
            output: ModuleOutput::Metrics(CohesionSummary {
                nodes: 1,
                edges: 0,
                connected_components: 1,
                average_degree: Some(0.0),
                density: None,
            }),
        }]);
        result.add_error(PipelineError::from(LoadError::ConflictingPackages {
            dir: "bad".into(),
            first: "a".to_string(),
            second: "b".to_string(),
        }));

        let doc = run_document(&result);
        assert_eq!(doc["module_count"], 1);
        assert_eq!(doc["modules"][0]["path"], "example.com/m");
        assert_eq!(doc["modules"][0]["output"]["type"], "metrics");
        assert_eq!(doc["modules"][0]["output"]["connected_components"], 1);
        assert!(doc["modules"][0]["output"]["density"].is_null());
        assert_eq!(doc["errors"][0]["code"], "PACKAGE_CONFLICT");
    }
}
