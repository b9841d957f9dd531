use std::fs;
use std::path::Path;

use cohesion_analysis::pipeline::{run, Analysis, ModuleOutput};
use cohesion_analysis::reports::to_json_string;
use cohesion_core::config::{CohesionConfig, ScanConfig};
use cohesion_core::errors::{CohesionErrorCode, PipelineError};
use cohesion_core::traits::{Cancellable, CancellationToken};

const SHOP: &str = r#"package shop

type Cart struct {
	items []string
}

func (c *Cart) Add(item string) {
	c.items = append(c.items, item)
}

func NewCart() *Cart { return &Cart{} }
"#;

const UTIL: &str = "package util\n\nconst Max = 3\n\nvar count int\n";

fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("go.mod"), "module example.com/shop\n").unwrap();
    fs::write(dir.path().join("shop.go"), SHOP).unwrap();
    fs::create_dir_all(dir.path().join("util")).unwrap();
    fs::write(dir.path().join("util").join("util.go"), UTIL).unwrap();
    fs::create_dir_all(dir.path().join("broken")).unwrap();
    fs::write(dir.path().join("broken").join("a.go"), "package a\n").unwrap();
    fs::write(dir.path().join("broken").join("b.go"), "package b\n").unwrap();
    dir
}

fn run_on(root: &Path, analysis: Analysis) -> cohesion_core::errors::PipelineResult<Vec<cohesion_analysis::ModuleReport>> {
    run(root, &CohesionConfig::default(), &analysis, &CancellationToken::new()).unwrap()
}

#[test]
fn metrics_per_module_in_discovery_order() {
    let dir = project();
    let result = run_on(dir.path(), Analysis::Metrics);

    let paths: Vec<&str> = result.data.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["example.com/shop", "example.com/shop/util"]);
    assert_eq!(result.error_count(), 1);
    assert_eq!(result.errors[0].error_code(), "PACKAGE_CONFLICT");

    let ModuleOutput::Metrics(shop) = &result.data[0].output else {
        panic!("expected metrics");
    };
    // Cart, Add, NewCart; Add -> Cart, NewCart -> Cart.
    assert_eq!(shop.nodes, 3);
    assert_eq!(shop.edges, 2);
    assert_eq!(shop.connected_components, 1);

    assert_eq!(
        result.data[1].output.to_string(),
        "Connected components: 2\nAverage degree: 0.000000\nDensity: 0.000000\n"
    );
}

#[test]
fn dependencies_list_positions_and_names() {
    let dir = project();
    let result = run_on(dir.path(), Analysis::Dependencies);
    let text = result.data[0].output.to_string();
    let lines: Vec<&str> = text.lines().collect();

    assert!(lines[0].ends_with("shop.go:3:6 Cart"), "{text}");
    assert!(lines[1].ends_with("shop.go:7:16 Add"), "{text}");
    assert!(lines[2].starts_with('\t'));
    assert!(lines[2].ends_with("shop.go:3:6 Cart"));
    assert!(lines[3].ends_with("shop.go:11:6 NewCart"));
    assert!(lines[4].starts_with('\t'));
    assert_eq!(lines.len(), 5);
}

#[test]
fn stats_count_declarations() {
    let dir = project();
    let result = run_on(dir.path(), Analysis::Stats);
    assert_eq!(
        result.data[0].output.to_string(),
        "Funcs: 2\nTypes: 1\nConsts: 0\nVars: 0\n"
    );
    assert_eq!(
        result.data[1].output.to_string(),
        "Funcs: 0\nTypes: 0\nConsts: 1\nVars: 1\n"
    );
}

#[test]
fn format_uses_configured_indent() {
    let dir = project();
    let mut config = CohesionConfig::default();
    config.format.indent = Some("\t".to_string());
    let result = run(dir.path(), &config, &Analysis::Format, &CancellationToken::new()).unwrap();
    let listing = result.data[1].output.to_string();
    assert!(listing.starts_with("source_file util\n\tpackage_clause \n\t\tpackage_identifier util\n"));
    assert!(listing.contains("\t\tidentifier Max\n"));
}

#[test]
fn graph_writes_one_svg_per_module() {
    let dir = project();
    let out = tempfile::tempdir().unwrap();
    let result = run_on(
        dir.path(),
        Analysis::Graph {
            out_dir: out.path().join("graphs"),
        },
    );
    for report in &result.data {
        let ModuleOutput::Graph { path } = &report.output else {
            panic!("expected graph output");
        };
        assert!(path.exists(), "{} missing", path.display());
        assert!(path.is_absolute());
    }
    assert!(out.path().join("graphs").join("example.com_shop_util.svg").exists());
}

#[test]
fn json_document_includes_errors() {
    let dir = project();
    let result = run_on(dir.path(), Analysis::Metrics);
    let doc: serde_json::Value = serde_json::from_str(&to_json_string(&result).unwrap()).unwrap();
    assert_eq!(doc["module_count"], 2);
    assert_eq!(doc["modules"][1]["path"], "example.com/shop/util");
    assert_eq!(doc["modules"][1]["output"]["connected_components"], 2);
    assert_eq!(doc["errors"][0]["code"], "PACKAGE_CONFLICT");
}

#[test]
fn cancelled_run_abandons_modules() {
    let dir = project();
    let token = CancellationToken::new();
    token.cancel();
    let result = run(dir.path(), &CohesionConfig::default(), &Analysis::Metrics, &token).unwrap();
    assert!(result.data.is_empty());
    assert_eq!(result.error_count(), 1);
    assert!(matches!(result.errors[0], PipelineError::Cancelled));
}

#[test]
fn explicit_thread_count_keeps_order() {
    let dir = project();
    let config = CohesionConfig {
        scan: ScanConfig {
            threads: Some(2),
            ..Default::default()
        },
        ..Default::default()
    };
    let result = run(dir.path(), &config, &Analysis::Metrics, &CancellationToken::new()).unwrap();
    let paths: Vec<&str> = result.data.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["example.com/shop", "example.com/shop/util"]);
}

#[test]
fn missing_root_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(run(&missing, &CohesionConfig::default(), &Analysis::Metrics, &CancellationToken::new()).is_err());
}
