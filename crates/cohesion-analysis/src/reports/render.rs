//! SVG drawing of a laid-out dependency graph.

use std::path::{Path, PathBuf};
use std::time::Instant;

use cohesion_core::config::GraphConfig;
use cohesion_core::errors::RenderError;
use cohesion_core::tracing::metrics;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::field::Empty;

use super::layout::{eades_layout, EadesParams, Layout, Point};
use crate::cohesion::DependencyGraph;

/// File name of a module's graph image: the import path with `/` replaced.
pub fn graph_file_name(module_path: &str) -> String {
    let stem: String = module_path
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c => c,
        })
        .collect();
    format!("{stem}.svg")
}

/// Lay out `graph` and draw it into `out_dir`. Returns the written path.
pub fn render_graph(
    graph: &DependencyGraph,
    config: &GraphConfig,
    out_dir: &Path,
    module_path: &str,
) -> Result<PathBuf, RenderError> {
    std::fs::create_dir_all(out_dir).map_err(|source| RenderError::OutputDir {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let out_dir = std::fs::canonicalize(out_dir).map_err(|source| RenderError::OutputDir {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let path = out_dir.join(graph_file_name(module_path));

    let span = tracing::info_span!("render_graph", module = %module_path, layout_time_ms = Empty);
    let _entered = span.enter();
    let started = Instant::now();
    let layout = eades_layout(graph, &EadesParams::from(config));
    span.record(metrics::LAYOUT_TIME_MS, started.elapsed().as_millis() as u64);

    draw(graph, &layout, config, &path)?;
    tracing::info!(path = %path.display(), "graph written");
    Ok(path)
}

/// Draw an existing layout to `path`.
pub fn draw(
    graph: &DependencyGraph,
    layout: &Layout,
    config: &GraphConfig,
    path: &Path,
) -> Result<(), RenderError> {
    let failed = |e: &dyn std::fmt::Display| RenderError::Drawing {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let side = config.canvas_pixels();
    let radius = config.effective_node_radius();
    let root = SVGBackend::new(path, (side, side)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| failed(&e))?;

    if let Some((lo, hi)) = layout.bounds() {
        let (x_range, y_range) = (padded(lo.x, hi.x), padded(lo.y, hi.y));
        let mut chart = ChartBuilder::on(&root)
            .margin(radius * 2)
            .build_cartesian_2d(x_range, y_range)
            .map_err(|e| failed(&e))?;

        let at = |p: Point| (p.x, p.y);
        let mut edges = Vec::with_capacity(graph.edge_count());
        for (idx, _) in graph.nodes() {
            let Some(from) = layout.position(idx) else {
                continue;
            };
            for (target, _) in graph.out_edges(idx) {
                if let Some(to) = layout.position(target) {
                    edges.push(PathElement::new(vec![at(from), at(to)], BLACK.stroke_width(1)));
                }
            }
        }
        chart.draw_series(edges).map_err(|e| failed(&e))?;

        let placed: Vec<(Point, &str)> = graph
            .nodes()
            .filter_map(|(idx, node)| Some((layout.position(idx)?, node.symbol.name.as_str())))
            .collect();
        let size = radius as i32;
        chart
            .draw_series(placed.iter().map(|(p, _)| Circle::new(at(*p), size, WHITE.filled())))
            .map_err(|e| failed(&e))?;
        chart
            .draw_series(placed.iter().map(|(p, _)| Circle::new(at(*p), size, BLACK.stroke_width(1))))
            .map_err(|e| failed(&e))?;

        let label = ("sans-serif", config.effective_font_size() as f64)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        chart
            .draw_series(
                placed
                    .iter()
                    .map(|(p, name)| Text::new(name.to_string(), at(*p), label.clone())),
            )
            .map_err(|e| failed(&e))?;
    }

    root.present().map_err(|e| failed(&e))?;
    Ok(())
}

/// Data range with a little room around it; never zero-width.
fn padded(lo: f64, hi: f64) -> std::ops::Range<f64> {
    let width = hi - lo;
    let pad = if width > 0.0 { width * 0.05 } else { 1.0 };
    (lo - pad)..(hi + pad)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::semantics::{DeclScope, Symbol, SymbolKind};

    fn sym(name: &str, offset: u64) -> Arc<Symbol> {
        Arc::new(Symbol {
            package_path: Some("example.com/m".to_string()),
            name: name.to_string(),
            kind: SymbolKind::Func,
            scope: DeclScope::Package,
            position: None,
            offset,
        })
    }

    #[test]
    fn file_name_flattens_import_path() {
        assert_eq!(graph_file_name("example.com/a/b"), "example.com_a_b.svg");
        assert_eq!(graph_file_name("main"), "main.svg");
    }

    #[test]
    fn padded_range_is_never_empty() {
        let r = padded(2.0, 2.0);
        assert!(r.start < r.end);
    }

    #[test]
    fn writes_svg_with_labels() {
        let dir = tempfile::tempdir().unwrap();
        let mut g = DependencyGraph::new();
        g.add_edge(&sym("alpha", 1), &sym("beta", 20));
        g.ensure_node(&sym("gamma", 40));
        let out = dir.path().join("graphs");
        let path = render_graph(&g, &GraphConfig::default(), &out, "example.com/m").unwrap();
        assert!(path.ends_with("example.com_m.svg"));
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("alpha"));
        assert!(svg.contains("gamma"));
    }

    #[test]
    fn empty_graph_still_writes_a_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let path = render_graph(&DependencyGraph::new(), &GraphConfig::default(), dir.path(), "empty")
            .unwrap();
        assert!(path.exists());
    }
}
