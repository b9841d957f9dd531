//! Structured span field names shared by the loader, analyzer and CLI.

/// Loader: number of modules discovered under the root.
pub const MODULES_DISCOVERED: &str = "modules_discovered";

/// Loader: per-module parse time in microseconds.
pub const PARSE_TIME_US: &str = "parse_time_us";

/// Analyzer: nodes in a finished dependency graph.
pub const GRAPH_NODES: &str = "graph_nodes";

/// Analyzer: edges in a finished dependency graph.
pub const GRAPH_EDGES: &str = "graph_edges";

/// Analyzer: expressions whose resolution failed while building a graph.
pub const RESOLUTION_FAILURES: &str = "resolution_failures";

/// Renderer: layout time in milliseconds.
pub const LAYOUT_TIME_MS: &str = "layout_time_ms";
