//! Presentation of cohesion results: text listings, JSON and SVG images.

pub mod dependencies;
pub mod json;
pub mod layout;
pub mod render;
pub mod summary;

pub use dependencies::{DependencyListing, ListedNode, ListedSymbol};
pub use json::{run_document, to_json_string};
pub use layout::{eades_layout, EadesParams, Layout, Point};
pub use render::{graph_file_name, render_graph};
pub use summary::SummaryText;
