//! Eades force-directed layout with Barnes-Hut repulsion.
//!
//! Neighbors attract with `2·ln(d)` along the edge, every pair repels with
//! inverse-square gravity approximated over a quadtree. Starting positions
//! come from node identities, so the same graph always lays out the same way.

use std::ops::{Add, AddAssign, Mul, Sub};

use cohesion_core::config::GraphConfig;
use cohesion_core::types::collections::SmallVec2;
use petgraph::graph::NodeIndex;

use crate::cohesion::DependencyGraph;

/// Quadtree depth past which bodies share a leaf.
const MAX_TREE_DEPTH: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, k: f64) -> Point {
        Point::new(self.x * k, self.y * k)
    }
}

/// Fixed parameters of one layout run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EadesParams {
    pub repulsion: f64,
    pub rate: f64,
    pub updates: u32,
    pub theta: f64,
}

impl Default for EadesParams {
    fn default() -> Self {
        Self::from(&GraphConfig::default())
    }
}

impl From<&GraphConfig> for EadesParams {
    fn from(config: &GraphConfig) -> Self {
        Self {
            repulsion: config.effective_repulsion(),
            rate: config.effective_rate(),
            updates: config.effective_updates(),
            theta: config.effective_theta(),
        }
    }
}

/// Node positions indexed by `NodeIndex::index()`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    positions: Vec<Point>,
}

impl Layout {
    pub fn position(&self, node: NodeIndex) -> Option<Point> {
        self.positions.get(node.index()).copied()
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// `(min, max)` corners of the bounding box, `None` when empty.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(lo, hi), p| {
            (
                Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        }))
    }
}

/// Run `params.updates` Eades steps over the graph.
pub fn eades_layout(graph: &DependencyGraph, params: &EadesParams) -> Layout {
    let inner = graph.inner();
    let mut positions: Vec<Point> = graph
        .nodes()
        .map(|(_, node)| initial_position(node.identity))
        .collect();
    if positions.len() < 2 {
        return Layout { positions };
    }

    let neighbors: Vec<Vec<usize>> = inner
        .node_indices()
        .map(|idx| {
            let mut adjacent: Vec<usize> = inner.neighbors_undirected(idx).map(|n| n.index()).collect();
            adjacent.sort_unstable();
            adjacent.dedup();
            adjacent
        })
        .collect();

    for _ in 0..params.updates {
        let tree = QuadTree::build(&positions);
        let mut next = positions.clone();
        for (u, adjacent) in neighbors.iter().enumerate() {
            let here = positions[u];
            let mut force = Point::default();
            for &v in adjacent {
                let d = positions[v] - here;
                let m = d.norm();
                if m == 0.0 {
                    continue;
                }
                force += d * (2.0 * m.ln() / m);
            }
            force += tree.repulsion_on(u, &positions, params.theta) * params.repulsion;

            let moved = here + force * params.rate;
            if moved.is_finite() {
                next[u] = moved;
            }
        }
        positions = next;
    }

    Layout { positions }
}

/// A point in the unit square taken from the identity's two halves.
fn initial_position(identity: u64) -> Point {
    let low = (identity & 0xffff_ffff) as f64 / u32::MAX as f64;
    let high = (identity >> 32) as f64 / u32::MAX as f64;
    Point::new(low, high)
}

struct Cell {
    center: Point,
    half: f64,
    mass: f64,
    weighted: Point,
    bodies: SmallVec2<usize>,
    children: Option<[usize; 4]>,
}

impl Cell {
    fn new(center: Point, half: f64) -> Self {
        Self {
            center,
            half,
            mass: 0.0,
            weighted: Point::default(),
            bodies: SmallVec2::new(),
            children: None,
        }
    }

    fn center_of_mass(&self) -> Point {
        self.weighted * (1.0 / self.mass)
    }

    fn quadrant(&self, p: Point) -> usize {
        usize::from(p.x >= self.center.x) | (usize::from(p.y >= self.center.y) << 1)
    }
}

/// Barnes-Hut quadtree over unit-mass bodies.
struct QuadTree {
    cells: Vec<Cell>,
}

impl QuadTree {
    fn build(points: &[Point]) -> Self {
        let (mut lo, mut hi) = (points[0], points[0]);
        for p in points {
            lo = Point::new(lo.x.min(p.x), lo.y.min(p.y));
            hi = Point::new(hi.x.max(p.x), hi.y.max(p.y));
        }
        let half = ((hi.x - lo.x).max(hi.y - lo.y) / 2.0).max(f64::EPSILON);
        let center = Point::new((lo.x + hi.x) / 2.0, (lo.y + hi.y) / 2.0);

        let mut tree = Self {
            cells: vec![Cell::new(center, half)],
        };
        for i in 0..points.len() {
            tree.insert(0, i, points, 0);
        }
        tree
    }

    fn insert(&mut self, cell: usize, body: usize, points: &[Point], depth: usize) {
        let p = points[body];
        let was_empty = {
            let c = &mut self.cells[cell];
            let empty = c.mass == 0.0;
            c.mass += 1.0;
            c.weighted += p;
            empty
        };

        if self.cells[cell].children.is_none() {
            if was_empty || depth >= MAX_TREE_DEPTH {
                self.cells[cell].bodies.push(body);
                return;
            }
            let children = self.split(cell);
            let resident: SmallVec2<usize> = std::mem::take(&mut self.cells[cell].bodies);
            for other in resident {
                let q = self.cells[cell].quadrant(points[other]);
                self.insert(children[q], other, points, depth + 1);
            }
        }

        if let Some(children) = self.cells[cell].children {
            let q = self.cells[cell].quadrant(p);
            self.insert(children[q], body, points, depth + 1);
        }
    }

    fn split(&mut self, cell: usize) -> [usize; 4] {
        let (center, half) = (self.cells[cell].center, self.cells[cell].half / 2.0);
        let first = self.cells.len();
        for q in 0..4 {
            let dx = if q & 1 == 1 { half } else { -half };
            let dy = if q & 2 == 2 { half } else { -half };
            self.cells
                .push(Cell::new(center + Point::new(dx, dy), half));
        }
        let children = [first, first + 1, first + 2, first + 3];
        self.cells[cell].children = Some(children);
        children
    }

    /// Net push on `body` away from every other body.
    fn repulsion_on(&self, body: usize, points: &[Point], theta: f64) -> Point {
        let here = points[body];
        let mut force = Point::default();
        let mut stack = vec![0usize];
        while let Some(idx) = stack.pop() {
            let cell = &self.cells[idx];
            if cell.mass == 0.0 {
                continue;
            }
            match cell.children {
                None => {
                    for &other in &cell.bodies {
                        if other != body {
                            force += gravity(points[other] - here, 1.0);
                        }
                    }
                }
                Some(children) => {
                    let toward = cell.center_of_mass() - here;
                    let distance = toward.norm();
                    if distance > 0.0 && (2.0 * cell.half) / distance < theta {
                        force += gravity(toward, cell.mass);
                    } else {
                        stack.extend(children);
                    }
                }
            }
        }
        force * -1.0
    }
}

/// Inverse-square pull of `mass` along `v`.
fn gravity(v: Point, mass: f64) -> Point {
    let d2 = v.x * v.x + v.y * v.y;
    if d2 == 0.0 {
        return Point::default();
    }
    v * (mass / (d2 * d2.sqrt()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::semantics::{DeclScope, Symbol, SymbolKind};

    fn sym(name: &str, offset: u64) -> Arc<Symbol> {
        Arc::new(Symbol {
            package_path: Some("m".to_string()),
            name: name.to_string(),
            kind: SymbolKind::Func,
            scope: DeclScope::Package,
            position: None,
            offset,
        })
    }

    fn chain(len: u64) -> DependencyGraph {
        let mut g = DependencyGraph::new();
        for i in 1..len {
            g.add_edge(&sym(&format!("f{}", i - 1), i - 1), &sym(&format!("f{i}"), i));
        }
        g
    }

    #[test]
    fn layout_is_deterministic() {
        let g = chain(6);
        let first = eades_layout(&g, &EadesParams::default());
        let second = eades_layout(&g, &EadesParams::default());
        assert_eq!(first, second);
        assert_eq!(first.positions().len(), 6);
        assert!(first.positions().iter().all(|p| p.is_finite()));
    }

    #[test]
    fn single_node_stays_put() {
        let mut g = DependencyGraph::new();
        let idx = g.ensure_node(&sym("only", 0));
        let layout = eades_layout(&g, &EadesParams::default());
        let node = g.nodes().next().map(|(_, n)| n.identity).unwrap();
        assert_eq!(layout.position(idx), Some(initial_position(node)));
    }

    #[test]
    fn isolated_nodes_push_apart() {
        let mut g = DependencyGraph::new();
        let a = g.ensure_node(&sym("a", 0));
        let b = g.ensure_node(&sym("b", 10));
        let before = initial_position(g.inner()[a].identity) - initial_position(g.inner()[b].identity);
        let layout = eades_layout(&g, &EadesParams::default());
        let after = layout.position(a).unwrap() - layout.position(b).unwrap();
        assert!(after.norm() > before.norm());
    }

    #[test]
    fn quadtree_matches_direct_sum_with_zero_theta() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 2.0),
            Point::new(3.0, 3.0),
        ];
        let tree = QuadTree::build(&points);
        let approx = tree.repulsion_on(0, &points, 0.0);
        let mut direct = Point::default();
        for p in &points[1..] {
            direct += gravity(*p - points[0], 1.0);
        }
        let direct = direct * -1.0;
        assert!((approx.x - direct.x).abs() < 1e-12);
        assert!((approx.y - direct.y).abs() < 1e-12);
    }

    #[test]
    fn coincident_bodies_do_not_recurse_forever() {
        let points = vec![Point::new(0.5, 0.5); 3];
        let tree = QuadTree::build(&points);
        assert_eq!(tree.repulsion_on(1, &points, 0.2), Point::default());
    }
}
