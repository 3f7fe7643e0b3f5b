mod astar;

pub use astar::AstarSearch;

use crate::common::{Path, Position};

/// Admissible and consistent for unit-cost orthogonal movement.
pub(crate) fn manhattan_distance(a: Position, b: Position) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

#[derive(Debug, Clone)]
pub(crate) struct SearchNode {
    pub(crate) position: Position,
    pub(crate) g: usize,
    pub(crate) h: usize,
    pub(crate) f: usize,
    // Index into the per-run node arena; reassigned only when a cheaper g
    // is found for the same position.
    pub(crate) parent: Option<usize>,
}

pub(crate) fn construct_path(nodes: &[SearchNode], mut current: usize) -> Path {
    let mut path = vec![nodes[current].position];
    while let Some(parent) = nodes[current].parent {
        path.push(nodes[parent].position);
        current = parent;
    }
    path.reverse();
    path
}
