use super::{construct_path, manhattan_distance, SearchNode};
use crate::common::{Position, SearchOutcome, StageEvent};
use crate::error::SearchError;
use crate::grid::{Cell, Grid};
use crate::stat::Stats;

use std::collections::{HashSet, VecDeque};
use tracing::{debug, trace};

/// A* over a grid snapshot, exposed as a lazy iterator of [`StageEvent`]s.
///
/// The iterator performs one expansion step at a time, so intermediate grid
/// states applied by the animation driver always correspond to completed
/// steps. Events are emitted exactly once; the final [`SearchOutcome`] is
/// available once the iterator is drained.
pub struct AstarSearch {
    grid: Grid,
    goal: Position,
    // Per-run node arena; open holds arena indices in insertion order.
    nodes: Vec<SearchNode>,
    open: Vec<usize>,
    closed: HashSet<Position>,
    pending: VecDeque<StageEvent>,
    outcome: Option<SearchOutcome>,
    stats: Stats,
}

impl AstarSearch {
    /// Fails with `MissingEndpoint` unless the snapshot holds both a `Start`
    /// and a `Goal` marker. No events are emitted on failure.
    pub fn new(grid: Grid) -> Result<Self, SearchError> {
        let start = grid
            .find_marker(Cell::Start)
            .ok_or(SearchError::MissingEndpoint("start"))?;
        let goal = grid
            .find_marker(Cell::Goal)
            .ok_or(SearchError::MissingEndpoint("goal"))?;
        Ok(Self::with_endpoints(grid, start, goal))
    }

    pub fn with_endpoints(grid: Grid, start: Position, goal: Position) -> Self {
        debug!("search start {start:?} goal {goal:?}");
        let h = manhattan_distance(start, goal);
        AstarSearch {
            grid,
            goal,
            nodes: vec![SearchNode {
                position: start,
                g: 0,
                h,
                f: h,
                parent: None,
            }],
            open: vec![0],
            closed: HashSet::new(),
            pending: VecDeque::new(),
            outcome: None,
            stats: Stats::default(),
        }
    }

    /// `None` until the event iterator has been drained.
    pub fn outcome(&self) -> Option<&SearchOutcome> {
        self.outcome.as_ref()
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Drains any remaining events and returns the final outcome.
    pub fn into_outcome(mut self) -> SearchOutcome {
        while self.next().is_some() {}
        self.outcome.unwrap_or(SearchOutcome::NotFound)
    }

    /// One expansion step: select the best open node, emit its `Visited`
    /// event, then emit a `Frontier` event per open neighbor while relaxing
    /// them into the open list.
    fn step(&mut self) {
        if self.open.is_empty() {
            debug!("open list exhausted without reaching the goal");
            self.outcome = Some(SearchOutcome::NotFound);
            return;
        }

        // Stable ascending sort on f, then pop the front: equal-f nodes keep
        // their insertion order. No secondary key.
        let nodes = &self.nodes;
        self.open.sort_by_key(|&idx| nodes[idx].f);
        let current = self.open.remove(0);
        let position = self.nodes[current].position;
        trace!("expand node: {position:?} f={}", self.nodes[current].f);

        self.pending.push_back(StageEvent::Visited(position));
        self.closed.insert(position);
        self.stats.expanded_nodes += 1;

        if position == self.goal {
            let path = construct_path(&self.nodes, current);
            debug!("goal reached, path length {}", path.len());
            self.outcome = Some(SearchOutcome::Found(path));
            return;
        }

        let tentative_g = self.nodes[current].g + 1;
        for neighbor in self.grid.open_neighbors(position) {
            // The frontier event is purely visual and fires before the
            // closed check, even for already-expanded neighbors.
            self.pending.push_back(StageEvent::Frontier(neighbor));

            if self.closed.contains(&neighbor) {
                continue;
            }

            let h = manhattan_distance(neighbor, self.goal);
            let existing = self
                .open
                .iter()
                .find(|&&idx| self.nodes[idx].position == neighbor)
                .copied();
            match existing {
                None => {
                    self.nodes.push(SearchNode {
                        position: neighbor,
                        g: tentative_g,
                        h,
                        f: tentative_g + h,
                        parent: Some(current),
                    });
                    self.open.push(self.nodes.len() - 1);
                    self.stats.discovered_nodes += 1;
                }
                Some(idx) if tentative_g < self.nodes[idx].g => {
                    // Decrease-key in place.
                    let node = &mut self.nodes[idx];
                    node.g = tentative_g;
                    node.h = h;
                    node.f = tentative_g + h;
                    node.parent = Some(current);
                }
                Some(_) => {}
            }
        }
    }
}

impl Iterator for AstarSearch {
    type Item = StageEvent;

    fn next(&mut self) -> Option<StageEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            if self.outcome.is_some() {
                return None;
            }
            self.step();
        }
    }
}
