pub type Position = (usize, usize);

/// Ordered cell sequence from start to goal, both inclusive.
pub type Path = Vec<Position>;

/// A unit of observable search progress, emitted in the order the engine
/// produces it: a `Visited` event for each expanded node, followed by one
/// `Frontier` event per in-bounds non-wall neighbor of that node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEvent {
    Visited(Position),
    Frontier(Position),
}

/// Goal unreachable is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Path),
    NotFound,
}
