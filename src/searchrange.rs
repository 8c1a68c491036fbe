//! Reusable per-search state.

use thiserror::Error;

use crate::geom::Point;
use crate::grid::Grid;
use crate::queue::PriorityQueue;
use crate::score::{ScoreError, TurnScore};

/// Caller contract violations at the search boundary.
///
/// Unreachable goals are never errors; they come back as empty results.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("point {0} is outside the search range")]
    OutOfRange(Point),
    #[error("missing turn-cost state for {0}; the node does not belong to this search")]
    MissingState(Point),
    #[error(transparent)]
    Score(#[from] ScoreError),
}

/// A cell reached by [`SearchRange::reachable_points`], with the turns
/// consumed and the in-turn distance spent to get there.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReachedNode {
    pub pos: Point,
    pub turns: u32,
    pub cost: f64,
}

/// Sentinel scalar meaning "not reached" in reachability maps.
pub(crate) const UNREACHED: f64 = f64::INFINITY;

// ---------------------------------------------------------------------------
// Internal node state
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) g: Option<TurnScore>,
    pub(crate) parent: usize,
    pub(crate) generation: u32,
    pub(crate) open: bool,
    pub(crate) closed: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: None,
            parent: usize::MAX,
            generation: 0,
            open: false,
            closed: false,
        }
    }
}

// ---------------------------------------------------------------------------
// SearchRange
// ---------------------------------------------------------------------------

/// Central coordinator for searches over a `width × height` grid area.
///
/// `SearchRange` owns all transient search state (node costs, parents,
/// open/closed flags, the priority queue, scratch buffers) so that
/// repeated queries reuse allocations, and so that no per-search state
/// lives in the graph itself: one graph can serve any number of
/// `SearchRange`s, each used by one search at a time.
///
/// Node state is invalidated lazily by bumping a generation counter at
/// the start of every search.
pub struct SearchRange {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) nodes: Vec<Node>,
    pub(crate) generation: u32,
    pub(crate) queue: PriorityQueue<usize>,
    pub(crate) reach_results: Vec<ReachedNode>,
    pub(crate) reach_map: Vec<f64>,
    // shared scratch buffer for neighbor queries
    pub(crate) nbuf: Vec<Point>,
}

impl SearchRange {
    /// Create a `SearchRange` covering `(0, 0)` to
    /// `(width - 1, height - 1)`.
    pub fn new(width: usize, height: usize) -> Self {
        let len = width * height;
        Self {
            width,
            height,
            nodes: vec![Node::default(); len],
            generation: 0,
            queue: PriorityQueue::new(),
            reach_results: Vec::new(),
            reach_map: vec![UNREACHED; len],
            nbuf: Vec::with_capacity(8),
        }
    }

    /// A `SearchRange` sized to the given grid.
    pub fn for_grid(grid: &Grid) -> Self {
        Self::new(grid.width(), grid.height())
    }

    /// Extent along x.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Extent along y.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Begin a new search: bump the generation (lazily invalidating all
    /// node state) and clear the queue.
    pub(crate) fn begin(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        self.queue.clear();
        self.generation
    }

    /// Convert a `Point` to a flat index. `None` if out of range.
    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        if p.x < 0 || p.y < 0 {
            return None;
        }
        let (x, y) = (p.x as usize, p.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(x * self.height + y)
    }

    /// Convert a flat index back to a `Point`.
    #[inline]
    pub(crate) fn point(&self, idx: usize) -> Point {
        Point::new((idx / self.height) as i32, (idx % self.height) as i32)
    }

    /// Trace parents back from `end`, returning the path excluding the
    /// start cell. Empty when `end` is the start itself.
    pub(crate) fn build_path(&self, end: usize, start: usize) -> Vec<Point> {
        let mut path = Vec::new();
        let mut ci = end;
        while ci != start && ci != usize::MAX {
            path.push(self.point(ci));
            ci = self.nodes[ci].parent;
        }
        path.reverse();
        path
    }
}
