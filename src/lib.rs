//! Turn-rationed pathfinding for grid-based games.
//!
//! Movement is budgeted per discrete turn: each turn grants a distance
//! allowance, and paths are ranked first by turns consumed, then by
//! distance spent within the current turn. On top of that cost model the
//! crate provides:
//!
//! - **A\*** turn-optimal point-to-point search ([`SearchRange::astar_path`])
//! - **Reachability** turn-bounded expansion ([`SearchRange::reachable_points`])
//!
//! Both operate through [`SearchRange`], which owns and reuses all
//! transient search state so that repeated queries incur no allocations
//! after warm-up and so one graph can serve many concurrent ranges.
//! One-shot callers can use [`search`] and [`find_reachable_points`]
//! instead.
//!
//! Movement semantics beyond plain weights come in three flavors, all
//! supplied per search through [`MoveRules`] (or registered on the
//! [`Grid`] for barriers): *stop points* end the turn of whoever enters
//! them, *partial stop points* do the same unless the exit taken is on
//! their allow-list, and *barriers* forbid single directed edges.
//!
//! # Trait hierarchy
//!
//! | Trait | Provides |
//! |---|---|
//! | [`Pather`] | neighbor enumeration |
//! | [`WeightedPather`] : [`Pather`] | edge costs, directed blocks |
//! | [`AstarPather`] : [`WeightedPather`] | heuristic estimate |
//!
//! [`Grid`] implements all three; custom graphs only need to implement
//! the traits.

mod api;
mod astar;
mod distance;
mod geom;
mod grid;
mod queue;
mod reachable;
mod rules;
mod score;
mod searchrange;
mod traits;

pub use api::{find_reachable_points, search};
pub use astar::SearchOptions;
pub use distance::{chebyshev, manhattan, octile};
pub use geom::Point;
pub use grid::{Grid, GridError};
pub use queue::PriorityQueue;
pub use rules::{Barrier, MoveRules, PartialStop};
pub use score::{Allowance, ScoreError, TurnScore, TURN_SCALE};
pub use searchrange::{ReachedNode, SearchError, SearchRange};
