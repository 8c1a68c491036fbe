//! Per-search movement metadata.
//!
//! Stop points, partial stop points and barriers are supplied per search
//! invocation, so the same graph can be searched under different movement
//! constraints without being mutated between calls.

use std::collections::{HashMap, HashSet};

use crate::geom::Point;

/// A directed edge prohibition: moving from `from` directly into
/// `blocked` is forbidden, independent of cell weight or stop-point
/// status. The reverse edge stays open unless separately barred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Barrier {
    pub from: Point,
    pub blocked: Point,
}

/// A conditional stop point: entering `pos` forces the turn to end unless
/// the next move goes to one of the `allowed_exits` neighbor coordinates,
/// for which the cell behaves like a plain open cell.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartialStop {
    pub pos: Point,
    pub allowed_exits: Vec<Point>,
}

/// Stop points, partial stop points and barriers for one search
/// invocation.
#[derive(Debug, Clone, Default)]
pub struct MoveRules {
    stops: HashSet<Point>,
    partial_stops: HashMap<Point, HashSet<Point>>,
    barriers: HashSet<(Point, Point)>,
}

impl MoveRules {
    /// No stops, no barriers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `p` as an unconditional stop point.
    pub fn add_stop(&mut self, p: Point) {
        self.stops.insert(p);
    }

    /// Mark `p` as a partial stop point exempting the given exit
    /// coordinates.
    pub fn add_partial_stop(&mut self, p: Point, allowed_exits: impl IntoIterator<Item = Point>) {
        self.partial_stops
            .entry(p)
            .or_default()
            .extend(allowed_exits);
    }

    /// Forbid the directed edge `from -> blocked`.
    pub fn add_barrier(&mut self, from: Point, blocked: Point) {
        self.barriers.insert((from, blocked));
    }

    /// Whether `p` is an unconditional stop point.
    pub fn is_stop(&self, p: Point) -> bool {
        self.stops.contains(&p)
    }

    /// Whether leaving `from` toward `to` forces the remainder of the
    /// current turn to be spent first.
    pub fn stop_binds(&self, from: Point, to: Point) -> bool {
        if self.stops.contains(&from) {
            return true;
        }
        match self.partial_stops.get(&from) {
            Some(allowed) => !allowed.contains(&to),
            None => false,
        }
    }

    /// Whether the directed edge `from -> to` is barred for this search.
    pub fn is_barred(&self, from: Point, to: Point) -> bool {
        self.barriers.contains(&(from, to))
    }
}
