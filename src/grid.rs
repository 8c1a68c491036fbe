//! Dense weighted grid graph.

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

use crate::distance::{manhattan, octile};
use crate::geom::Point;
use crate::traits::{AstarPather, Pather, WeightedPather};

/// Rejected grid construction parameters.
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("weight grid must not be empty")]
    Empty,
    #[error("weight rows must all have the same length: row {row} has {got}, expected {expected}")]
    Ragged {
        row: usize,
        got: usize,
        expected: usize,
    },
    #[error("weight at ({x}, {y}) must be finite and non-negative, got {weight}")]
    InvalidWeight { x: usize, y: usize, weight: f64 },
}

/// Neighbor scan order: west, east, south, north.
const CARDINAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
/// Then southwest, southeast, northwest, northeast.
const DIAGONAL: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// A rectangular movement graph with per-cell traversal weights.
///
/// A weight of `0` marks an impassable wall; any positive weight is the
/// cost of entering the cell, independent of the direction of entry. The
/// outer index of the weight table is `x`, so `weights[x][y]` is the
/// weight of cell `(x, y)`.
///
/// Directed barriers registered with [`add_barrier`](Self::add_barrier)
/// forbid specific edge traversals regardless of weight. They are not
/// transitive and not automatically bidirectional.
#[derive(Debug)]
pub struct Grid {
    weights: Vec<f64>,
    width: usize,
    height: usize,
    diagonal: bool,
    barriers: HashSet<(Point, Point)>,
}

impl Grid {
    /// Build a grid from per-cell weights, optionally with 8-way movement.
    pub fn new(weights: &[Vec<f64>], diagonal: bool) -> Result<Self, GridError> {
        if weights.is_empty() || weights[0].is_empty() {
            return Err(GridError::Empty);
        }
        let height = weights[0].len();
        let mut flat = Vec::with_capacity(weights.len() * height);
        for (x, row) in weights.iter().enumerate() {
            if row.len() != height {
                return Err(GridError::Ragged {
                    row: x,
                    got: row.len(),
                    expected: height,
                });
            }
            for (y, &weight) in row.iter().enumerate() {
                if !weight.is_finite() || weight < 0.0 {
                    return Err(GridError::InvalidWeight { x, y, weight });
                }
                flat.push(weight);
            }
        }
        Ok(Self {
            weights: flat,
            width: weights.len(),
            height,
            diagonal,
            barriers: HashSet::new(),
        })
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

    /// Whether 8-way movement is enabled.
    #[inline]
    pub fn diagonal(&self) -> bool {
        self.diagonal
    }

    /// Whether `p` lies within the grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height
    }

    /// Traversal weight of `p`. Out-of-range coordinates read as walls.
    #[inline]
    pub fn weight(&self, p: Point) -> f64 {
        if self.contains(p) {
            self.weights[p.x as usize * self.height + p.y as usize]
        } else {
            0.0
        }
    }

    /// Whether `p` is impassable.
    #[inline]
    pub fn is_wall(&self, p: Point) -> bool {
        self.weight(p) == 0.0
    }

    /// Cost of entering `to` from `from`; direction-independent.
    #[inline]
    pub fn cost_to_enter(&self, to: Point, _from: Point) -> f64 {
        self.weight(to)
    }

    /// Forbid direct traversal of the directed edge `from -> to`.
    pub fn add_barrier(&mut self, from: Point, to: Point) {
        self.barriers.insert((from, to));
    }

    /// Remove all registered barriers.
    pub fn clear_barriers(&mut self) {
        self.barriers.clear();
    }
}

impl Pather for Grid {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        for (dx, dy) in CARDINAL {
            let n = p.shift(dx, dy);
            if self.contains(n) && !self.is_wall(n) {
                buf.push(n);
            }
        }
        if self.diagonal {
            for (dx, dy) in DIAGONAL {
                let n = p.shift(dx, dy);
                if self.contains(n) && !self.is_wall(n) {
                    buf.push(n);
                }
            }
        }
    }
}

impl WeightedPather for Grid {
    fn cost(&self, from: Point, to: Point) -> f64 {
        self.cost_to_enter(to, from)
    }

    fn is_blocked(&self, from: Point, to: Point) -> bool {
        self.barriers.contains(&(from, to))
    }
}

impl AstarPather for Grid {
    fn estimate(&self, from: Point, to: Point) -> f64 {
        if self.diagonal {
            octile(from, to)
        } else {
            manhattan(from, to)
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for x in 0..self.width {
            for y in 0..self.height {
                if y > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self.weights[x * self.height + y])?;
            }
            if x + 1 < self.width {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
