use crate::geom::Point;

/// Minimal pathfinding interface providing neighbor enumeration.
pub trait Pather {
    /// Append the enterable neighbors of `p` into `buf`, in scan order.
    /// The caller clears `buf` before calling.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);
}

/// Pather with weighted (positive-cost) edges and optional directed
/// edge prohibitions.
pub trait WeightedPather: Pather {
    /// Cost of entering adjacent `to` from `from`. Must be > 0.
    fn cost(&self, from: Point, to: Point) -> f64;

    /// Whether the directed edge `from -> to` is barred regardless of
    /// cost. Checked before any cost computation.
    fn is_blocked(&self, _from: Point, _to: Point) -> bool {
        false
    }
}

/// Full A* pather with an admissible heuristic.
pub trait AstarPather: WeightedPather {
    /// Heuristic estimate of the distance from `from` to `to`.
    /// Must never overestimate the true cost (admissible).
    fn estimate(&self, from: Point, to: Point) -> f64;
}
