//! One-shot convenience entry points.
//!
//! These wrap [`SearchRange`] for callers that run a single query and do
//! not want to manage reusable search state themselves. Repeated queries
//! over the same grid are cheaper through a long-lived `SearchRange`.

use crate::astar::SearchOptions;
use crate::geom::Point;
use crate::grid::Grid;
use crate::rules::{Barrier, MoveRules, PartialStop};
use crate::score::Allowance;
use crate::searchrange::{SearchError, SearchRange};

fn assemble_rules(
    stop_points: &[Point],
    barriers: &[Barrier],
    partial_stops: &[PartialStop],
) -> MoveRules {
    let mut rules = MoveRules::new();
    for &p in stop_points {
        rules.add_stop(p);
    }
    for b in barriers {
        rules.add_barrier(b.from, b.blocked);
    }
    for ps in partial_stops {
        rules.add_partial_stop(ps.pos, ps.allowed_exits.iter().copied());
    }
    rules
}

/// Find the turn-optimal path from `start` to `goal`.
///
/// The path excludes `start` and ends at `goal`; an empty path means the
/// goal is unreachable. See [`SearchRange::astar_path`].
#[allow(clippy::too_many_arguments)]
pub fn search(
    graph: &Grid,
    start: Point,
    goal: Point,
    allowance: &Allowance,
    stop_points: &[Point],
    barriers: &[Barrier],
    partial_stops: &[PartialStop],
    options: &SearchOptions,
) -> Result<Vec<Point>, SearchError> {
    let rules = assemble_rules(stop_points, barriers, partial_stops);
    SearchRange::for_grid(graph).astar_path(graph, start, goal, allowance, &rules, options)
}

/// Collect every cell reachable from `start` within `turns` turns.
///
/// The result excludes `start`. See [`SearchRange::reachable_points`].
pub fn find_reachable_points(
    graph: &Grid,
    start: Point,
    allowance: &Allowance,
    stop_points: &[Point],
    turns: u32,
    barriers: &[Barrier],
    partial_stops: &[PartialStop],
) -> Result<Vec<Point>, SearchError> {
    let rules = assemble_rules(stop_points, barriers, partial_stops);
    let mut range = SearchRange::for_grid(graph);
    let reached = range.reachable_points(graph, start, allowance, turns, &rules)?;
    Ok(reached.iter().map(|n| n.pos).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn grid(weights: &[&[f64]]) -> Grid {
        let rows: Vec<Vec<f64>> = weights.iter().map(|r| r.to_vec()).collect();
        Grid::new(&rows, false).unwrap()
    }

    fn pts(coords: &[(i32, i32)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn uniform_two_by_two() {
        let g = grid(&[&[1.0, 1.0], &[1.0, 1.0]]);
        let path = search(
            &g,
            Point::new(0, 0),
            Point::new(1, 0),
            &Allowance::unlimited(),
            &[],
            &[],
            &[],
            &SearchOptions::default(),
        )
        .unwrap();
        assert_eq!(path, pts(&[(1, 0)]));
    }

    #[test]
    fn path_threads_between_walls() {
        let g = grid(&[
            &[1.0, 1.0, 1.0, 1.0],
            &[0.0, 1.0, 1.0, 0.0],
            &[0.0, 0.0, 1.0, 1.0],
        ]);
        let path = search(
            &g,
            Point::new(0, 0),
            Point::new(2, 3),
            &Allowance::unlimited(),
            &[],
            &[],
            &[],
            &SearchOptions::default(),
        )
        .unwrap();
        assert_eq!(path, pts(&[(0, 1), (1, 1), (1, 2), (2, 2), (2, 3)]));
    }

    #[test]
    fn stop_point_is_avoided_when_movement_allows() {
        let g = grid(&[&[1.0, 1.0, 0.0], &[1.0, 1.0, 0.0], &[0.0, 1.0, 1.0]]);
        let path = search(
            &g,
            Point::new(0, 0),
            Point::new(2, 2),
            &Allowance::flat(2.0).unwrap(),
            &pts(&[(1, 0)]),
            &[],
            &[],
            &SearchOptions::default(),
        )
        .unwrap();
        assert_eq!(path, pts(&[(0, 1), (1, 1), (2, 1), (2, 2)]));
    }

    #[test]
    fn barrier_forces_the_detour() {
        let g = grid(&[&[0.0, 3.0, 3.0], &[1.0, 0.0, 3.0], &[1.0, 1.0, 1.0]]);
        let barriers = [Barrier {
            from: Point::new(0, 0),
            blocked: Point::new(1, 0),
        }];
        let path = search(
            &g,
            Point::new(0, 0),
            Point::new(2, 2),
            &Allowance::flat(10.0).unwrap(),
            &[],
            &barriers,
            &[],
            &SearchOptions::default(),
        )
        .unwrap();
        assert_eq!(path, pts(&[(0, 1), (0, 2), (1, 2), (2, 2)]));
    }

    #[test]
    fn reachable_cells_within_one_turn() {
        let g = grid(&[&[0.0, 1.0], &[4.0, 1.0], &[2.0, 1.0]]);
        let cells = find_reachable_points(
            &g,
            Point::new(0, 0),
            &Allowance::flat(5.0).unwrap(),
            &[],
            1,
            &[],
            &[],
        )
        .unwrap();
        let set: HashSet<Point> = cells.into_iter().collect();
        let expected: HashSet<Point> =
            pts(&[(0, 1), (1, 0), (1, 1), (2, 0), (2, 1)]).into_iter().collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn closest_returns_empty_when_start_is_nearest() {
        let g = grid(&[
            &[1.0, 0.0, 1.0, 1.0],
            &[0.0, 1.0, 1.0, 0.0],
            &[0.0, 0.0, 1.0, 1.0],
        ]);
        let path = search(
            &g,
            Point::new(0, 0),
            Point::new(2, 1),
            &Allowance::unlimited(),
            &[],
            &[],
            &[],
            &SearchOptions {
                closest: true,
                heuristic: None,
            },
        )
        .unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn partial_stop_input_carries_exit_coordinates() {
        let g = grid(&[&[1.0], &[1.0], &[1.0], &[1.0]]);
        let partial = [PartialStop {
            pos: Point::new(1, 0),
            allowed_exits: vec![Point::new(2, 0)],
        }];
        let cells = find_reachable_points(
            &g,
            Point::new(0, 0),
            &Allowance::flat(2.0).unwrap(),
            &[],
            1,
            &[],
            &partial,
        )
        .unwrap();
        let set: HashSet<Point> = cells.into_iter().collect();
        assert_eq!(set, pts(&[(1, 0), (2, 0)]).into_iter().collect());
    }
}
