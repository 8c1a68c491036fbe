//! Turn-bounded reachability expansion.

use std::cmp::Ordering;

use log::{debug, trace};

use crate::geom::Point;
use crate::rules::MoveRules;
use crate::score::{Allowance, TurnScore};
use crate::searchrange::{ReachedNode, SearchError, SearchRange, UNREACHED};
use crate::traits::WeightedPather;

impl SearchRange {
    /// Expand from `from` and collect every cell reachable within `turns`
    /// turns under the allowance schedule.
    ///
    /// The result excludes the start cell and is unordered apart from the
    /// expansion order. Zero turns permit no movement at all. The set is
    /// monotonic in `turns` and in each allowance value.
    pub fn reachable_points<P: WeightedPather>(
        &mut self,
        pather: &P,
        from: Point,
        allowance: &Allowance,
        turns: u32,
        rules: &MoveRules,
    ) -> Result<&[ReachedNode], SearchError> {
        let start_idx = self.idx(from).ok_or(SearchError::OutOfRange(from))?;
        trace!("reachable: from {from} within {turns} turns");

        self.reach_results.clear();
        self.reach_map.fill(UNREACHED);
        if turns == 0 {
            return Ok(&self.reach_results);
        }
        // The last permitted turn may be spent in full.
        let last = turns - 1;
        let bound = TurnScore::from_parts(last, allowance.cap(last), allowance)?;

        let cur_gen = self.begin();
        {
            let node = &mut self.nodes[start_idx];
            node.g = Some(TurnScore::zero(allowance));
            node.parent = usize::MAX;
            node.generation = cur_gen;
            node.open = true;
            node.closed = false;
        }
        self.reach_map[start_idx] = 0.0;

        let mut queue = std::mem::take(&mut self.queue);
        let mut nbuf = std::mem::take(&mut self.nbuf);
        queue.push(start_idx, 0.0);

        while let Some((ci, _)) = queue.pop() {
            if self.nodes[ci].generation != cur_gen || self.nodes[ci].closed {
                continue;
            }
            self.nodes[ci].closed = true;
            self.nodes[ci].open = false;

            let cp = self.point(ci);
            let Some(current_g) = self.nodes[ci].g.clone() else {
                self.queue = queue;
                self.nbuf = nbuf;
                return Err(SearchError::MissingState(cp));
            };
            if ci != start_idx {
                self.reach_map[ci] = current_g.to_scalar();
                self.reach_results.push(ReachedNode {
                    pos: cp,
                    turns: current_g.turns(),
                    cost: current_g.extra(),
                });
            }

            nbuf.clear();
            pather.neighbors(cp, &mut nbuf);

            for &np in nbuf.iter() {
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                if self.nodes[ni].generation == cur_gen && self.nodes[ni].closed {
                    continue;
                }
                if pather.is_blocked(cp, np) || rules.is_barred(cp, np) {
                    continue;
                }

                let g_base = if ci != start_idx && rules.stop_binds(cp, np) {
                    current_g.round_up()
                } else {
                    current_g.clone()
                };
                let Some(g_next) = g_base.add_step(pather.cost(cp, np), rules.is_stop(np))
                else {
                    continue;
                };
                // Outside the turn budget.
                if g_next.compare(&bound) == Ordering::Greater {
                    continue;
                }

                let visited = self.nodes[ni].generation == cur_gen;
                if visited {
                    let Some(g_old) = self.nodes[ni].g.as_ref() else {
                        self.queue = queue;
                        self.nbuf = nbuf;
                        return Err(SearchError::MissingState(np));
                    };
                    if g_next.compare(g_old) != Ordering::Less {
                        continue;
                    }
                }

                let key = g_next.to_scalar();
                let node = &mut self.nodes[ni];
                node.generation = cur_gen;
                node.g = Some(g_next);
                node.parent = ci;
                node.closed = false;
                if visited && node.open {
                    queue.rescore(&ni, key);
                } else {
                    node.open = true;
                    queue.push(ni, key);
                }
            }
        }

        self.queue = queue;
        self.nbuf = nbuf;
        debug!("reachable: {} cells from {from}", self.reach_results.len());
        Ok(&self.reach_results)
    }

    /// The scalar cost at which `p` was reached by the most recent
    /// [`reachable_points`](Self::reachable_points) call, or `None` when
    /// it was not reached. The start cell reads as `0.0`.
    pub fn reached_at(&self, p: Point) -> Option<f64> {
        let i = self.idx(p)?;
        let v = self.reach_map[i];
        (v != UNREACHED).then_some(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use std::collections::HashSet;

    fn grid(weights: &[&[f64]]) -> Grid {
        let rows: Vec<Vec<f64>> = weights.iter().map(|r| r.to_vec()).collect();
        Grid::new(&rows, false).unwrap()
    }

    fn reach(
        g: &Grid,
        start: (i32, i32),
        allowance: &Allowance,
        turns: u32,
        rules: &MoveRules,
    ) -> HashSet<(i32, i32)> {
        SearchRange::for_grid(g)
            .reachable_points(g, Point::new(start.0, start.1), allowance, turns, rules)
            .unwrap()
            .iter()
            .map(|n| (n.pos.x, n.pos.y))
            .collect()
    }

    #[test]
    fn one_turn_reach() {
        let g = grid(&[&[0.0, 1.0], &[4.0, 1.0], &[2.0, 1.0]]);
        let set = reach(
            &g,
            (0, 0),
            &Allowance::flat(5.0).unwrap(),
            1,
            &MoveRules::new(),
        );
        let expected: HashSet<_> = [(0, 1), (1, 0), (1, 1), (2, 0), (2, 1)].into();
        assert_eq!(set, expected);
    }

    #[test]
    fn zero_turns_reach_nothing() {
        let g = grid(&[&[1.0, 1.0], &[1.0, 1.0]]);
        let set = reach(
            &g,
            (0, 0),
            &Allowance::flat(5.0).unwrap(),
            0,
            &MoveRules::new(),
        );
        assert!(set.is_empty());
    }

    #[test]
    fn start_is_excluded() {
        let g = grid(&[&[1.0, 1.0], &[1.0, 1.0]]);
        let set = reach(
            &g,
            (0, 0),
            &Allowance::flat(5.0).unwrap(),
            3,
            &MoveRules::new(),
        );
        assert!(!set.contains(&(0, 0)));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn monotonic_in_turns_and_allowance() {
        let g = grid(&[
            &[1.0, 2.0, 3.0],
            &[2.0, 1.0, 2.0],
            &[3.0, 2.0, 1.0],
        ]);
        let rules = MoveRules::new();
        let small = reach(&g, (0, 0), &Allowance::flat(2.0).unwrap(), 1, &rules);
        let more_turns = reach(&g, (0, 0), &Allowance::flat(2.0).unwrap(), 2, &rules);
        let more_movement = reach(&g, (0, 0), &Allowance::flat(4.0).unwrap(), 1, &rules);
        assert!(small.is_subset(&more_turns));
        assert!(small.is_subset(&more_movement));
    }

    #[test]
    fn stop_point_shrinks_the_reach() {
        let g = grid(&[&[1.0], &[1.0], &[1.0], &[1.0]]);
        let two = Allowance::flat(2.0).unwrap();
        let free = reach(&g, (0, 0), &two, 1, &MoveRules::new());
        assert_eq!(free, [(1, 0), (2, 0)].into());

        let mut rules = MoveRules::new();
        rules.add_stop(Point::new(1, 0));
        let stopped = reach(&g, (0, 0), &two, 1, &rules);
        assert_eq!(stopped, [(1, 0)].into());
        // A second turn carries past the stop again.
        let stopped = reach(&g, (0, 0), &two, 2, &rules);
        assert_eq!(stopped, [(1, 0), (2, 0), (3, 0)].into());
    }

    #[test]
    fn partial_stop_exempts_listed_exits() {
        let g = grid(&[&[1.0], &[1.0], &[1.0], &[1.0]]);
        let two = Allowance::flat(2.0).unwrap();

        let mut exempt = MoveRules::new();
        exempt.add_partial_stop(Point::new(1, 0), [Point::new(2, 0)]);
        assert_eq!(reach(&g, (0, 0), &two, 1, &exempt), [(1, 0), (2, 0)].into());

        let mut binding = MoveRules::new();
        binding.add_partial_stop(Point::new(1, 0), []);
        assert_eq!(reach(&g, (0, 0), &two, 1, &binding), [(1, 0)].into());
    }

    #[test]
    fn stops_never_bind_the_start_cell() {
        let g = grid(&[&[1.0], &[1.0], &[1.0]]);
        let mut rules = MoveRules::new();
        rules.add_stop(Point::new(0, 0));
        let set = reach(&g, (0, 0), &Allowance::flat(2.0).unwrap(), 1, &rules);
        assert_eq!(set, [(1, 0), (2, 0)].into());
    }

    #[test]
    fn barriers_cut_the_reach() {
        let g = grid(&[&[1.0, 1.0], &[1.0, 1.0]]);
        let mut rules = MoveRules::new();
        rules.add_barrier(Point::new(0, 0), Point::new(1, 0));
        let set = reach(&g, (0, 0), &Allowance::flat(1.0).unwrap(), 1, &rules);
        assert_eq!(set, [(0, 1)].into());
    }

    #[test]
    fn schedule_applies_per_turn() {
        let g = grid(&[&[1.0], &[1.0], &[1.0], &[1.0], &[1.0]]);
        let a = Allowance::schedule(&[3.0, 1.0]).unwrap();
        let rules = MoveRules::new();
        assert_eq!(
            reach(&g, (0, 0), &a, 1, &rules),
            [(1, 0), (2, 0), (3, 0)].into()
        );
        assert_eq!(
            reach(&g, (0, 0), &a, 2, &rules),
            [(1, 0), (2, 0), (3, 0), (4, 0)].into()
        );
    }

    #[test]
    fn reached_at_reports_scalar_costs() {
        let g = grid(&[&[1.0, 1.0], &[2.0, 1.0]]);
        let mut sr = SearchRange::for_grid(&g);
        sr.reachable_points(
            &g,
            Point::new(0, 0),
            &Allowance::flat(5.0).unwrap(),
            1,
            &MoveRules::new(),
        )
        .unwrap();
        assert_eq!(sr.reached_at(Point::new(0, 0)), Some(0.0));
        assert_eq!(sr.reached_at(Point::new(1, 0)), Some(2.0));
        assert_eq!(sr.reached_at(Point::new(1, 1)), Some(2.0));
        assert_eq!(sr.reached_at(Point::new(5, 5)), None);
    }

    #[test]
    fn turn_counts_and_costs_are_reported() {
        let g = grid(&[&[1.0], &[2.0], &[2.0]]);
        let mut sr = SearchRange::for_grid(&g);
        let nodes = sr
            .reachable_points(
                &g,
                Point::new(0, 0),
                &Allowance::flat(2.0).unwrap(),
                2,
                &MoveRules::new(),
            )
            .unwrap();
        let by_pos: std::collections::HashMap<_, _> =
            nodes.iter().map(|n| (n.pos, (n.turns, n.cost))).collect();
        assert_eq!(by_pos[&Point::new(1, 0)], (0, 2.0));
        assert_eq!(by_pos[&Point::new(2, 0)], (1, 2.0));
    }
}
