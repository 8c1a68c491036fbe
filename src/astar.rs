//! Point-to-point turn-ordered shortest path.

use std::cmp::Ordering;

use log::{debug, trace};

use crate::geom::Point;
use crate::rules::MoveRules;
use crate::score::{Allowance, TurnScore};
use crate::searchrange::{SearchError, SearchRange};
use crate::traits::AstarPather;

/// Options for [`SearchRange::astar_path`].
#[derive(Default, Clone, Copy)]
pub struct SearchOptions {
    /// When the goal is unreachable, return the path to the closest
    /// examined node instead of an empty path. Closeness is ranked by
    /// heuristic distance to the goal, ties broken by smaller g-score.
    pub closest: bool,
    /// Distance estimate overriding the pather's own (e.g. great-circle
    /// distance). Must never overestimate the true cost.
    pub heuristic: Option<fn(Point, Point) -> f64>,
}

impl SearchRange {
    /// Compute the turn-optimal path from `from` to `to`.
    ///
    /// Paths are ranked by turns consumed first, in-turn distance second.
    /// The returned path excludes `from` and includes `to`; an empty path
    /// means the goal is unreachable (or, with
    /// [`closest`](SearchOptions::closest), that the start itself was the
    /// closest node). Out-of-range endpoints are caller errors.
    pub fn astar_path<P: AstarPather>(
        &mut self,
        pather: &P,
        from: Point,
        to: Point,
        allowance: &Allowance,
        rules: &MoveRules,
        options: &SearchOptions,
    ) -> Result<Vec<Point>, SearchError> {
        let start_idx = self.idx(from).ok_or(SearchError::OutOfRange(from))?;
        let goal_idx = self.idx(to).ok_or(SearchError::OutOfRange(to))?;
        trace!("astar: {from} -> {to}");

        let cur_gen = self.begin();
        let estimate = |a: Point, b: Point| match options.heuristic {
            Some(h) => h(a, b),
            None => pather.estimate(a, b),
        };

        let start_h = estimate(from, to);
        {
            let node = &mut self.nodes[start_idx];
            node.g = Some(TurnScore::zero(allowance));
            node.parent = usize::MAX;
            node.generation = cur_gen;
            node.open = true;
            node.closed = false;
        }

        let mut closest_idx = start_idx;
        let mut closest_h = start_h;

        let mut queue = std::mem::take(&mut self.queue);
        let mut nbuf = std::mem::take(&mut self.nbuf);
        queue.push(start_idx, 0.0);

        let mut found = false;
        while let Some((ci, _)) = queue.pop() {
            if ci == goal_idx {
                found = true;
                break;
            }
            // The queue never holds stale entries (rescore mutates keys in
            // place), but guard anyway.
            if self.nodes[ci].generation != cur_gen || self.nodes[ci].closed {
                continue;
            }
            self.nodes[ci].closed = true;
            self.nodes[ci].open = false;

            let cp = self.point(ci);
            let Some(current_g) = self.nodes[ci].g.clone() else {
                return Err(SearchError::MissingState(cp));
            };

            nbuf.clear();
            pather.neighbors(cp, &mut nbuf);

            for &np in nbuf.iter() {
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                if self.nodes[ni].generation == cur_gen && self.nodes[ni].closed {
                    continue;
                }
                // Barriers veto the edge before any cost is computed.
                if pather.is_blocked(cp, np) || rules.is_barred(cp, np) {
                    continue;
                }

                // A binding stop point spends the rest of the turn before
                // this edge is taken. Never applies when leaving the
                // start: the mover begins its move already stopped there.
                let g_base = if ci != start_idx && rules.stop_binds(cp, np) {
                    current_g.round_up()
                } else {
                    current_g.clone()
                };
                let Some(g_next) = g_base.add_step(pather.cost(cp, np), rules.is_stop(np))
                else {
                    // Edge not traversable under this allowance.
                    continue;
                };

                let visited = self.nodes[ni].generation == cur_gen;
                if visited {
                    let Some(g_old) = self.nodes[ni].g.as_ref() else {
                        return Err(SearchError::MissingState(np));
                    };
                    if g_next.compare(g_old) != Ordering::Less {
                        continue;
                    }
                }

                let h = estimate(np, to);
                let f = if h > 0.0 {
                    match g_next.add_total(h) {
                        Ok(f) => f.to_scalar(),
                        // The estimated remainder can never be spent
                        // under this allowance; prune the branch.
                        Err(_) => continue,
                    }
                } else {
                    g_next.to_scalar()
                };

                if options.closest {
                    let better = h < closest_h
                        || (h == closest_h
                            && self.nodes[closest_idx]
                                .g
                                .as_ref()
                                .is_some_and(|cg| g_next.compare(cg) == Ordering::Less));
                    if better {
                        closest_idx = ni;
                        closest_h = h;
                    }
                }

                let node = &mut self.nodes[ni];
                node.generation = cur_gen;
                node.g = Some(g_next);
                node.parent = ci;
                node.closed = false;
                if visited && node.open {
                    queue.rescore(&ni, f);
                } else {
                    node.open = true;
                    queue.push(ni, f);
                }
            }
        }

        self.queue = queue;
        self.nbuf = nbuf;

        if found {
            let path = self.build_path(goal_idx, start_idx);
            debug!("astar: {from} -> {to}, {} steps", path.len());
            return Ok(path);
        }
        if options.closest {
            let path = self.build_path(closest_idx, start_idx);
            debug!(
                "astar: {to} unreachable, closest is {}",
                self.point(closest_idx)
            );
            return Ok(path);
        }
        debug!("astar: no path from {from} to {to}");
        Ok(Vec::new())
    }
}
