//! Turn-quantized path costs.
//!
//! Movement is rationed per discrete turn: each turn grants a distance cap
//! (the *allowance*), and a path is ranked first by how many turns it
//! consumes, then by how much of the current turn's cap it has spent.
//! [`TurnScore`] carries that pair together with the cap schedule needed to
//! combine costs correctly.

use std::cmp::Ordering;
use std::sync::Arc;

use thiserror::Error;

/// Scalar weight of one whole turn in [`TurnScore::to_scalar`].
///
/// Larger than any accepted per-turn cap, so one extra turn always
/// outweighs any amount of in-turn distance.
pub const TURN_SCALE: f64 = 1_000_000.0;

/// Rejected score or allowance construction parameters.
#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    #[error("distance must be finite and non-negative, got {0}")]
    InvalidDistance(f64),
    #[error("cumulative addition must be positive and finite, got {0}")]
    NonPositiveAddition(f64),
    #[error("allowance schedule must not be empty")]
    EmptySchedule,
    #[error("allowance cap must be finite, non-negative and at most {TURN_SCALE}, got {0}")]
    InvalidCap(f64),
    #[error("extra weight {extra} exceeds the cap {cap} in effect for turn {turn}")]
    ExtraExceedsCap { turn: u32, extra: f64, cap: f64 },
    #[error("remaining allowance caps are zero, the distance can never be spent")]
    NeverFits,
}

/// Per-turn movement caps. The final entry repeats for all later turns.
///
/// A cap of zero means the turn permits no movement at all; score
/// arithmetic skips such turns before any distance can accrue.
#[derive(Clone, Debug)]
pub struct Allowance {
    caps: Arc<[f64]>,
}

impl Allowance {
    /// A constant cap for every turn.
    pub fn flat(cap: f64) -> Result<Self, ScoreError> {
        Self::schedule(&[cap])
    }

    /// A per-turn cap schedule; the last entry repeats indefinitely.
    pub fn schedule(caps: &[f64]) -> Result<Self, ScoreError> {
        if caps.is_empty() {
            return Err(ScoreError::EmptySchedule);
        }
        for &cap in caps {
            if !cap.is_finite() || cap < 0.0 || cap > TURN_SCALE {
                return Err(ScoreError::InvalidCap(cap));
            }
        }
        Ok(Self { caps: caps.into() })
    }

    /// No effective rationing: a single turn holds any plausible distance.
    pub fn unlimited() -> Self {
        Self {
            caps: Arc::from([TURN_SCALE]),
        }
    }

    /// The cap in effect for a turn index.
    #[inline]
    pub fn cap(&self, turn: u32) -> f64 {
        let i = (turn as usize).min(self.caps.len() - 1);
        self.caps[i]
    }

    /// Whether `turn` is on the repeating tail of the schedule.
    #[inline]
    fn on_tail(&self, turn: u32) -> bool {
        turn as usize >= self.caps.len() - 1
    }
}

/// A turn-aware path cost: whole turns consumed plus the distance spent
/// within the current turn.
///
/// The order is lexicographic on (turns, extra). Values are compared with
/// [`compare`](Self::compare) or through the [`to_scalar`](Self::to_scalar)
/// key; the type deliberately implements no comparison operators, so no
/// lossy numeric coercion can sneak in. Equal-valued scores built
/// independently compare `Equal` while remaining distinct values.
///
/// Invariant: `extra` never exceeds the cap in effect for `turns`.
#[derive(Clone, Debug)]
pub struct TurnScore {
    turns: u32,
    extra: f64,
    allowance: Allowance,
}

impl TurnScore {
    /// Score a raw distance against an allowance.
    ///
    /// The distance is folded into whole turns until the remainder fits the
    /// cap in effect. With `stop` set (the distance lands on a stop point),
    /// the remainder of the landing turn is consumed, meaning the turn the
    /// value actually lands in, which may be later than the first.
    pub fn new(distance: f64, allowance: &Allowance, stop: bool) -> Result<Self, ScoreError> {
        if !distance.is_finite() || distance < 0.0 {
            return Err(ScoreError::InvalidDistance(distance));
        }
        let (turns, extra) = normalize(0, distance, allowance)?;
        let extra = if stop { allowance.cap(turns) } else { extra };
        Ok(Self {
            turns,
            extra,
            allowance: allowance.clone(),
        })
    }

    /// Build a score from an existing (turns, extra) pair, validating the
    /// cap invariant.
    pub fn from_parts(turns: u32, extra: f64, allowance: &Allowance) -> Result<Self, ScoreError> {
        if !extra.is_finite() || extra < 0.0 {
            return Err(ScoreError::InvalidDistance(extra));
        }
        let cap = allowance.cap(turns);
        if extra > cap {
            return Err(ScoreError::ExtraExceedsCap { turn: turns, extra, cap });
        }
        Ok(Self {
            turns,
            extra,
            allowance: allowance.clone(),
        })
    }

    /// The zero score: no turns consumed, no distance spent.
    pub fn zero(allowance: &Allowance) -> Self {
        Self {
            turns: 0,
            extra: 0.0,
            allowance: allowance.clone(),
        }
    }

    /// Whole turns consumed.
    #[inline]
    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// Distance spent within the current turn.
    #[inline]
    pub fn extra(&self) -> f64 {
        self.extra
    }

    /// Add the cost of traversing one edge.
    ///
    /// Returns `None` when the edge can never be taken: its weight exceeds
    /// every cap reachable by advancing turns, including the repeating
    /// final entry. That is a normal control-flow signal ("this edge is
    /// not traversable under this allowance"), not an error.
    ///
    /// A single edge is never split across a turn boundary: when it does
    /// not fit the remainder of the current turn, the turn advances and
    /// the whole weight is retried against the next cap. Zero caps permit
    /// no movement and are skipped outright. With `stop` set (the edge
    /// enters a stop point), the remainder of the landing turn is
    /// consumed.
    pub fn add_step(&self, weight: f64, stop: bool) -> Option<TurnScore> {
        debug_assert!(
            weight.is_finite() && weight > 0.0,
            "edge weights must be positive"
        );
        let mut turns = self.turns;
        let mut extra = self.extra;
        loop {
            let cap = self.allowance.cap(turns);
            if extra + weight <= cap {
                extra += weight;
                break;
            }
            if self.allowance.on_tail(turns) && weight > cap {
                return None;
            }
            turns += 1;
            extra = 0.0;
        }
        let extra = if stop { self.allowance.cap(turns) } else { extra };
        Some(Self {
            turns,
            extra,
            allowance: self.allowance.clone(),
        })
    }

    /// Add a cumulative path-equivalent distance (e.g. a heuristic
    /// estimate on top of a g-score), carrying overflow across as many
    /// turn boundaries as needed.
    ///
    /// Rejects non-positive input: a zero addition is meaningless in this
    /// model and signals a caller bug.
    pub fn add_total(&self, distance: f64) -> Result<TurnScore, ScoreError> {
        if !distance.is_finite() || distance <= 0.0 {
            return Err(ScoreError::NonPositiveAddition(distance));
        }
        let (turns, extra) = normalize(self.turns, self.extra + distance, &self.allowance)?;
        Ok(Self {
            turns,
            extra,
            allowance: self.allowance.clone(),
        })
    }

    /// The score as if the remainder of the current turn's cap had been
    /// spent. Used when a path is forced to stop mid-turn.
    pub fn round_up(&self) -> TurnScore {
        Self {
            turns: self.turns,
            extra: self.allowance.cap(self.turns),
            allowance: self.allowance.clone(),
        }
    }

    /// Total order: turns first, then in-turn distance.
    pub fn compare(&self, other: &TurnScore) -> Ordering {
        self.turns
            .cmp(&other.turns)
            .then(self.extra.total_cmp(&other.extra))
    }

    /// A single comparable number: `turns × TURN_SCALE + extra`.
    #[inline]
    pub fn to_scalar(&self) -> f64 {
        f64::from(self.turns) * TURN_SCALE + self.extra
    }
}

/// Fold `extra` into whole turns until it fits the cap in effect. Zero
/// caps subtract nothing and simply advance the turn; a zero repeating
/// tail with distance still unspent can never fit.
fn normalize(mut turns: u32, mut extra: f64, allowance: &Allowance) -> Result<(u32, f64), ScoreError> {
    loop {
        let cap = allowance.cap(turns);
        if extra <= cap {
            return Ok((turns, extra));
        }
        if allowance.on_tail(turns) && cap <= 0.0 {
            return Err(ScoreError::NeverFits);
        }
        extra -= cap;
        turns += 1;
    }
}
