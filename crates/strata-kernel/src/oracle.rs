//! Pluggable decision sources standing in for real property checks.
//!
//! During bring-up the per-layer assertions are placeholders: instead of
//! checking a genuine property of `(x, y)` they ask an injected oracle for
//! a verdict, optionally stating which direction they would prefer. The
//! engine never implements the oracle itself — it is a strategy seam, so a
//! production deployment substitutes concrete assertions (or a concrete
//! source) without touching the dispatch logic.

use crate::direction::LatticeDirection;
use sha2::{Digest, Sha256};
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

/// Produces one verdict per predicate evaluation.
///
/// `preferred` is the direction the asking predicate is biased towards;
/// a source is free to ignore it.
pub trait DecisionSource {
    fn decide(&mut self, preferred: LatticeDirection) -> LatticeDirection;
}

/// The documented simulation contract: a pseudo-random verdict among
/// `{neutral, up, down, error}`, honouring the caller's preference roughly
/// a third of the time.
///
/// Draws come from a seeded SHA-256 chain (`state = sha256(state)`, first
/// eight bytes per draw), so a run is reproducible from its seed and there
/// is no process-global generator state to synchronize.
pub struct BiasedOracle {
    state: [u8; 32],
}

impl BiasedOracle {
    /// Oracle with a fixed seed; two oracles with the same seed produce
    /// the same verdict sequence.
    pub fn seeded(seed: u64) -> Self {
        let state = Sha256::digest(seed.to_le_bytes()).into();
        Self { state }
    }

    /// Oracle seeded from the wall clock, for varying interactive runs.
    pub fn from_entropy() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::seeded(nanos ^ u64::from(std::process::id()))
    }

    fn draw(&mut self) -> u64 {
        self.state = Sha256::digest(self.state).into();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.state[..8]);
        u64::from_le_bytes(bytes)
    }

    fn draw_in(&mut self, n: u64) -> u64 {
        self.draw() % n
    }
}

impl DecisionSource for BiasedOracle {
    fn decide(&mut self, preferred: LatticeDirection) -> LatticeDirection {
        // Honour the preference ~1/3 of the time, unless it is one of the
        // reserved outcomes a linear chain cannot follow.
        if self.draw_in(3) == 0 && !preferred.is_reserved() {
            return preferred;
        }

        match self.draw_in(4) {
            1 => LatticeDirection::Neutral,
            2 => LatticeDirection::Up,
            3 => LatticeDirection::Down,
            _ => LatticeDirection::Error,
        }
    }
}

/// Always returns the same direction, whatever the preference.
///
/// The bring-up source behind the CLI's `--decide` override and most of
/// the engine tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedDecision(pub LatticeDirection);

impl DecisionSource for FixedDecision {
    fn decide(&mut self, _preferred: LatticeDirection) -> LatticeDirection {
        self.0
    }
}

/// Replays a scripted verdict sequence, then defers to the caller's
/// preference once the script is exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedDecision {
    script: VecDeque<LatticeDirection>,
}

impl ScriptedDecision {
    pub fn new(script: impl IntoIterator<Item = LatticeDirection>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Verdicts not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl DecisionSource for ScriptedDecision {
    fn decide(&mut self, preferred: LatticeDirection) -> LatticeDirection {
        self.script.pop_front().unwrap_or(preferred)
    }
}
