//! Layers of the reference model.
//!
//! A layer is an ordinal in the fixed range `[Layer::MIN, Layer::MAX]`.
//! Layers are insulated from each other: nothing in this crate lets one
//! layer call into another by name — all cross-layer traffic goes through
//! the chains and the engine.
//!
//! The vertical lattice guide is currently a linear chain, so the only
//! structure a layer carries is its position: comparison, the neighbour
//! above, and the neighbour below. The rim of the chain is expressed in
//! the types (`above`/`below` return `None`) instead of the out-of-range
//! integer checks the chain operations would otherwise repeat.

use crate::error::OutOfRangeShift;
use serde::{Deserialize, Serialize};

/// One level of the reference model.
///
/// `Layer::L3` is the topmost configured layer; the notional "top" element
/// of the lattice above it is deliberately unrepresentable — tunnelling up
/// from `L3` is the fallback edge case handled by the engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    L0,
    L1,
    L2,
    L3,
}

impl Layer {
    /// The bottom element of the lattice.
    pub const MIN: Layer = Layer::L0;

    /// The topmost configured layer.
    pub const MAX: Layer = Layer::L3;

    /// Number of configured layers.
    pub const COUNT: usize = 4;

    /// All layers, bottom first.
    pub const ALL: [Layer; Layer::COUNT] = [Layer::L0, Layer::L1, Layer::L2, Layer::L3];

    /// Position of this layer in the chain, bottom = 0.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Layer at the given chain position, if within `[MIN, MAX]`.
    pub fn from_index(index: usize) -> Option<Layer> {
        Layer::ALL.get(index).copied()
    }

    /// The neighbour towards the top, `None` at `MAX`.
    pub fn above(self) -> Option<Layer> {
        Layer::from_index(self.index() + 1)
    }

    /// The neighbour towards the bottom, `None` at `MIN`.
    pub fn below(self) -> Option<Layer> {
        self.index().checked_sub(1).and_then(Layer::from_index)
    }

    /// Relative displacement along the chain.
    ///
    /// A target outside `[MIN, MAX]` is rejected, leaving the caller's
    /// state untouched — bound checks degrade, they never abort.
    pub fn offset(self, delta: i8) -> Result<Layer, OutOfRangeShift> {
        let requested = self.index() as i32 + i32::from(delta);
        usize::try_from(requested)
            .ok()
            .and_then(Layer::from_index)
            .ok_or(OutOfRangeShift {
                from: self,
                requested,
            })
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Layer{}", self.index())
    }
}
