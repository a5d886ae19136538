//! Per-layer context, explicitly threaded through the dispatch chain.
//!
//! Layers are insulated, so the state a layer may consult is never globally
//! visible: it travels inside a [`ContextChain`] that the engine hands from
//! frame to frame. A chain owns one opaque payload per layer plus a
//! `current` index stating which slot the active layer reads and writes.
//!
//! Chains are created fresh per top-level call and destroyed when it
//! returns; nothing persists across calls.

use crate::error::OutOfRangeShift;
use crate::layer::Layer;
use serde::{Deserialize, Serialize};

/// The layer-scoped payload.
///
/// A single integer during bring-up; real services would carry richer
/// state here.
pub type ContextValue = i64;

/// Ordered mapping from [`Layer`] to context, plus the current index.
///
/// Every operation is total: a move that would leave
/// `[Layer::MIN, Layer::MAX]` is rejected with the chain observably
/// unchanged — no partial mutation, no abort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextChain {
    current: Layer,
    slots: [ContextValue; Layer::COUNT],
}

impl ContextChain {
    /// Build a chain sized for the whole layer range, seeded with a
    /// layer-derived placeholder per slot, positioned at `layer`.
    pub fn make(layer: Layer) -> Self {
        let mut slots = [0; Layer::COUNT];
        for l in Layer::ALL {
            slots[l.index()] = Self::seed(l);
        }
        Self {
            current: layer,
            slots,
        }
    }

    /// Placeholder payload for a layer's slot.
    fn seed(layer: Layer) -> ContextValue {
        match layer {
            Layer::L0 => -1,
            Layer::L1 => 10,
            Layer::L2 => 20,
            Layer::L3 => 30,
        }
    }

    /// The layer whose slot is active.
    pub fn current(&self) -> Layer {
        self.current
    }

    /// The payload of the active slot.
    pub fn value(&self) -> ContextValue {
        self.slots[self.current.index()]
    }

    /// The payload of an arbitrary slot.
    pub fn value_at(&self, layer: Layer) -> ContextValue {
        self.slots[layer.index()]
    }

    /// Overwrite the active slot.
    ///
    /// This is the only mutation a predicate performs on the chain: a
    /// layer's assertion may rewrite its own context, never a neighbour's.
    pub fn set_value(&mut self, value: ContextValue) {
        self.slots[self.current.index()] = value;
    }

    /// Absolute repositioning.
    pub fn set(&mut self, layer: Layer) {
        self.current = layer;
    }

    /// Relative repositioning (`delta = ±1` in practice).
    ///
    /// Out-of-range targets leave the chain untouched.
    pub fn shift(&mut self, delta: i8) -> Result<(), OutOfRangeShift> {
        self.current = self.current.offset(delta)?;
        Ok(())
    }
}
