//! Error types for the tunnelling engine.
//!
//! The taxonomy has three tiers:
//!
//! - [`OutOfRangeShift`] is recoverable: the chain is left unchanged, the
//!   holder of the [`Diagnostics`](crate::diagnostics::Diagnostics)
//!   capability emits a warning, and execution continues with a fallback
//!   action. A touched bound never aborts a call.
//! - [`TunnelError`] aborts the current call frame and is surfaced to the
//!   caller as failure. Nothing is retried.
//! - Diagnostic overflow (a message exceeding the bounded buffer) is not
//!   represented here at all: it signals a logic error the system cannot
//!   reason about further and is surfaced through
//!   [`Diagnostics::fatal_exit`](crate::diagnostics::Diagnostics::fatal_exit).

use crate::direction::LatticeDirection;
use crate::layer::Layer;

/// A relative or absolute repositioning would leave `[Layer::MIN, Layer::MAX]`.
///
/// Recovered locally wherever it arises: the chain that rejected the move
/// is observably unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error(
    "cannot move from {from} to layer index {requested}: outside [{min}, {max}]",
    min = Layer::MIN,
    max = Layer::MAX
)]
pub struct OutOfRangeShift {
    /// Where the chain currently sits.
    pub from: Layer,
    /// The chain index the move would have landed on.
    pub requested: i32,
}

/// Why a layer could not be entered for evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnvettedReason {
    /// The predicate chain's tag names a different layer.
    TagMismatch {
        /// The layer the chain is actually vetted for.
        tagged: Layer,
    },
    /// No predicate capability is attached for the layer (or for a lower
    /// layer its arity requires read access to).
    MissingPredicate,
}

impl std::fmt::Display for UnvettedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnvettedReason::TagMismatch { tagged } => {
                write!(f, "predicate chain is vetted for {tagged}")
            }
            UnvettedReason::MissingPredicate => {
                write!(f, "no predicate capability attached")
            }
        }
    }
}

/// Failure of a single top-level tunnelling call.
///
/// No layer above the failing one observes partial completion: the whole
/// call either settles at some layer's local operation or aborts with one
/// of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TunnelError {
    /// The chain tag disagrees with the layer being entered, or the
    /// required predicate capability is absent. The engine never evaluates
    /// against a predicate outside the vetted layer.
    #[error("{layer} is unvetted: {reason}")]
    Unvetted {
        layer: Layer,
        reason: UnvettedReason,
    },

    /// The active predicate explicitly reported `Error`.
    #[error("assertion failed at {0}")]
    AssertionFailed(Layer),

    /// A predicate produced one of the reserved outcomes
    /// (`independent`/`lub`/`glb`/`set`). Treated as an abort, but
    /// distinguished from an assertion failure.
    #[error("unsupported lattice direction {direction} at {layer}")]
    ReservedDirection {
        layer: Layer,
        direction: LatticeDirection,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_shift_names_both_ends() {
        let err = OutOfRangeShift {
            from: Layer::L3,
            requested: 4,
        };
        let text = err.to_string();
        assert!(text.contains("Layer3"));
        assert!(text.contains("index 4"));
        assert!(text.contains("Layer0"));
    }

    #[test]
    fn unvetted_display_names_the_tagged_layer() {
        let err = TunnelError::Unvetted {
            layer: Layer::L2,
            reason: UnvettedReason::TagMismatch { tagged: Layer::L3 },
        };
        assert_eq!(
            err.to_string(),
            "Layer2 is unvetted: predicate chain is vetted for Layer3"
        );
    }
}
