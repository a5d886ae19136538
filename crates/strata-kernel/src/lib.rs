//! # Strata Kernel
//!
//! Execution tunnelling: traversal of an N-layer reference model where
//! each layer may assert a property about the current operation and
//! decide whether to settle here, hand off upward, or hand off downward.
//!
//! Layers are insulated — they cannot call each other directly — so all
//! cross-layer state (the arguments, the per-layer context, and the
//! capability to consult lower layers' assertions) is explicitly threaded
//! through a pair of chains. The traversal path is guided by the vertical
//! lattice guide, currently a finite linear chain with a fixed bottom.
//!
//! ## Architecture
//!
//! ```text
//! Layer                 ← Ordinals of the chain, [MIN, MAX]
//!     │
//! LatticeDirection      ← Verdict vocabulary of one evaluation
//!     │
//! ContextChain          ← Layer → opaque payload, plus a current index
//!     │
//! PredicateChain        ← Layer → assertion capability, tagged current
//!     │
//! DecisionSource        ← Injected verdict strategy (oracle in bring-up)
//!     │
//! Engine                ← Recursive dispatch: vet, evaluate, transition
//! ```
//!
//! This crate is layer-agnostic about what predicates actually assert: it
//! only prescribes how verdicts move execution along the chain, which
//! capabilities each arity receives, and what happens at the rims.

pub mod context;
pub mod diagnostics;
pub mod direction;
pub mod engine;
pub mod error;
pub mod layer;
pub mod ops;
pub mod oracle;
pub mod predicate;

pub use context::{ContextChain, ContextValue};
pub use diagnostics::{
    DiagnosticEntry, Diagnostics, MESSAGE_CAP, MemoryDiagnostics, Severity, StderrDiagnostics,
};
pub use direction::{LatticeDirection, ParseDirectionError};
pub use engine::{Engine, Settlement, run};
pub use error::{OutOfRangeShift, TunnelError, UnvettedReason};
pub use layer::Layer;
pub use ops::{LayerOps, RecordingOps, StdoutOps};
pub use oracle::{BiasedOracle, DecisionSource, FixedDecision, ScriptedDecision};
pub use predicate::{
    FixedAssertion, Layer0Predicate, Layer1Predicate, Layer2Predicate, Layer3Predicate,
    OracleAssertion, PredicateChain,
};
