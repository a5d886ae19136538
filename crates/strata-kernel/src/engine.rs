//! The transition engine: recursive dispatch along the lattice.
//!
//! One generic recursive function parameterized by the layer index replaces
//! the original hand-written service procedure per layer; the insulated
//! layers / explicit hand-off contract is unchanged. Each frame:
//!
//! 1. vets the predicate chain against the layer being entered,
//! 2. evaluates the active predicate,
//! 3. interprets the returned [`LatticeDirection`] — settle here, abort,
//!    or shift both chains one layer and recurse.
//!
//! Recursion depth is bounded by the layer count: every `up`/`down`
//! strictly changes the layer by one, and at either rim the verdict
//! degrades to the bottom-default action instead of recursing further, so
//! a pathological predicate that always points off the end of the chain
//! cannot cycle.

use crate::context::ContextChain;
use crate::diagnostics::Diagnostics;
use crate::direction::LatticeDirection;
use crate::error::{TunnelError, UnvettedReason};
use crate::layer::Layer;
use crate::ops::LayerOps;
use crate::oracle::DecisionSource;
use crate::predicate::PredicateChain;
use serde::{Deserialize, Serialize};

const SITE: &str = "tunnel";
const FALLBACK_SITE: &str = "bottom-default";

/// Terminal, successful outcome of a tunnelling call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    /// The layer whose local operation ran.
    pub layer: Layer,
    /// Whether the call settled through the bottom-default fallback
    /// rather than a `neutral` verdict at `layer`.
    pub via_fallback: bool,
}

/// The dispatcher, holding the three injected capabilities.
pub struct Engine<'a> {
    decide: &'a mut dyn DecisionSource,
    diag: &'a mut dyn Diagnostics,
    ops: &'a mut dyn LayerOps,
}

impl<'a> Engine<'a> {
    pub fn new(
        decide: &'a mut dyn DecisionSource,
        diag: &'a mut dyn Diagnostics,
        ops: &'a mut dyn LayerOps,
    ) -> Self {
        Self { decide, diag, ops }
    }

    /// Tunnel the request `(x, y)` starting at `layer`.
    ///
    /// Precondition: `pdc.current() == layer`. A violated precondition, or
    /// a missing predicate capability for the layer, fails the call with
    /// [`TunnelError::Unvetted`] before anything is evaluated.
    ///
    /// The call either settles at some layer's local operation or aborts;
    /// no layer above a failing frame observes partial completion.
    pub fn tunnel(
        &mut self,
        x: i64,
        y: i64,
        layer: Layer,
        ctx: &mut ContextChain,
        pdc: &PredicateChain,
    ) -> Result<Settlement, TunnelError> {
        if pdc.current() != layer {
            return self.unvetted(
                layer,
                UnvettedReason::TagMismatch {
                    tagged: pdc.current(),
                },
            );
        }

        let verdict = match layer {
            Layer::L0 => pdc.layer0().assert(x, y),
            Layer::L1 => {
                let Some(p1) = pdc.layer1() else {
                    return self.unvetted(layer, UnvettedReason::MissingPredicate);
                };
                p1.assert(x, y, ctx, self.decide)
            }
            Layer::L2 => {
                let (Some(p2), Some(p1)) = (pdc.layer2(), pdc.layer1()) else {
                    return self.unvetted(layer, UnvettedReason::MissingPredicate);
                };
                p2.assert(x, y, ctx, self.decide, p1.as_ref())
            }
            Layer::L3 => {
                let (Some(p3), Some(p2), Some(p1)) =
                    (pdc.layer3(), pdc.layer2(), pdc.layer1())
                else {
                    return self.unvetted(layer, UnvettedReason::MissingPredicate);
                };
                p3.assert(x, y, ctx, self.decide, p1.as_ref(), p2.as_ref())
            }
        };

        match verdict {
            LatticeDirection::Error => {
                self.diag
                    .error(SITE, &format!("assertion failed at {layer}"));
                Err(TunnelError::AssertionFailed(layer))
            }

            LatticeDirection::Neutral => {
                self.ops.execute(layer, x, y, ctx);
                Ok(Settlement {
                    layer,
                    via_fallback: false,
                })
            }

            LatticeDirection::Down => match layer.below() {
                None => {
                    self.diag.warn(
                        SITE,
                        &format!("no layer below {layer}: carrying out the default action"),
                    );
                    self.bottom_default(x, y, pdc)
                }
                Some(lower) => self.hand_off(x, y, lower, -1, ctx, pdc),
            },

            LatticeDirection::Up => match layer.above() {
                None => {
                    // Falls back to the layer-0 default action, skipping
                    // the layers in between. Inherited behaviour, kept.
                    self.diag.warn(
                        SITE,
                        &format!("no layer above {layer}: carrying out the default action"),
                    );
                    self.bottom_default(x, y, pdc)
                }
                Some(upper) => self.hand_off(x, y, upper, 1, ctx, pdc),
            },

            reserved => {
                self.diag.error(
                    SITE,
                    &format!("unsupported lattice direction {reserved} at {layer}"),
                );
                Err(TunnelError::ReservedDirection {
                    layer,
                    direction: reserved,
                })
            }
        }
    }

    /// Shift both chains towards `next` and recurse.
    ///
    /// `next` is an in-bounds neighbour of the vetted layer, so the
    /// predicate chain's repositioning is total. The caller's context may
    /// sit anywhere on the chain; a rejected context shift degrades to a
    /// warning and an unchanged context.
    fn hand_off(
        &mut self,
        x: i64,
        y: i64,
        next: Layer,
        delta: i8,
        ctx: &mut ContextChain,
        pdc: &PredicateChain,
    ) -> Result<Settlement, TunnelError> {
        if let Err(shift) = ctx.shift(delta) {
            self.diag.warn(SITE, &shift.to_string());
        }
        self.tunnel(x, y, next, ctx, &pdc.set_to(next))
    }

    /// The bottom-default action: a fresh context at the bottom layer, the
    /// layer-0 assertion, then the layer-0 operation.
    ///
    /// This is the terminal fallback for both rims of the chain. It is an
    /// edge case, not a failure — only an explicit `error` verdict from
    /// the layer-0 predicate aborts it.
    fn bottom_default(
        &mut self,
        x: i64,
        y: i64,
        pdc: &PredicateChain,
    ) -> Result<Settlement, TunnelError> {
        let ctx = ContextChain::make(Layer::MIN);
        match pdc.layer0().assert(x, y) {
            LatticeDirection::Error => {
                self.diag.error(
                    FALLBACK_SITE,
                    "default assertion failed; default operation ignored",
                );
                Err(TunnelError::AssertionFailed(Layer::MIN))
            }
            _ => {
                self.ops.execute(Layer::MIN, x, y, &ctx);
                Ok(Settlement {
                    layer: Layer::MIN,
                    via_fallback: true,
                })
            }
        }
    }

    fn unvetted(
        &mut self,
        layer: Layer,
        reason: UnvettedReason,
    ) -> Result<Settlement, TunnelError> {
        self.diag
            .warn(SITE, &format!("{layer} cannot be entered: {reason}"));
        Err(TunnelError::Unvetted { layer, reason })
    }
}

/// Top-level entry point: fresh chains at the top layer, defaults for
/// every layer, tunnel from the top.
///
/// Each invocation owns its chains exclusively; independent calls may run
/// on separate threads as long as each brings its own capabilities.
pub fn run(
    x: i64,
    y: i64,
    decide: &mut dyn DecisionSource,
    diag: &mut dyn Diagnostics,
    ops: &mut dyn LayerOps,
) -> Result<Settlement, TunnelError> {
    let mut ctx = ContextChain::make(Layer::MAX);
    let pdc = PredicateChain::with_defaults(Layer::MAX);
    Engine::new(decide, diag, ops).tunnel(x, y, Layer::MAX, &mut ctx, &pdc)
}
