//! Per-layer assertions and the chain that carries them.
//!
//! A predicate's arity grows with layer depth: the layer-0 assertion is a
//! pure function of the arguments, layer 1 additionally sees its mutable
//! context, and layers 2 and 3 additionally receive read-only access to
//! the predicates of every layer strictly below them. That is the whole
//! vetting mechanism — a higher layer may consult lower layers' assertions
//! without the lower layers ever knowing the higher ones exist. Capability
//! flow is unidirectional; no layer invokes another by name.
//!
//! Each arity is its own trait rather than a generic function pointer, so
//! dispatch is a match on the active layer and an absent capability is an
//! `Option::None`, never a dangling cast.

use crate::context::ContextChain;
use crate::direction::LatticeDirection;
use crate::error::OutOfRangeShift;
use crate::layer::Layer;
use crate::oracle::DecisionSource;
use std::sync::Arc;

/// Assertion for the bottom layer: a pure function of the arguments.
pub trait Layer0Predicate: Send + Sync {
    fn assert(&self, x: i64, y: i64) -> LatticeDirection;
}

/// Assertion for layer 1: additionally sees the mutable context chain and
/// the injected decision source.
pub trait Layer1Predicate: Send + Sync {
    fn assert(
        &self,
        x: i64,
        y: i64,
        ctx: &mut ContextChain,
        decide: &mut dyn DecisionSource,
    ) -> LatticeDirection;
}

/// Assertion for layer 2: additionally reads the layer-1 assertion.
pub trait Layer2Predicate: Send + Sync {
    fn assert(
        &self,
        x: i64,
        y: i64,
        ctx: &mut ContextChain,
        decide: &mut dyn DecisionSource,
        below1: &dyn Layer1Predicate,
    ) -> LatticeDirection;
}

/// Assertion for layer 3: additionally reads the layer-1 and layer-2
/// assertions.
pub trait Layer3Predicate: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    fn assert(
        &self,
        x: i64,
        y: i64,
        ctx: &mut ContextChain,
        decide: &mut dyn DecisionSource,
        below1: &dyn Layer1Predicate,
        below2: &dyn Layer2Predicate,
    ) -> LatticeDirection;
}

/// Assertion that always reports the same direction, at any arity.
///
/// `FixedAssertion(Neutral)` is the layer-0 default; other directions are
/// bring-up stand-ins for rim behaviour (an always-`down` bottom, an
/// always-`up` top).
#[derive(Debug, Clone, Copy)]
pub struct FixedAssertion(pub LatticeDirection);

impl Layer0Predicate for FixedAssertion {
    fn assert(&self, _x: i64, _y: i64) -> LatticeDirection {
        self.0
    }
}

impl Layer1Predicate for FixedAssertion {
    fn assert(
        &self,
        _x: i64,
        _y: i64,
        _ctx: &mut ContextChain,
        _decide: &mut dyn DecisionSource,
    ) -> LatticeDirection {
        self.0
    }
}

impl Layer2Predicate for FixedAssertion {
    fn assert(
        &self,
        _x: i64,
        _y: i64,
        _ctx: &mut ContextChain,
        _decide: &mut dyn DecisionSource,
        _below1: &dyn Layer1Predicate,
    ) -> LatticeDirection {
        self.0
    }
}

impl Layer3Predicate for FixedAssertion {
    fn assert(
        &self,
        _x: i64,
        _y: i64,
        _ctx: &mut ContextChain,
        _decide: &mut dyn DecisionSource,
        _below1: &dyn Layer1Predicate,
        _below2: &dyn Layer2Predicate,
    ) -> LatticeDirection {
        self.0
    }
}

/// Bring-up assertion for layers 1–3: defers the verdict to the injected
/// decision source, stating a per-layer preferred direction.
///
/// The lower-layer capabilities are deliberately ignored — the default
/// predicates simulate verdicts, they do not re-vet.
#[derive(Debug, Clone, Copy)]
pub struct OracleAssertion {
    pub preferred: LatticeDirection,
}

impl OracleAssertion {
    pub fn preferring(preferred: LatticeDirection) -> Self {
        Self { preferred }
    }
}

impl Layer1Predicate for OracleAssertion {
    fn assert(
        &self,
        _x: i64,
        _y: i64,
        _ctx: &mut ContextChain,
        decide: &mut dyn DecisionSource,
    ) -> LatticeDirection {
        decide.decide(self.preferred)
    }
}

impl Layer2Predicate for OracleAssertion {
    fn assert(
        &self,
        _x: i64,
        _y: i64,
        _ctx: &mut ContextChain,
        decide: &mut dyn DecisionSource,
        _below1: &dyn Layer1Predicate,
    ) -> LatticeDirection {
        decide.decide(self.preferred)
    }
}

impl Layer3Predicate for OracleAssertion {
    fn assert(
        &self,
        _x: i64,
        _y: i64,
        _ctx: &mut ContextChain,
        decide: &mut dyn DecisionSource,
        _below1: &dyn Layer1Predicate,
        _below2: &dyn Layer2Predicate,
    ) -> LatticeDirection {
        decide.decide(self.preferred)
    }
}

/// Default predicate for a layer, as installed by the chain factories.
fn default_layer0() -> Arc<dyn Layer0Predicate> {
    Arc::new(FixedAssertion(LatticeDirection::Neutral))
}

fn default_layer1() -> Arc<dyn Layer1Predicate> {
    Arc::new(OracleAssertion::preferring(LatticeDirection::Neutral))
}

fn default_layer2() -> Arc<dyn Layer2Predicate> {
    Arc::new(OracleAssertion::preferring(LatticeDirection::Up))
}

fn default_layer3() -> Arc<dyn Layer3Predicate> {
    Arc::new(OracleAssertion::preferring(LatticeDirection::Down))
}

/// Bundle of at most one predicate per layer, tagged with the layer the
/// chain is currently vetted for.
///
/// The engine refuses to evaluate unless the tag agrees with the layer it
/// is entering and the slot for that layer is attached; see
/// [`TunnelError::Unvetted`](crate::error::TunnelError::Unvetted).
///
/// Navigation is functional: `set_to`/`shift` return a new chain (slots
/// are shared `Arc`s, so copies are cheap) and never mutate predicates
/// already established for layers they do not target.
#[derive(Clone)]
pub struct PredicateChain {
    current: Layer,
    layer0: Arc<dyn Layer0Predicate>,
    layer1: Option<Arc<dyn Layer1Predicate>>,
    layer2: Option<Arc<dyn Layer2Predicate>>,
    layer3: Option<Arc<dyn Layer3Predicate>>,
}

impl std::fmt::Debug for PredicateChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredicateChain")
            .field("current", &self.current)
            .field("vetted", &self.vetted_layers())
            .finish()
    }
}

impl PredicateChain {
    /// Chain with the guaranteed layer-0 default attached, layers 1–3
    /// unset, vetted for `Layer0`.
    pub fn make() -> Self {
        Self {
            current: Layer::MIN,
            layer0: default_layer0(),
            layer1: None,
            layer2: None,
            layer3: None,
        }
    }

    /// Chain with one default predicate per layer up to `top`, vetted for
    /// `top` — the shape a top-level call starts from.
    pub fn with_defaults(top: Layer) -> Self {
        Self::make().set_to(top)
    }

    /// The layer this chain is vetted for.
    pub fn current(&self) -> Layer {
        self.current
    }

    /// Whether a predicate capability is attached for `layer`.
    pub fn is_vetted(&self, layer: Layer) -> bool {
        match layer {
            Layer::L0 => true,
            Layer::L1 => self.layer1.is_some(),
            Layer::L2 => self.layer2.is_some(),
            Layer::L3 => self.layer3.is_some(),
        }
    }

    /// Layers with an attached predicate, bottom first.
    pub fn vetted_layers(&self) -> Vec<Layer> {
        Layer::ALL.into_iter().filter(|l| self.is_vetted(*l)).collect()
    }

    pub fn layer0(&self) -> &Arc<dyn Layer0Predicate> {
        &self.layer0
    }

    pub fn layer1(&self) -> Option<&Arc<dyn Layer1Predicate>> {
        self.layer1.as_ref()
    }

    pub fn layer2(&self) -> Option<&Arc<dyn Layer2Predicate>> {
        self.layer2.as_ref()
    }

    pub fn layer3(&self) -> Option<&Arc<dyn Layer3Predicate>> {
        self.layer3.as_ref()
    }

    /// Replace the layer-0 predicate.
    pub fn with_layer0(mut self, predicate: Arc<dyn Layer0Predicate>) -> Self {
        self.layer0 = predicate;
        self
    }

    /// Attach (or replace) the layer-1 predicate.
    pub fn with_layer1(mut self, predicate: Arc<dyn Layer1Predicate>) -> Self {
        self.layer1 = Some(predicate);
        self
    }

    /// Attach (or replace) the layer-2 predicate.
    pub fn with_layer2(mut self, predicate: Arc<dyn Layer2Predicate>) -> Self {
        self.layer2 = Some(predicate);
        self
    }

    /// Attach (or replace) the layer-3 predicate.
    pub fn with_layer3(mut self, predicate: Arc<dyn Layer3Predicate>) -> Self {
        self.layer3 = Some(predicate);
        self
    }

    /// Detach the predicate capability for `layer`, leaving the tag as-is.
    ///
    /// The layer-0 default is guaranteed and cannot be detached. This
    /// exists to model a null capability (a chain whose tag names a layer
    /// it cannot actually vet) when exercising the engine's refusal paths.
    pub fn without_predicate(mut self, layer: Layer) -> Self {
        match layer {
            Layer::L0 => {}
            Layer::L1 => self.layer1 = None,
            Layer::L2 => self.layer2 = None,
            Layer::L3 => self.layer3 = None,
        }
        self
    }

    /// Absolute repositioning of the vetted layer.
    ///
    /// Predicates for layers at or below `min(current, target)` are
    /// carried over unchanged; layers in `(min, target]` get freshly
    /// instantiated defaults. Going up therefore always attaches a
    /// concrete predicate for the new layer, while going down reuses
    /// whatever was established for the lower layer — the chain never
    /// silently drops a capability it is descending onto. Repositioning
    /// to the current layer is the identity.
    pub fn set_to(&self, target: Layer) -> PredicateChain {
        let keep = self.current.min(target);

        let mut next = PredicateChain {
            current: target,
            layer0: Arc::clone(&self.layer0),
            layer1: None,
            layer2: None,
            layer3: None,
        };

        if keep >= Layer::L1 {
            next.layer1 = self.layer1.clone();
        }
        if keep >= Layer::L2 {
            next.layer2 = self.layer2.clone();
        }
        if keep >= Layer::L3 {
            next.layer3 = self.layer3.clone();
        }

        for layer in Layer::ALL {
            if layer > keep && layer <= target {
                match layer {
                    Layer::L0 => next.layer0 = default_layer0(),
                    Layer::L1 => next.layer1 = Some(default_layer1()),
                    Layer::L2 => next.layer2 = Some(default_layer2()),
                    Layer::L3 => next.layer3 = Some(default_layer3()),
                }
            }
        }

        next
    }

    /// Relative repositioning: `set_to(current + delta)`.
    ///
    /// Out-of-range targets are rejected with the chain unchanged.
    pub fn shift(&self, delta: i8) -> Result<PredicateChain, OutOfRangeShift> {
        let target = self.current.offset(delta)?;
        Ok(self.set_to(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn same_layer1(a: &PredicateChain, b: &PredicateChain) -> bool {
        match (a.layer1(), b.layer1()) {
            (Some(x), Some(y)) => Arc::ptr_eq(x, y),
            (None, None) => true,
            _ => false,
        }
    }

    fn same_layer2(a: &PredicateChain, b: &PredicateChain) -> bool {
        match (a.layer2(), b.layer2()) {
            (Some(x), Some(y)) => Arc::ptr_eq(x, y),
            (None, None) => true,
            _ => false,
        }
    }

    #[test]
    fn make_attaches_only_the_bottom_default() {
        let chain = PredicateChain::make();
        assert_eq!(chain.current(), Layer::L0);
        assert_eq!(chain.vetted_layers(), vec![Layer::L0]);
    }

    #[test]
    fn with_defaults_populates_every_layer() {
        let chain = PredicateChain::with_defaults(Layer::MAX);
        assert_eq!(chain.current(), Layer::L3);
        assert_eq!(chain.vetted_layers(), Layer::ALL.to_vec());
    }

    #[test]
    fn set_to_is_idempotent() {
        let chain = PredicateChain::with_defaults(Layer::MAX);
        let once = chain.set_to(Layer::L2);
        let twice = once.set_to(Layer::L2);

        assert_eq!(once.current(), twice.current());
        assert_eq!(once.vetted_layers(), twice.vetted_layers());
        assert!(same_layer1(&once, &twice));
        assert!(same_layer2(&once, &twice));
    }

    #[test]
    fn shifting_down_retains_the_established_lower_predicates() {
        let chain = PredicateChain::with_defaults(Layer::MAX);
        let down = chain.shift(-1).unwrap();

        assert_eq!(down.current(), Layer::L2);
        // The layer-3 slot is dropped; layers 1 and 2 are the very same
        // capabilities, not recreated ones.
        assert_eq!(
            down.vetted_layers(),
            vec![Layer::L0, Layer::L1, Layer::L2]
        );
        assert!(same_layer1(&chain, &down));
        assert!(same_layer2(&chain, &down));
    }

    #[test]
    fn shifting_up_attaches_a_fresh_predicate_for_the_new_layer() {
        let chain = PredicateChain::with_defaults(Layer::L1);
        let up = chain.shift(1).unwrap();

        assert_eq!(up.current(), Layer::L2);
        assert!(up.is_vetted(Layer::L2));
        assert!(same_layer1(&chain, &up));
    }

    #[test]
    fn round_trip_restores_the_vetted_layer_and_lower_capabilities() {
        let chain = PredicateChain::with_defaults(Layer::L2);
        let there_and_back = chain.shift(1).unwrap().shift(-1).unwrap();

        assert_eq!(there_and_back.current(), chain.current());
        assert!(same_layer1(&chain, &there_and_back));
        assert!(same_layer2(&chain, &there_and_back));
    }

    #[test]
    fn out_of_range_shift_is_rejected() {
        let bottom = PredicateChain::make();
        let err = bottom.shift(-1).unwrap_err();
        assert_eq!(err.from, Layer::L0);

        let top = PredicateChain::with_defaults(Layer::MAX);
        assert!(top.shift(1).is_err());
        // The original is untouched either way.
        assert_eq!(top.current(), Layer::L3);
    }

    #[test]
    fn custom_predicates_survive_navigation_below_them() {
        let custom: Arc<dyn Layer1Predicate> =
            Arc::new(FixedAssertion(LatticeDirection::Up));
        let chain = PredicateChain::with_defaults(Layer::MAX).with_layer1(Arc::clone(&custom));

        let down_twice = chain.shift(-1).unwrap().shift(-1).unwrap();
        assert_eq!(down_twice.current(), Layer::L1);
        assert!(Arc::ptr_eq(down_twice.layer1().unwrap(), &custom));
    }
}
