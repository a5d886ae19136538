//! Local operations executed when a predicate settles.
//!
//! When the active layer's assertion reports `neutral`, the tunnel has
//! found the layer the request belongs to and the layer's service runs
//! with the arguments and the context threaded down to it. Like the
//! decision source, the operation set is an injected capability.

use crate::context::ContextChain;
use crate::layer::Layer;

/// The per-layer side-effecting actions.
pub trait LayerOps {
    fn execute(&mut self, layer: Layer, x: i64, y: i64, ctx: &ContextChain);
}

/// Bring-up operations: a service trace on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutOps;

impl LayerOps for StdoutOps {
    fn execute(&mut self, layer: Layer, x: i64, y: i64, ctx: &ContextChain) {
        println!(
            "{layer} service executing: x = {x}; y = {y}; context {} = {}",
            ctx.current(),
            ctx.value()
        );
        println!("{layer} service completed");
    }
}

/// Records each execution for assertions in tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingOps {
    pub executed: Vec<(Layer, i64, i64)>,
}

impl RecordingOps {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LayerOps for RecordingOps {
    fn execute(&mut self, layer: Layer, x: i64, y: i64, _ctx: &ContextChain) {
        self.executed.push((layer, x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_ops_keep_execution_order() {
        let mut ops = RecordingOps::new();
        let ctx = ContextChain::make(Layer::L1);
        ops.execute(Layer::L1, 2, 3, &ctx);
        ops.execute(Layer::L0, 2, 3, &ctx);
        assert_eq!(ops.executed, vec![(Layer::L1, 2, 3), (Layer::L0, 2, 3)]);
    }
}
