use strata_kernel::{BiasedOracle, DecisionSource, FixedDecision, LatticeDirection, Layer};

pub fn parse_layer_or_exit(index: usize) -> Layer {
    Layer::from_index(index).unwrap_or_else(|| {
        eprintln!(
            "error: start layer {index} is out of range: expected 0-{}",
            Layer::MAX.index()
        );
        std::process::exit(1);
    })
}

pub fn parse_direction_or_exit(name: &str) -> LatticeDirection {
    name.parse().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

/// Decision source for a run: a fixed override when `--decide` is given,
/// otherwise the biased oracle (seeded, or from the wall clock).
pub fn decision_source(seed: Option<u64>, decide: Option<&str>) -> Box<dyn DecisionSource> {
    match decide {
        Some(name) => Box::new(FixedDecision(parse_direction_or_exit(name))),
        None => match seed {
            Some(seed) => Box::new(BiasedOracle::seeded(seed)),
            None => Box::new(BiasedOracle::from_entropy()),
        },
    }
}
