use crate::support::{decision_source, parse_layer_or_exit};
use serde_json::json;
use strata_kernel::{
    ContextChain, Engine, MemoryDiagnostics, PredicateChain, RecordingOps, StderrDiagnostics,
    StdoutOps,
};

pub fn run(
    x: i64,
    y: i64,
    start_layer: usize,
    seed: Option<u64>,
    decide: Option<String>,
    json_output: bool,
) {
    let start = parse_layer_or_exit(start_layer);
    let mut decide = decision_source(seed, decide.as_deref());

    let mut ctx = ContextChain::make(start);
    let pdc = PredicateChain::with_defaults(start);

    if json_output {
        let mut diag = MemoryDiagnostics::new();
        let mut ops = RecordingOps::new();
        let outcome = Engine::new(decide.as_mut(), &mut diag, &mut ops)
            .tunnel(x, y, start, &mut ctx, &pdc);

        let operations: Vec<_> = ops
            .executed
            .iter()
            .map(|(layer, x, y)| json!({"layer": layer, "x": x, "y": y}))
            .collect();
        let payload = json!({
            "x": x,
            "y": y,
            "startLayer": start.index(),
            "result": if outcome.is_ok() { "settled" } else { "failed" },
            "settlement": outcome.as_ref().ok(),
            "error": outcome.as_ref().err().map(|e| e.to_string()),
            "warnings": diag.entries,
            "operations": operations,
        });
        let rendered = serde_json::to_string_pretty(&payload).unwrap_or_else(|err| {
            eprintln!("error: failed to render run payload: {err}");
            std::process::exit(1);
        });
        println!("{rendered}");

        if outcome.is_err() {
            std::process::exit(1);
        }
    } else {
        let mut diag = StderrDiagnostics;
        let mut ops = StdoutOps;
        let outcome = Engine::new(decide.as_mut(), &mut diag, &mut ops)
            .tunnel(x, y, start, &mut ctx, &pdc);

        println!("strata run {x} {y} --start-layer {}", start.index());
        match outcome {
            Ok(settled) => {
                println!("  Settled at: {}", settled.layer);
                println!(
                    "  Via fallback: {}",
                    if settled.via_fallback { "yes" } else { "no" }
                );
            }
            Err(e) => {
                println!("  Failed: {e}");
                std::process::exit(1);
            }
        }
    }
}
