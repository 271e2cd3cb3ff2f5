use std::path::PathBuf;

use replaystate_core::JsonFileSink;
use replaystate_csgo::{CsgoFormat, CsgoGenerator, decoder_from_yaml};

fn main() {
    tracing_subscriber::fmt::init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("crates/replaystate-csgo/examples/sample.round.yaml"));

    let mut decoder = decoder_from_yaml(&path).expect("failed to load replay script");
    let sink = JsonFileSink::beside_replay(&path);
    let output = sink.path().to_path_buf();

    let report = CsgoGenerator::with_default_config(CsgoFormat)
        .generate(&mut decoder, sink)
        .expect("generation failed");

    println!(
        "output={} rounds={} degraded={}",
        output.display(),
        report.rounds,
        report.is_degraded()
    );
}
