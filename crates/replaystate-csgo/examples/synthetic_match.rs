use replaystate_core::{GeneratorConfig, JsonFileSink};
use replaystate_csgo::{CsgoFormat, CsgoGenerator, SyntheticConfig, SyntheticReplay};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(12345);

    let mut decoder = SyntheticReplay::new(SyntheticConfig::default(), seed)
        .decoder()
        .expect("generated script should be valid");

    let output = std::env::temp_dir().join(format!("synthetic-{seed}.json"));
    let sink = JsonFileSink::new(&output);
    let config = GeneratorConfig::from_default_yaml().expect("embedded config should parse");

    let report = CsgoGenerator::new(CsgoFormat, config)
        .generate(&mut decoder, sink)
        .expect("generation failed");

    println!(
        "output={} rounds={} ticks_parsed={} ticks_retained={} events={}",
        output.display(),
        report.rounds,
        report.ticks_parsed,
        report.ticks_retained,
        report.events_recorded
    );
}
