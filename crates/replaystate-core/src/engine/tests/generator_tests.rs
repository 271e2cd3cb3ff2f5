use crate::{
    DecodeError, Event, GameStateDocument, GameStateGenerator, GenerateError, GeneratorConfig,
    LifecycleSignal, RunOutcome, RunReport,
};

use super::support::{
    RecordingSink, TestEvent, TestFormat, TestPlayer, VecDecoder, gameplay, lifecycle, round_end,
};

fn decoder(tick_rate: f64) -> VecDecoder {
    VecDecoder::new(tick_rate, vec![TestPlayer::new(1), TestPlayer::new(2)])
}

fn run(decoder: &mut VecDecoder, config: GeneratorConfig) -> (GameStateDocument, RunReport) {
    let sink = RecordingSink::default();
    let document = sink.document.clone();
    let report = GameStateGenerator::new(TestFormat, config)
        .generate(decoder, sink)
        .expect("run should succeed");
    let document = document.borrow_mut().take().expect("sink received a document");
    (document, report)
}

fn actor_ids(document: &GameStateDocument) -> Vec<u64> {
    document
        .rounds()
        .iter()
        .flat_map(|round| round.events())
        .flat_map(|event| event.tracked_actors())
        .map(|id| id.value())
        .collect()
}

fn play_round(decoder: &mut VecDecoder, shooter: u64, winner: &str) {
    decoder
        .tick(vec![lifecycle(LifecycleSignal::RoundStart)])
        .tick(vec![
            lifecycle(LifecycleSignal::FreezeEnd),
            gameplay(TestEvent::Shot(shooter)),
        ])
        .tick(vec![round_end(winner)]);
}

#[test]
fn stream_failure_keeps_only_finalized_rounds() {
    let mut decoder = decoder(128.0);
    decoder.tick(vec![lifecycle(LifecycleSignal::MatchStart)]);
    play_round(&mut decoder, 1, "Terrorist");
    play_round(&mut decoder, 2, "CounterTerrorist");
    play_round(&mut decoder, 1, "Terrorist");
    decoder
        .tick(vec![lifecycle(LifecycleSignal::RoundStart)])
        .tick(vec![gameplay(TestEvent::Shot(2))])
        .fail_with(DecodeError::Truncated { ticks_decoded: 12 });

    let sink = RecordingSink::default();
    let writes = sink.writes.clone();
    let releases = sink.releases.clone();
    let stored = sink.document.clone();

    let report = GameStateGenerator::with_default_config(TestFormat)
        .generate(&mut decoder, sink)
        .expect("stream errors are recovered");

    assert_eq!(
        report.outcome,
        RunOutcome::Degraded {
            error: DecodeError::Truncated { ticks_decoded: 12 }
        }
    );
    assert_eq!(writes.get(), 1);
    assert_eq!(releases.get(), 1);

    let document = stored.borrow().clone().expect("partial document written");
    let round_ids: Vec<u32> = document.rounds().iter().map(|r| r.round_id).collect();
    assert_eq!(round_ids, vec![1, 2, 3]);
    assert_eq!(report.rounds, 3);
    assert_eq!(report.discarded_events, 1);
    assert!(!report.match_ended);
    assert_eq!(document.meta.as_ref().map(|m| m.mapname.as_str()), Some("de_test"));
}

#[test]
fn zero_tick_rate_fails_before_decoding_and_never_writes() {
    let mut decoder = decoder(0.0);
    decoder.tick(vec![lifecycle(LifecycleSignal::MatchStart)]);

    let sink = RecordingSink::default();
    let writes = sink.writes.clone();
    let releases = sink.releases.clone();

    let err = GameStateGenerator::with_default_config(TestFormat)
        .generate(&mut decoder, sink)
        .expect_err("zero tick rate is fatal");

    assert!(matches!(err, GenerateError::ZeroSamplingInterval { .. }));
    assert_eq!(decoder.calls, 0);
    assert_eq!(writes.get(), 0);
    assert_eq!(releases.get(), 1);
}

#[test]
fn events_outside_the_match_never_reach_the_document() {
    let mut decoder = decoder(64.0);
    decoder
        .tick(vec![gameplay(TestEvent::Shot(9)), gameplay(TestEvent::Shot(9))])
        .tick(vec![
            gameplay(TestEvent::Shot(9)),
            lifecycle(LifecycleSignal::MatchStart),
            gameplay(TestEvent::Shot(1)),
        ]);
    play_round(&mut decoder, 2, "Terrorist");
    decoder
        .tick(vec![
            lifecycle(LifecycleSignal::MatchEnd),
            gameplay(TestEvent::Shot(9)),
        ])
        .tick(vec![
            lifecycle(LifecycleSignal::RoundStart),
            gameplay(TestEvent::Shot(9)),
            round_end("Terrorist"),
        ]);

    let (document, report) = run(&mut decoder, GeneratorConfig::default());

    assert!(!actor_ids(&document).contains(&9));
    assert_eq!(report.gated_events, 5);
    assert!(report.match_ended);
    assert_eq!(document.rounds().len(), 1);
    assert_eq!(report.outcome, RunOutcome::Complete);
}

#[test]
fn events_before_first_round_start_belong_to_round_one() {
    let mut decoder = decoder(64.0);
    decoder
        .tick(vec![
            lifecycle(LifecycleSignal::MatchStart),
            gameplay(TestEvent::Shot(1)),
        ])
        .tick(vec![lifecycle(LifecycleSignal::RoundStart)])
        .tick(vec![round_end("CounterTerrorist")]);

    let (document, _) = run(&mut decoder, GeneratorConfig::default());

    let round = &document.rounds()[0];
    assert_eq!(round.round_id, 1);
    assert_eq!(round.winner_team, "CounterTerrorist");
    assert_eq!(round.ticks[0].tick_id, 0);
}

#[test]
fn orphan_round_end_is_counted_and_finalizes_nothing() {
    let mut decoder = decoder(64.0);
    decoder
        .tick(vec![lifecycle(LifecycleSignal::MatchStart)])
        .tick(vec![gameplay(TestEvent::Shot(1)), round_end("Terrorist")])
        .tick(vec![lifecycle(LifecycleSignal::MatchEnd)]);

    let (document, report) = run(&mut decoder, GeneratorConfig::default());

    assert_eq!(report.orphan_round_ends, 1);
    assert!(document.rounds().is_empty());
    assert_eq!(report.discarded_events, 1);
}

#[test]
fn restarted_round_keeps_ids_contiguous() {
    let mut decoder = decoder(64.0);
    decoder
        .tick(vec![lifecycle(LifecycleSignal::MatchStart)])
        .tick(vec![lifecycle(LifecycleSignal::RoundStart)])
        .tick(vec![gameplay(TestEvent::Shot(1))])
        .tick(vec![lifecycle(LifecycleSignal::RoundStart)])
        .tick(vec![gameplay(TestEvent::Shot(2))])
        .tick(vec![round_end("Terrorist")]);
    play_round(&mut decoder, 1, "CounterTerrorist");

    let (document, report) = run(&mut decoder, GeneratorConfig::default());

    let round_ids: Vec<u32> = document.rounds().iter().map(|r| r.round_id).collect();
    assert_eq!(round_ids, vec![1, 2]);
    assert_eq!(document.rounds()[0].ticks.len(), 2);
    assert_eq!(report.restarted_rounds, 1);
}

#[test]
fn empty_round_is_still_appended() {
    let mut decoder = decoder(64.0);
    decoder
        .tick(vec![lifecycle(LifecycleSignal::MatchStart)])
        .tick(vec![lifecycle(LifecycleSignal::RoundStart)])
        .tick(vec![round_end("Terrorist")]);

    let (document, _) = run(&mut decoder, GeneratorConfig::default());

    assert_eq!(document.rounds().len(), 1);
    assert!(document.rounds()[0].ticks.is_empty());
}

#[test]
fn tick_ids_skip_discarded_ticks_and_never_repeat() {
    let mut decoder = decoder(128.0);
    decoder
        .tick(vec![
            lifecycle(LifecycleSignal::MatchStart),
            lifecycle(LifecycleSignal::RoundStart),
        ])
        .empty_ticks(1)
        .tick(vec![gameplay(TestEvent::Shot(1))])
        .empty_ticks(1)
        .tick(vec![gameplay(TestEvent::Shot(2))])
        .tick(vec![round_end("Terrorist")])
        .tick(vec![lifecycle(LifecycleSignal::RoundStart)])
        .tick(vec![gameplay(TestEvent::Shot(1))])
        .tick(vec![round_end("CounterTerrorist")]);

    let (document, report) = run(&mut decoder, GeneratorConfig::default());

    let tick_ids: Vec<Vec<u64>> = document
        .rounds()
        .iter()
        .map(|round| round.ticks.iter().map(|t| t.tick_id).collect())
        .collect();
    assert_eq!(tick_ids, vec![vec![2, 4], vec![7]]);
    assert_eq!(report.ticks_parsed, 9);
    assert_eq!(report.ticks_retained, 3);
}

#[test]
fn positions_are_sampled_only_after_freeze_time() {
    let mut decoder = decoder(64.0);
    decoder
        .tick(vec![
            lifecycle(LifecycleSignal::MatchStart),
            lifecycle(LifecycleSignal::RoundStart),
        ])
        .tick(vec![lifecycle(LifecycleSignal::FreezeEnd)])
        .empty_ticks(14)
        .tick(vec![gameplay(TestEvent::Step(2))])
        .tick(vec![round_end("Terrorist")]);

    let (document, report) = run(&mut decoder, GeneratorConfig::default());

    let round = &document.rounds()[0];
    assert_eq!(round.ticks.len(), 1);
    let tick = &round.ticks[0];
    assert_eq!(tick.tick_id, 16);
    let kinds: Vec<&str> = tick.events.iter().map(Event::kind).collect();
    assert_eq!(kinds, vec!["player_footstep", "player_position"]);
    assert_eq!(
        tick.events[1].tracked_actors().map(|id| id.value()).collect::<Vec<_>>(),
        vec![1]
    );
    assert_eq!(report.positions_sampled, 1);
}

#[test]
fn killed_by_world_omits_actor_and_counts_gap() {
    let mut decoder = decoder(64.0);
    decoder
        .tick(vec![
            lifecycle(LifecycleSignal::MatchStart),
            lifecycle(LifecycleSignal::RoundStart),
        ])
        .tick(vec![gameplay(TestEvent::Kill {
            killer: None,
            victim: 2,
        })])
        .tick(vec![round_end("CounterTerrorist")]);

    let (document, report) = run(&mut decoder, GeneratorConfig::default());

    let event = document.rounds()[0]
        .events()
        .next()
        .expect("kill recorded");
    let json = serde_json::to_value(event).expect("event serializes");
    assert_eq!(json["kind"], "player_killed");
    assert!(json.get("actor").is_none());
    assert_eq!(json["victim"]["player_id"], 2);
    // absent killer plus absent weapon
    assert_eq!(report.data_gaps, 2);
}

#[test]
fn configuration_filters_footsteps_and_extended_events() {
    let script = |decoder: &mut VecDecoder| {
        decoder
            .tick(vec![
                lifecycle(LifecycleSignal::MatchStart),
                lifecycle(LifecycleSignal::RoundStart),
            ])
            .tick(vec![
                gameplay(TestEvent::Step(1)),
                gameplay(TestEvent::Jump(2)),
            ])
            .tick(vec![round_end("Terrorist")]);
    };

    let mut defaults = decoder(64.0);
    script(&mut defaults);
    let (document, report) = run(&mut defaults, GeneratorConfig::default());
    let kinds: Vec<&str> = document.rounds()[0].events().map(Event::kind).collect();
    assert_eq!(kinds, vec!["player_footstep"]);
    assert_eq!(report.filtered_events, 1);

    let mut everything = decoder(64.0);
    script(&mut everything);
    let config = GeneratorConfig {
        footsteps: false,
        extended_events: true,
        ..GeneratorConfig::default()
    };
    let (document, _) = run(&mut everything, config);
    let kinds: Vec<&str> = document.rounds()[0].events().map(Event::kind).collect();
    assert_eq!(kinds, vec!["player_jumped"]);
}

#[test]
fn spectator_footsteps_are_not_recorded() {
    let mut decoder = decoder(64.0);
    decoder
        .tick(vec![
            lifecycle(LifecycleSignal::MatchStart),
            lifecycle(LifecycleSignal::RoundStart),
        ])
        .tick(vec![gameplay(TestEvent::Step(42))])
        .tick(vec![round_end("Terrorist")]);

    let (document, report) = run(&mut decoder, GeneratorConfig::default());

    assert!(document.rounds()[0].ticks.is_empty());
    assert_eq!(report.events_recorded, 0);
}

#[test]
fn stream_without_match_start_writes_empty_document() {
    let mut decoder = decoder(64.0);
    decoder.tick(vec![gameplay(TestEvent::Shot(1))]);

    let (document, report) = run(&mut decoder, GeneratorConfig::default());

    assert_eq!(document, GameStateDocument::default());
    assert_eq!(report.ticks_parsed, 0);
    assert_eq!(report.gated_events, 1);
}

#[test]
fn generate_string_produces_nested_document() {
    let mut decoder = decoder(64.0);
    decoder.tick(vec![lifecycle(LifecycleSignal::MatchStart)]);
    play_round(&mut decoder, 1, "Terrorist");
    decoder.tick(vec![lifecycle(LifecycleSignal::MatchEnd)]);

    let (json, report) = GameStateGenerator::with_default_config(TestFormat)
        .generate_string(&mut decoder)
        .expect("run should succeed");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

    assert_eq!(value["meta"]["mapname"], "de_test");
    assert_eq!(value["meta"]["tickrate"], 64.0);
    assert_eq!(value["meta"]["players"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["match"]["rounds"][0]["round_id"], 1);
    assert_eq!(value["match"]["rounds"][0]["winner_team"], "Terrorist");
    assert_eq!(
        value["match"]["rounds"][0]["ticks"][0]["events"][0]["kind"],
        "weapon_fire"
    );
    assert!(report.match_ended);

    let parsed = GameStateDocument::from_json_str(&json).expect("document parses back");
    assert_eq!(parsed.rounds().len(), 1);
}
