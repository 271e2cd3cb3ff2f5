use std::collections::HashSet;

use proptest::prelude::*;

use crate::{Event, GameStateGenerator, GeneratorConfig, LifecycleSignal, sampling_interval};

use super::support::{
    RecordingSink, TestEvent, TestFormat, TestNotification, TestPlayer, VecDecoder, gameplay,
    lifecycle, round_end,
};

fn notification(op: u8, actor: u64) -> TestNotification {
    match op {
        0 => lifecycle(LifecycleSignal::MatchStart),
        1 => lifecycle(LifecycleSignal::RoundStart),
        2 => lifecycle(LifecycleSignal::FreezeEnd),
        3 => round_end(if actor % 2 == 0 { "Terrorist" } else { "CounterTerrorist" }),
        4 => lifecycle(LifecycleSignal::MatchEnd),
        5 => gameplay(TestEvent::Step(actor)),
        6 => gameplay(TestEvent::Shot(actor)),
        7 => gameplay(TestEvent::Jump(actor)),
        _ => gameplay(TestEvent::Kill {
            killer: (actor != 0).then_some(actor),
            victim: (actor + 1) % 4,
        }),
    }
}

// Match end is rare so most streams exercise a running match.
fn op() -> impl Strategy<Value = u8> {
    prop_oneof![
        1 => Just(0u8),
        3 => Just(1u8),
        3 => Just(2u8),
        3 => Just(3u8),
        1 => Just(4u8),
        8 => 5u8..9u8,
    ]
}

fn stream() -> impl Strategy<Value = Vec<Vec<(u8, u64)>>> {
    proptest::collection::vec(proptest::collection::vec((op(), 0u64..4u64), 0..5), 0..160)
}

fn build_decoder(ticks: &[Vec<(u8, u64)>]) -> VecDecoder {
    let players = (0..4).map(TestPlayer::new).collect();
    let mut decoder = VecDecoder::new(64.0, players);
    for tick in ticks {
        decoder.tick(
            tick.iter()
                .map(|&(op, actor)| notification(op, actor))
                .collect(),
        );
    }
    decoder
}

proptest! {
    #[test]
    fn sampling_interval_follows_closed_form(rate in 1u64..=1024u64) {
        prop_assert_eq!(sampling_interval(rate as f64), 8 * rate.div_ceil(32));
    }

    #[test]
    fn generated_documents_keep_structural_invariants(ticks in stream()) {
        let mut decoder = build_decoder(&ticks);
        let sink = RecordingSink::default();
        let stored = sink.document.clone();

        let report = GameStateGenerator::with_default_config(TestFormat)
            .generate(&mut decoder, sink)
            .expect("valid tick rate never fails");
        let document = stored.borrow().clone().expect("document always written");

        let mut previous_tick = None;
        for (index, round) in document.rounds().iter().enumerate() {
            prop_assert_eq!(round.round_id as usize, index + 1);
            for tick in &round.ticks {
                prop_assert!(!tick.events.is_empty());
                if let Some(previous) = previous_tick {
                    prop_assert!(tick.tick_id > previous);
                }
                previous_tick = Some(tick.tick_id);

                let discrete: HashSet<u64> = tick
                    .events
                    .iter()
                    .filter(|event| !matches!(event, Event::PlayerPosition(_)))
                    .flat_map(|event| event.tracked_actors())
                    .map(|id| id.value())
                    .collect();
                let mut sampled = HashSet::new();
                for event in tick.events.iter().filter(|e| matches!(e, Event::PlayerPosition(_))) {
                    for id in event.tracked_actors() {
                        prop_assert!(!discrete.contains(&id.value()));
                        prop_assert!(sampled.insert(id.value()));
                    }
                }
            }
        }

        prop_assert_eq!(report.rounds, document.rounds().len());
        prop_assert!(report.ticks_retained <= report.ticks_parsed);
    }

    #[test]
    fn gameplay_outside_the_match_does_not_change_the_document(
        ticks in stream(),
        noise in proptest::collection::vec((5u8..9u8, 0u64..4u64), 1..6),
    ) {
        let clean = GameStateGenerator::with_default_config(TestFormat)
            .generate_string(&mut build_decoder(&ticks))
            .expect("clean run")
            .0;

        // Gameplay ahead of the whole stream arrives before any match start.
        let mut noisy_ticks = ticks.clone();
        match noisy_ticks.first_mut() {
            Some(first) => {
                let mut prefixed = noise.clone();
                prefixed.extend(first.iter().copied());
                *first = prefixed;
            }
            None => noisy_ticks.push(noise.clone()),
        }
        let noisy = GameStateGenerator::new(TestFormat, GeneratorConfig::default())
            .generate_string(&mut build_decoder(&noisy_ticks))
            .expect("noisy run")
            .0;

        prop_assert_eq!(clean, noisy);
    }
}
