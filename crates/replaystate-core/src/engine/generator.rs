use std::time::Instant;

use tracing::{debug, info, warn};

use crate::{
    document::{GameStateDocument, Match, Meta},
    engine::{
        accumulator::RoundAccumulator,
        adapter::{DecoderAdapter, LifecycleSignal, Notification, ReplayFormat},
        config::GeneratorConfig,
        error::GenerateError,
        lifecycle::{LifecycleState, Transition},
        report::{RunOutcome, RunReport},
        sink::{JsonStringSink, OutputSink},
        tick::{SamplingSchedule, TickAggregator},
    },
};

/// Drives a decoder to the end of its stream and aggregates the notifications
/// into a gamestate document.
///
/// The generator holds no per-run state; every call to [`generate`](Self::generate)
/// builds a fresh aggregation context, so one generator can process any number
/// of replays one after another.
#[derive(Debug, Clone)]
pub struct GameStateGenerator<F> {
    format: F,
    config: GeneratorConfig,
}

impl<F: ReplayFormat> GameStateGenerator<F> {
    pub fn new(format: F, config: GeneratorConfig) -> Self {
        GameStateGenerator { format, config }
    }

    pub fn with_default_config(format: F) -> Self {
        Self::new(format, GeneratorConfig::default())
    }

    pub fn format(&self) -> &F {
        &self.format
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run the decoder to completion and hand the document to `sink` once.
    ///
    /// A tick rate without a usable sampling interval fails before any tick is
    /// decoded and without touching the sink. A decoder failure mid-stream is not
    /// an error: the document built so far is written and the report is marked
    /// degraded. The sink is dropped when this returns, on every path.
    pub fn generate<D, S>(&self, decoder: &mut D, mut sink: S) -> Result<RunReport, GenerateError>
    where
        D: DecoderAdapter<Player = F::Player, Event = F::Event>,
        S: OutputSink,
    {
        let started = Instant::now();
        let tick_rate = decoder.tick_rate();
        let schedule = SamplingSchedule::from_tick_rate(tick_rate)?;

        info!(
            map = decoder.map_name(),
            tick_rate,
            sampling_interval = schedule.interval(),
            "generating gamestate"
        );

        let mut run = MatchAggregation::new(
            schedule,
            RunReport::new(decoder.map_name().to_string(), tick_rate, schedule.interval()),
        );
        let mut notifications = Vec::new();

        let outcome = loop {
            notifications.clear();
            match decoder.advance_tick(&mut notifications) {
                Ok(true) => {
                    for notification in notifications.drain(..) {
                        run.dispatch(&self.format, &self.config, &*decoder, notification);
                    }
                    run.close_tick(&self.format, decoder.participants());
                }
                Ok(false) => break RunOutcome::Complete,
                Err(error) => {
                    warn!(%error, "replay stream failed; writing partial gamestate");
                    break RunOutcome::Degraded { error };
                }
            }
        };

        let (document, mut report) = run.finish(outcome);
        sink.write(&document, self.config.pretty)?;
        report.elapsed = started.elapsed();

        info!(
            ticks_parsed = report.ticks_parsed,
            ticks_retained = report.ticks_retained,
            rounds = report.rounds,
            elapsed_ms = report.elapsed.as_millis() as u64,
            degraded = report.is_degraded(),
            "gamestate generated"
        );
        Ok(report)
    }

    /// Run the decoder and return the serialized document as a string.
    pub fn generate_string<D>(&self, decoder: &mut D) -> Result<(String, RunReport), GenerateError>
    where
        D: DecoderAdapter<Player = F::Player, Event = F::Event>,
    {
        let mut sink = JsonStringSink::new();
        let report = self.generate(decoder, &mut sink)?;
        Ok((sink.into_string(), report))
    }
}

/// Aggregation state of one run.
struct MatchAggregation {
    state: LifecycleState,
    meta: Option<Meta>,
    rounds: RoundAccumulator,
    ticks: TickAggregator,
    finished: Option<Match>,
    report: RunReport,
}

impl MatchAggregation {
    fn new(schedule: SamplingSchedule, report: RunReport) -> Self {
        MatchAggregation {
            state: LifecycleState::Idle,
            meta: None,
            rounds: RoundAccumulator::new(),
            ticks: TickAggregator::new(schedule),
            finished: None,
            report,
        }
    }

    /// Route one notification to the lifecycle or gameplay path.
    fn dispatch<F, D>(
        &mut self,
        format: &F,
        config: &GeneratorConfig,
        decoder: &D,
        notification: Notification<F::Event>,
    ) where
        F: ReplayFormat,
        D: DecoderAdapter<Player = F::Player, Event = F::Event>,
    {
        match notification {
            Notification::Lifecycle(signal) => self.on_lifecycle(format, decoder, signal),
            Notification::Gameplay(raw) => {
                self.on_gameplay(format, config, &raw, decoder.participants())
            }
        }
    }

    fn on_lifecycle<F, D>(&mut self, format: &F, decoder: &D, signal: LifecycleSignal)
    where
        F: ReplayFormat,
        D: DecoderAdapter<Player = F::Player, Event = F::Event>,
    {
        let tick_id = self.ticks.tick_id();
        match self.state.apply(signal) {
            transition @ (Transition::StartMatch | Transition::RefreshMeta) => {
                if transition == Transition::StartMatch {
                    debug!(tick_id, "match started");
                } else {
                    debug!(tick_id, "match restarted; metadata reassembled");
                }
                self.meta = Some(format.assemble_meta(
                    decoder.map_name(),
                    decoder.tick_rate(),
                    decoder.participants(),
                ));
            }
            Transition::OpenRound => {
                let round_id = self.rounds.open_round();
                debug!(tick_id, round_id, "round started");
            }
            Transition::RestartRound => {
                self.report.restarted_rounds += 1;
                debug!(
                    tick_id,
                    round_id = self.rounds.open_round_id(),
                    "round restarted before it ended"
                );
            }
            Transition::GoLive => debug!(tick_id, "freeze time ended"),
            Transition::StrayFreezeEnd => {
                self.report.stray_freeze_ends += 1;
                debug!(tick_id, "freeze end outside of freeze time ignored");
            }
            Transition::FinalizeRound { winner } => {
                let round = self.rounds.finalize_round(winner);
                debug!(
                    tick_id,
                    round_id = round.round_id,
                    winner = %round.winner_team,
                    ticks = round.ticks.len(),
                    "round finalized"
                );
            }
            Transition::OrphanRoundEnd => {
                self.report.orphan_round_ends += 1;
                warn!(
                    tick_id,
                    open_ticks = self.rounds.open_tick_count(),
                    "round end without a started round; no round finalized"
                );
            }
            Transition::EndMatch => {
                self.discard_unfinished();
                self.report.match_ended = true;
                self.finished = Some(std::mem::take(&mut self.rounds).into_match());
                debug!(tick_id, "match ended");
            }
            Transition::Ignored => debug!(tick_id, state = ?self.state, "lifecycle signal ignored"),
        }
    }

    fn on_gameplay<F: ReplayFormat>(
        &mut self,
        format: &F,
        config: &GeneratorConfig,
        raw: &F::Event,
        participants: &[F::Player],
    ) {
        if !self.state.is_active() {
            self.report.gated_events += 1;
            return;
        }

        let Some(event) = format.map_event(raw, participants) else {
            return;
        };
        if !config.admits(&event) {
            self.report.filtered_events += 1;
            return;
        }

        let gaps = event.data_gaps();
        if gaps > 0 {
            self.report.data_gaps += gaps as u64;
            debug!(
                tick_id = self.ticks.tick_id(),
                kind = event.kind(),
                gaps,
                "event recorded with absent references"
            );
        }

        self.ticks.push(event);
        self.report.events_recorded += 1;
    }

    fn close_tick<F: ReplayFormat>(&mut self, format: &F, participants: &[F::Player]) {
        if !self.state.is_active() {
            return;
        }
        if let Some(tick) = self
            .ticks
            .close(self.state.samples_positions(), format, participants)
        {
            self.rounds.push_tick(tick);
        }
    }

    /// Drop the pending tick and the open round's ticks, which never reach the document.
    fn discard_unfinished(&mut self) {
        let dropped = self.ticks.discard_pending() + self.rounds.open_event_count();
        self.report.discarded_events += dropped as u64;
    }

    fn finish(mut self, outcome: RunOutcome) -> (GameStateDocument, RunReport) {
        let game_match = match self.finished.take() {
            Some(game_match) => Some(game_match),
            None if self.state.is_active() => {
                self.discard_unfinished();
                Some(self.rounds.into_match())
            }
            None => None,
        };

        let stats = self.ticks.stats();
        let mut report = self.report;
        report.outcome = outcome;
        report.ticks_parsed = stats.parsed;
        report.ticks_retained = stats.retained;
        report.positions_sampled = stats.positions_sampled;
        report.rounds = game_match.as_ref().map_or(0, |m| m.rounds.len());

        let document = GameStateDocument {
            meta: self.meta,
            game_match,
        };
        (document, report)
    }
}
