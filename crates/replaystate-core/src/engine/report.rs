use std::time::Duration;

use crate::engine::error::DecodeError;

/// How the decoder stream ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The decoder reported the end of the stream.
    Complete,
    /// The stream failed mid-run; the document holds everything finalized before it.
    Degraded { error: DecodeError },
}

/// Summary of one generator run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub map_name: String,
    pub tick_rate: f64,
    pub sampling_interval: u64,
    /// Whether the match-end signal was seen.
    pub match_ended: bool,
    pub ticks_parsed: u64,
    pub ticks_retained: u64,
    pub rounds: usize,
    pub events_recorded: u64,
    pub positions_sampled: u64,
    /// Gameplay notifications dropped because no match was active.
    pub gated_events: u64,
    /// Mapped events rejected by the generator configuration.
    pub filtered_events: u64,
    /// Absent actor or weapon references replaced by omitted fields.
    pub data_gaps: u64,
    /// Round ends received without a started round.
    pub orphan_round_ends: u64,
    pub restarted_rounds: u64,
    pub stray_freeze_ends: u64,
    /// Events aggregated into ticks or rounds that never got finalized.
    pub discarded_events: u64,
    pub elapsed: Duration,
}

impl RunReport {
    pub(crate) fn new(map_name: String, tick_rate: f64, sampling_interval: u64) -> Self {
        RunReport {
            outcome: RunOutcome::Complete,
            map_name,
            tick_rate,
            sampling_interval,
            match_ended: false,
            ticks_parsed: 0,
            ticks_retained: 0,
            rounds: 0,
            events_recorded: 0,
            positions_sampled: 0,
            gated_events: 0,
            filtered_events: 0,
            data_gaps: 0,
            orphan_round_ends: 0,
            restarted_rounds: 0,
            stray_freeze_ends: 0,
            discarded_events: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.outcome, RunOutcome::Degraded { .. })
    }
}
