use std::{collections::HashSet, num::NonZeroU64};

use crate::{
    document::{Tick, actor::ActorId, event::Event},
    engine::{adapter::ReplayFormat, error::GenerateError},
};

/// Number of ticks between synthesized position samples: `8 * ceil(tick_rate / 32)`.
///
/// 64 tick replays are sampled every 16 ticks and 128 tick replays every 32, which
/// keeps roughly four samples per second. Non-finite, non-positive or
/// implausibly large tick rates yield 0.
pub fn sampling_interval(tick_rate: f64) -> u64 {
    if !tick_rate.is_finite() || tick_rate <= 0.0 {
        return 0;
    }
    let windows = (tick_rate / 32.0).ceil();
    if windows >= u64::MAX as f64 {
        return 0;
    }
    (windows as u64).checked_mul(8).unwrap_or(0)
}

/// Sampling interval validated once from the replay header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingSchedule {
    interval: NonZeroU64,
}

impl SamplingSchedule {
    pub fn from_tick_rate(tick_rate: f64) -> Result<Self, GenerateError> {
        NonZeroU64::new(sampling_interval(tick_rate))
            .map(|interval| SamplingSchedule { interval })
            .ok_or(GenerateError::ZeroSamplingInterval { tick_rate })
    }

    pub fn interval(&self) -> u64 {
        self.interval.get()
    }

    pub fn is_due(&self, tick_id: u64) -> bool {
        tick_id % self.interval.get() == 0
    }
}

/// Counters kept across the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Tick boundaries processed while the match was active.
    pub parsed: u64,
    /// Ticks that carried at least one event and were stored.
    pub retained: u64,
    pub positions_sampled: u64,
}

/// Buffers the events of the tick being decoded and decides at the tick
/// boundary whether the tick is kept.
#[derive(Debug, Clone)]
pub struct TickAggregator {
    schedule: SamplingSchedule,
    tick_id: u64,
    events: Vec<Event>,
    tracked: HashSet<ActorId>,
    stats: TickStats,
}

impl TickAggregator {
    pub fn new(schedule: SamplingSchedule) -> Self {
        TickAggregator {
            schedule,
            tick_id: 0,
            events: Vec::new(),
            tracked: HashSet::new(),
            stats: TickStats::default(),
        }
    }

    /// Id the tick currently being decoded will receive.
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    pub fn stats(&self) -> TickStats {
        self.stats
    }

    pub fn pending_events(&self) -> &[Event] {
        &self.events
    }

    /// Whether a participant already appears in a discrete event this tick.
    pub fn is_tracked(&self, actor: ActorId) -> bool {
        self.tracked.contains(&actor)
    }

    /// Add a mapped event to the current tick and exempt its actors from sampling.
    pub fn push(&mut self, event: Event) {
        self.tracked.extend(event.tracked_actors());
        self.events.push(event);
    }

    /// Close the current tick.
    ///
    /// When `sample` is set and the tick falls on the sampling schedule, every
    /// participant without a discrete event this tick receives a position
    /// snapshot. Returns the tick if it holds any event. Either way the tick id
    /// advances and the dedup set is cleared.
    pub fn close<F: ReplayFormat>(
        &mut self,
        sample: bool,
        format: &F,
        participants: &[F::Player],
    ) -> Option<Tick> {
        if sample && self.schedule.is_due(self.tick_id) {
            for player in participants {
                let id = format.actor_id(player);
                if self.tracked.insert(id) {
                    self.events.push(format.position_snapshot(player));
                    self.stats.positions_sampled += 1;
                }
            }
        }

        let tick_id = self.tick_id;
        self.tick_id += 1;
        self.stats.parsed += 1;
        self.tracked.clear();

        if self.events.is_empty() {
            return None;
        }

        self.stats.retained += 1;
        Some(Tick {
            tick_id,
            events: std::mem::take(&mut self.events),
        })
    }

    /// Drop whatever the current tick buffered without closing it.
    /// Returns how many events were thrown away.
    pub fn discard_pending(&mut self) -> usize {
        self.tracked.clear();
        let dropped = self.events.len();
        self.events.clear();
        dropped
    }
}
