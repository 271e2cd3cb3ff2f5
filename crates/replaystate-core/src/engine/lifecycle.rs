use crate::engine::adapter::LifecycleSignal;

/// Sub-state of an active match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoundPhase {
    /// Between rounds, or before the first round start.
    #[default]
    Pending,
    /// Round started, freeze time still running.
    Freeze,
    /// Freeze time over; position sampling enabled.
    Live,
}

/// Match lifecycle. Illegal flag combinations such as "round live while the
/// match has not started" cannot be expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LifecycleState {
    #[default]
    Idle,
    MatchActive(RoundPhase),
    MatchEnded,
}

/// Effect a lifecycle signal has on the accumulated match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// First match start: attach metadata.
    StartMatch,
    /// Match start while already active: metadata is reassembled.
    RefreshMeta,
    /// Stamp the next round id on the open round.
    OpenRound,
    /// Round start while a round is already running; the open round continues.
    RestartRound,
    GoLive,
    /// Freeze end outside of freeze time.
    StrayFreezeEnd,
    FinalizeRound { winner: String },
    /// Round end without a matching round start. Nothing is finalized.
    OrphanRoundEnd,
    EndMatch,
    /// Signal arrived before the match started or after it ended.
    Ignored,
}

impl LifecycleState {
    /// Gameplay events are aggregated only while the match is active.
    pub fn is_active(&self) -> bool {
        matches!(self, LifecycleState::MatchActive(_))
    }

    /// Synthesized position snapshots are emitted only after freeze time.
    pub fn samples_positions(&self) -> bool {
        matches!(self, LifecycleState::MatchActive(RoundPhase::Live))
    }

    pub fn phase(&self) -> Option<RoundPhase> {
        match self {
            LifecycleState::MatchActive(phase) => Some(*phase),
            LifecycleState::Idle | LifecycleState::MatchEnded => None,
        }
    }

    /// Advance the state machine and report what the accumulator has to do.
    pub fn apply(&mut self, signal: LifecycleSignal) -> Transition {
        use LifecycleSignal as S;
        use LifecycleState::{Idle, MatchActive, MatchEnded};
        use RoundPhase::{Freeze, Live, Pending};

        let (next, transition) = match (*self, signal) {
            (MatchEnded, _) => (MatchEnded, Transition::Ignored),
            (Idle, S::MatchStart) => (MatchActive(Pending), Transition::StartMatch),
            (Idle, _) => (Idle, Transition::Ignored),
            (MatchActive(phase), S::MatchStart) => (MatchActive(phase), Transition::RefreshMeta),
            (MatchActive(Pending), S::RoundStart) => (MatchActive(Freeze), Transition::OpenRound),
            (MatchActive(Freeze | Live), S::RoundStart) => {
                (MatchActive(Freeze), Transition::RestartRound)
            }
            (MatchActive(Freeze), S::FreezeEnd) => (MatchActive(Live), Transition::GoLive),
            (MatchActive(phase @ (Pending | Live)), S::FreezeEnd) => {
                (MatchActive(phase), Transition::StrayFreezeEnd)
            }
            (MatchActive(Freeze | Live), S::RoundEnd { winner }) => {
                (MatchActive(Pending), Transition::FinalizeRound { winner })
            }
            (MatchActive(Pending), S::RoundEnd { .. }) => {
                (MatchActive(Pending), Transition::OrphanRoundEnd)
            }
            (MatchActive(_), S::MatchEnd) => (MatchEnded, Transition::EndMatch),
        };

        *self = next;
        transition
    }
}
