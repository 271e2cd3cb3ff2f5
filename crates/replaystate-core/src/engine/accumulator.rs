use crate::document::{Match, Round, Tick};

/// Owns the match being built and the round currently receiving ticks.
///
/// A round is always open while the match is active. Finalizing moves the open
/// round into the match and replaces it in the same step, so a finalized round
/// can never receive another tick.
#[derive(Debug, Clone, Default)]
pub struct RoundAccumulator {
    game_match: Match,
    open: Round,
}

impl RoundAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp the open round with the next id and return it.
    ///
    /// Ids follow the number of finalized rounds, so retained rounds are always
    /// numbered 1, 2, 3, ... even when round ends were dropped.
    pub fn open_round(&mut self) -> u32 {
        let round_id = self.game_match.rounds.len() as u32 + 1;
        self.open.round_id = round_id;
        round_id
    }

    pub fn push_tick(&mut self, tick: Tick) {
        self.open.ticks.push(tick);
    }

    /// Stamp the winner, move the open round into the match and open a fresh one.
    pub fn finalize_round(&mut self, winner: String) -> &Round {
        self.open.winner_team = winner;
        let round = std::mem::take(&mut self.open);
        self.game_match.rounds.push(round);
        &self.game_match.rounds[self.game_match.rounds.len() - 1]
    }

    pub fn open_round_id(&self) -> u32 {
        self.open.round_id
    }

    pub fn open_tick_count(&self) -> usize {
        self.open.ticks.len()
    }

    /// Events held by the open round, lost if the round is never finalized.
    pub fn open_event_count(&self) -> usize {
        self.open.ticks.iter().map(|tick| tick.events.len()).sum()
    }

    pub fn finalized_rounds(&self) -> &[Round] {
        &self.game_match.rounds
    }

    /// Consume the accumulator, keeping only finalized rounds.
    pub fn into_match(self) -> Match {
        self.game_match
    }
}
