use std::collections::{HashMap, HashSet};

use crate::{RawPlayer, ScriptError};

/// Every player a script can reference, keyed by name.
///
/// Playing participants come first so the decoder can hand out a contiguous
/// slice of them; spectators follow and can be referenced by events but are
/// never sampled and never recorded as footstep or connection actors.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<RawPlayer>,
    participant_count: usize,
    name_to_index: HashMap<String, usize>,
}

impl Roster {
    /// Build a roster, rejecting empty participant lists and duplicate names
    /// or steam ids.
    pub fn new(participants: &[RawPlayer], spectators: &[RawPlayer]) -> Result<Self, ScriptError> {
        if participants.is_empty() {
            return Err(ScriptError::EmptyRoster);
        }

        let mut roster = Roster {
            players: Vec::with_capacity(participants.len() + spectators.len()),
            participant_count: participants.len(),
            name_to_index: HashMap::new(),
        };
        let mut steam_ids = HashSet::new();

        for player in participants.iter().chain(spectators) {
            if roster.name_to_index.contains_key(&player.name) || !steam_ids.insert(player.steam_id)
            {
                return Err(ScriptError::DuplicatePlayer {
                    name: player.name.clone(),
                });
            }
            roster
                .name_to_index
                .insert(player.name.clone(), roster.players.len());
            roster.players.push(player.clone());
        }

        Ok(roster)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// Current state of a named player.
    pub fn get(&self, name: &str) -> Option<&RawPlayer> {
        self.index_of(name).map(|index| &self.players[index])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut RawPlayer> {
        let index = self.index_of(name)?;
        self.players.get_mut(index)
    }

    pub fn participants(&self) -> &[RawPlayer] {
        &self.players[..self.participant_count]
    }

    pub fn spectators(&self) -> &[RawPlayer] {
        &self.players[self.participant_count..]
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
