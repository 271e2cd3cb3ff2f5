pub mod actor;
pub mod event;

use serde::{Deserialize, Serialize};

use crate::document::{actor::ActorId, event::Event};

/// Root of the serialized gamestate: replay metadata plus the aggregated match.
///
/// Both halves are optional. `meta` is attached when the match starts and
/// `match` once the match ends or the run is flushed, so a replay whose match
/// never started serializes as `{"meta": null, "match": null}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStateDocument {
    pub meta: Option<Meta>,
    #[serde(rename = "match")]
    pub game_match: Option<Match>,
}

impl GameStateDocument {
    /// Parse a document previously produced by a sink.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the document, optionally pretty printed.
    pub fn to_json_string(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    /// Return the finalized rounds, or an empty slice if no match was attached.
    pub fn rounds(&self) -> &[Round] {
        self.game_match
            .as_ref()
            .map(|m| m.rounds.as_slice())
            .unwrap_or(&[])
    }
}

/// Replay-level metadata, attached once at match start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub mapname: String,
    pub tickrate: f64,
    pub players: Vec<PlayerMeta>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerMeta {
    pub playername: String,
    pub player_id: ActorId,
    pub team: String,
    pub clanname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub rounds: Vec<Round>,
}

/// One play of the match. Ticks are owned exclusively by their round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub round_id: u32,
    pub winner_team: String,
    pub ticks: Vec<Tick>,
}

/// All events decoded within one replay tick. Only ticks with at least one
/// event are ever stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub tick_id: u64,
    pub events: Vec<Event>,
}

impl Round {
    /// Iterate every event of this round in tick order.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.ticks.iter().flat_map(|tick| tick.events.iter())
    }
}
