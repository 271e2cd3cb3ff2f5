use replaystate_core::LifecycleSignal;
use serde::{Deserialize, Serialize};

use crate::{
    Equipment, GameplayEvent, RawPlayer, Roster, ScriptError, ScriptedDecoder, Team, Vector3,
};

/// Script schema version written by this crate.
pub const SCRIPT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Serializable replay script: a header, the roster and the notifications of
/// every tick in decode order.
pub struct ReplayScript {
    /// Schema version for future compatibility checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    pub map: String,
    pub tick_rate: f64,
    /// Playing participants.
    pub roster: Vec<RawPlayer>,
    /// Players that can be referenced by events but are not playing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spectators: Vec<RawPlayer>,
    #[serde(default)]
    pub ticks: Vec<ScriptTick>,
    /// How the stream ends once every tick is decoded. Absent means cleanly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<ScriptFailure>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// One decoded tick.
pub struct ScriptTick {
    /// Empty ticks decoded before this one.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub wait: u32,
    /// Player state changes applied before any notification of this tick.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub updates: Vec<PlayerUpdate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notify: Vec<ScriptNotification>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptNotification {
    Lifecycle(ScriptSignal),
    Gameplay(GameplayEvent<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptSignal {
    MatchStart,
    RoundStart,
    FreezeEnd,
    RoundEnd { winner: Team },
    MatchEnd,
}

impl From<&ScriptSignal> for LifecycleSignal {
    fn from(signal: &ScriptSignal) -> Self {
        match signal {
            ScriptSignal::MatchStart => LifecycleSignal::MatchStart,
            ScriptSignal::RoundStart => LifecycleSignal::RoundStart,
            ScriptSignal::FreezeEnd => LifecycleSignal::FreezeEnd,
            ScriptSignal::RoundEnd { winner } => LifecycleSignal::RoundEnd {
                winner: winner.to_string(),
            },
            ScriptSignal::MatchEnd => LifecycleSignal::MatchEnd,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptFailure {
    Truncated,
    Corrupted { reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Partial change of one player's state. Absent fields are left untouched.
pub struct PlayerUpdate {
    pub player: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vector3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<Vector3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_y: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_spotted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_ducking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_scoped: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_walking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_helmet: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_defuse_kit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flash_duration: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapons: Option<Vec<Equipment>>,
}

impl PlayerUpdate {
    pub fn new(player: impl Into<String>) -> Self {
        PlayerUpdate {
            player: player.into(),
            ..PlayerUpdate::default()
        }
    }

    pub fn apply(&self, target: &mut RawPlayer) {
        fn set<T: Clone>(field: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *field = value.clone();
            }
        }

        set(&mut target.team, &self.team);
        set(&mut target.position, &self.position);
        set(&mut target.velocity, &self.velocity);
        set(&mut target.view_x, &self.view_x);
        set(&mut target.view_y, &self.view_y);
        set(&mut target.hp, &self.hp);
        set(&mut target.armor, &self.armor);
        set(&mut target.is_spotted, &self.is_spotted);
        set(&mut target.is_ducking, &self.is_ducking);
        set(&mut target.is_scoped, &self.is_scoped);
        set(&mut target.is_walking, &self.is_walking);
        set(&mut target.has_helmet, &self.has_helmet);
        set(&mut target.has_defuse_kit, &self.has_defuse_kit);
        set(&mut target.flash_duration, &self.flash_duration);
        set(&mut target.weapons, &self.weapons);
    }
}

impl ReplayScript {
    /// An empty script for the given map and roster.
    pub fn new(map: impl Into<String>, tick_rate: f64, roster: Vec<RawPlayer>) -> Self {
        ReplayScript {
            version: Some(SCRIPT_VERSION),
            map: map.into(),
            tick_rate,
            roster,
            spectators: Vec::new(),
            ticks: Vec::new(),
            failure: None,
        }
    }

    /// Check the roster and that every name the ticks reference is declared.
    pub fn validate(&self) -> Result<(), ScriptError> {
        let roster = Roster::new(&self.roster, &self.spectators)?;

        for (tick, entry) in self.ticks.iter().enumerate() {
            let unknown = |name: &String| ScriptError::UnknownPlayer {
                name: name.clone(),
                tick,
            };

            for update in &entry.updates {
                if roster.index_of(&update.player).is_none() {
                    return Err(unknown(&update.player));
                }
            }

            for notification in &entry.notify {
                let ScriptNotification::Gameplay(event) = notification else {
                    continue;
                };
                if let Some(name) = event
                    .players()
                    .into_iter()
                    .find(|name| roster.index_of(name).is_none())
                {
                    return Err(unknown(name));
                }
            }
        }

        Ok(())
    }

    /// Number of ticks a decoder replays for this script, counting waits.
    pub fn tick_count(&self) -> u64 {
        self.ticks.iter().map(|tick| u64::from(tick.wait) + 1).sum()
    }

    /// Validate and build a decoder positioned before the first tick.
    pub fn compile(&self) -> Result<ScriptedDecoder, ScriptError> {
        ScriptedDecoder::from_script(self)
    }
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}
