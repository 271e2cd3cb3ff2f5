use serde::{Deserialize, Serialize};

/// Stable participant identity used for per-tick deduplication.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ActorId(u64);

impl ActorId {
    /// Return the raw numeric id (a platform account id for most replay formats).
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ActorId {
    fn from(value: u64) -> Self {
        ActorId(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Facing {
    pub yaw: f32,
    pub pitch: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: f32,
    pub vy: f32,
    pub vz: f32,
}

/// One piece of equipment as carried by a participant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub ammo_in_magazine: i32,
}

/// Basic actor snapshot carried by almost every event kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub playername: String,
    pub player_id: ActorId,
    pub position: Position,
    pub facing: Facing,
    pub velocity: Velocity,
    pub team: String,
    pub is_spotted: bool,
    pub hp: i32,
}

/// Basic snapshot plus stance, scope and armor state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerDetailed {
    #[serde(flatten)]
    pub basic: PlayerSnapshot,
    pub is_ducking: bool,
    pub is_scoped: bool,
    pub is_walking: bool,
    pub armor: i32,
    pub has_helmet: bool,
    pub has_defuser: bool,
}

/// Detailed snapshot plus the full equipment inventory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerDetailedWithItems {
    #[serde(flatten)]
    pub detailed: PlayerDetailed,
    pub items: Vec<Item>,
}

/// Detailed snapshot of a participant blinded by a flashbang.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerFlashed {
    #[serde(flatten)]
    pub detailed: PlayerDetailed,
    pub flashed_duration: f32,
}

impl PlayerDetailed {
    pub fn player_id(&self) -> ActorId {
        self.basic.player_id
    }
}

impl PlayerDetailedWithItems {
    pub fn player_id(&self) -> ActorId {
        self.detailed.player_id()
    }
}

impl PlayerFlashed {
    pub fn player_id(&self) -> ActorId {
        self.detailed.player_id()
    }
}
