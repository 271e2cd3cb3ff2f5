use serde::{Deserialize, Serialize};

use crate::document::actor::{
    ActorId, Item, PlayerDetailed, PlayerDetailedWithItems, PlayerFlashed, PlayerSnapshot,
    Position,
};

/// One normalized gameplay event inside a tick.
///
/// Serialized as an object whose `kind` field carries the snake_case variant name.
/// The actor width of each variant is fixed: most carry a basic snapshot, the kill
/// assister is detailed, reloads carry the inventory and flash victims carry their
/// blind duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    WeaponFire(WeaponFire),
    WeaponFireEmpty(WeaponFire),
    WeaponReload(WeaponReload),
    PlayerSpotted(ActorEvent),
    PlayerHurt(PlayerHurt),
    PlayerKilled(PlayerKilled),
    NadeThrown(NadeEvent),
    HegrenadeExploded(NadeEvent),
    FirenadeExploded(NadeEvent),
    FirenadeEnded(NadeEvent),
    SmokeExploded(NadeEvent),
    SmokeEnded(NadeEvent),
    DecoyExploded(NadeEvent),
    DecoyEnded(NadeEvent),
    FlashExploded(FlashEvent),
    BombPlanted(BombEvent),
    BombDefused(BombEvent),
    BombExploded(BombEvent),
    BombBeginPlant(BombEvent),
    BombAbortPlant(BombEvent),
    BombBeginDefuse(BombEvent),
    BombAbortDefuse(BombEvent),
    BombDropped(ActorEvent),
    BombPicked(ActorEvent),
    PlayerConnected(ActorEvent),
    PlayerDisconnected(ActorEvent),
    PlayerTakeover(Takeover),
    PlayerFootstep(ActorEvent),
    PlayerJumped(ActorEvent),
    PlayerFallen(ActorEvent),
    PlayerPosition(ActorEvent),
}

/// Payload for events that only identify who did something.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<PlayerSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaponFire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<PlayerSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapon: Option<Item>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaponReload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<PlayerDetailedWithItems>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerHurt {
    /// Absent when the damage came from the world (falling, map hazards).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<PlayerSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub victim: Option<PlayerSnapshot>,
    pub armor: i32,
    pub armor_damage: i32,
    pub hp: i32,
    pub hp_damage: i32,
    pub hitgroup: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapon: Option<Item>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerKilled {
    /// Absent when the victim was killed by the world.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<PlayerSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub victim: Option<PlayerSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assister: Option<PlayerDetailed>,
    pub headshot: bool,
    pub penetrated: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapon: Option<Item>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NadeEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<PlayerSnapshot>,
    pub nadetype: String,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlashEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<PlayerSnapshot>,
    pub nadetype: String,
    pub position: Position,
    pub flashedplayers: Vec<PlayerFlashed>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BombEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<PlayerSnapshot>,
    pub site: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub haskit: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Takeover {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<PlayerSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taken: Option<PlayerSnapshot>,
}

impl Event {
    /// Wrap a basic snapshot as a synthesized position sample.
    pub fn position(actor: PlayerSnapshot) -> Self {
        Event::PlayerPosition(ActorEvent { actor: Some(actor) })
    }

    /// Return the serialized `kind` tag of this event.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::WeaponFire(_) => "weapon_fire",
            Event::WeaponFireEmpty(_) => "weapon_fire_empty",
            Event::WeaponReload(_) => "weapon_reload",
            Event::PlayerSpotted(_) => "player_spotted",
            Event::PlayerHurt(_) => "player_hurt",
            Event::PlayerKilled(_) => "player_killed",
            Event::NadeThrown(_) => "nade_thrown",
            Event::HegrenadeExploded(_) => "hegrenade_exploded",
            Event::FirenadeExploded(_) => "firenade_exploded",
            Event::FirenadeEnded(_) => "firenade_ended",
            Event::SmokeExploded(_) => "smoke_exploded",
            Event::SmokeEnded(_) => "smoke_ended",
            Event::DecoyExploded(_) => "decoy_exploded",
            Event::DecoyEnded(_) => "decoy_ended",
            Event::FlashExploded(_) => "flash_exploded",
            Event::BombPlanted(_) => "bomb_planted",
            Event::BombDefused(_) => "bomb_defused",
            Event::BombExploded(_) => "bomb_exploded",
            Event::BombBeginPlant(_) => "bomb_begin_plant",
            Event::BombAbortPlant(_) => "bomb_abort_plant",
            Event::BombBeginDefuse(_) => "bomb_begin_defuse",
            Event::BombAbortDefuse(_) => "bomb_abort_defuse",
            Event::BombDropped(_) => "bomb_dropped",
            Event::BombPicked(_) => "bomb_picked",
            Event::PlayerConnected(_) => "player_connected",
            Event::PlayerDisconnected(_) => "player_disconnected",
            Event::PlayerTakeover(_) => "player_takeover",
            Event::PlayerFootstep(_) => "player_footstep",
            Event::PlayerJumped(_) => "player_jumped",
            Event::PlayerFallen(_) => "player_fallen",
            Event::PlayerPosition(_) => "player_position",
        }
    }

    /// Kinds that are only recorded when extended events are switched on.
    pub fn is_extended(&self) -> bool {
        matches!(
            self,
            Event::WeaponFireEmpty(_)
                | Event::WeaponReload(_)
                | Event::BombExploded(_)
                | Event::BombBeginPlant(_)
                | Event::BombAbortPlant(_)
                | Event::BombBeginDefuse(_)
                | Event::BombAbortDefuse(_)
                | Event::PlayerJumped(_)
                | Event::PlayerFallen(_)
        )
    }

    /// Participants this event already places on the map for the current tick.
    /// They are exempt from synthesized position sampling in the same tick.
    pub fn tracked_actors(&self) -> impl Iterator<Item = ActorId> {
        let (primary, secondary) = match self {
            Event::WeaponFire(e) | Event::WeaponFireEmpty(e) => (snapshot_id(&e.actor), None),
            Event::WeaponReload(e) => (e.actor.as_ref().map(|a| a.player_id()), None),
            Event::PlayerHurt(e) => (snapshot_id(&e.actor), snapshot_id(&e.victim)),
            Event::PlayerKilled(e) => (snapshot_id(&e.actor), snapshot_id(&e.victim)),
            Event::NadeThrown(e)
            | Event::HegrenadeExploded(e)
            | Event::FirenadeExploded(e)
            | Event::FirenadeEnded(e)
            | Event::SmokeExploded(e)
            | Event::SmokeEnded(e)
            | Event::DecoyExploded(e)
            | Event::DecoyEnded(e) => (snapshot_id(&e.actor), None),
            Event::FlashExploded(e) => (snapshot_id(&e.actor), None),
            Event::BombPlanted(e)
            | Event::BombDefused(e)
            | Event::BombExploded(e)
            | Event::BombBeginPlant(e)
            | Event::BombAbortPlant(e)
            | Event::BombBeginDefuse(e)
            | Event::BombAbortDefuse(e) => (snapshot_id(&e.actor), None),
            Event::PlayerTakeover(e) => (snapshot_id(&e.actor), snapshot_id(&e.taken)),
            Event::PlayerSpotted(e)
            | Event::BombDropped(e)
            | Event::BombPicked(e)
            | Event::PlayerConnected(e)
            | Event::PlayerDisconnected(e)
            | Event::PlayerFootstep(e)
            | Event::PlayerJumped(e)
            | Event::PlayerFallen(e)
            | Event::PlayerPosition(e) => (snapshot_id(&e.actor), None),
        };
        [primary, secondary].into_iter().flatten()
    }

    /// Count required references the decoder could not resolve.
    ///
    /// A hurt or kill without an attacker is still a gap: the field is omitted
    /// from the document even though the event itself is legitimate.
    pub fn data_gaps(&self) -> usize {
        let missing = |present: bool| usize::from(!present);
        match self {
            Event::WeaponFire(e) | Event::WeaponFireEmpty(e) => {
                missing(e.actor.is_some()) + missing(e.weapon.is_some())
            }
            Event::WeaponReload(e) => missing(e.actor.is_some()),
            Event::PlayerHurt(e) => {
                missing(e.actor.is_some())
                    + missing(e.victim.is_some())
                    + missing(e.weapon.is_some())
            }
            Event::PlayerKilled(e) => {
                missing(e.actor.is_some())
                    + missing(e.victim.is_some())
                    + missing(e.weapon.is_some())
            }
            Event::PlayerTakeover(e) => missing(e.actor.is_some()) + missing(e.taken.is_some()),
            Event::FlashExploded(e) => missing(e.actor.is_some()),
            Event::NadeThrown(e)
            | Event::HegrenadeExploded(e)
            | Event::FirenadeExploded(e)
            | Event::FirenadeEnded(e)
            | Event::SmokeExploded(e)
            | Event::SmokeEnded(e)
            | Event::DecoyExploded(e)
            | Event::DecoyEnded(e) => missing(e.actor.is_some()),
            Event::BombPlanted(e)
            | Event::BombDefused(e)
            | Event::BombExploded(e)
            | Event::BombBeginPlant(e)
            | Event::BombAbortPlant(e)
            | Event::BombBeginDefuse(e)
            | Event::BombAbortDefuse(e) => missing(e.actor.is_some()),
            Event::PlayerSpotted(e)
            | Event::BombDropped(e)
            | Event::BombPicked(e)
            | Event::PlayerConnected(e)
            | Event::PlayerDisconnected(e)
            | Event::PlayerFootstep(e)
            | Event::PlayerJumped(e)
            | Event::PlayerFallen(e)
            | Event::PlayerPosition(e) => missing(e.actor.is_some()),
        }
    }
}

fn snapshot_id(snapshot: &Option<PlayerSnapshot>) -> Option<ActorId> {
    snapshot.as_ref().map(|s| s.player_id)
}
