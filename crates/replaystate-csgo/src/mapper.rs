use replaystate_core::{
    ActorEvent, ActorId, BombEvent, Event, Facing, FlashEvent, Item, Meta, NadeEvent,
    PlayerDetailed, PlayerDetailedWithItems, PlayerFlashed, PlayerHurt, PlayerKilled, PlayerMeta,
    PlayerSnapshot, Position, ReplayFormat, Takeover, Velocity, WeaponFire, WeaponReload,
};

use crate::{
    BombAction, CsgoEvent, Equipment, GameplayEvent, GrenadePhase, NadeKind, RawPlayer, Vector3,
};

/// Counter-Strike capability set: turns decoder notifications into document
/// events and decoder players into snapshots of the width each event needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsgoFormat;

impl ReplayFormat for CsgoFormat {
    type Player = RawPlayer;
    type Event = CsgoEvent;

    fn map_event(&self, raw: &CsgoEvent, participants: &[RawPlayer]) -> Option<Event> {
        use GameplayEvent as G;

        let event = match raw {
            G::WeaponFired { shooter, weapon } => Event::WeaponFire(WeaponFire {
                actor: shooter.as_ref().map(snapshot),
                weapon: weapon.as_ref().map(item),
            }),
            G::WeaponFiredEmpty { shooter, weapon } => Event::WeaponFireEmpty(WeaponFire {
                actor: shooter.as_ref().map(snapshot),
                weapon: weapon.as_ref().map(item),
            }),
            G::WeaponReload { player } => Event::WeaponReload(WeaponReload {
                actor: player.as_ref().map(detailed_with_items),
            }),
            G::PlayerSpotted { player } => Event::PlayerSpotted(actor_event(player)),
            G::PlayerHurt {
                attacker,
                victim,
                armor,
                armor_damage,
                health,
                health_damage,
                hitgroup,
                weapon,
            } => Event::PlayerHurt(PlayerHurt {
                actor: attacker.as_ref().map(snapshot),
                victim: victim.as_ref().map(snapshot),
                armor: *armor,
                armor_damage: *armor_damage,
                hp: *health,
                hp_damage: *health_damage,
                hitgroup: *hitgroup,
                weapon: weapon.as_ref().map(item),
            }),
            G::PlayerKilled {
                killer,
                victim,
                assister,
                headshot,
                penetrated_objects,
                weapon,
            } => Event::PlayerKilled(PlayerKilled {
                actor: killer.as_ref().map(snapshot),
                victim: victim.as_ref().map(snapshot),
                assister: assister.as_ref().map(detailed),
                headshot: *headshot,
                penetrated: *penetrated_objects,
                weapon: weapon.as_ref().map(item),
            }),
            G::Grenade {
                phase,
                nade,
                thrower,
                position: at,
            } => {
                let payload = NadeEvent {
                    actor: thrower.as_ref().map(snapshot),
                    nadetype: nade.to_string(),
                    position: position(at),
                };
                grenade_event(*phase, *nade, payload)?
            }
            G::FlashExploded {
                thrower,
                position: at,
                flashed,
            } => Event::FlashExploded(FlashEvent {
                actor: thrower.as_ref().map(snapshot),
                nadetype: NadeKind::Flash.to_string(),
                position: position(at),
                flashedplayers: flashed.iter().map(flashed_player).collect(),
            }),
            G::Bomb {
                action,
                player,
                site,
                has_kit,
            } => {
                let payload = BombEvent {
                    actor: player.as_ref().map(snapshot),
                    site: site.clone(),
                    haskit: action.involves_defuse().then_some(*has_kit),
                };
                match action {
                    BombAction::Planted => Event::BombPlanted(payload),
                    BombAction::Defused => Event::BombDefused(payload),
                    BombAction::Exploded => Event::BombExploded(payload),
                    BombAction::BeginPlant => Event::BombBeginPlant(payload),
                    BombAction::AbortPlant => Event::BombAbortPlant(payload),
                    BombAction::BeginDefuse => Event::BombBeginDefuse(payload),
                    BombAction::AbortDefuse => Event::BombAbortDefuse(payload),
                }
            }
            G::BombDropped { player } => Event::BombDropped(actor_event(player)),
            G::BombPicked { player } => Event::BombPicked(actor_event(player)),
            G::PlayerConnected { player } => {
                Event::PlayerConnected(participant_event(player, participants)?)
            }
            G::PlayerDisconnected { player } => {
                Event::PlayerDisconnected(participant_event(player, participants)?)
            }
            G::BotTakeover { taker, taken } => {
                let taker = taker.as_ref().filter(|p| is_participant(p, participants))?;
                Event::PlayerTakeover(Takeover {
                    actor: Some(snapshot(taker)),
                    taken: taken.as_ref().map(snapshot),
                })
            }
            G::PlayerStepped { player } => {
                Event::PlayerFootstep(participant_event(player, participants)?)
            }
            G::PlayerJumped { player } => {
                Event::PlayerJumped(participant_event(player, participants)?)
            }
            G::PlayerFallen { player } => {
                Event::PlayerFallen(participant_event(player, participants)?)
            }
        };

        Some(event)
    }

    fn assemble_meta(&self, map_name: &str, tick_rate: f64, participants: &[RawPlayer]) -> Meta {
        Meta {
            mapname: map_name.to_string(),
            tickrate: tick_rate,
            players: participants
                .iter()
                .map(|p| PlayerMeta {
                    playername: p.name.clone(),
                    player_id: ActorId::from(p.steam_id),
                    team: p.team.to_string(),
                    clanname: p.clan_tag.clone(),
                })
                .collect(),
        }
    }

    fn actor_id(&self, player: &RawPlayer) -> ActorId {
        ActorId::from(player.steam_id)
    }

    fn position_snapshot(&self, player: &RawPlayer) -> Event {
        Event::position(snapshot(player))
    }
}

/// Per-type exploded/ended kinds. Flashbang detonations arrive as their own
/// notification with the blinded players, and HE grenades never "end".
fn grenade_event(phase: GrenadePhase, nade: NadeKind, payload: NadeEvent) -> Option<Event> {
    use GrenadePhase::{Ended, Exploded, Thrown};
    use NadeKind::{Decoy, Flash, HighExplosive, Incendiary, Molotov, Smoke};

    let event = match (phase, nade) {
        (Thrown, _) => Event::NadeThrown(payload),
        (Exploded, HighExplosive) => Event::HegrenadeExploded(payload),
        (Exploded, Molotov | Incendiary) => Event::FirenadeExploded(payload),
        (Ended, Molotov | Incendiary) => Event::FirenadeEnded(payload),
        (Exploded, Smoke) => Event::SmokeExploded(payload),
        (Ended, Smoke) => Event::SmokeEnded(payload),
        (Exploded, Decoy) => Event::DecoyExploded(payload),
        (Ended, Decoy) => Event::DecoyEnded(payload),
        (Exploded | Ended, Flash) | (Ended, HighExplosive) => return None,
    };
    Some(event)
}

fn is_participant(player: &RawPlayer, participants: &[RawPlayer]) -> bool {
    participants.iter().any(|p| p.steam_id == player.steam_id)
}

/// Movement and connection events only count for playing participants; a
/// spectator or an absent player produces nothing.
fn participant_event(player: &Option<RawPlayer>, participants: &[RawPlayer]) -> Option<ActorEvent> {
    let player = player.as_ref().filter(|p| is_participant(p, participants))?;
    Some(ActorEvent {
        actor: Some(snapshot(player)),
    })
}

fn actor_event(player: &Option<RawPlayer>) -> ActorEvent {
    ActorEvent {
        actor: player.as_ref().map(snapshot),
    }
}

fn position(v: &Vector3) -> Position {
    Position {
        x: v.x,
        y: v.y,
        z: v.z,
    }
}

fn item(equipment: &Equipment) -> Item {
    Item {
        name: equipment.weapon.clone(),
        ammo_in_magazine: equipment.ammo_in_magazine,
    }
}

fn snapshot(p: &RawPlayer) -> PlayerSnapshot {
    PlayerSnapshot {
        playername: p.name.clone(),
        player_id: ActorId::from(p.steam_id),
        position: position(&p.position),
        facing: Facing {
            yaw: p.view_x,
            pitch: p.view_y,
        },
        velocity: Velocity {
            vx: p.velocity.x,
            vy: p.velocity.y,
            vz: p.velocity.z,
        },
        team: p.team.to_string(),
        is_spotted: p.is_spotted,
        hp: p.hp,
    }
}

fn detailed(p: &RawPlayer) -> PlayerDetailed {
    PlayerDetailed {
        basic: snapshot(p),
        is_ducking: p.is_ducking,
        is_scoped: p.is_scoped,
        is_walking: p.is_walking,
        armor: p.armor,
        has_helmet: p.has_helmet,
        has_defuser: p.has_defuse_kit,
    }
}

fn detailed_with_items(p: &RawPlayer) -> PlayerDetailedWithItems {
    PlayerDetailedWithItems {
        detailed: detailed(p),
        items: p.weapons.iter().map(item).collect(),
    }
}

fn flashed_player(p: &RawPlayer) -> PlayerFlashed {
    PlayerFlashed {
        detailed: detailed(p),
        flashed_duration: p.flash_duration,
    }
}
