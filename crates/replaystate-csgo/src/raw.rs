use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Side a player is on.
pub enum Team {
    #[default]
    Spectate,
    Terrorist,
    CounterTerrorist,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Team::Spectate => "Spectate",
            Team::Terrorist => "Terrorist",
            Team::CounterTerrorist => "CounterTerrorist",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Vector3 { x, y, z }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// A weapon or utility item as the decoder reports it.
pub struct Equipment {
    pub weapon: String,
    #[serde(default)]
    pub ammo_in_magazine: i32,
}

impl Equipment {
    pub fn new(weapon: impl Into<String>, ammo_in_magazine: i32) -> Self {
        Equipment {
            weapon: weapon.into(),
            ammo_in_magazine,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Decoder-side view of one player at the moment a notification is raised.
pub struct RawPlayer {
    pub name: String,
    pub steam_id: u64,
    pub team: Team,
    pub clan_tag: String,
    pub position: Vector3,
    pub velocity: Vector3,
    /// View direction, yaw then pitch.
    pub view_x: f32,
    pub view_y: f32,
    pub hp: i32,
    pub armor: i32,
    pub is_spotted: bool,
    pub is_ducking: bool,
    pub is_scoped: bool,
    pub is_walking: bool,
    pub has_helmet: bool,
    pub has_defuse_kit: bool,
    pub flash_duration: f32,
    pub weapons: Vec<Equipment>,
}

impl RawPlayer {
    /// A freshly spawned player with full health.
    pub fn new(name: impl Into<String>, steam_id: u64, team: Team) -> Self {
        RawPlayer {
            name: name.into(),
            steam_id,
            team,
            hp: 100,
            ..RawPlayer::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NadeKind {
    #[serde(rename = "HE")]
    HighExplosive,
    Flash,
    Smoke,
    Decoy,
    Molotov,
    Incendiary,
}

impl fmt::Display for NadeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NadeKind::HighExplosive => "HE",
            NadeKind::Flash => "Flash",
            NadeKind::Smoke => "Smoke",
            NadeKind::Decoy => "Decoy",
            NadeKind::Molotov => "Molotov",
            NadeKind::Incendiary => "Incendiary",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrenadePhase {
    Thrown,
    Exploded,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BombAction {
    Planted,
    Defused,
    Exploded,
    BeginPlant,
    AbortPlant,
    BeginDefuse,
    AbortDefuse,
}

impl BombAction {
    /// Defuse-related actions report whether the defuser carried a kit.
    pub fn involves_defuse(&self) -> bool {
        matches!(
            self,
            BombAction::Defused | BombAction::BeginDefuse | BombAction::AbortDefuse
        )
    }
}

/// Gameplay notification raised by a Counter-Strike decoder.
///
/// Generic over how players are referenced: scripts name them (`P = String`)
/// and the decoder resolves each name to the player's state at the current
/// tick (`P = RawPlayer`). A reference is optional wherever the decoder may
/// report no player, such as world damage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameplayEvent<P> {
    WeaponFired {
        shooter: Option<P>,
        weapon: Option<Equipment>,
    },
    WeaponFiredEmpty {
        shooter: Option<P>,
        weapon: Option<Equipment>,
    },
    WeaponReload {
        player: Option<P>,
    },
    PlayerSpotted {
        player: Option<P>,
    },
    PlayerHurt {
        attacker: Option<P>,
        victim: Option<P>,
        #[serde(default)]
        armor: i32,
        #[serde(default)]
        armor_damage: i32,
        #[serde(default)]
        health: i32,
        #[serde(default)]
        health_damage: i32,
        #[serde(default)]
        hitgroup: i32,
        weapon: Option<Equipment>,
    },
    PlayerKilled {
        killer: Option<P>,
        victim: Option<P>,
        assister: Option<P>,
        #[serde(default)]
        headshot: bool,
        #[serde(default)]
        penetrated_objects: i32,
        weapon: Option<Equipment>,
    },
    Grenade {
        phase: GrenadePhase,
        nade: NadeKind,
        thrower: Option<P>,
        #[serde(default)]
        position: Vector3,
    },
    FlashExploded {
        thrower: Option<P>,
        #[serde(default)]
        position: Vector3,
        #[serde(default)]
        flashed: Vec<P>,
    },
    Bomb {
        action: BombAction,
        player: Option<P>,
        #[serde(default)]
        site: String,
        #[serde(default)]
        has_kit: bool,
    },
    BombDropped {
        player: Option<P>,
    },
    BombPicked {
        player: Option<P>,
    },
    PlayerConnected {
        player: Option<P>,
    },
    PlayerDisconnected {
        player: Option<P>,
    },
    BotTakeover {
        taker: Option<P>,
        taken: Option<P>,
    },
    PlayerStepped {
        player: Option<P>,
    },
    PlayerJumped {
        player: Option<P>,
    },
    PlayerFallen {
        player: Option<P>,
    },
}

/// Gameplay notification with every player reference resolved.
pub type CsgoEvent = GameplayEvent<RawPlayer>;

impl<P> GameplayEvent<P> {
    /// Every player referenced by this event, in field order.
    pub fn players(&self) -> Vec<&P> {
        use GameplayEvent as E;
        match self {
            E::WeaponFired { shooter, .. } | E::WeaponFiredEmpty { shooter, .. } => {
                shooter.iter().collect()
            }
            E::PlayerHurt {
                attacker, victim, ..
            } => attacker.iter().chain(victim).collect(),
            E::PlayerKilled {
                killer,
                victim,
                assister,
                ..
            } => killer.iter().chain(victim).chain(assister).collect(),
            E::Grenade { thrower, .. } => thrower.iter().collect(),
            E::FlashExploded {
                thrower, flashed, ..
            } => thrower.iter().chain(flashed).collect(),
            E::BotTakeover { taker, taken } => taker.iter().chain(taken).collect(),
            E::WeaponReload { player }
            | E::PlayerSpotted { player }
            | E::Bomb { player, .. }
            | E::BombDropped { player }
            | E::BombPicked { player }
            | E::PlayerConnected { player }
            | E::PlayerDisconnected { player }
            | E::PlayerStepped { player }
            | E::PlayerJumped { player }
            | E::PlayerFallen { player } => player.iter().collect(),
        }
    }

    /// Swap every player reference through `lookup`. References the lookup
    /// cannot resolve become absent; unresolved flash victims are dropped.
    pub fn resolve<Q>(&self, mut lookup: impl FnMut(&P) -> Option<Q>) -> GameplayEvent<Q> {
        use GameplayEvent as E;
        let mut one = |reference: &Option<P>| reference.as_ref().and_then(&mut lookup);

        match self {
            E::WeaponFired { shooter, weapon } => E::WeaponFired {
                shooter: one(shooter),
                weapon: weapon.clone(),
            },
            E::WeaponFiredEmpty { shooter, weapon } => E::WeaponFiredEmpty {
                shooter: one(shooter),
                weapon: weapon.clone(),
            },
            E::WeaponReload { player } => E::WeaponReload {
                player: one(player),
            },
            E::PlayerSpotted { player } => E::PlayerSpotted {
                player: one(player),
            },
            E::PlayerHurt {
                attacker,
                victim,
                armor,
                armor_damage,
                health,
                health_damage,
                hitgroup,
                weapon,
            } => E::PlayerHurt {
                attacker: one(attacker),
                victim: one(victim),
                armor: *armor,
                armor_damage: *armor_damage,
                health: *health,
                health_damage: *health_damage,
                hitgroup: *hitgroup,
                weapon: weapon.clone(),
            },
            E::PlayerKilled {
                killer,
                victim,
                assister,
                headshot,
                penetrated_objects,
                weapon,
            } => E::PlayerKilled {
                killer: one(killer),
                victim: one(victim),
                assister: one(assister),
                headshot: *headshot,
                penetrated_objects: *penetrated_objects,
                weapon: weapon.clone(),
            },
            E::Grenade {
                phase,
                nade,
                thrower,
                position,
            } => E::Grenade {
                phase: *phase,
                nade: *nade,
                thrower: one(thrower),
                position: *position,
            },
            E::FlashExploded {
                thrower,
                position,
                flashed,
            } => {
                let thrower = one(thrower);
                E::FlashExploded {
                    thrower,
                    position: *position,
                    flashed: flashed.iter().filter_map(&mut lookup).collect(),
                }
            }
            E::Bomb {
                action,
                player,
                site,
                has_kit,
            } => E::Bomb {
                action: *action,
                player: one(player),
                site: site.clone(),
                has_kit: *has_kit,
            },
            E::BombDropped { player } => E::BombDropped {
                player: one(player),
            },
            E::BombPicked { player } => E::BombPicked {
                player: one(player),
            },
            E::PlayerConnected { player } => E::PlayerConnected {
                player: one(player),
            },
            E::PlayerDisconnected { player } => E::PlayerDisconnected {
                player: one(player),
            },
            E::BotTakeover { taker, taken } => E::BotTakeover {
                taker: one(taker),
                taken: one(taken),
            },
            E::PlayerStepped { player } => E::PlayerStepped {
                player: one(player),
            },
            E::PlayerJumped { player } => E::PlayerJumped {
                player: one(player),
            },
            E::PlayerFallen { player } => E::PlayerFallen {
                player: one(player),
            },
        }
    }
}
