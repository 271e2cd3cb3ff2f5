use rand::{Rng, SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;

use crate::{
    BombAction, Equipment, GameplayEvent, GrenadePhase, NadeKind, PlayerUpdate, RawPlayer,
    ReplayScript, ScriptError, ScriptFailure, ScriptNotification, ScriptSignal, ScriptTick,
    ScriptedDecoder, Team, Vector3,
};

const STEAM_ID_BASE: u64 = 76_561_198_000_000_000;

#[derive(Debug, Clone, PartialEq)]
/// Shape of a generated match.
pub struct SyntheticConfig {
    pub map: String,
    pub tick_rate: f64,
    pub players_per_team: usize,
    pub spectators: usize,
    pub rounds: u32,
    /// Ticks of warmup noise decoded before the match starts.
    pub warmup_ticks: u32,
    pub freeze_ticks: u32,
    /// Ticks between freeze end and round end.
    pub round_ticks: u32,
    /// Chance that a live tick carries a gameplay event.
    pub event_probability: f64,
    /// Cut the stream in the middle of this round (0-based), reporting truncation.
    pub truncate_in_round: Option<u32>,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        SyntheticConfig {
            map: "de_dust2".to_string(),
            tick_rate: 64.0,
            players_per_team: 5,
            spectators: 1,
            rounds: 3,
            warmup_ticks: 32,
            freeze_ticks: 64,
            round_ticks: 512,
            event_probability: 0.15,
            truncate_in_round: None,
        }
    }
}

#[derive(Debug, Clone)]
/// Seeded generator of plausible replay scripts. The same seed and config
/// always produce the same script.
pub struct SyntheticReplay {
    config: SyntheticConfig,
    rng: ChaCha8Rng,
}

impl SyntheticReplay {
    pub fn new(config: SyntheticConfig, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &SyntheticConfig {
        &self.config
    }

    /// Generate the next script from the RNG stream.
    pub fn script(&mut self) -> ReplayScript {
        let roster = self.roster();
        let spectators = (0..self.config.spectators)
            .map(|i| {
                RawPlayer::new(
                    format!("spec{i}"),
                    STEAM_ID_BASE + 1_000 + i as u64,
                    Team::Spectate,
                )
            })
            .collect::<Vec<_>>();

        let mut script = ReplayScript::new(self.config.map.clone(), self.config.tick_rate, roster);
        script.spectators = spectators;

        let mut state = MatchState::new(&script.roster);

        // Warmup noise precedes the match start and never reaches the document.
        let warmup = state
            .names
            .first()
            .map(|name| {
                gameplay(GameplayEvent::PlayerStepped {
                    player: Some(name.clone()),
                })
            })
            .into_iter()
            .collect();
        script.ticks.push(tick_with(0, Vec::new(), warmup));
        script.ticks.push(tick_with(
            self.config.warmup_ticks,
            Vec::new(),
            vec![signal(ScriptSignal::MatchStart)],
        ));

        for round in 0..self.config.rounds {
            let truncated = self.config.truncate_in_round == Some(round);
            self.play_round(&mut script, &mut state, truncated);
            if truncated {
                script.failure = Some(ScriptFailure::Truncated);
                return script;
            }
        }

        script
            .ticks
            .push(tick_with(1, Vec::new(), vec![signal(ScriptSignal::MatchEnd)]));
        script
    }

    /// Generate a script and build a decoder over it.
    pub fn decoder(&mut self) -> Result<ScriptedDecoder, ScriptError> {
        self.script().compile()
    }

    fn roster(&self) -> Vec<RawPlayer> {
        let per_team = self.config.players_per_team;
        let mut roster = Vec::with_capacity(per_team * 2);
        for i in 0..per_team {
            let mut player =
                RawPlayer::new(format!("t{i}"), STEAM_ID_BASE + i as u64, Team::Terrorist);
            player.clan_tag = "ALPHA".to_string();
            player.weapons = vec![Equipment::new("Glock", 20), Equipment::new("AK47", 30)];
            roster.push(player);
        }
        for i in 0..per_team {
            let mut player = RawPlayer::new(
                format!("ct{i}"),
                STEAM_ID_BASE + 100 + i as u64,
                Team::CounterTerrorist,
            );
            player.clan_tag = "BRAVO".to_string();
            player.weapons = vec![Equipment::new("USP", 12), Equipment::new("M4A4", 30)];
            roster.push(player);
        }
        roster
    }

    fn play_round(&mut self, script: &mut ReplayScript, state: &mut MatchState, truncated: bool) {
        state.respawn();
        let spawn_updates = state
            .names
            .iter()
            .zip(&state.positions)
            .map(|(name, position)| PlayerUpdate {
                hp: Some(100),
                position: Some(*position),
                ..PlayerUpdate::new(name.clone())
            })
            .collect();
        script.ticks.push(tick_with(
            1,
            spawn_updates,
            vec![signal(ScriptSignal::RoundStart)],
        ));
        script.ticks.push(tick_with(
            self.config.freeze_ticks,
            Vec::new(),
            vec![signal(ScriptSignal::FreezeEnd)],
        ));

        let round_ticks = if truncated {
            self.config.round_ticks / 2
        } else {
            self.config.round_ticks
        };

        let probability = if self.config.event_probability.is_finite() {
            self.config.event_probability.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mut quiet = 0;
        for _ in 0..round_ticks {
            if !self.rng.gen_bool(probability) {
                quiet += 1;
                continue;
            }
            if let Some(tick) = self.live_tick(state, quiet) {
                script.ticks.push(tick);
                quiet = 0;
            } else {
                quiet += 1;
            }
        }

        if truncated {
            return;
        }

        let winner = state.leading_team(&mut self.rng);
        script.ticks.push(tick_with(
            quiet + 1,
            Vec::new(),
            vec![signal(ScriptSignal::RoundEnd { winner })],
        ));
    }

    /// One tick with a random gameplay event by a living player.
    fn live_tick(&mut self, state: &mut MatchState, wait: u32) -> Option<ScriptTick> {
        let alive = state.alive_indices();
        let &actor = alive.choose(&mut self.rng)?;
        let name = state.names[actor].clone();
        let moved = state.walk(actor, &mut self.rng);
        let mut updates = vec![PlayerUpdate {
            position: Some(moved),
            ..PlayerUpdate::new(name.clone())
        }];

        let opponents = state.opponents_of(actor);
        let roll = self.rng.gen_range(0..100);
        let event = match (roll, opponents.choose(&mut self.rng).copied()) {
            (0..=39, _) => GameplayEvent::PlayerStepped { player: Some(name) },
            (40..=59, _) => GameplayEvent::WeaponFired {
                shooter: Some(name),
                weapon: state.weapon_of(actor),
            },
            (60..=74, Some(victim)) => {
                let damage = self.rng.gen_range(10..60);
                let remaining = state.damage(victim, damage);
                updates.push(PlayerUpdate {
                    hp: Some(remaining),
                    ..PlayerUpdate::new(state.names[victim].clone())
                });
                if remaining == 0 {
                    GameplayEvent::PlayerKilled {
                        killer: Some(name),
                        victim: Some(state.names[victim].clone()),
                        assister: None,
                        headshot: self.rng.gen_bool(0.3),
                        penetrated_objects: 0,
                        weapon: state.weapon_of(actor),
                    }
                } else {
                    GameplayEvent::PlayerHurt {
                        attacker: Some(name),
                        victim: Some(state.names[victim].clone()),
                        armor: 100,
                        armor_damage: damage / 2,
                        health: remaining,
                        health_damage: damage,
                        hitgroup: self.rng.gen_range(0..8),
                        weapon: state.weapon_of(actor),
                    }
                }
            }
            (75..=84, _) => {
                let nade = *[
                    NadeKind::HighExplosive,
                    NadeKind::Smoke,
                    NadeKind::Molotov,
                    NadeKind::Decoy,
                ]
                .choose(&mut self.rng)?;
                let phase = if self.rng.gen_bool(0.5) {
                    GrenadePhase::Thrown
                } else {
                    GrenadePhase::Exploded
                };
                GameplayEvent::Grenade {
                    phase,
                    nade,
                    thrower: Some(name),
                    position: moved,
                }
            }
            (85..=92, _) => {
                let flashed: Vec<String> = opponents
                    .iter()
                    .filter(|_| self.rng.gen_bool(0.4))
                    .map(|&i| state.names[i].clone())
                    .collect();
                for victim in &flashed {
                    updates.push(PlayerUpdate {
                        flash_duration: Some(self.rng.gen_range(0.5..3.5)),
                        ..PlayerUpdate::new(victim.clone())
                    });
                }
                GameplayEvent::FlashExploded {
                    thrower: Some(name),
                    position: moved,
                    flashed,
                }
            }
            (93..=96, _) if state.teams[actor] == Team::Terrorist => GameplayEvent::Bomb {
                action: BombAction::BeginPlant,
                player: Some(name),
                site: if self.rng.gen_bool(0.5) { "A" } else { "B" }.to_string(),
                has_kit: false,
            },
            (93..=96, _) => GameplayEvent::PlayerJumped { player: Some(name) },
            _ => GameplayEvent::PlayerSpotted { player: Some(name) },
        };

        Some(tick_with(wait, updates, vec![gameplay(event)]))
    }
}

/// Per-round bookkeeping for the generator.
#[derive(Debug, Clone)]
struct MatchState {
    names: Vec<String>,
    teams: Vec<Team>,
    weapons: Vec<Option<Equipment>>,
    spawns: Vec<Vector3>,
    positions: Vec<Vector3>,
    hp: Vec<i32>,
}

impl MatchState {
    fn new(roster: &[RawPlayer]) -> Self {
        let spawns: Vec<Vector3> = roster
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let side = if p.team == Team::Terrorist { -1.0 } else { 1.0 };
                Vector3::new(side * 1500.0, i as f32 * 64.0, 0.0)
            })
            .collect();
        MatchState {
            names: roster.iter().map(|p| p.name.clone()).collect(),
            teams: roster.iter().map(|p| p.team).collect(),
            weapons: roster.iter().map(|p| p.weapons.last().cloned()).collect(),
            positions: spawns.clone(),
            spawns,
            hp: vec![100; roster.len()],
        }
    }

    fn respawn(&mut self) {
        self.positions.clone_from(&self.spawns);
        self.hp.iter_mut().for_each(|hp| *hp = 100);
    }

    fn alive_indices(&self) -> Vec<usize> {
        (0..self.names.len()).filter(|&i| self.hp[i] > 0).collect()
    }

    fn opponents_of(&self, actor: usize) -> Vec<usize> {
        self.alive_indices()
            .into_iter()
            .filter(|&i| self.teams[i] != self.teams[actor])
            .collect()
    }

    fn weapon_of(&self, actor: usize) -> Option<Equipment> {
        self.weapons[actor].clone()
    }

    fn walk(&mut self, actor: usize, rng: &mut ChaCha8Rng) -> Vector3 {
        let position = &mut self.positions[actor];
        position.x += rng.gen_range(-32.0..32.0);
        position.y += rng.gen_range(-32.0..32.0);
        *position
    }

    /// Apply damage and return the remaining health.
    fn damage(&mut self, victim: usize, amount: i32) -> i32 {
        self.hp[victim] = (self.hp[victim] - amount).max(0);
        self.hp[victim]
    }

    fn leading_team(&self, rng: &mut ChaCha8Rng) -> Team {
        let survivors = |team: Team| {
            self.alive_indices()
                .into_iter()
                .filter(|&i| self.teams[i] == team)
                .count()
        };
        let t = survivors(Team::Terrorist);
        let ct = survivors(Team::CounterTerrorist);
        match t.cmp(&ct) {
            std::cmp::Ordering::Greater => Team::Terrorist,
            std::cmp::Ordering::Less => Team::CounterTerrorist,
            std::cmp::Ordering::Equal if rng.gen_bool(0.5) => Team::Terrorist,
            std::cmp::Ordering::Equal => Team::CounterTerrorist,
        }
    }
}

fn tick_with(
    wait: u32,
    updates: Vec<PlayerUpdate>,
    notify: Vec<ScriptNotification>,
) -> ScriptTick {
    ScriptTick {
        wait,
        updates,
        notify,
    }
}

fn signal(signal: ScriptSignal) -> ScriptNotification {
    ScriptNotification::Lifecycle(signal)
}

fn gameplay(event: GameplayEvent<String>) -> ScriptNotification {
    ScriptNotification::Gameplay(event)
}
