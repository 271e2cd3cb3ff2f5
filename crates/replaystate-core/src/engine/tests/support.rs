use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
};

use crate::{
    ActorEvent, ActorId, DecodeError, DecoderAdapter, Event, GameStateDocument, LifecycleSignal,
    Meta, Notification, OutputSink, PlayerKilled, PlayerMeta, PlayerSnapshot, ReplayFormat,
    SinkError, WeaponFire,
};

#[derive(Debug, Clone, PartialEq)]
pub struct TestPlayer {
    pub id: u64,
    pub name: String,
}

impl TestPlayer {
    pub fn new(id: u64) -> Self {
        TestPlayer {
            id,
            name: format!("player{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TestEvent {
    Step(u64),
    Shot(u64),
    Jump(u64),
    Kill { killer: Option<u64>, victim: u64 },
}

pub fn snapshot(id: u64) -> PlayerSnapshot {
    PlayerSnapshot {
        playername: format!("player{id}"),
        player_id: ActorId::from(id),
        team: "Terrorist".to_string(),
        hp: 100,
        ..PlayerSnapshot::default()
    }
}

/// Minimal format: footsteps only for participants, everything else always maps.
#[derive(Debug, Clone, Default)]
pub struct TestFormat;

impl ReplayFormat for TestFormat {
    type Player = TestPlayer;
    type Event = TestEvent;

    fn map_event(&self, raw: &TestEvent, participants: &[TestPlayer]) -> Option<Event> {
        match raw {
            TestEvent::Step(id) => participants
                .iter()
                .any(|p| p.id == *id)
                .then(|| Event::PlayerFootstep(ActorEvent { actor: Some(snapshot(*id)) })),
            TestEvent::Shot(id) => Some(Event::WeaponFire(WeaponFire {
                actor: Some(snapshot(*id)),
                weapon: None,
            })),
            TestEvent::Jump(id) => Some(Event::PlayerJumped(ActorEvent {
                actor: Some(snapshot(*id)),
            })),
            TestEvent::Kill { killer, victim } => Some(Event::PlayerKilled(PlayerKilled {
                actor: killer.map(snapshot),
                victim: Some(snapshot(*victim)),
                ..PlayerKilled::default()
            })),
        }
    }

    fn assemble_meta(&self, map_name: &str, tick_rate: f64, participants: &[TestPlayer]) -> Meta {
        Meta {
            mapname: map_name.to_string(),
            tickrate: tick_rate,
            players: participants
                .iter()
                .map(|p| PlayerMeta {
                    playername: p.name.clone(),
                    player_id: ActorId::from(p.id),
                    team: "Terrorist".to_string(),
                    clanname: String::new(),
                })
                .collect(),
        }
    }

    fn actor_id(&self, player: &TestPlayer) -> ActorId {
        ActorId::from(player.id)
    }

    fn position_snapshot(&self, player: &TestPlayer) -> Event {
        Event::position(snapshot(player.id))
    }
}

pub type TestNotification = Notification<TestEvent>;

pub fn lifecycle(signal: LifecycleSignal) -> TestNotification {
    Notification::Lifecycle(signal)
}

pub fn gameplay(event: TestEvent) -> TestNotification {
    Notification::Gameplay(event)
}

pub fn round_end(winner: &str) -> TestNotification {
    lifecycle(LifecycleSignal::RoundEnd {
        winner: winner.to_string(),
    })
}

/// Decoder replaying a fixed list of ticks, optionally failing at the end.
#[derive(Debug, Clone)]
pub struct VecDecoder {
    pub tick_rate: f64,
    pub players: Vec<TestPlayer>,
    pub ticks: VecDeque<Vec<TestNotification>>,
    pub failure: Option<DecodeError>,
    pub calls: u64,
}

impl VecDecoder {
    pub fn new(tick_rate: f64, players: Vec<TestPlayer>) -> Self {
        VecDecoder {
            tick_rate,
            players,
            ticks: VecDeque::new(),
            failure: None,
            calls: 0,
        }
    }

    pub fn tick(&mut self, notifications: Vec<TestNotification>) -> &mut Self {
        self.ticks.push_back(notifications);
        self
    }

    pub fn empty_ticks(&mut self, count: usize) -> &mut Self {
        for _ in 0..count {
            self.ticks.push_back(Vec::new());
        }
        self
    }

    pub fn fail_with(&mut self, error: DecodeError) -> &mut Self {
        self.failure = Some(error);
        self
    }
}

impl DecoderAdapter for VecDecoder {
    type Player = TestPlayer;
    type Event = TestEvent;

    fn map_name(&self) -> &str {
        "de_test"
    }

    fn tick_rate(&self) -> f64 {
        self.tick_rate
    }

    fn participants(&self) -> &[TestPlayer] {
        &self.players
    }

    fn advance_tick(
        &mut self,
        notifications: &mut Vec<TestNotification>,
    ) -> Result<bool, DecodeError> {
        self.calls += 1;
        match self.ticks.pop_front() {
            Some(tick) => {
                notifications.extend(tick);
                Ok(true)
            }
            None => match self.failure.take() {
                Some(error) => Err(error),
                None => Ok(false),
            },
        }
    }
}

/// Sink recording every write and its own release.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub writes: Rc<Cell<usize>>,
    pub releases: Rc<Cell<usize>>,
    pub document: Rc<RefCell<Option<GameStateDocument>>>,
}

impl OutputSink for RecordingSink {
    fn write(&mut self, document: &GameStateDocument, _pretty: bool) -> Result<(), SinkError> {
        self.writes.set(self.writes.get() + 1);
        *self.document.borrow_mut() = Some(document.clone());
        Ok(())
    }
}

impl Drop for RecordingSink {
    fn drop(&mut self) {
        self.releases.set(self.releases.get() + 1);
    }
}
