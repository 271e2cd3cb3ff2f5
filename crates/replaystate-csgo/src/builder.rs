use crate::{
    GameplayEvent, PlayerUpdate, RawPlayer, ReplayScript, ScriptError, ScriptFailure,
    ScriptNotification, ScriptSignal, ScriptTick, ScriptedDecoder, Team,
};

#[derive(Debug, Clone)]
/// Assembles a replay script tick by tick.
///
/// Notifications and updates go into the tick opened by the last call to
/// [`tick`](Self::tick); one is opened implicitly if none is.
pub struct ScriptBuilder {
    script: ReplayScript,
}

impl ScriptBuilder {
    /// Start a script for a map and tick rate with an empty roster.
    pub fn new(map: impl Into<String>, tick_rate: f64) -> Self {
        ScriptBuilder {
            script: ReplayScript::new(map, tick_rate, Vec::new()),
        }
    }

    /// Declare a playing participant.
    pub fn add_player(&mut self, name: impl Into<String>, steam_id: u64, team: Team) -> &mut Self {
        self.script.roster.push(RawPlayer::new(name, steam_id, team));
        self
    }

    /// Declare a spectator that events may reference.
    pub fn add_spectator(&mut self, name: impl Into<String>, steam_id: u64) -> &mut Self {
        self.script
            .spectators
            .push(RawPlayer::new(name, steam_id, Team::Spectate));
        self
    }

    /// Open a new tick.
    pub fn tick(&mut self) -> &mut Self {
        self.script.ticks.push(ScriptTick::default());
        self
    }

    /// Open a new tick preceded by `ticks` empty ones.
    pub fn wait(&mut self, ticks: u32) -> &mut Self {
        self.script.ticks.push(ScriptTick {
            wait: ticks,
            ..ScriptTick::default()
        });
        self
    }

    pub fn update(&mut self, update: PlayerUpdate) -> &mut Self {
        self.current().updates.push(update);
        self
    }

    pub fn signal(&mut self, signal: ScriptSignal) -> &mut Self {
        self.current()
            .notify
            .push(ScriptNotification::Lifecycle(signal));
        self
    }

    pub fn event(&mut self, event: GameplayEvent<String>) -> &mut Self {
        self.current()
            .notify
            .push(ScriptNotification::Gameplay(event));
        self
    }

    pub fn match_start(&mut self) -> &mut Self {
        self.signal(ScriptSignal::MatchStart)
    }

    pub fn round_start(&mut self) -> &mut Self {
        self.signal(ScriptSignal::RoundStart)
    }

    pub fn freeze_end(&mut self) -> &mut Self {
        self.signal(ScriptSignal::FreezeEnd)
    }

    pub fn round_end(&mut self, winner: Team) -> &mut Self {
        self.signal(ScriptSignal::RoundEnd { winner })
    }

    pub fn match_end(&mut self) -> &mut Self {
        self.signal(ScriptSignal::MatchEnd)
    }

    /// End the stream with a decoder failure after the last tick.
    pub fn fail_with(&mut self, failure: ScriptFailure) -> &mut Self {
        self.script.failure = Some(failure);
        self
    }

    fn current(&mut self) -> &mut ScriptTick {
        if self.script.ticks.is_empty() {
            self.script.ticks.push(ScriptTick::default());
        }
        let last = self.script.ticks.len() - 1;
        &mut self.script.ticks[last]
    }

    pub fn build_script(self) -> Result<ReplayScript, ScriptError> {
        self.script.validate()?;
        Ok(self.script)
    }

    pub fn compile(self) -> Result<ScriptedDecoder, ScriptError> {
        let script = self.build_script()?;
        script.compile()
    }
}
