use replaystate_core::{DecodeError, DecoderAdapter, Notification};
use tracing::trace;

use crate::{
    CsgoEvent, RawPlayer, ReplayScript, Roster, ScriptError, ScriptFailure, ScriptNotification,
    ScriptTick,
};

#[derive(Debug, Clone)]
/// Pull-based decoder replaying a validated script one tick at a time.
///
/// Player references are resolved against the roster state of the tick being
/// decoded, so an event carries the player as they were at that moment.
pub struct ScriptedDecoder {
    map: String,
    tick_rate: f64,
    roster: Roster,
    ticks: Vec<ScriptTick>,
    failure: Option<ScriptFailure>,
    cursor: usize,
    waiting: u32,
    ticks_decoded: u64,
}

impl ScriptedDecoder {
    /// Validate `script` and build a decoder positioned before its first tick.
    pub fn from_script(script: &ReplayScript) -> Result<Self, ScriptError> {
        script.validate()?;
        let roster = Roster::new(&script.roster, &script.spectators)?;
        let waiting = script.ticks.first().map_or(0, |tick| tick.wait);

        Ok(ScriptedDecoder {
            map: script.map.clone(),
            tick_rate: script.tick_rate,
            roster,
            ticks: script.ticks.clone(),
            failure: script.failure.clone(),
            cursor: 0,
            waiting,
            ticks_decoded: 0,
        })
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Ticks decoded so far, including empty ones.
    pub fn ticks_decoded(&self) -> u64 {
        self.ticks_decoded
    }

    fn resolve(&self, name: &str) -> Option<RawPlayer> {
        self.roster.get(name).cloned()
    }

    fn decode_scripted_tick(&mut self, notifications: &mut Vec<Notification<CsgoEvent>>) {
        let tick = &self.ticks[self.cursor];
        for update in &tick.updates {
            if let Some(player) = self.roster.get_mut(&update.player) {
                update.apply(player);
            }
        }

        for notification in &tick.notify {
            let decoded = match notification {
                ScriptNotification::Lifecycle(signal) => Notification::Lifecycle(signal.into()),
                ScriptNotification::Gameplay(event) => {
                    Notification::Gameplay(event.resolve(|name| self.resolve(name)))
                }
            };
            notifications.push(decoded);
        }

        self.cursor += 1;
        self.waiting = self.ticks.get(self.cursor).map_or(0, |next| next.wait);
    }
}

impl DecoderAdapter for ScriptedDecoder {
    type Player = RawPlayer;
    type Event = CsgoEvent;

    fn map_name(&self) -> &str {
        &self.map
    }

    fn tick_rate(&self) -> f64 {
        self.tick_rate
    }

    fn participants(&self) -> &[RawPlayer] {
        self.roster.participants()
    }

    fn advance_tick(
        &mut self,
        notifications: &mut Vec<Notification<CsgoEvent>>,
    ) -> Result<bool, DecodeError> {
        if self.cursor >= self.ticks.len() {
            return match self.failure.take() {
                None => Ok(false),
                Some(ScriptFailure::Truncated) => Err(DecodeError::Truncated {
                    ticks_decoded: self.ticks_decoded,
                }),
                Some(ScriptFailure::Corrupted { reason }) => Err(DecodeError::Corrupted {
                    ticks_decoded: self.ticks_decoded,
                    reason,
                }),
            };
        }

        if self.waiting > 0 {
            self.waiting -= 1;
        } else {
            self.decode_scripted_tick(notifications);
            trace!(
                tick = self.ticks_decoded,
                notifications = notifications.len(),
                "decoded scripted tick"
            );
        }

        self.ticks_decoded += 1;
        Ok(true)
    }
}
