use crate::{
    document::{Meta, actor::ActorId, event::Event},
    engine::error::DecodeError,
};

/// Lifecycle signals that drive the match/round state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleSignal {
    MatchStart,
    RoundStart,
    FreezeEnd,
    RoundEnd { winner: String },
    MatchEnd,
}

/// One notification raised by a decoder while it advances a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification<E> {
    Lifecycle(LifecycleSignal),
    Gameplay(E),
}

/// Pull-based replay decoder.
///
/// `advance_tick` decodes exactly one tick and pushes the notifications raised
/// during it, in decode order. It returns `Ok(false)` once the stream is
/// exhausted, in which case nothing was decoded. An `Err` is terminal; anything
/// pushed during the failing call is discarded by the generator.
pub trait DecoderAdapter {
    /// Decoder-side participant handle.
    type Player;
    /// Decoder-side gameplay notification.
    type Event;

    fn map_name(&self) -> &str;

    fn tick_rate(&self) -> f64;

    /// Participants currently playing (spectators excluded).
    fn participants(&self) -> &[Self::Player];

    fn advance_tick(
        &mut self,
        notifications: &mut Vec<Notification<Self::Event>>,
    ) -> Result<bool, DecodeError>;
}

/// Per replay-type capability set.
///
/// The aggregation core never inspects decoder types directly; everything that
/// depends on the game title goes through this trait, so the lifecycle, tick
/// and round logic is shared by every format.
pub trait ReplayFormat {
    type Player;
    type Event;

    /// Normalize one gameplay notification. `None` means the notification does
    /// not produce an event (for example a spectator footstep).
    fn map_event(&self, raw: &Self::Event, participants: &[Self::Player]) -> Option<Event>;

    fn assemble_meta(&self, map_name: &str, tick_rate: f64, participants: &[Self::Player])
    -> Meta;

    fn actor_id(&self, player: &Self::Player) -> ActorId;

    /// Build the synthesized `player_position` event for a participant.
    fn position_snapshot(&self, player: &Self::Player) -> Event;
}
