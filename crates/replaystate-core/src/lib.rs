mod document;
mod engine;

pub use document::actor::{
    ActorId, Facing, Item, PlayerDetailed, PlayerDetailedWithItems, PlayerFlashed, PlayerSnapshot,
    Position, Velocity,
};
pub use document::event::{
    ActorEvent, BombEvent, Event, FlashEvent, NadeEvent, PlayerHurt, PlayerKilled, Takeover,
    WeaponFire, WeaponReload,
};
pub use document::{GameStateDocument, Match, Meta, PlayerMeta, Round, Tick};
pub use engine::GameStateGenerator;
pub use engine::accumulator::RoundAccumulator;
pub use engine::adapter::{DecoderAdapter, LifecycleSignal, Notification, ReplayFormat};
pub use engine::config::{GeneratorConfig, GeneratorConfigError};
pub use engine::error::{DecodeError, GenerateError, SinkError};
pub use engine::lifecycle::{LifecycleState, RoundPhase, Transition};
pub use engine::report::{RunOutcome, RunReport};
pub use engine::sink::{JsonFileSink, JsonStringSink, OutputSink, json_path_for};
pub use engine::tick::{SamplingSchedule, TickAggregator, TickStats, sampling_interval};
