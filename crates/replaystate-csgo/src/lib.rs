mod builder;
mod decoder;
mod error;
mod io;
mod mapper;
mod raw;
mod roster;
mod script;
mod synthetic;

pub use builder::ScriptBuilder;
pub use decoder::ScriptedDecoder;
pub use error::ScriptError;
pub use io::{decoder_from_yaml, load_yaml, parse_script, save_yaml};
pub use mapper::CsgoFormat;
pub use raw::{
    BombAction, CsgoEvent, Equipment, GameplayEvent, GrenadePhase, NadeKind, RawPlayer, Team,
    Vector3,
};
pub use roster::Roster;
pub use script::{
    PlayerUpdate, ReplayScript, SCRIPT_VERSION, ScriptFailure, ScriptNotification, ScriptSignal,
    ScriptTick,
};
pub use synthetic::{SyntheticConfig, SyntheticReplay};

/// Generator preconfigured for Counter-Strike replays.
pub type CsgoGenerator = replaystate_core::GameStateGenerator<CsgoFormat>;
