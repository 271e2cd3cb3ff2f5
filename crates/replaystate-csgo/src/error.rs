use thiserror::Error;

#[derive(Debug, Error)]
/// Error type for replay script loading, validation and building.
pub enum ScriptError {
    #[error("failed to read replay script: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse replay script YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("replay script version {found} is not supported (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("tick {tick} references unknown player '{name}'")]
    UnknownPlayer { name: String, tick: usize },

    #[error("player '{name}' is declared more than once (by name or steam id)")]
    DuplicatePlayer { name: String },

    #[error("replay script declares no playing participants")]
    EmptyRoster,
}
