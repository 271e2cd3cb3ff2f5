use thiserror::Error;

/// Terminal failure reported by a decoder while advancing the replay stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("replay stream ended unexpectedly after {ticks_decoded} ticks")]
    Truncated { ticks_decoded: u64 },

    #[error("replay stream corrupted after {ticks_decoded} ticks: {reason}")]
    Corrupted { ticks_decoded: u64, reason: String },
}

/// Failure while handing the finished document to an output sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write gamestate output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize gamestate: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error type for a complete generator run.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The tick rate reported by the decoder produces no usable sampling interval.
    #[error("sampling interval is zero for tick rate {tick_rate}; replay header is malformed")]
    ZeroSamplingInterval { tick_rate: f64 },

    #[error(transparent)]
    Sink(#[from] SinkError),
}
