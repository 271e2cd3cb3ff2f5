use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{document::GameStateDocument, engine::error::SinkError};

/// Destination for the finished gamestate document.
///
/// The generator calls `write` at most once per run and drops the sink when the
/// run ends, so implementations release any handle they hold in `Drop`.
pub trait OutputSink {
    fn write(&mut self, document: &GameStateDocument, pretty: bool) -> Result<(), SinkError>;
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn write(&mut self, document: &GameStateDocument, pretty: bool) -> Result<(), SinkError> {
        (**self).write(document, pretty)
    }
}

/// Derive the output path for a replay file: `match.dem` becomes `match.json`.
pub fn json_path_for(replay: impl AsRef<Path>) -> PathBuf {
    replay.as_ref().with_extension("json")
}

/// Writes the document as JSON into a file.
///
/// The file is created on the first `write`, so a run rejected before any
/// output exists leaves nothing on disk.
#[derive(Debug)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    /// Target `path`; an existing file there is truncated once the document is written.
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonFileSink {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Target the path next to a replay, see [`json_path_for`].
    pub fn beside_replay(replay: impl AsRef<Path>) -> Self {
        Self::new(json_path_for(replay))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for JsonFileSink {
    fn write(&mut self, document: &GameStateDocument, pretty: bool) -> Result<(), SinkError> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        if pretty {
            serde_json::to_writer_pretty(&mut writer, document)?;
        } else {
            serde_json::to_writer(&mut writer, document)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Collects the serialized document in memory.
#[derive(Debug, Clone, Default)]
pub struct JsonStringSink {
    output: String,
}

impl JsonStringSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.output
    }

    pub fn into_string(self) -> String {
        self.output
    }
}

impl OutputSink for JsonStringSink {
    fn write(&mut self, document: &GameStateDocument, pretty: bool) -> Result<(), SinkError> {
        self.output = document.to_json_string(pretty)?;
        Ok(())
    }
}
