use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::{ReplayScript, SCRIPT_VERSION, ScriptError, ScriptedDecoder};

/// Parse a replay script from YAML text and check that it can be replayed.
///
/// Scripts without a `version` are read as the current version.
pub fn parse_script(yaml: &str) -> Result<ReplayScript, ScriptError> {
    admit(serde_yaml::from_str(yaml)?)
}

/// Load a replay script from YAML on disk, see [`parse_script`].
pub fn load_yaml(path: impl AsRef<Path>) -> Result<ReplayScript, ScriptError> {
    let reader = BufReader::new(File::open(path)?);
    admit(serde_yaml::from_reader(reader)?)
}

pub fn decoder_from_yaml(path: impl AsRef<Path>) -> Result<ScriptedDecoder, ScriptError> {
    load_yaml(path)?.compile()
}

/// Write a replay script as YAML. Invalid scripts are rejected before the file
/// is touched.
pub fn save_yaml(path: impl AsRef<Path>, script: &ReplayScript) -> Result<(), ScriptError> {
    script.validate()?;
    let mut writer = BufWriter::new(File::create(path)?);
    serde_yaml::to_writer(&mut writer, script)?;
    writer.flush()?;
    Ok(())
}

fn admit(script: ReplayScript) -> Result<ReplayScript, ScriptError> {
    if let Some(found) = script.version.filter(|&version| version != SCRIPT_VERSION) {
        return Err(ScriptError::UnsupportedVersion {
            found,
            supported: SCRIPT_VERSION,
        });
    }
    script.validate()?;
    Ok(script)
}
