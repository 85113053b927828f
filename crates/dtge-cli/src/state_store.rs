use std::fs;
use std::path::Path;

use crate::{
    map_cli_state_invalid, map_cli_state_read, map_cli_state_write, CliError, CliStateV1,
    CLI_STATE_SCHEMA,
};

pub(crate) fn save_cli_state(path: &Path, state: &CliStateV1) -> Result<(), CliError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(map_cli_state_write)?;

    let payload = serde_json::to_string_pretty(state).map_err(map_cli_state_invalid)?;
    fs::write(path, payload).map_err(map_cli_state_write)
}

pub(crate) fn load_cli_state(path: &Path) -> Result<CliStateV1, CliError> {
    if !path.exists() {
        return Err(CliError::new(
            "CLI_STATE_NOT_FOUND",
            format!("State file does not exist: {}", path.display()),
        ));
    }

    let raw = fs::read_to_string(path).map_err(map_cli_state_read)?;
    let state: CliStateV1 = serde_json::from_str(&raw).map_err(map_cli_state_invalid)?;

    if state.schema_version != CLI_STATE_SCHEMA {
        return Err(CliError::new(
            "CLI_STATE_SCHEMA",
            format!("Unsupported cli state schema: {}", state.schema_version),
        ));
    }

    Ok(state)
}
