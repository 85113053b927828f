use dtge_api::PlaythroughState;
use serde::{Deserialize, Serialize};

pub(crate) const CLI_STATE_SCHEMA: &str = "dtge-cli-state.v1";

/// What `play` keeps between invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CliStateV1 {
    pub(crate) schema_version: String,
    pub(crate) scenes_dir: String,
    pub(crate) playthrough: PlaythroughState,
}

impl CliStateV1 {
    pub(crate) fn new(scenes_dir: &str, playthrough: PlaythroughState) -> Self {
        Self {
            schema_version: CLI_STATE_SCHEMA.to_string(),
            scenes_dir: scenes_dir.to_string(),
            playthrough,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineCommandAction {
    NotHandled,
    Continue,
    Refresh,
    Quit,
}
