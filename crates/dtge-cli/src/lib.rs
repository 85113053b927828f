use std::ffi::OsString;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod agent;
mod cli_args;
mod error_map;
mod inspect;
mod line_mode;
mod models;
mod scene_output;
mod source_loader;
mod state_store;

pub(crate) use cli_args::{
    CheckArgs, ChooseArgs, Cli, LineArgs, Mode, PlayArgs, PlayCommand, PreviewArgs, StartArgs,
};
pub(crate) use error_map::{
    emit_error, json_string, map_cli_state_invalid, map_cli_state_read, map_cli_state_write,
    map_line_io, CliError,
};
pub(crate) use models::{CliStateV1, LineCommandAction, CLI_STATE_SCHEMA};
pub(crate) use scene_output::emit_scene;
pub(crate) use source_loader::load_cli_project;
pub(crate) use state_store::{load_cli_state, save_cli_state};

/// Environment variable holding the log filter, e.g. `DTGE_LOG=debug`.
pub const LOG_ENV: &str = "DTGE_LOG";

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    init_logging();
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

/// Logs go to stderr so stdout stays a clean line protocol.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when running inside tests.
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<i32, CliError> {
    match cli.command {
        Mode::Play(args) => agent::run_play(args),
        Mode::Preview(args) => inspect::run_preview(args),
        Mode::Check(args) => inspect::run_check(args),
        Mode::Line(args) => line_mode::run_line_mode(args),
    }
}
