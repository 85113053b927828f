use std::path::Path;

use dtge_api::{load_scene_directory, Playthrough};
use dtge_runtime::clock_seed;

use crate::{
    emit_scene, load_cli_project, load_cli_state, save_cli_state, ChooseArgs, CliError,
    CliStateV1, PlayArgs, PlayCommand, StartArgs,
};

pub(super) fn run_play(args: PlayArgs) -> Result<i32, CliError> {
    match args.command {
        PlayCommand::Start(args) => run_start(args),
        PlayCommand::Choose(args) => run_choose(args),
    }
}

pub(super) fn run_start(args: StartArgs) -> Result<i32, CliError> {
    let project = load_cli_project(&args.scenes_dir)?;
    let start = args
        .start_scene
        .unwrap_or_else(|| project.start_scene_id().to_string());
    let seed = args.seed.unwrap_or_else(clock_seed);
    let scenes_dir = project.root.to_string_lossy().to_string();

    let playthrough = Playthrough::start(project.registry, &start, seed)?;
    emit_with_saved_state(&playthrough, &scenes_dir, &args.state_out)
}

pub(super) fn run_choose(args: ChooseArgs) -> Result<i32, CliError> {
    let state = load_cli_state(Path::new(&args.state_in))?;
    let registry = load_scene_directory(Path::new(&state.scenes_dir))?;
    let mut playthrough = Playthrough::restore(registry, state.playthrough)?;
    playthrough.choose(args.choice)?;
    emit_with_saved_state(&playthrough, &state.scenes_dir, &args.state_out)
}

fn emit_with_saved_state(
    playthrough: &Playthrough,
    scenes_dir: &str,
    state_out: &str,
) -> Result<i32, CliError> {
    let view = playthrough.view()?;
    save_cli_state(
        Path::new(state_out),
        &CliStateV1::new(scenes_dir, playthrough.state()),
    )?;
    emit_scene(&view, Some(state_out));
    Ok(0)
}
