use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use dtge_api::{load_scene_directory, Playthrough};
use dtge_runtime::clock_seed;

use crate::{
    load_cli_project, load_cli_state, map_line_io, save_cli_state, CliError, CliStateV1,
    LineArgs, LineCommandAction,
};

const DEFAULT_STATE_FILE: &str = ".dtge/save.json";
const HELP: &str = "commands: :help :facts :save :load :restart :quit";

/// Fixed inputs of an interactive session.
#[derive(Debug, Clone)]
pub(crate) struct LineSession {
    pub(crate) scenes_dir: PathBuf,
    pub(crate) start_target: String,
    pub(crate) seed: u32,
    pub(crate) state_file: PathBuf,
}

pub(crate) fn run_line_mode(args: LineArgs) -> Result<i32, CliError> {
    let project = load_cli_project(&args.scenes_dir)?;
    let session = LineSession {
        scenes_dir: project.root.clone(),
        start_target: args
            .start_scene
            .unwrap_or_else(|| project.start_scene_id().to_string()),
        seed: args.seed.unwrap_or_else(clock_seed),
        state_file: PathBuf::from(
            args.state_file
                .unwrap_or_else(|| DEFAULT_STATE_FILE.to_string()),
        ),
    };
    let mut playthrough = Playthrough::start(project.registry, &session.start_target, session.seed)?;

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut writer = io::stdout();
    run_line_mode_with_io(&session, &mut playthrough, &mut reader, &mut writer)
}

pub(crate) fn run_line_mode_with_io(
    session: &LineSession,
    playthrough: &mut Playthrough,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<i32, CliError> {
    writeln!(writer, "DTGE").map_err(map_line_io)?;
    writeln!(writer, "{}", HELP).map_err(map_line_io)?;

    loop {
        let view = playthrough.view()?;
        writeln!(writer).map_err(map_line_io)?;
        writeln!(writer, "{}", view.text).map_err(map_line_io)?;
        for option in &view.options {
            let written = if option.enabled {
                writeln!(writer, "  [{}] {}", option.slot, option.display_name)
            } else {
                writeln!(writer, "  [{}] ({})", option.slot, option.display_name)
            };
            written.map_err(map_line_io)?;
        }
        if !view.options.iter().any(|option| option.enabled) {
            writeln!(writer).map_err(map_line_io)?;
            writeln!(writer, "[END]").map_err(map_line_io)?;
            return Ok(0);
        }

        loop {
            let Some(raw) = prompt_input_from("> ", reader, writer)? else {
                return Ok(0);
            };
            let mut emit = |line: String| writeln!(writer, "{}", line).map_err(map_line_io);
            let action = match handle_line_command(raw.as_str(), session, playthrough, &mut emit)
            {
                Ok(action) => action,
                Err(error) => {
                    emit(format!("{}: {}", error.code, error.message))?;
                    continue;
                }
            };
            match action {
                LineCommandAction::Continue => continue,
                LineCommandAction::Refresh => break,
                LineCommandAction::Quit => return Ok(0),
                LineCommandAction::NotHandled => {}
            }
            let Ok(slot) = raw.trim().parse::<usize>() else {
                emit(format!("invalid choice: {}", raw))?;
                continue;
            };
            match playthrough.choose(slot) {
                Ok(()) => break,
                Err(error) => emit(format!("{}: {}", error.code(), error))?,
            }
        }
    }
}

pub(crate) fn handle_line_command(
    raw: &str,
    session: &LineSession,
    playthrough: &mut Playthrough,
    emit: &mut dyn FnMut(String) -> Result<(), CliError>,
) -> Result<LineCommandAction, CliError> {
    match raw.trim() {
        ":help" => {
            emit(HELP.to_string())?;
            Ok(LineCommandAction::Continue)
        }
        ":facts" => {
            let facts = playthrough.facts().to_sorted();
            if facts.is_empty() {
                emit("(no facts)".to_string())?;
            }
            for (name, value) in facts {
                emit(format!("{} = {}", name, value))?;
            }
            Ok(LineCommandAction::Continue)
        }
        ":save" => {
            save_cli_state(
                &session.state_file,
                &CliStateV1::new(
                    &session.scenes_dir.to_string_lossy(),
                    playthrough.state(),
                ),
            )?;
            emit(format!("saved: {}", session.state_file.display()))?;
            Ok(LineCommandAction::Continue)
        }
        ":load" => {
            let state = load_cli_state(&session.state_file)?;
            let registry = load_scene_directory(Path::new(&state.scenes_dir))?;
            *playthrough = Playthrough::restore(registry, state.playthrough)?;
            emit(format!("loaded: {}", session.state_file.display()))?;
            Ok(LineCommandAction::Refresh)
        }
        ":restart" => {
            let registry = load_scene_directory(&session.scenes_dir)?;
            *playthrough = Playthrough::start(registry, &session.start_target, session.seed)?;
            emit("restarted".to_string())?;
            Ok(LineCommandAction::Refresh)
        }
        ":quit" => {
            emit("bye".to_string())?;
            Ok(LineCommandAction::Quit)
        }
        _ => Ok(LineCommandAction::NotHandled),
    }
}

/// `None` once the input is exhausted.
pub(crate) fn prompt_input_from(
    prefix: &str,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<Option<String>, CliError> {
    write!(writer, "{}", prefix).map_err(map_line_io)?;
    writer.flush().map_err(map_line_io)?;
    let mut input = String::new();
    let read = reader.read_line(&mut input).map_err(map_line_io)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim_end_matches(&['\r', '\n'][..]).to_string()))
}
