use std::path::PathBuf;

use dtge_api::{load_project, LoadedProject};

use crate::CliError;

pub(crate) fn resolve_scenes_dir(scenes_dir: &str) -> Result<PathBuf, CliError> {
    let path = PathBuf::from(scenes_dir);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map_err(|error| CliError::new("CLI_SOURCE_PATH", error.to_string()))?
            .join(path)
    };

    if !absolute.exists() {
        return Err(CliError::new(
            "CLI_SOURCE_NOT_FOUND",
            format!("scenes-dir does not exist: {}", absolute.display()),
        ));
    }

    if !absolute.is_dir() {
        return Err(CliError::new(
            "CLI_SOURCE_NOT_DIR",
            format!("scenes-dir is not a directory: {}", absolute.display()),
        ));
    }

    Ok(absolute)
}

pub(crate) fn load_cli_project(scenes_dir: &str) -> Result<LoadedProject, CliError> {
    let root = resolve_scenes_dir(scenes_dir)?;
    let project = load_project(&root)?;
    if project.registry.is_empty() {
        return Err(CliError::new(
            "CLI_SOURCE_EMPTY",
            format!("No .dscn files under {}", root.display()),
        ));
    }
    Ok(project)
}
