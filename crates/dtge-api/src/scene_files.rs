use std::fs;
use std::path::{Path, PathBuf};

use dtge_core::{DtgeError, GameData, SceneRecord, GAME_DATA_FILE_PATH, SCENE_FILE_EXTENSION};
use dtge_runtime::{Scene, SceneRegistry};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A scene directory with its registry and settings.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub root: PathBuf,
    pub game_data: GameData,
    pub registry: SceneRegistry,
}

impl LoadedProject {
    pub fn start_scene_id(&self) -> &str {
        &self.game_data.start_scene_name
    }
}

/// Errors of either stage carry `origin` in their context.
pub fn parse_scene(source: &str, origin: &str) -> Result<Scene, DtgeError> {
    let record: SceneRecord =
        serde_json::from_str(source).map_err(|error| DtgeError::format(origin, error))?;
    Scene::from_record(record).map_err(|error| match error {
        DtgeError::Format { context, message } => DtgeError::Format {
            context: format!("{}: {}", origin, context),
            message,
        },
        other => DtgeError::format(origin, other),
    })
}

pub fn render_scene(scene: &Scene) -> Result<String, DtgeError> {
    serde_json::to_string_pretty(&scene.to_record())
        .map_err(|error| DtgeError::format(format!("scene \"{}\"", scene.id()), error))
}

pub fn load_scene_file(path: &Path) -> Result<Scene, DtgeError> {
    let raw = fs::read_to_string(path).map_err(|error| DtgeError::io(path.display(), error))?;
    parse_scene(&raw, &path.display().to_string())
}

pub fn save_scene_file(path: &Path, scene: &Scene) -> Result<(), DtgeError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|error| DtgeError::io(parent.display(), error))?;
    let payload = render_scene(scene)?;
    fs::write(path, payload).map_err(|error| DtgeError::io(path.display(), error))
}

/// Path a scene is saved under inside a scene directory.
pub fn scene_file_path(scenes_dir: &Path, scene_id: &str) -> PathBuf {
    scenes_dir.join(format!("{}.{}", scene_id, SCENE_FILE_EXTENSION))
}

/// Loads every `*.dscn` file below `scenes_dir`, in file-name order.
///
/// Any file that fails to parse aborts the whole load. A later file with an
/// id already seen replaces the earlier scene.
pub fn load_scene_directory(scenes_dir: &Path) -> Result<SceneRegistry, DtgeError> {
    if !scenes_dir.is_dir() {
        return Err(DtgeError::io(
            scenes_dir.display(),
            "scene directory does not exist or is not a directory",
        ));
    }

    let mut registry = SceneRegistry::new();
    for entry in WalkDir::new(scenes_dir)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|error| DtgeError::io(scenes_dir.display(), error))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(SCENE_FILE_EXTENSION) {
            continue;
        }
        let scene = load_scene_file(path)?;
        if registry.register(scene).is_some() {
            warn!(path = %path.display(), "scene id registered twice; later file wins");
        }
    }
    debug!(dir = %scenes_dir.display(), scenes = registry.len(), "scene directory loaded");
    Ok(registry)
}

/// Reads `dtge.gamedata`; a missing file yields the defaults.
pub fn load_game_data(path: &Path) -> Result<GameData, DtgeError> {
    if !path.exists() {
        debug!(path = %path.display(), "no game data file; using defaults");
        return Ok(GameData::default());
    }
    let raw = fs::read_to_string(path).map_err(|error| DtgeError::io(path.display(), error))?;
    serde_json::from_str(&raw)
        .map_err(|error| DtgeError::format(path.display().to_string(), error))
}

/// Loads a scene directory together with the `dtge.gamedata` stored in it.
pub fn load_project(scenes_dir: &Path) -> Result<LoadedProject, DtgeError> {
    let game_data = load_game_data(&scenes_dir.join(GAME_DATA_FILE_PATH))?;
    let registry = load_scene_directory(scenes_dir)?;
    Ok(LoadedProject {
        root: scenes_dir.to_path_buf(),
        game_data,
        registry,
    })
}
