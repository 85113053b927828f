use serde::{Deserialize, Serialize};

use crate::record::SCENE_FILE_EXTENSION;

pub const GAME_DATA_FILE_PATH: &str = "dtge.gamedata";
pub const DEFAULT_SCENE_DIRECTORY_PATH: &str = "DTGEScenes";
pub const DEFAULT_START_SCENE_NAME: &str = "startscene";
pub const DEFAULT_NAVIGATION_GRID_COLUMNS: usize = 5;
pub const DEFAULT_NAVIGATION_GRID_ROWS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NavigationGridShortcutMode {
    #[default]
    Keyboard,
    Numeric,
}

/// Game-wide settings, as opposed to anything scoped to one scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameData {
    pub scene_directory_path: String,
    pub start_scene_name: String,
    pub navigation_grid_shortcut_mode: NavigationGridShortcutMode,
    pub navigation_grid_columns: usize,
    pub navigation_grid_rows: usize,
}

impl Default for GameData {
    fn default() -> Self {
        Self {
            scene_directory_path: DEFAULT_SCENE_DIRECTORY_PATH.to_string(),
            start_scene_name: DEFAULT_START_SCENE_NAME.to_string(),
            navigation_grid_shortcut_mode: NavigationGridShortcutMode::default(),
            navigation_grid_columns: DEFAULT_NAVIGATION_GRID_COLUMNS,
            navigation_grid_rows: DEFAULT_NAVIGATION_GRID_ROWS,
        }
    }
}

impl GameData {
    pub fn start_scene_path(&self) -> String {
        format!("{}.{}", self.start_scene_name, SCENE_FILE_EXTENSION)
    }

    pub fn maximum_supported_options(&self) -> usize {
        self.navigation_grid_columns * self.navigation_grid_rows
    }
}
