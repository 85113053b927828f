mod playthrough;
mod scene_files;

pub use playthrough::{
    OptionView, Playthrough, PlaythroughState, SceneView, PLAYTHROUGH_STATE_SCHEMA,
};
pub use scene_files::{
    load_game_data, load_project, load_scene_directory, load_scene_file, parse_scene,
    render_scene, save_scene_file, scene_file_path, LoadedProject,
};

use dtge_core::DtgeError;
use dtge_runtime::{derive_seed, EvaluatePass, FactStore, SceneRegistry};

/// Renders one scene without touching its random state or the given facts.
///
/// `target` may name a subscene (`scene.subscene`). When `seed` is given the
/// scene's snippets are reseeded and Random snippets draw once, so a preview
/// can show what a fresh visit would roll. The registry is left untouched,
/// subscene cursors included.
pub fn preview_scene(
    registry: &SceneRegistry,
    target: &str,
    facts: &FactStore,
    seed: Option<u32>,
) -> Result<String, DtgeError> {
    let mut scene = registry.resolve_detached(target)?;
    let mut scratch = facts.clone();
    let pass = match seed {
        Some(seed) => {
            scene.reseed(derive_seed(seed, 0));
            EvaluatePass {
                refresh_random: true,
                apply_effects: true,
            }
        }
        None => EvaluatePass {
            refresh_random: false,
            apply_effects: true,
        },
    };
    scene.calculate_scene_text(&mut scratch, pass)
}
