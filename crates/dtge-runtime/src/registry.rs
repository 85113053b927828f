use std::collections::BTreeMap;

use dtge_core::{DtgeError, SceneTarget};
use tracing::{debug, warn};

use crate::{Scene, SubsceneSelector};

/// Option whose target does not resolve to a registered scene or subscene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingTarget {
    pub scene_id: String,
    pub slot: usize,
    pub target: String,
}

/// Scenes by id. Registering an id twice replaces the earlier scene.
#[derive(Debug, Clone, Default)]
pub struct SceneRegistry {
    scenes: BTreeMap<String, Scene>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, scene: Scene) -> Option<Scene> {
        let id = scene.id().to_string();
        debug!(scene_id = %id, "scene registered");
        self.scenes.insert(id, scene)
    }

    pub fn unregister(&mut self, scene_id: &str) -> Option<Scene> {
        self.scenes.remove(scene_id)
    }

    pub fn contains(&self, scene_id: &str) -> bool {
        self.scenes.contains_key(scene_id)
    }

    pub fn lookup(&self, scene_id: &str) -> Result<&Scene, DtgeError> {
        self.scenes
            .get(scene_id)
            .ok_or_else(|| scene_not_found(scene_id))
    }

    pub fn lookup_mut(&mut self, scene_id: &str) -> Result<&mut Scene, DtgeError> {
        self.scenes
            .get_mut(scene_id)
            .ok_or_else(|| scene_not_found(scene_id))
    }

    /// Resolves `scene` or `scene.subscene` and moves the scene's cursor.
    ///
    /// A named subscene that does not exist is an error, never a silent
    /// fallback. Without a subscene part the cursor goes to the scene's first
    /// subscene, if it has any.
    pub fn lookup_with_subscene(&mut self, compound: &str) -> Result<&mut Scene, DtgeError> {
        let target = SceneTarget::parse(compound);
        let scene = self.lookup_mut(target.scene_id)?;
        point_cursor(scene, target.subscene)?;
        Ok(scene)
    }

    /// Same resolution as [`Self::lookup_with_subscene`], applied to a copy.
    /// The registered scene keeps its cursor.
    pub fn resolve_detached(&self, compound: &str) -> Result<Scene, DtgeError> {
        let target = SceneTarget::parse(compound);
        let mut scene = self.lookup(target.scene_id)?.clone();
        point_cursor(&mut scene, target.subscene)?;
        Ok(scene)
    }

    pub fn clear(&mut self) {
        self.scenes.clear();
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Scene ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.scenes.keys().map(String::as_str)
    }

    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.values()
    }

    /// Options pointing nowhere. Placeholder options with an empty target
    /// are skipped.
    pub fn dangling_targets(&self) -> Vec<DanglingTarget> {
        let mut dangling = Vec::new();
        for scene in self.scenes.values() {
            for (slot, option) in scene.options().iter().enumerate() {
                let target = option.target();
                if target.is_empty() || self.resolves(target) {
                    continue;
                }
                warn!(scene_id = %scene.id(), slot, target = %option.target_scene_id, "dangling option target");
                dangling.push(DanglingTarget {
                    scene_id: scene.id().to_string(),
                    slot,
                    target: option.target_scene_id.clone(),
                });
            }
        }
        dangling
    }

    fn resolves(&self, target: SceneTarget<'_>) -> bool {
        let Some(scene) = self.scenes.get(target.scene_id) else {
            return false;
        };
        match target.subscene {
            Some(name) => scene.find_subscene(name).is_some(),
            None => true,
        }
    }
}

fn scene_not_found(scene_id: &str) -> DtgeError {
    DtgeError::SceneNotFound {
        scene_id: scene_id.to_string(),
    }
}

fn point_cursor(scene: &mut Scene, subscene: Option<&str>) -> Result<(), DtgeError> {
    match subscene {
        Some(name) => scene.set_current_subscene(SubsceneSelector::Name(name)),
        None => {
            scene.select_default_subscene();
            Ok(())
        }
    }
}
