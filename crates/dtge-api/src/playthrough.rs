use std::collections::BTreeMap;

use dtge_core::{DtgeError, SceneTarget};
use dtge_runtime::{
    derive_seed, EvaluatePass, FactStore, SceneRegistry, SubsceneContext,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const PLAYTHROUGH_STATE_SCHEMA: &str = "dtge-playthrough.v1";

/// Snapshot of a playthrough, enough to continue it in another process
/// holding the same scenes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaythroughState {
    pub schema_version: String,
    pub current_target: String,
    pub text: String,
    pub facts: BTreeMap<String, bool>,
    pub history: Vec<String>,
    pub seed: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionView {
    pub slot: usize,
    pub id: String,
    pub display_name: String,
    pub tooltip: String,
    pub target: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneView {
    pub scene_id: String,
    pub subscene: Option<String>,
    pub text: String,
    pub options: Vec<OptionView>,
}

/// One player's walk through a scene registry.
///
/// Every scene entry reseeds the scene from the playthrough seed and the
/// step count, so a restored playthrough continues exactly like an
/// uninterrupted one.
#[derive(Debug, Clone)]
pub struct Playthrough {
    registry: SceneRegistry,
    facts: FactStore,
    current_target: String,
    subscene: Option<String>,
    text: String,
    history: Vec<String>,
    seed: u32,
}

impl Playthrough {
    pub fn start(registry: SceneRegistry, start_target: &str, seed: u32) -> Result<Self, DtgeError> {
        let mut playthrough = Self {
            registry,
            facts: FactStore::new(),
            current_target: String::new(),
            subscene: None,
            text: String::new(),
            history: Vec::new(),
            seed,
        };
        playthrough.enter(start_target)?;
        Ok(playthrough)
    }

    /// Rebuilds a playthrough from a snapshot. Entity setters of the current
    /// scene are not applied again; the saved text is shown as it was.
    pub fn restore(registry: SceneRegistry, state: PlaythroughState) -> Result<Self, DtgeError> {
        if state.schema_version != PLAYTHROUGH_STATE_SCHEMA {
            return Err(DtgeError::format(
                "playthrough state",
                format!("unsupported schema {}", state.schema_version),
            ));
        }
        let mut registry = registry;
        let subscene = registry
            .lookup_with_subscene(&state.current_target)?
            .current_subscene_identity()
            .map(|identity| identity.name().to_string());
        Ok(Self {
            registry,
            facts: state.facts.into_iter().collect(),
            current_target: state.current_target,
            subscene,
            text: state.text,
            history: state.history,
            seed: state.seed,
        })
    }

    pub fn state(&self) -> PlaythroughState {
        PlaythroughState {
            schema_version: PLAYTHROUGH_STATE_SCHEMA.to_string(),
            current_target: self.current_target.clone(),
            text: self.text.clone(),
            facts: self.facts.to_sorted(),
            history: self.history.clone(),
            seed: self.seed,
        }
    }

    pub fn view(&self) -> Result<SceneView, DtgeError> {
        let scene_id = self.current_scene_id();
        let scene = self.registry.lookup(scene_id)?;
        let options = scene
            .options()
            .iter()
            .enumerate()
            .map(|(slot, option)| OptionView {
                slot,
                id: option.id.clone(),
                display_name: option.display_name.clone(),
                tooltip: option.tooltip.clone(),
                target: option.target_scene_id.clone(),
                enabled: option.enabled,
            })
            .collect();
        Ok(SceneView {
            scene_id: scene_id.to_string(),
            subscene: self.subscene.clone(),
            text: self.text.clone(),
            options,
        })
    }

    /// Follows the option in `slot`. On any error the playthrough stays on
    /// the current scene with its facts untouched.
    pub fn choose(&mut self, slot: usize) -> Result<(), DtgeError> {
        let scene = self.registry.lookup(self.current_scene_id())?;
        let option = scene.option(slot)?;
        if !option.enabled {
            return Err(DtgeError::OptionDisabled {
                scene_id: scene.id().to_string(),
                option_id: option.id.clone(),
            });
        }
        let target = option.target_scene_id.clone();
        let previous = self.current_target.clone();
        self.enter(&target)?;
        self.history.push(previous);
        Ok(())
    }

    pub fn current_target(&self) -> &str {
        &self.current_target
    }

    pub fn current_scene_id(&self) -> &str {
        SceneTarget::parse(&self.current_target).scene_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn facts(&self) -> &FactStore {
        &self.facts
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    fn enter(&mut self, target: &str) -> Result<(), DtgeError> {
        let step = self.history.len() + usize::from(!self.current_target.is_empty());
        let scene = self.registry.lookup_with_subscene(target)?;
        scene.reseed(derive_seed(self.seed, step));
        let text = scene.calculate_scene_text(&mut self.facts, EvaluatePass::PLAY)?;
        let subscene = scene
            .current_subscene_identity()
            .map(|identity| identity.name().to_string());
        debug!(target = %target, step, "scene entered");
        self.current_target = target.to_string();
        self.subscene = subscene;
        self.text = text;
        Ok(())
    }
}
