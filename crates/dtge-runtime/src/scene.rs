use std::fmt;

use dtge_core::{
    DtgeError, SceneOption, ScenePresentation, SnippetMode, SubsceneId, SubsceneIdentity,
    MAX_OPTION_COUNT,
};
use tracing::debug;

use crate::ids::mint_subscene_id;
use crate::rng::derive_seed;
use crate::{EvaluatePass, FactStore, Snippet, SubsceneContext, SubsceneView};

/// Subscene lifecycle notifications, kept for collaborators (editors, lists)
/// that mirror the subscene list. Snippets are updated directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubsceneEvent {
    Added(SubsceneId),
    Removed(SubsceneId),
    Renamed {
        id: SubsceneId,
        old_name: String,
        new_name: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubsceneSelector<'a> {
    Id(SubsceneId),
    Name(&'a str),
    /// The null subscene, or no subscene at all on a scene without any.
    Null,
}

/// A navigable unit: composed text, up to [`MAX_OPTION_COUNT`] options and
/// any number of subscene variants.
///
/// The null subscene, when allowed, sits at index 0 of the subscene list.
#[derive(Debug, Clone)]
pub struct Scene {
    id: String,
    options: Vec<SceneOption>,
    subscenes: Vec<SubsceneIdentity>,
    allow_null_subscene: bool,
    current_subscene: Option<SubsceneId>,
    snippets: Vec<Snippet>,
    presentation: ScenePresentation,
    events: Vec<SubsceneEvent>,
}

impl PartialEq for Scene {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.options == other.options
            && self.subscenes == other.subscenes
            && self.allow_null_subscene == other.allow_null_subscene
            && self.current_subscene == other.current_subscene
            && self.snippets == other.snippets
            && self.presentation == other.presentation
    }
}

impl Scene {
    /// A fresh scene with one blank option and one blank Simple snippet.
    pub fn new(id: impl Into<String>) -> Self {
        let mut scene = Self::empty(id);
        scene.options.push(SceneOption::default());
        scene.snippets.push(Snippet::new());
        scene
    }

    pub(crate) fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            options: Vec::new(),
            subscenes: Vec::new(),
            allow_null_subscene: false,
            current_subscene: None,
            snippets: Vec::new(),
            presentation: ScenePresentation::default(),
            events: Vec::new(),
        }
    }

    pub(crate) fn restore_parts(
        &mut self,
        subscenes: Vec<SubsceneIdentity>,
        allow_null_subscene: bool,
        current_subscene: Option<SubsceneId>,
    ) {
        self.subscenes = subscenes;
        self.allow_null_subscene = allow_null_subscene;
        self.current_subscene = current_subscene;
    }

    pub(crate) fn push_restored_snippet(&mut self, snippet: Snippet) {
        self.snippets.push(snippet);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn presentation(&self) -> &ScenePresentation {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut ScenePresentation {
        &mut self.presentation
    }

    // ---- options ----

    pub fn options(&self) -> &[SceneOption] {
        &self.options
    }

    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    pub fn option(&self, slot: usize) -> Result<&SceneOption, DtgeError> {
        self.options
            .get(slot)
            .ok_or_else(|| self.option_not_found(slot))
    }

    pub fn option_mut(&mut self, slot: usize) -> Result<&mut SceneOption, DtgeError> {
        let missing = self.option_not_found(slot);
        self.options.get_mut(slot).ok_or(missing)
    }

    /// Appends to the first free slot and returns it.
    pub fn add_option(&mut self, option: SceneOption) -> Result<usize, DtgeError> {
        if self.options.len() >= MAX_OPTION_COUNT {
            return Err(DtgeError::OptionCapacityExceeded {
                scene_id: self.id.clone(),
                capacity: MAX_OPTION_COUNT,
            });
        }
        self.options.push(option);
        Ok(self.options.len() - 1)
    }

    /// Removes a slot; later options shift forward so the list stays packed.
    pub fn remove_option(&mut self, slot: usize) -> Result<SceneOption, DtgeError> {
        if slot >= self.options.len() {
            return Err(self.option_not_found(slot));
        }
        Ok(self.options.remove(slot))
    }

    pub fn move_option(&mut self, from: usize, to: usize) -> Result<(), DtgeError> {
        let len = self.options.len();
        if from >= len {
            return Err(self.option_not_found(from));
        }
        if to >= len {
            return Err(self.option_not_found(to));
        }
        let option = self.options.remove(from);
        self.options.insert(to, option);
        Ok(())
    }

    pub fn clear_options(&mut self) {
        self.options.clear();
    }

    fn option_not_found(&self, slot: usize) -> DtgeError {
        DtgeError::OptionNotFound {
            scene_id: self.id.clone(),
            slot,
        }
    }

    // ---- subscenes ----

    pub fn subscenes(&self) -> &[SubsceneIdentity] {
        &self.subscenes
    }

    pub fn allows_null_subscene(&self) -> bool {
        self.allow_null_subscene
    }

    pub fn current_subscene_id(&self) -> Option<SubsceneId> {
        self.current_subscene
    }

    pub fn current_subscene_index(&self) -> Option<usize> {
        let current = self.current_subscene?;
        self.subscenes
            .iter()
            .position(|identity| identity.id() == current)
    }

    pub fn find_subscene(&self, name: &str) -> Option<&SubsceneIdentity> {
        self.subscenes.iter().find(|identity| identity.name() == name)
    }

    /// Mints a new identity, appends it and gives every Subscene-mode
    /// snippet an empty variation for it.
    pub fn add_subscene(&mut self, name: impl Into<String>) -> SubsceneId {
        let identity = SubsceneIdentity::new(mint_subscene_id(), name);
        let id = identity.id();
        debug!(scene_id = %self.id, subscene = %identity.name(), id = id.get(), "subscene added");
        self.subscenes.push(identity);
        self.notify_added(id);
        id
    }

    /// Snippets are notified before the identity leaves the list. Removing the
    /// selected subscene clears the cursor.
    pub fn remove_subscene(&mut self, index: usize) -> Result<SubsceneIdentity, DtgeError> {
        let Some(identity) = self.subscenes.get(index) else {
            return Err(DtgeError::SubsceneIndexOutOfRange {
                scene_id: self.id.clone(),
                index,
            });
        };
        if identity.is_none() {
            let identity = identity.clone();
            self.disable_null_subscene();
            return Ok(identity);
        }
        let id = identity.id();
        self.notify_removed(id);
        let removed = self.subscenes.remove(index);
        if self.current_subscene == Some(id) {
            self.current_subscene = None;
        }
        debug!(scene_id = %self.id, subscene = %removed.name(), id = id.get(), "subscene removed");
        Ok(removed)
    }

    /// Names are labels only; snippet variations stay keyed by id.
    pub fn rename_subscene(
        &mut self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<(), DtgeError> {
        let scene_id = self.id.clone();
        let identity = self
            .subscenes
            .get_mut(index)
            .ok_or(DtgeError::SubsceneIndexOutOfRange { scene_id, index })?;
        if identity.is_none() {
            return Err(DtgeError::ReservedSubscene {
                operation: "renamed",
            });
        }
        let new_name = name.into();
        let old_name = identity.name().to_string();
        identity.set_name(new_name.clone());
        self.events.push(SubsceneEvent::Renamed {
            id: identity.id(),
            old_name,
            new_name,
        });
        Ok(())
    }

    pub fn enable_null_subscene(&mut self) {
        if self.allow_null_subscene {
            return;
        }
        self.allow_null_subscene = true;
        self.subscenes.insert(0, SubsceneIdentity::none());
        self.notify_added(SubsceneId::NONE);
    }

    pub fn disable_null_subscene(&mut self) {
        if !self.allow_null_subscene {
            return;
        }
        self.notify_removed(SubsceneId::NONE);
        self.subscenes.retain(|identity| !identity.is_none());
        self.allow_null_subscene = false;
        if self.current_subscene == Some(SubsceneId::NONE) {
            self.current_subscene = None;
        }
    }

    /// Moves the cursor. A target that does not exist is rejected and the
    /// cursor keeps its previous value.
    pub fn set_current_subscene(&mut self, selector: SubsceneSelector<'_>) -> Result<(), DtgeError> {
        let next = match selector {
            SubsceneSelector::Id(id) => self
                .subscenes
                .iter()
                .find(|identity| identity.id() == id)
                .map(|identity| Some(identity.id()))
                .ok_or_else(|| DtgeError::SubsceneNotFound {
                    scene_id: self.id.clone(),
                    subscene: id.to_string(),
                })?,
            SubsceneSelector::Name(name) => self
                .find_subscene(name)
                .map(|identity| Some(identity.id()))
                .ok_or_else(|| DtgeError::SubsceneNotFound {
                    scene_id: self.id.clone(),
                    subscene: name.to_string(),
                })?,
            SubsceneSelector::Null if self.allow_null_subscene => Some(SubsceneId::NONE),
            SubsceneSelector::Null if self.subscenes.is_empty() => None,
            SubsceneSelector::Null => {
                return Err(DtgeError::NullSubsceneNotAllowed {
                    scene_id: self.id.clone(),
                })
            }
        };
        self.current_subscene = next;
        Ok(())
    }

    /// Cursor used when navigation names no subscene: the first entry of the
    /// subscene list (the null subscene when allowed), or none.
    pub fn select_default_subscene(&mut self) {
        self.current_subscene = self.subscenes.first().map(SubsceneIdentity::id);
    }

    pub fn subscene_events(&self) -> &[SubsceneEvent] {
        &self.events
    }

    pub fn drain_subscene_events(&mut self) -> Vec<SubsceneEvent> {
        std::mem::take(&mut self.events)
    }

    fn subscene_ids(&self) -> Vec<SubsceneId> {
        self.subscenes.iter().map(SubsceneIdentity::id).collect()
    }

    fn notify_added(&mut self, id: SubsceneId) {
        for snippet in &mut self.snippets {
            snippet.on_subscene_added(id);
        }
        self.events.push(SubsceneEvent::Added(id));
    }

    fn notify_removed(&mut self, id: SubsceneId) {
        for snippet in &mut self.snippets {
            snippet.on_subscene_removed(id);
        }
        self.events.push(SubsceneEvent::Removed(id));
    }

    // ---- snippets ----

    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn snippet_count(&self) -> usize {
        self.snippets.len()
    }

    pub fn snippet(&self, index: usize) -> Result<&Snippet, DtgeError> {
        self.snippets
            .get(index)
            .ok_or_else(|| self.snippet_not_found(index))
    }

    pub fn snippet_mut(&mut self, index: usize) -> Result<&mut Snippet, DtgeError> {
        let missing = self.snippet_not_found(index);
        self.snippets.get_mut(index).ok_or(missing)
    }

    pub fn add_snippet(&mut self, snippet: Snippet) -> usize {
        let snippet = self.adopt(snippet);
        self.snippets.push(snippet);
        self.snippets.len() - 1
    }

    pub fn insert_snippet(&mut self, index: usize, snippet: Snippet) -> Result<(), DtgeError> {
        if index > self.snippets.len() {
            return Err(self.snippet_not_found(index));
        }
        let snippet = self.adopt(snippet);
        self.snippets.insert(index, snippet);
        Ok(())
    }

    pub fn remove_snippet(&mut self, index: usize) -> Result<Snippet, DtgeError> {
        if index >= self.snippets.len() {
            return Err(self.snippet_not_found(index));
        }
        Ok(self.snippets.remove(index))
    }

    pub fn move_snippet(&mut self, from: usize, to: usize) -> Result<(), DtgeError> {
        let len = self.snippets.len();
        if from >= len {
            return Err(self.snippet_not_found(from));
        }
        if to >= len {
            return Err(self.snippet_not_found(to));
        }
        let snippet = self.snippets.remove(from);
        self.snippets.insert(to, snippet);
        Ok(())
    }

    pub fn clear_snippets(&mut self) {
        self.snippets.clear();
    }

    pub fn change_snippet_mode(&mut self, index: usize, mode: SnippetMode) -> Result<(), DtgeError> {
        let missing = self.snippet_not_found(index);
        let view = SubsceneView::new(&self.id, &self.subscenes, self.current_subscene);
        let snippet = self.snippets.get_mut(index).ok_or(missing)?;
        snippet.change_mode(mode, &view)?;
        debug!(scene_id = %self.id, snippet = index, mode = %mode, "snippet mode set");
        Ok(())
    }

    /// Gives every snippet a seed derived from `base` and its position.
    pub fn reseed(&mut self, base: u32) {
        for (index, snippet) in self.snippets.iter_mut().enumerate() {
            snippet.reseed(derive_seed(base, index));
        }
    }

    fn adopt(&self, mut snippet: Snippet) -> Snippet {
        snippet.reconcile_subscenes(&self.subscene_ids());
        snippet
    }

    fn snippet_not_found(&self, index: usize) -> DtgeError {
        DtgeError::SnippetNotFound {
            scene_id: self.id.clone(),
            index,
        }
    }

    // ---- text ----

    /// Concatenates snippet texts in list order. Effects of earlier snippets
    /// are visible to the conditions of later ones within the same pass.
    ///
    /// All-or-nothing: on error neither `facts` nor any snippet's random
    /// state has changed.
    pub fn calculate_scene_text(
        &mut self,
        facts: &mut FactStore,
        pass: EvaluatePass,
    ) -> Result<String, DtgeError> {
        let view = SubsceneView::new(&self.id, &self.subscenes, self.current_subscene);
        let mut staged_facts = facts.clone();
        let mut staged_snippets = self.snippets.clone();
        let mut text = String::new();
        for snippet in &mut staged_snippets {
            text.push_str(&snippet.evaluate(&view, &mut staged_facts, pass)?);
        }
        *facts = staged_facts;
        self.snippets = staged_snippets;
        Ok(text)
    }
}

impl SubsceneContext for Scene {
    fn scene_id(&self) -> &str {
        &self.id
    }

    fn subscene_count(&self) -> usize {
        self.subscenes.len()
    }

    fn subscene_identity(&self, index: usize) -> Option<&SubsceneIdentity> {
        self.subscenes.get(index)
    }

    fn current_subscene_identity(&self) -> Option<&SubsceneIdentity> {
        let current = self.current_subscene?;
        self.subscenes
            .iter()
            .find(|identity| identity.id() == current)
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Id: {}", self.id)?;
        writeln!(f, "Subscenes:")?;
        for identity in &self.subscenes {
            let marker = if Some(identity.id()) == self.current_subscene {
                "*"
            } else {
                " "
            };
            writeln!(f, " {} {} ({})", marker, identity.name(), identity.id())?;
        }
        writeln!(f, "Snippets:")?;
        for (index, snippet) in self.snippets.iter().enumerate() {
            writeln!(
                f,
                "  [{}] {} x{}",
                index,
                snippet.mode(),
                snippet.variation_count()
            )?;
        }
        writeln!(f, "Options:")?;
        for option in &self.options {
            write!(f, "{}", option)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod scene_tests {
    use super::*;
    use crate::VariationKey;

    fn subscene_scene() -> (Scene, SubsceneId, SubsceneId) {
        let mut scene = Scene::new("camp");
        let day = scene.add_subscene("day");
        let night = scene.add_subscene("night");
        (scene, day, night)
    }

    #[test]
    fn new_scene_has_one_option_and_one_simple_snippet() {
        let scene = Scene::new("start");
        assert_eq!(scene.option_count(), 1);
        assert_eq!(scene.snippet_count(), 1);
        assert_eq!(scene.snippets()[0].mode(), SnippetMode::Simple);
        assert_eq!(scene.subscene_count(), 0);
        assert_eq!(scene.current_subscene_identity(), None);
    }

    #[test]
    fn options_are_front_packed_and_capped() {
        let mut scene = Scene::new("hub");
        for index in 1..MAX_OPTION_COUNT {
            let slot = scene
                .add_option(SceneOption::new(format!("o{}", index), "x", "X"))
                .expect("slot available");
            assert_eq!(slot, index);
        }
        let error = scene
            .add_option(SceneOption::default())
            .expect_err("sixteenth option should fail");
        assert_eq!(error.code(), "OPTION_CAPACITY_EXCEEDED");
        assert_eq!(scene.option_count(), MAX_OPTION_COUNT);

        let removed = scene.remove_option(1).expect("remove slot 1");
        assert_eq!(removed.id, "o1");
        assert_eq!(scene.option(1).expect("packed").id, "o2");
        assert_eq!(scene.option_count(), MAX_OPTION_COUNT - 1);

        scene.move_option(0, 2).expect("move");
        assert_eq!(scene.option(2).expect("moved").id, "");
        assert!(scene.remove_option(99).is_err());
    }

    #[test]
    fn adding_a_subscene_extends_subscene_mode_snippets() {
        let (mut scene, day, _) = subscene_scene();
        scene
            .change_snippet_mode(0, SnippetMode::Subscene)
            .expect("subscene mode");
        scene.add_snippet(Snippet::with_text("plain"));
        assert_eq!(scene.snippets()[0].variation_count(), 2);

        let dawn = scene.add_subscene("dawn");
        assert_eq!(scene.snippets()[0].variation_count(), 3);
        assert!(scene.snippets()[0]
            .variation(VariationKey::Subscene(dawn))
            .is_ok());
        assert_eq!(scene.snippets()[1].variation_count(), 1);
        assert!(scene.snippets()[0]
            .variation(VariationKey::Subscene(day))
            .is_ok());
    }

    #[test]
    fn removing_the_last_subscene_forces_simple_mode() {
        let mut scene = Scene::new("lonely");
        let only = scene.add_subscene("only");
        scene
            .change_snippet_mode(0, SnippetMode::Subscene)
            .expect("subscene mode");
        scene
            .snippet_mut(0)
            .expect("snippet")
            .set_variation_text(VariationKey::Subscene(only), "kept")
            .expect("text");
        scene.set_current_subscene(SubsceneSelector::Id(only)).expect("select");

        let removed = scene.remove_subscene(0).expect("remove");
        assert_eq!(removed.id(), only);
        assert_eq!(scene.snippets()[0].mode(), SnippetMode::Simple);
        assert_eq!(scene.current_subscene_id(), None);

        let mut facts = FactStore::new();
        let text = scene
            .calculate_scene_text(&mut facts, EvaluatePass::PREVIEW)
            .expect("simple text");
        assert_eq!(text, "kept");
    }

    #[test]
    fn removed_ids_are_never_reused() {
        let (mut scene, _, night) = subscene_scene();
        scene.remove_subscene(1).expect("remove night");
        let again = scene.add_subscene("night");
        assert_ne!(again, night);
    }

    #[test]
    fn rename_keeps_variation_keys_and_records_event() {
        let (mut scene, day, _) = subscene_scene();
        scene
            .change_snippet_mode(0, SnippetMode::Subscene)
            .expect("subscene mode");
        scene.drain_subscene_events();

        scene.rename_subscene(0, "morning").expect("rename");
        assert_eq!(scene.subscenes()[0].name(), "morning");
        assert!(scene.snippets()[0]
            .variation(VariationKey::Subscene(day))
            .is_ok());
        assert_eq!(
            scene.drain_subscene_events(),
            vec![SubsceneEvent::Renamed {
                id: day,
                old_name: "day".to_string(),
                new_name: "morning".to_string()
            }]
        );
        assert!(scene.subscene_events().is_empty());
    }

    #[test]
    fn null_subscene_participates_like_a_real_one() {
        let (mut scene, _, _) = subscene_scene();
        scene
            .change_snippet_mode(0, SnippetMode::Subscene)
            .expect("subscene mode");

        scene.enable_null_subscene();
        assert!(scene.allows_null_subscene());
        assert_eq!(scene.subscene_count(), 3);
        assert!(scene.subscenes()[0].is_none());
        assert!(scene.snippets()[0]
            .variation(VariationKey::Subscene(SubsceneId::NONE))
            .is_ok());

        scene
            .set_current_subscene(SubsceneSelector::Null)
            .expect("null allowed");
        assert_eq!(scene.current_subscene_id(), Some(SubsceneId::NONE));

        let error = scene
            .rename_subscene(0, "nothing")
            .expect_err("sentinel cannot be renamed");
        assert_eq!(error.code(), "RESERVED_SUBSCENE");

        scene.disable_null_subscene();
        assert_eq!(scene.subscene_count(), 2);
        assert_eq!(scene.current_subscene_id(), None);
        assert!(scene.snippets()[0]
            .variation(VariationKey::Subscene(SubsceneId::NONE))
            .is_err());
        assert_eq!(scene.snippets()[0].variation_count(), 2);
    }

    #[test]
    fn set_current_subscene_rejects_missing_targets_without_mutation() {
        let (mut scene, day, _) = subscene_scene();
        scene.set_current_subscene(SubsceneSelector::Id(day)).expect("day");

        let by_name = scene
            .set_current_subscene(SubsceneSelector::Name("dusk"))
            .expect_err("unknown name");
        assert_eq!(by_name.code(), "SUBSCENE_NOT_FOUND");
        let by_id = scene
            .set_current_subscene(SubsceneSelector::Id(SubsceneId::new(u32::MAX)))
            .expect_err("unknown id");
        assert_eq!(by_id.code(), "SUBSCENE_NOT_FOUND");
        let null = scene
            .set_current_subscene(SubsceneSelector::Null)
            .expect_err("null not allowed");
        assert_eq!(null.code(), "NULL_SUBSCENE_NOT_ALLOWED");
        assert_eq!(scene.current_subscene_id(), Some(day));

        scene
            .set_current_subscene(SubsceneSelector::Name("night"))
            .expect("by name");
        assert_eq!(
            scene.current_subscene_identity().map(|identity| identity.name()),
            Some("night")
        );

        let mut bare = Scene::new("bare");
        bare.set_current_subscene(SubsceneSelector::Null)
            .expect("null on scene without subscenes");
        assert_eq!(bare.current_subscene_id(), None);
    }

    #[test]
    fn change_snippet_mode_to_subscene_without_subscenes_is_rejected() {
        let mut scene = Scene::new("flat");
        let error = scene
            .change_snippet_mode(0, SnippetMode::Subscene)
            .expect_err("no subscenes");
        assert_eq!(error.code(), "NO_SUBSCENES_AVAILABLE");
        assert_eq!(scene.snippets()[0].mode(), SnippetMode::Simple);
        let missing = scene
            .change_snippet_mode(4, SnippetMode::If)
            .expect_err("missing snippet");
        assert_eq!(missing.code(), "SNIPPET_NOT_FOUND");
    }

    #[test]
    fn earlier_snippet_effects_are_visible_to_later_conditions() {
        let mut scene = Scene::new("gate");
        scene.clear_snippets();
        let mut first = Snippet::with_text("You look around. ");
        first
            .variation_mut(VariationKey::Index(0))
            .expect("v0")
            .set_entity_setter("seen", true);
        scene.add_snippet(first);
        let second = scene.add_snippet(Snippet::with_text("You have seen it."));
        scene
            .change_snippet_mode(second, SnippetMode::If)
            .expect("if");
        scene
            .snippet_mut(second)
            .expect("second")
            .variation_mut(VariationKey::Index(0))
            .expect("v0")
            .set_conditional_fact_name("seen");

        let mut facts = FactStore::new();
        let preview = scene
            .calculate_scene_text(&mut facts, EvaluatePass::PREVIEW)
            .expect("preview");
        assert_eq!(preview, "You look around. ");
        assert!(facts.is_empty());

        let played = scene
            .calculate_scene_text(&mut facts, EvaluatePass::PLAY)
            .expect("play");
        assert_eq!(played, "You look around. You have seen it.");
        assert_eq!(facts.get("seen"), Ok(true));
    }

    #[test]
    fn failed_text_pass_leaves_facts_untouched() {
        let (mut scene, _, _) = subscene_scene();
        scene.clear_snippets();
        let mut setter = Snippet::with_text("a");
        setter
            .variation_mut(VariationKey::Index(0))
            .expect("v0")
            .set_entity_setter("touched", true);
        scene.add_snippet(setter);
        let index = scene.add_snippet(Snippet::with_text("b"));
        scene
            .change_snippet_mode(index, SnippetMode::Subscene)
            .expect("subscene");

        let mut facts = FactStore::new();
        let error = scene
            .calculate_scene_text(&mut facts, EvaluatePass::PLAY)
            .expect_err("no cursor selected");
        assert_eq!(error.code(), "NO_CURRENT_SUBSCENE");
        assert!(!facts.has("touched"));
    }

    #[test]
    fn pasted_subscene_snippet_is_aligned_with_adopting_scene() {
        let (mut source, _, _) = subscene_scene();
        source
            .change_snippet_mode(0, SnippetMode::Subscene)
            .expect("subscene");
        let copied = source.snippet(0).expect("snippet").clone();

        let mut target = Scene::new("elsewhere");
        let only = target.add_subscene("only");
        let index = target.add_snippet(copied.clone());
        let adopted = target.snippet(index).expect("adopted");
        assert_eq!(adopted.variation_count(), 1);
        assert!(adopted.variation(VariationKey::Subscene(only)).is_ok());

        let mut flat = Scene::new("flat");
        let index = flat.add_snippet(copied);
        assert_eq!(flat.snippet(index).expect("adopted").mode(), SnippetMode::Simple);
    }

    #[test]
    fn display_lists_structure() {
        let (mut scene, day, _) = subscene_scene();
        scene.set_current_subscene(SubsceneSelector::Id(day)).expect("day");
        let dump = scene.to_string();
        assert!(dump.contains("Id: camp"));
        assert!(dump.contains("* day"));
        assert!(dump.contains("[0] Simple x1"));
    }
}
