use std::collections::BTreeMap;

use dtge_core::{DtgeError, SnippetMode, SubsceneId};
use tracing::{debug, trace};

use crate::rng::SnippetRng;
use crate::{FactStore, SubsceneContext, Variation};

pub const DEFAULT_SNIPPET_SEED: u32 = 1;

/// Variation set of a snippet, shaped by its mode.
///
/// The shape carries the key-domain invariants: Simple and If hold exactly
/// one variation, IfElse at least two (the last one is the unconditional
/// else), Subscene one per subscene id, Random at least one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnippetVariations {
    Simple(Variation),
    If(Variation),
    IfElse(Vec<Variation>),
    Subscene(BTreeMap<SubsceneId, Variation>),
    Random(Vec<Variation>),
}

impl SnippetVariations {
    pub fn mode(&self) -> SnippetMode {
        match self {
            Self::Simple(_) => SnippetMode::Simple,
            Self::If(_) => SnippetMode::If,
            Self::IfElse(_) => SnippetMode::IfElse,
            Self::Subscene(_) => SnippetMode::Subscene,
            Self::Random(_) => SnippetMode::Random,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Simple(_) | Self::If(_) => 1,
            Self::IfElse(variations) | Self::Random(variations) => variations.len(),
            Self::Subscene(variations) => variations.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index 0, or the lowest subscene id in Subscene mode.
    pub fn first(&self) -> Option<&Variation> {
        match self {
            Self::Simple(variation) | Self::If(variation) => Some(variation),
            Self::IfElse(variations) | Self::Random(variations) => variations.first(),
            Self::Subscene(variations) => variations.values().next(),
        }
    }
}

/// Addresses one variation inside a snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariationKey {
    Index(usize),
    Subscene(SubsceneId),
}

impl std::fmt::Display for VariationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{}", index),
            Self::Subscene(id) => write!(f, "{}", id),
        }
    }
}

/// Controls the two observable side effects of evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatePass {
    /// Draw a new index for Random snippets instead of reusing the last one.
    pub refresh_random: bool,
    /// Write the selected variation's entity setters into the fact store.
    pub apply_effects: bool,
}

impl EvaluatePass {
    /// Read-only: no redraw, no fact writes.
    pub const PREVIEW: EvaluatePass = EvaluatePass {
        refresh_random: false,
        apply_effects: false,
    };
    /// What a player sees when entering a scene.
    pub const PLAY: EvaluatePass = EvaluatePass {
        refresh_random: true,
        apply_effects: true,
    };
}

/// One unit of scene text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    variations: SnippetVariations,
    rng: SnippetRng,
    current_random_index: usize,
}

impl Default for Snippet {
    fn default() -> Self {
        Self::new()
    }
}

impl Snippet {
    pub fn new() -> Self {
        Self::seeded(DEFAULT_SNIPPET_SEED)
    }

    pub fn seeded(seed: u32) -> Self {
        Self {
            variations: SnippetVariations::Simple(Variation::new()),
            rng: SnippetRng::new(seed),
            current_random_index: 0,
        }
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let mut snippet = Self::new();
        snippet.variations = SnippetVariations::Simple(Variation::with_text(text));
        snippet
    }

    pub(crate) fn from_parts(
        variations: SnippetVariations,
        rng: SnippetRng,
        current_random_index: usize,
    ) -> Self {
        let current_random_index = match &variations {
            SnippetVariations::Random(list) if current_random_index < list.len() => {
                current_random_index
            }
            _ => 0,
        };
        Self {
            variations,
            rng,
            current_random_index,
        }
    }

    pub fn mode(&self) -> SnippetMode {
        self.variations.mode()
    }

    pub fn variations(&self) -> &SnippetVariations {
        &self.variations
    }

    pub fn variation_count(&self) -> usize {
        self.variations.len()
    }

    pub fn random_seed(&self) -> u32 {
        self.rng.seed()
    }

    pub(crate) fn rng(&self) -> &SnippetRng {
        &self.rng
    }

    pub fn reseed(&mut self, seed: u32) {
        self.rng = SnippetRng::new(seed);
    }

    pub fn current_random_index(&self) -> usize {
        self.current_random_index
    }

    /// Pins the Random selection, e.g. for previewing one variation.
    pub fn set_random_index(&mut self, index: usize) -> Result<(), DtgeError> {
        let SnippetVariations::Random(variations) = &self.variations else {
            return Err(DtgeError::InvalidModeOperation {
                mode: self.mode(),
                operation: "pin a random index",
            });
        };
        if index >= variations.len() {
            return Err(self.missing(VariationKey::Index(index)));
        }
        self.current_random_index = index;
        Ok(())
    }

    pub fn variation(&self, key: VariationKey) -> Result<&Variation, DtgeError> {
        let found = match (&self.variations, key) {
            (
                SnippetVariations::Simple(variation) | SnippetVariations::If(variation),
                VariationKey::Index(0),
            ) => Some(variation),
            (
                SnippetVariations::IfElse(variations) | SnippetVariations::Random(variations),
                VariationKey::Index(index),
            ) => variations.get(index),
            (SnippetVariations::Subscene(variations), VariationKey::Subscene(id)) => {
                variations.get(&id)
            }
            _ => None,
        };
        found.ok_or_else(|| self.missing(key))
    }

    pub fn variation_mut(&mut self, key: VariationKey) -> Result<&mut Variation, DtgeError> {
        let mode = self.mode();
        let found = match (&mut self.variations, key) {
            (
                SnippetVariations::Simple(variation) | SnippetVariations::If(variation),
                VariationKey::Index(0),
            ) => Some(variation),
            (
                SnippetVariations::IfElse(variations) | SnippetVariations::Random(variations),
                VariationKey::Index(index),
            ) => variations.get_mut(index),
            (SnippetVariations::Subscene(variations), VariationKey::Subscene(id)) => {
                variations.get_mut(&id)
            }
            _ => None,
        };
        found.ok_or(DtgeError::VariationNotFound {
            mode,
            key: key.to_string(),
        })
    }

    pub fn set_variation_text(
        &mut self,
        key: VariationKey,
        text: impl Into<String>,
    ) -> Result<(), DtgeError> {
        self.variation_mut(key)?.set_text(text);
        Ok(())
    }

    /// Produces this snippet's text for the current facts and subscene.
    ///
    /// The selected variation's setters are applied when `pass.apply_effects`
    /// is set, so later snippets of the same scene observe them.
    pub fn evaluate(
        &mut self,
        context: &dyn SubsceneContext,
        facts: &mut FactStore,
        pass: EvaluatePass,
    ) -> Result<String, DtgeError> {
        if pass.refresh_random {
            if let SnippetVariations::Random(variations) = &self.variations {
                self.current_random_index = self.rng.next_index(variations.len());
            }
        }

        let Some(selected) = self.select(context, facts)? else {
            trace!(mode = %self.mode(), "snippet selected nothing");
            return Ok(String::new());
        };
        if pass.apply_effects {
            selected.apply_entity_setters(facts);
        }
        trace!(mode = %self.mode(), variation = selected.id().get(), "snippet evaluated");
        Ok(selected.text().to_string())
    }

    fn select(
        &self,
        context: &dyn SubsceneContext,
        facts: &FactStore,
    ) -> Result<Option<&Variation>, DtgeError> {
        match &self.variations {
            SnippetVariations::Simple(variation) => Ok(Some(variation)),
            SnippetVariations::If(variation) => {
                Ok(variation.condition_holds(facts).then_some(variation))
            }
            SnippetVariations::IfElse(variations) => {
                let Some((otherwise, branches)) = variations.split_last() else {
                    return Ok(None);
                };
                Ok(Some(
                    branches
                        .iter()
                        .find(|branch| branch.condition_holds(facts))
                        .unwrap_or(otherwise),
                ))
            }
            SnippetVariations::Subscene(variations) => {
                let current = context.current_subscene_identity().ok_or_else(|| {
                    DtgeError::NoCurrentSubscene {
                        scene_id: context.scene_id().to_string(),
                    }
                })?;
                variations
                    .get(&current.id())
                    .map(Some)
                    .ok_or_else(|| self.missing(VariationKey::Subscene(current.id())))
            }
            SnippetVariations::Random(variations) => {
                Ok(variations.get(self.current_random_index))
            }
        }
    }

    /// Switches evaluation strategy, carrying the first variation into the
    /// first slot of the new mode. Other new slots start empty.
    pub(crate) fn change_mode(
        &mut self,
        mode: SnippetMode,
        context: &dyn SubsceneContext,
    ) -> Result<(), DtgeError> {
        if mode == self.mode() {
            return Ok(());
        }
        let subscene_ids = if mode == SnippetMode::Subscene {
            let ids = context.subscene_ids();
            if ids.is_empty() {
                return Err(DtgeError::NoSubscenesAvailable);
            }
            ids
        } else {
            Vec::new()
        };
        self.rebuild(mode, &subscene_ids);
        Ok(())
    }

    fn rebuild(&mut self, mode: SnippetMode, subscene_ids: &[SubsceneId]) {
        let from = self.mode();
        let carried = self.variations.first().cloned().unwrap_or_default();
        self.variations = match mode {
            SnippetMode::Simple => SnippetVariations::Simple(carried),
            SnippetMode::If => SnippetVariations::If(carried),
            SnippetMode::IfElse => SnippetVariations::IfElse(vec![carried, Variation::new()]),
            SnippetMode::Random => SnippetVariations::Random(vec![carried]),
            SnippetMode::Subscene => {
                let mut ids = subscene_ids.to_vec();
                ids.sort();
                let mut variations = BTreeMap::new();
                let mut ids = ids.into_iter();
                if let Some(first) = ids.next() {
                    variations.insert(first, carried);
                }
                for id in ids {
                    variations.entry(id).or_insert_with(Variation::new);
                }
                SnippetVariations::Subscene(variations)
            }
        };
        self.current_random_index = 0;
        debug!(from = %from, to = %mode, "snippet mode changed");
    }

    /// Appends a variation. IfElse inserts before the trailing else.
    pub fn add_variation(&mut self) -> Result<usize, DtgeError> {
        match &mut self.variations {
            SnippetVariations::IfElse(variations) => {
                let index = variations.len().saturating_sub(1);
                variations.insert(index, Variation::new());
                Ok(index)
            }
            SnippetVariations::Random(variations) => {
                variations.push(Variation::new());
                Ok(variations.len() - 1)
            }
            other => Err(DtgeError::InvalidModeOperation {
                mode: other.mode(),
                operation: "add a variation",
            }),
        }
    }

    pub fn remove_variation(&mut self, index: usize) -> Result<Variation, DtgeError> {
        let mode = self.mode();
        let missing = self.missing(VariationKey::Index(index));
        match &mut self.variations {
            SnippetVariations::IfElse(variations) => {
                if index >= variations.len() {
                    return Err(missing);
                }
                if variations.len() <= 2 {
                    return Err(DtgeError::VariationMinimum { mode, minimum: 2 });
                }
                let removed = variations.remove(index);
                if let Some(otherwise) = variations.last_mut() {
                    otherwise.set_conditional_fact_name("");
                }
                Ok(removed)
            }
            SnippetVariations::Random(variations) => {
                if index >= variations.len() {
                    return Err(missing);
                }
                if variations.len() <= 1 {
                    return Err(DtgeError::VariationMinimum { mode, minimum: 1 });
                }
                let removed = variations.remove(index);
                if self.current_random_index >= variations.len() {
                    self.current_random_index = variations.len() - 1;
                }
                Ok(removed)
            }
            _ => Err(DtgeError::InvalidModeOperation {
                mode,
                operation: "remove a variation",
            }),
        }
    }

    pub(crate) fn on_subscene_added(&mut self, id: SubsceneId) {
        if let SnippetVariations::Subscene(variations) = &mut self.variations {
            variations.entry(id).or_insert_with(Variation::new);
        }
    }

    /// Called before the scene drops the identity. Losing the last subscene
    /// drops the snippet back to Simple mode.
    pub(crate) fn on_subscene_removed(&mut self, id: SubsceneId) {
        let SnippetVariations::Subscene(variations) = &mut self.variations else {
            return;
        };
        if !variations.contains_key(&id) {
            return;
        }
        if variations.len() == 1 {
            self.rebuild(SnippetMode::Simple, &[]);
        } else {
            variations.remove(&id);
        }
    }

    /// Aligns a Subscene-mode snippet coming from elsewhere (a paste, another
    /// scene) with the subscene ids of the scene adopting it.
    pub(crate) fn reconcile_subscenes(&mut self, ids: &[SubsceneId]) {
        let SnippetVariations::Subscene(variations) = &mut self.variations else {
            return;
        };
        if ids.is_empty() {
            self.rebuild(SnippetMode::Simple, &[]);
            return;
        }
        let carried = variations.values().next().cloned();
        let mut matched = false;
        let mut kept = BTreeMap::new();
        for id in ids {
            let variation = match variations.remove(id) {
                Some(variation) => {
                    matched = true;
                    variation
                }
                None => Variation::new(),
            };
            kept.insert(*id, variation);
        }
        if !matched {
            if let (Some(carried), Some(first)) = (carried, kept.values_mut().next()) {
                *first = carried;
            }
        }
        *variations = kept;
    }

    fn missing(&self, key: VariationKey) -> DtgeError {
        DtgeError::VariationNotFound {
            mode: self.mode(),
            key: key.to_string(),
        }
    }
}

#[cfg(test)]
mod snippet_tests {
    use super::*;
    use crate::SubsceneView;
    use dtge_core::SubsceneIdentity;

    fn identities(names: &[(u32, &str)]) -> Vec<SubsceneIdentity> {
        names
            .iter()
            .map(|(id, name)| SubsceneIdentity::new(SubsceneId::new(*id), *name))
            .collect()
    }

    fn seeded_first(snippet: &mut Snippet, text: &str) {
        let key = match snippet.mode() {
            SnippetMode::Subscene => {
                let SnippetVariations::Subscene(map) = snippet.variations() else {
                    unreachable!()
                };
                VariationKey::Subscene(*map.keys().next().expect("subscene key"))
            }
            _ => VariationKey::Index(0),
        };
        let variation = snippet.variation_mut(key).expect("first variation");
        variation.set_text(text);
        variation.set_entity_setter("carried", true);
    }

    #[test]
    fn every_transition_carries_the_first_variation() {
        let subscenes = identities(&[(501, "day"), (502, "night")]);
        let view = SubsceneView::new("hall", &subscenes, Some(SubsceneId::new(501)));

        for from in SnippetMode::ALL {
            for to in SnippetMode::ALL {
                let mut snippet = Snippet::new();
                snippet.change_mode(from, &view).expect("enter source mode");
                seeded_first(&mut snippet, "kept");
                let before = snippet.variations().first().cloned().expect("first");

                snippet.change_mode(to, &view).expect("transition should pass");
                assert_eq!(snippet.mode(), to);
                let after = snippet.variations().first().expect("first after");
                assert_eq!(after.text(), before.text(), "{} -> {}", from, to);
                assert_eq!(
                    after.entity_setters(),
                    before.entity_setters(),
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn self_transition_is_a_no_op() {
        let subscenes = identities(&[(601, "a")]);
        let view = SubsceneView::new("s", &subscenes, None);
        let mut snippet = Snippet::new();
        snippet.change_mode(SnippetMode::Random, &view).expect("random");
        snippet.add_variation().expect("add");
        snippet
            .set_variation_text(VariationKey::Index(1), "second")
            .expect("text");
        let before = snippet.clone();
        snippet.change_mode(SnippetMode::Random, &view).expect("self");
        assert_eq!(snippet, before);
    }

    #[test]
    fn new_mode_slots_beyond_the_first_start_empty() {
        let subscenes = identities(&[(701, "a"), (702, "b"), (703, "c")]);
        let view = SubsceneView::new("s", &subscenes, None);
        let mut snippet = Snippet::with_text("hello");

        snippet.change_mode(SnippetMode::Subscene, &view).expect("subscene");
        assert_eq!(snippet.variation_count(), 3);
        let first = snippet
            .variation(VariationKey::Subscene(SubsceneId::new(701)))
            .expect("first subscene");
        assert_eq!(first.text(), "hello");
        let other = snippet
            .variation(VariationKey::Subscene(SubsceneId::new(703)))
            .expect("third subscene");
        assert_eq!(other.text(), "");

        snippet.change_mode(SnippetMode::IfElse, &view).expect("ifelse");
        assert_eq!(snippet.variation_count(), 2);
        let otherwise = snippet.variation(VariationKey::Index(1)).expect("else");
        assert_eq!(otherwise.text(), "");
    }

    #[test]
    fn entering_subscene_mode_without_subscenes_fails_without_mutation() {
        let view = SubsceneView::new("s", &[], None);
        let mut snippet = Snippet::with_text("x");
        let before = snippet.clone();
        let error = snippet
            .change_mode(SnippetMode::Subscene, &view)
            .expect_err("no subscenes should fail");
        assert_eq!(error, DtgeError::NoSubscenesAvailable);
        assert_eq!(snippet, before);
    }

    #[test]
    fn if_mode_requires_fact_set_and_true() {
        let view = SubsceneView::new("s", &[], None);
        let mut snippet = Snippet::with_text("T");
        snippet.change_mode(SnippetMode::If, &view).expect("if");
        {
            let variation = snippet.variation_mut(VariationKey::Index(0)).expect("v0");
            variation.set_conditional_fact_name("flag");
            variation.set_entity_setter("rewarded", true);
        }

        let mut facts = FactStore::new();
        let text = snippet
            .evaluate(&view, &mut facts, EvaluatePass::PLAY)
            .expect("unset evaluates");
        assert_eq!(text, "");
        assert!(!facts.has("rewarded"));

        facts.set("flag", false);
        let text = snippet
            .evaluate(&view, &mut facts, EvaluatePass::PLAY)
            .expect("false evaluates");
        assert_eq!(text, "");
        assert!(!facts.has("rewarded"));

        facts.set("flag", true);
        let text = snippet
            .evaluate(&view, &mut facts, EvaluatePass::PLAY)
            .expect("true evaluates");
        assert_eq!(text, "T");
        assert_eq!(facts.get("rewarded"), Ok(true));
    }

    #[test]
    fn if_else_picks_first_true_branch_or_the_else() {
        let view = SubsceneView::new("s", &[], None);
        let mut snippet = Snippet::new();
        snippet.change_mode(SnippetMode::IfElse, &view).expect("ifelse");
        snippet.add_variation().expect("else-if");
        for (index, (fact, text)) in [("a", "A"), ("b", "B"), ("", "ELSE")].iter().enumerate() {
            let variation = snippet
                .variation_mut(VariationKey::Index(index))
                .expect("branch");
            variation.set_conditional_fact_name(*fact);
            variation.set_text(*text);
        }

        let mut facts = FactStore::new();
        let eval = |snippet: &mut Snippet, facts: &mut FactStore| {
            snippet
                .evaluate(&view, facts, EvaluatePass::PREVIEW)
                .expect("evaluate")
        };
        assert_eq!(eval(&mut snippet, &mut facts), "ELSE");
        facts.set("b", true);
        assert_eq!(eval(&mut snippet, &mut facts), "B");
        facts.set("a", true);
        assert_eq!(eval(&mut snippet, &mut facts), "A");
        facts.set("a", false);
        assert_eq!(eval(&mut snippet, &mut facts), "B");
    }

    #[test]
    fn if_else_applies_only_the_selected_branch_setters() {
        let view = SubsceneView::new("s", &[], None);
        let mut snippet = Snippet::new();
        snippet.change_mode(SnippetMode::IfElse, &view).expect("ifelse");
        snippet.add_variation().expect("else-if");
        for (index, (fact, setter)) in [("a", "set_a"), ("b", "set_b"), ("", "set_else")]
            .iter()
            .enumerate()
        {
            let variation = snippet
                .variation_mut(VariationKey::Index(index))
                .expect("branch");
            variation.set_conditional_fact_name(*fact);
            variation.set_entity_setter(*setter, true);
        }

        let mut facts = FactStore::new();
        facts.set("b", true);
        snippet
            .evaluate(&view, &mut facts, EvaluatePass::PLAY)
            .expect("evaluate");
        assert_eq!(facts.get("set_b"), Ok(true));
        assert!(!facts.has("set_a"));
        assert!(!facts.has("set_else"));
    }

    #[test]
    fn random_applies_only_the_drawn_variation_setters() {
        let view = SubsceneView::new("s", &[], None);
        let mut snippet = Snippet::seeded(7);
        snippet.change_mode(SnippetMode::Random, &view).expect("random");
        for _ in 0..3 {
            snippet.add_variation().expect("add");
        }
        for index in 0..4 {
            snippet
                .variation_mut(VariationKey::Index(index))
                .expect("variation")
                .set_entity_setter(format!("drawn_{}", index), true);
        }

        for _ in 0..16 {
            let mut facts = FactStore::new();
            snippet
                .evaluate(&view, &mut facts, EvaluatePass::PLAY)
                .expect("play");
            let drawn = snippet.current_random_index();
            for index in 0..4 {
                assert_eq!(
                    facts.has(&format!("drawn_{}", index)),
                    index == drawn,
                    "drawn {} checked {}",
                    drawn,
                    index
                );
            }
        }
    }

    #[test]
    fn if_else_never_drops_below_two_and_reblanks_new_else() {
        let view = SubsceneView::new("s", &[], None);
        let mut snippet = Snippet::new();
        snippet.change_mode(SnippetMode::IfElse, &view).expect("ifelse");
        let inserted = snippet.add_variation().expect("add");
        assert_eq!(inserted, 1);
        assert_eq!(snippet.variation_count(), 3);
        snippet
            .variation_mut(VariationKey::Index(1))
            .expect("middle")
            .set_conditional_fact_name("middle_fact");

        snippet.remove_variation(2).expect("remove else");
        assert_eq!(snippet.variation_count(), 2);
        let otherwise = snippet.variation(VariationKey::Index(1)).expect("new else");
        assert_eq!(otherwise.conditional_fact_name(), "");

        let error = snippet.remove_variation(0).expect_err("minimum reached");
        assert_eq!(error.code(), "VARIATION_MINIMUM");
        assert_eq!(snippet.variation_count(), 2);
    }

    #[test]
    fn add_and_remove_are_rejected_outside_if_else_and_random() {
        let subscenes = identities(&[(801, "a")]);
        let view = SubsceneView::new("s", &subscenes, None);
        for mode in [SnippetMode::Simple, SnippetMode::If, SnippetMode::Subscene] {
            let mut snippet = Snippet::new();
            snippet.change_mode(mode, &view).expect("mode");
            let add = snippet.add_variation().expect_err("add should fail");
            assert_eq!(add.code(), "INVALID_MODE_OPERATION");
            let remove = snippet.remove_variation(0).expect_err("remove should fail");
            assert_eq!(remove.code(), "INVALID_MODE_OPERATION");
        }
    }

    #[test]
    fn random_reuses_index_unless_refreshed() {
        let view = SubsceneView::new("s", &[], None);
        let mut snippet = Snippet::seeded(42);
        snippet.change_mode(SnippetMode::Random, &view).expect("random");
        for _ in 0..3 {
            snippet.add_variation().expect("add");
        }
        for index in 0..4 {
            snippet
                .set_variation_text(VariationKey::Index(index), format!("v{}", index))
                .expect("text");
        }

        let mut facts = FactStore::new();
        snippet.set_random_index(2).expect("pin");
        for _ in 0..5 {
            let text = snippet
                .evaluate(&view, &mut facts, EvaluatePass::PREVIEW)
                .expect("preview");
            assert_eq!(text, "v2");
        }

        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..64 {
            let text = snippet
                .evaluate(&view, &mut facts, EvaluatePass::PLAY)
                .expect("play");
            assert!(snippet.current_random_index() < 4);
            seen.insert(text);
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn random_remove_keeps_index_in_range() {
        let view = SubsceneView::new("s", &[], None);
        let mut snippet = Snippet::new();
        snippet.change_mode(SnippetMode::Random, &view).expect("random");
        snippet.add_variation().expect("add");
        snippet.set_random_index(1).expect("pin");
        snippet.remove_variation(1).expect("remove");
        assert_eq!(snippet.current_random_index(), 0);
        let error = snippet.remove_variation(0).expect_err("last one stays");
        assert_eq!(error.code(), "VARIATION_MINIMUM");
    }

    #[test]
    fn subscene_mode_follows_current_subscene() {
        let subscenes = identities(&[(901, "day"), (902, "night")]);
        let mut snippet = Snippet::with_text("sunny");
        let view = SubsceneView::new("s", &subscenes, Some(SubsceneId::new(902)));
        snippet.change_mode(SnippetMode::Subscene, &view).expect("subscene");
        snippet
            .set_variation_text(VariationKey::Subscene(SubsceneId::new(902)), "dark")
            .expect("night text");

        let mut facts = FactStore::new();
        let text = snippet
            .evaluate(&view, &mut facts, EvaluatePass::PREVIEW)
            .expect("night");
        assert_eq!(text, "dark");

        let day = SubsceneView::new("s", &subscenes, Some(SubsceneId::new(901)));
        let text = snippet
            .evaluate(&day, &mut facts, EvaluatePass::PREVIEW)
            .expect("day");
        assert_eq!(text, "sunny");

        let none = SubsceneView::new("s", &subscenes, None);
        let error = snippet
            .evaluate(&none, &mut facts, EvaluatePass::PREVIEW)
            .expect_err("no cursor");
        assert_eq!(error.code(), "NO_CURRENT_SUBSCENE");
    }

    #[test]
    fn subscene_lifecycle_adds_removes_and_falls_back_to_simple() {
        let subscenes = identities(&[(1001, "a"), (1002, "b")]);
        let view = SubsceneView::new("s", &subscenes, None);
        let mut snippet = Snippet::with_text("a-text");
        snippet.change_mode(SnippetMode::Subscene, &view).expect("subscene");

        snippet.on_subscene_added(SubsceneId::new(1003));
        assert_eq!(snippet.variation_count(), 3);
        assert!(snippet
            .variation(VariationKey::Subscene(SubsceneId::new(1003)))
            .is_ok());

        snippet.on_subscene_removed(SubsceneId::new(1002));
        snippet.on_subscene_removed(SubsceneId::new(1003));
        assert_eq!(snippet.mode(), SnippetMode::Subscene);
        assert_eq!(snippet.variation_count(), 1);

        snippet.on_subscene_removed(SubsceneId::new(1001));
        assert_eq!(snippet.mode(), SnippetMode::Simple);
        let variation = snippet.variation(VariationKey::Index(0)).expect("simple");
        assert_eq!(variation.text(), "a-text");
    }

    #[test]
    fn lifecycle_events_are_ignored_outside_subscene_mode() {
        let mut snippet = Snippet::with_text("plain");
        let before = snippet.clone();
        snippet.on_subscene_added(SubsceneId::new(1101));
        snippet.on_subscene_removed(SubsceneId::new(1101));
        assert_eq!(snippet, before);
    }

    #[test]
    fn variation_lookup_rejects_out_of_domain_keys() {
        let mut snippet = Snippet::with_text("x");
        assert!(snippet.variation(VariationKey::Index(1)).is_err());
        assert!(snippet
            .variation(VariationKey::Subscene(SubsceneId::new(1)))
            .is_err());
        let error = snippet
            .set_random_index(0)
            .expect_err("only random pins");
        assert_eq!(error.code(), "INVALID_MODE_OPERATION");
    }
}
