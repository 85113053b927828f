use std::collections::{BTreeMap, BTreeSet};

use dtge_core::{
    DtgeError, SceneRecord, SnippetContentRecord, SnippetRecord, SubsceneId, SubsceneIdentity,
    SubsceneRecord, SubsceneVariationRecord, MAX_OPTION_COUNT, SCENE_SCHEMA_V2,
};
use tracing::warn;

use crate::ids::observe_subscene_id;
use crate::{Scene, Snippet, SnippetRng, SnippetVariations, Variation};

impl Scene {
    pub fn to_record(&self) -> SceneRecord {
        SceneRecord {
            schema_version: Some(SCENE_SCHEMA_V2.to_string()),
            id: self.id().to_string(),
            options: self.options().to_vec(),
            subscenes: self
                .subscenes()
                .iter()
                .filter(|identity| !identity.is_none())
                .map(|identity| SubsceneRecord {
                    name: identity.name().to_string(),
                    id: identity.id(),
                })
                .collect(),
            allow_null_subscene: self.allows_null_subscene(),
            snippets: self.snippets().iter().map(Snippet::to_record).collect(),
            current_subscene_id: self.current_subscene_id(),
            presentation: self.presentation().clone(),
            scene_text: None,
        }
    }

    /// Rebuilds a scene from its record.
    ///
    /// A record carrying a non-empty legacy `sceneText` becomes a scene with
    /// a single Simple snippet holding that text.
    pub fn from_record(record: SceneRecord) -> Result<Self, DtgeError> {
        let context = format!("scene \"{}\"", record.id);
        if record.options.len() > MAX_OPTION_COUNT {
            return Err(DtgeError::format(
                context,
                format!(
                    "{} options exceed the capacity of {}",
                    record.options.len(),
                    MAX_OPTION_COUNT
                ),
            ));
        }

        let mut subscenes = Vec::with_capacity(record.subscenes.len() + 1);
        if record.allow_null_subscene {
            subscenes.push(SubsceneIdentity::none());
        }
        let mut seen = BTreeSet::new();
        for subscene in record.subscenes {
            if subscene.id.is_none() {
                return Err(DtgeError::format(
                    context,
                    "subscene id 0 is reserved for the null subscene",
                ));
            }
            if subscene.id.get() == u32::MAX {
                return Err(DtgeError::format(
                    context,
                    format!("subscene id {} is out of range", subscene.id.get()),
                ));
            }
            if !seen.insert(subscene.id) {
                return Err(DtgeError::format(
                    context,
                    format!("duplicate subscene id {}", subscene.id),
                ));
            }
            observe_subscene_id(subscene.id);
            subscenes.push(SubsceneIdentity::new(subscene.id, subscene.name));
        }
        let ids = subscenes
            .iter()
            .map(SubsceneIdentity::id)
            .collect::<BTreeSet<_>>();

        let current = record.current_subscene_id.filter(|id| ids.contains(id));
        if current != record.current_subscene_id {
            warn!(scene_id = %record.id, "stored current subscene no longer exists");
        }

        let mut scene = Scene::empty(record.id);
        *scene.presentation_mut() = record.presentation;
        for option in record.options {
            scene.add_option(option)?;
        }
        scene.restore_parts(subscenes, record.allow_null_subscene, current);

        match record.scene_text.filter(|text| !text.is_empty()) {
            Some(text) => {
                warn!(scene_id = %scene.id(), "upgrading legacy sceneText into a Simple snippet");
                scene.push_restored_snippet(Snippet::with_text(text));
            }
            None => {
                for (index, snippet) in record.snippets.into_iter().enumerate() {
                    let snippet = Snippet::from_record(snippet, &ids)
                        .map_err(|message| {
                            DtgeError::format(format!("{} snippet {}", context, index), message)
                        })?;
                    scene.push_restored_snippet(snippet);
                }
            }
        }
        Ok(scene)
    }
}

impl Snippet {
    pub fn to_record(&self) -> SnippetRecord {
        let content = match self.variations() {
            SnippetVariations::Simple(variation) => SnippetContentRecord::Simple {
                variation: variation.to_record(),
            },
            SnippetVariations::If(variation) => SnippetContentRecord::If {
                variation: variation.to_record(),
            },
            SnippetVariations::IfElse(variations) => SnippetContentRecord::IfElse {
                variations: variations.iter().map(Variation::to_record).collect(),
            },
            SnippetVariations::Subscene(variations) => SnippetContentRecord::Subscene {
                variations: variations
                    .iter()
                    .map(|(subscene_id, variation)| SubsceneVariationRecord {
                        subscene_id: *subscene_id,
                        variation: variation.to_record(),
                    })
                    .collect(),
            },
            SnippetVariations::Random(variations) => SnippetContentRecord::Random {
                variations: variations.iter().map(Variation::to_record).collect(),
            },
        };
        SnippetRecord {
            content,
            random_seed: self.random_seed(),
            random_state: Some(self.rng().state()),
            current_random_index: self.current_random_index(),
        }
    }

    /// `subscene_ids` is the enumeration of the owning scene; a Subscene-mode
    /// record must key exactly those ids.
    fn from_record(record: SnippetRecord, subscene_ids: &BTreeSet<SubsceneId>) -> Result<Self, String> {
        let variations = match record.content {
            SnippetContentRecord::Simple { variation } => {
                SnippetVariations::Simple(Variation::from_record(variation)?)
            }
            SnippetContentRecord::If { variation } => {
                SnippetVariations::If(Variation::from_record(variation)?)
            }
            SnippetContentRecord::IfElse { variations } => {
                if variations.len() < 2 {
                    return Err("ifElse snippet needs at least 2 variations".to_string());
                }
                SnippetVariations::IfElse(
                    variations
                        .into_iter()
                        .map(Variation::from_record)
                        .collect::<Result<_, _>>()?,
                )
            }
            SnippetContentRecord::Random { variations } => {
                if variations.is_empty() {
                    return Err("random snippet needs at least 1 variation".to_string());
                }
                SnippetVariations::Random(
                    variations
                        .into_iter()
                        .map(Variation::from_record)
                        .collect::<Result<_, _>>()?,
                )
            }
            SnippetContentRecord::Subscene { variations } => {
                if subscene_ids.is_empty() {
                    return Err("subscene snippet in a scene without subscenes".to_string());
                }
                let mut keyed = BTreeMap::new();
                for entry in variations {
                    let id = entry.subscene_id;
                    if keyed.insert(id, Variation::from_record(entry.variation)?).is_some() {
                        return Err(format!("duplicate variation for subscene {}", id));
                    }
                }
                if keyed.keys().ne(subscene_ids.iter()) {
                    return Err("subscene variations do not match the scene's subscenes".to_string());
                }
                SnippetVariations::Subscene(keyed)
            }
        };
        let rng = SnippetRng::resume(
            record.random_seed,
            record.random_state.unwrap_or(record.random_seed),
        );
        Ok(Snippet::from_parts(
            variations,
            rng,
            record.current_random_index,
        ))
    }
}
