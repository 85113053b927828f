use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{null_as_default, EntitySetter, SceneOption, SubsceneId, VariationId};

pub const SCENE_SCHEMA_V2: &str = "dscn.v2";
pub const SCENE_FILE_EXTENSION: &str = "dscn";

/// On-disk form of one scene (`*.dscn`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    #[serde(alias = "Id", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(alias = "OptionList", default, deserialize_with = "packed_options")]
    pub options: Vec<SceneOption>,
    #[serde(default)]
    pub subscenes: Vec<SubsceneRecord>,
    #[serde(default)]
    pub allow_null_subscene: bool,
    #[serde(default)]
    pub snippets: Vec<SnippetRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_subscene_id: Option<SubsceneId>,
    #[serde(flatten)]
    pub presentation: ScenePresentation,
    /// Flat text from records written before snippets existed.
    #[serde(alias = "SceneText", default, skip_serializing_if = "Option::is_none")]
    pub scene_text: Option<String>,
}

/// Presentation fields the engine carries but never interprets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenePresentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_position: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsceneRecord {
    pub name: String,
    pub id: SubsceneId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetRecord {
    #[serde(flatten)]
    pub content: SnippetContentRecord,
    #[serde(default)]
    pub random_seed: u32,
    /// Generator position; absent means untouched since seeding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_state: Option<u32>,
    #[serde(default)]
    pub current_random_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum SnippetContentRecord {
    Simple { variation: VariationRecord },
    If { variation: VariationRecord },
    IfElse { variations: Vec<VariationRecord> },
    Subscene { variations: Vec<SubsceneVariationRecord> },
    Random { variations: Vec<VariationRecord> },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationRecord {
    /// `None` on hand-written content; a fresh id is minted on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<VariationId>,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub conditional_fact_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entity_setters: Vec<EntitySetter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsceneVariationRecord {
    pub subscene_id: SubsceneId,
    pub variation: VariationRecord,
}

fn packed_options<'de, D>(deserializer: D) -> Result<Vec<SceneOption>, D::Error>
where
    D: Deserializer<'de>,
{
    let slots: Option<Vec<Option<SceneOption>>> = Option::deserialize(deserializer)?;
    Ok(slots.unwrap_or_default().into_iter().flatten().collect())
}
