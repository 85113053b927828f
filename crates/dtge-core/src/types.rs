use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub const MAX_OPTION_COUNT: usize = 15;
pub const NULL_SUBSCENE_NAME: &str = "(None)";

/// Identity of a subscene. Never reused within a process, even after the
/// subscene it named has been deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubsceneId(u32);

impl SubsceneId {
    /// Sentinel for "no subscene selected".
    pub const NONE: SubsceneId = SubsceneId(0);

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for SubsceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariationId(u64);

impl VariationId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A subscene as the author sees it: a renameable label over a stable id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsceneIdentity {
    id: SubsceneId,
    name: String,
}

impl SubsceneIdentity {
    pub fn new(id: SubsceneId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn none() -> Self {
        Self::new(SubsceneId::NONE, NULL_SUBSCENE_NAME)
    }

    pub fn id(&self) -> SubsceneId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_none(&self) -> bool {
        self.id.is_none()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SnippetMode {
    Simple,
    Subscene,
    If,
    IfElse,
    Random,
}

impl SnippetMode {
    pub const ALL: [SnippetMode; 5] = [
        SnippetMode::Simple,
        SnippetMode::Subscene,
        SnippetMode::If,
        SnippetMode::IfElse,
        SnippetMode::Random,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Simple => "Simple",
            Self::Subscene => "Subscene",
            Self::If => "If",
            Self::IfElse => "IfElse",
            Self::Random => "Random",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for SnippetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySetter {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Value")]
    pub value: bool,
}

impl EntitySetter {
    pub fn new(name: impl Into<String>, value: bool) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A player-selectable jump to another scene. The target is a plain scene id
/// or a compound `scene.subscene` id, resolved lazily by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneOption {
    #[serde(alias = "Id", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(alias = "TargetSceneId", default, deserialize_with = "null_as_default")]
    pub target_scene_id: String,
    #[serde(alias = "DisplayName", default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(alias = "Tooltip", default, deserialize_with = "null_as_default")]
    pub tooltip: String,
    #[serde(alias = "Enabled", default = "default_enabled")]
    pub enabled: bool,
}

impl Default for SceneOption {
    fn default() -> Self {
        Self {
            id: String::new(),
            target_scene_id: String::new(),
            display_name: String::new(),
            tooltip: String::new(),
            enabled: true,
        }
    }
}

impl SceneOption {
    pub fn new(
        id: impl Into<String>,
        target_scene_id: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            target_scene_id: target_scene_id.into(),
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    pub fn target(&self) -> SceneTarget<'_> {
        SceneTarget::parse(&self.target_scene_id)
    }
}

impl fmt::Display for SceneOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Option:")?;
        writeln!(f, "  Id: {}", self.id)?;
        writeln!(f, "  Target Scene: {}", self.target_scene_id)?;
        writeln!(f, "  Display Name: {}", self.display_name)?;
        writeln!(f, "  Enabled: {}", self.enabled)
    }
}

/// Split form of a navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneTarget<'a> {
    pub scene_id: &'a str,
    pub subscene: Option<&'a str>,
}

impl<'a> SceneTarget<'a> {
    /// Splits on the first `.`; an empty subscene part counts as absent.
    pub fn parse(raw: &'a str) -> Self {
        match raw.split_once('.') {
            Some((scene_id, subscene)) if !subscene.is_empty() => Self {
                scene_id,
                subscene: Some(subscene),
            },
            Some((scene_id, _)) => Self {
                scene_id,
                subscene: None,
            },
            None => Self {
                scene_id: raw,
                subscene: None,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.scene_id.is_empty()
    }
}

fn default_enabled() -> bool {
    true
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
