use std::collections::{BTreeMap, HashMap};

use dtge_core::DtgeError;

/// Boolean world state read by If/IfElse snippets and written by the entity
/// setters of whichever variation gets rendered.
///
/// An unset fact is distinct from a fact set to `false`: [`FactStore::get`]
/// reports an unset key as an error instead of defaulting it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactStore {
    values: HashMap<String, bool>,
}

impl FactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: bool) {
        self.values.insert(name.into(), value);
    }

    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<bool, DtgeError> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| DtgeError::UnsetFact {
                name: name.to_string(),
            })
    }

    /// True only when the fact is set and holds `true`.
    pub fn is_true(&self, name: &str) -> bool {
        self.values.get(name).copied().unwrap_or(false)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Fact names in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Ordered copy of the store, for display and persistence.
    pub fn to_sorted(&self) -> BTreeMap<String, bool> {
        self.values
            .iter()
            .map(|(name, value)| (name.clone(), *value))
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for FactStore {
    fn from_iter<T: IntoIterator<Item = (K, bool)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}
