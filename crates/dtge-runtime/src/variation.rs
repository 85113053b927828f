use dtge_core::{EntitySetter, VariationId, VariationRecord};

use crate::ids::{mint_variation_id, observe_variation_id};
use crate::FactStore;

/// One candidate text of a snippet, with the fact it is conditional on and
/// the facts it sets when rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variation {
    id: VariationId,
    text: String,
    conditional_fact_name: String,
    entity_setters: Vec<EntitySetter>,
}

impl Default for Variation {
    fn default() -> Self {
        Self::new()
    }
}

impl Variation {
    pub fn new() -> Self {
        Self {
            id: mint_variation_id(),
            text: String::new(),
            conditional_fact_name: String::new(),
            entity_setters: Vec::new(),
        }
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let mut variation = Self::new();
        variation.text = text.into();
        variation
    }

    pub fn id(&self) -> VariationId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn conditional_fact_name(&self) -> &str {
        &self.conditional_fact_name
    }

    pub fn set_conditional_fact_name(&mut self, name: impl Into<String>) {
        self.conditional_fact_name = name.into();
    }

    pub fn entity_setters(&self) -> &[EntitySetter] {
        &self.entity_setters
    }

    /// Setters form an ordered set keyed by name: setting an existing name
    /// updates it in place.
    pub fn set_entity_setter(&mut self, name: impl Into<String>, value: bool) {
        let name = name.into();
        match self
            .entity_setters
            .iter_mut()
            .find(|setter| setter.name == name)
        {
            Some(existing) => existing.value = value,
            None => self.entity_setters.push(EntitySetter::new(name, value)),
        }
    }

    pub fn remove_entity_setter(&mut self, name: &str) -> bool {
        let before = self.entity_setters.len();
        self.entity_setters.retain(|setter| setter.name != name);
        self.entity_setters.len() != before
    }

    /// Set and true; an empty name never holds.
    pub fn condition_holds(&self, facts: &FactStore) -> bool {
        !self.conditional_fact_name.is_empty()
            && facts.has(&self.conditional_fact_name)
            && facts.is_true(&self.conditional_fact_name)
    }

    pub(crate) fn apply_entity_setters(&self, facts: &mut FactStore) {
        for setter in &self.entity_setters {
            facts.set(setter.name.clone(), setter.value);
        }
    }

    /// The top id is refused: the counter could not move past it.
    pub(crate) fn from_record(record: VariationRecord) -> Result<Self, String> {
        let id = match record.id {
            Some(id) if id.get() == u64::MAX => {
                return Err(format!("variation id {} is out of range", id.get()));
            }
            Some(id) => {
                observe_variation_id(id);
                id
            }
            None => mint_variation_id(),
        };
        let mut variation = Self {
            id,
            text: record.text,
            conditional_fact_name: record.conditional_fact_name,
            entity_setters: Vec::new(),
        };
        for setter in record.entity_setters {
            variation.set_entity_setter(setter.name, setter.value);
        }
        Ok(variation)
    }

    pub(crate) fn to_record(&self) -> VariationRecord {
        VariationRecord {
            id: Some(self.id),
            text: self.text.clone(),
            conditional_fact_name: self.conditional_fact_name.clone(),
            entity_setters: self.entity_setters.clone(),
        }
    }
}
