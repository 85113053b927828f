use dtge_core::{SubsceneId, SubsceneIdentity};

/// What a snippet may ask of the scene that owns it.
///
/// Snippets never hold their scene; the scene lends a view of its subscene
/// list for the duration of a call.
pub trait SubsceneContext {
    fn scene_id(&self) -> &str;
    fn subscene_count(&self) -> usize;
    fn subscene_identity(&self, index: usize) -> Option<&SubsceneIdentity>;
    fn current_subscene_identity(&self) -> Option<&SubsceneIdentity>;

    fn subscene_ids(&self) -> Vec<SubsceneId> {
        (0..self.subscene_count())
            .filter_map(|index| self.subscene_identity(index))
            .map(SubsceneIdentity::id)
            .collect()
    }
}

/// Borrowed view over a subscene list and cursor.
#[derive(Debug, Clone, Copy)]
pub struct SubsceneView<'a> {
    scene_id: &'a str,
    subscenes: &'a [SubsceneIdentity],
    current: Option<SubsceneId>,
}

impl<'a> SubsceneView<'a> {
    pub fn new(
        scene_id: &'a str,
        subscenes: &'a [SubsceneIdentity],
        current: Option<SubsceneId>,
    ) -> Self {
        Self {
            scene_id,
            subscenes,
            current,
        }
    }
}

impl SubsceneContext for SubsceneView<'_> {
    fn scene_id(&self) -> &str {
        self.scene_id
    }

    fn subscene_count(&self) -> usize {
        self.subscenes.len()
    }

    fn subscene_identity(&self, index: usize) -> Option<&SubsceneIdentity> {
        self.subscenes.get(index)
    }

    fn current_subscene_identity(&self) -> Option<&SubsceneIdentity> {
        let current = self.current?;
        self.subscenes
            .iter()
            .find(|identity| identity.id() == current)
    }
}
