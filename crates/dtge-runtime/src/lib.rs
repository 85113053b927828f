mod context;
mod facts;
mod ids;
mod persist;
mod registry;
mod rng;
mod scene;
mod snippet;
mod variation;

pub use context::{SubsceneContext, SubsceneView};
pub use facts::FactStore;
pub use registry::{DanglingTarget, SceneRegistry};
pub use rng::{clock_seed, derive_seed, SnippetRng};
pub use scene::{Scene, SubsceneEvent, SubsceneSelector};
pub use snippet::{EvaluatePass, Snippet, SnippetVariations, VariationKey, DEFAULT_SNIPPET_SEED};
pub use variation::Variation;
