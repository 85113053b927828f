use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use dtge_core::{SubsceneId, VariationId};

// 0 is reserved for the null subscene.
static NEXT_SUBSCENE_ID: AtomicU32 = AtomicU32::new(1);
static NEXT_VARIATION_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn mint_subscene_id() -> SubsceneId {
    SubsceneId::new(NEXT_SUBSCENE_ID.fetch_add(1, Ordering::Relaxed))
}

pub(crate) fn mint_variation_id() -> VariationId {
    VariationId::new(NEXT_VARIATION_ID.fetch_add(1, Ordering::Relaxed))
}

/// Moves the subscene counter past an id that came from persisted data.
pub(crate) fn observe_subscene_id(id: SubsceneId) {
    NEXT_SUBSCENE_ID.fetch_max(id.get().saturating_add(1), Ordering::Relaxed);
}

pub(crate) fn observe_variation_id(id: VariationId) {
    NEXT_VARIATION_ID.fetch_max(id.get().saturating_add(1), Ordering::Relaxed);
}
