use std::time::{SystemTime, UNIX_EPOCH};

/// Seeded generator owned by a single snippet. Keeps the seed it was built
/// with so the snippet can be persisted and reconstructed deterministically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetRng {
    seed: u32,
    state: u32,
}

impl SnippetRng {
    pub fn new(seed: u32) -> Self {
        Self { seed, state: seed }
    }

    /// Continues a generator from a persisted position.
    pub fn resume(seed: u32, state: u32) -> Self {
        Self { seed, state }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    /// Uniform draw from `[0, bound)`; `bound` of 0 yields 0.
    pub fn next_index(&mut self, bound: usize) -> usize {
        if bound <= 1 {
            return 0;
        }
        let bound = u32::try_from(bound).unwrap_or(u32::MAX);
        next_bounded_with(&mut self.state, bound, next_u32) as usize
    }
}

/// Seed for callers that do not want reproducible output.
pub fn clock_seed() -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    (nanos as u32) ^ ((nanos >> 32) as u32)
}

/// Derives the seed of the `index`-th snippet from a base seed, so a scene
/// built from one seed does not hand identical sequences to every snippet.
pub fn derive_seed(base: u32, index: usize) -> u32 {
    let mut state = base ^ (index as u32).wrapping_mul(0x9e37_79b9);
    next_u32(&mut state)
}

fn next_u32(state: &mut u32) -> u32 {
    let mut next = state.wrapping_add(0x6d2b79f5);
    *state = next;
    next = (next ^ (next >> 15)).wrapping_mul(next | 1);
    next ^= next.wrapping_add((next ^ (next >> 7)).wrapping_mul(next | 61));
    next ^ (next >> 14)
}

fn next_bounded_with<F>(state: &mut u32, bound: u32, mut next: F) -> u32
where
    F: FnMut(&mut u32) -> u32,
{
    let threshold = (u64::from(u32::MAX) + 1) / u64::from(bound) * u64::from(bound);
    let mut candidate = next(state);
    while u64::from(candidate) >= threshold {
        candidate = next(state);
    }
    candidate % bound
}
