use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_PARTICLE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique particle identity.
///
/// A fresh id is issued every time a particle (re)initializes, so caches keyed
/// by id never see a stale value from a previous life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(u64);

impl ParticleId {
    /// Issues a new id.
    pub fn next() -> Self {
        Self(NEXT_PARTICLE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Where a particle lives (`slot`) and which life it is on (`id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticleKey {
    /// Index in the population; stable across resets.
    pub slot: usize,
    /// Identity of the current life.
    pub id: ParticleId,
}

impl ParticleKey {
    /// A key for `slot` with a freshly issued id.
    pub fn fresh(slot: usize) -> Self {
        Self {
            slot,
            id: ParticleId::next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_unique() {
        let a = ParticleId::next();
        let b = ParticleId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_fresh_key_keeps_slot() {
        let a = ParticleKey::fresh(3);
        let b = ParticleKey::fresh(3);
        assert_eq!(a.slot, b.slot);
        assert_ne!(a.id, b.id);
    }
}
