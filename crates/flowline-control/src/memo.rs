use flowline_core::{ParticleId, ParticleKey};

/// Per-particle cache, indexed by slot and tagged with the particle's id.
///
/// A value lives for one particle life: when a new identity occupies a slot
/// its first lookup recomputes the value. Storage never exceeds the
/// population size.
#[derive(Debug, Clone)]
pub struct Memo<T> {
    slots: Vec<Option<(ParticleId, T)>>,
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T: Copy> Memo<T> {
    /// Creates an empty memo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, computing it with `init` on first use.
    pub fn get_or_insert_with(&mut self, key: ParticleKey, init: impl FnOnce() -> T) -> T {
        if key.slot >= self.slots.len() {
            self.slots.resize_with(key.slot + 1, || None);
        }
        if let Some((id, value)) = self.slots[key.slot] {
            if id == key.id {
                return value;
            }
        }
        let value = init();
        self.slots[key.slot] = Some((key.id, value));
        value
    }

    /// Number of slots allocated.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Drops every cached value.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
