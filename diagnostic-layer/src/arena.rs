//! Deferred-release handles.
//!
//! The original implementation embeds an atomic refcount in a polymorphic handle base
//! class. We replace that with an explicit arena + generational index per the design
//! notes: every handle kind lives as an entry in a typed [`Arena`]; outside references
//! hold a [`Handle<T>`] of `(index, generation)`; `release` decrements a refcount stored
//! in the entry and, at zero, invalidates the slot and bumps its generation. A stale
//! `Handle<T>` can never alias a reused slot because the generation check fails.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};

/// A typed, generation-checked reference into an [`Arena<T>`].
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(index: u32, generation: u32) -> Self {
        Handle {
            index,
            generation,
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}
impl<T> Eq for Handle<T> {}

impl<T> std::hash::Hash for Handle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> std::fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle")
            .field("index", &self.index)
            .field("generation", &self.generation)
            .finish()
    }
}

struct Entry<T> {
    generation: u32,
    refcount: AtomicU32,
    value: Option<T>,
}

/// A typed arena of deferred-release entries, the backing store for one handle kind
/// (shader module, pipeline, descriptor set, ...). Mirrors the per-kind `StateTables.h`
/// lookup tables, minus the `void*`-keyed indirection: a [`Handle<T>`] *is* the lookup
/// key.
pub struct Arena<T> {
    entries: Vec<Entry<T>>,
    free_list: Vec<u32>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Arena {
            entries: Vec::new(),
            free_list: Vec::new(),
        }
    }
}

impl<T> Arena<T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value with an initial refcount of 1 (the caller's own reference,
    /// matching `usages` starting at 1 in the data model).
    pub fn insert(&mut self, value: T) -> Handle<T> {
        if let Some(index) = self.free_list.pop() {
            let entry = &mut self.entries[index as usize];
            entry.value = Some(value);
            entry.refcount.store(1, Ordering::Relaxed);
            Handle::new(index, entry.generation)
        } else {
            let index = self.entries.len() as u32;
            self.entries.push(Entry {
                generation: 0,
                refcount: AtomicU32::new(1),
                value: Some(value),
            });
            Handle::new(index, 0)
        }
    }

    fn entry(&self, handle: Handle<T>) -> Option<&Entry<T>> {
        self.entries
            .get(handle.index as usize)
            .filter(|e| e.generation == handle.generation && e.value.is_some())
    }

    /// Looks up a live value. Returns `None` if the handle is stale (its slot was
    /// reused, or already released).
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.entry(handle).and_then(|e| e.value.as_ref())
    }

    /// Looks up a live value mutably.
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        let valid = self
            .entries
            .get(handle.index as usize)
            .map_or(false, |e| e.generation == handle.generation && e.value.is_some());
        if !valid {
            return None;
        }
        self.entries[handle.index as usize].value.as_mut()
    }

    /// Increments the refcount of a live handle. Cross-thread safe: concurrent
    /// `retain`/`release` pairs only ever move the count, never the liveness decision at
    /// zero (see [`Arena::release`]).
    pub fn retain(&self, handle: Handle<T>) {
        if let Some(entry) = self.entry(handle) {
            entry.refcount.fetch_add(1, Ordering::AcqRel);
        }
    }

    /// Decrements the refcount of a live handle. At zero, invalidates the slot, bumps its
    /// generation, and returns the released value so the caller can run its destructor
    /// outside of any lock the arena itself might be guarded by.
    pub fn release(&mut self, handle: Handle<T>) -> Option<T> {
        let still_live = {
            let entry = self.entries.get(handle.index as usize)?;
            if entry.generation != handle.generation || entry.value.is_none() {
                return None;
            }
            entry.refcount.fetch_sub(1, Ordering::AcqRel) != 1
        };
        if still_live {
            return None;
        }
        let entry = &mut self.entries[handle.index as usize];
        entry.generation = entry.generation.wrapping_add(1);
        self.free_list.push(handle.index);
        entry.value.take()
    }

    /// Number of live entries. Used by tests and diagnostics, not the hot path.
    pub fn live_count(&self) -> usize {
        self.entries.iter().filter(|e| e.value.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_handle_after_release_is_rejected() {
        let mut arena: Arena<u32> = Arena::new();
        let h = arena.insert(7);
        assert_eq!(arena.get(h), Some(&7));
        assert_eq!(arena.release(h), Some(7));
        assert_eq!(arena.get(h), None);

        let h2 = arena.insert(9);
        assert_eq!(h2.index, h.index, "slot should be recycled");
        assert_ne!(h2.generation, h.generation, "generation must differ");
        assert_eq!(arena.get(h), None, "old handle must not see the new value");
        assert_eq!(arena.get(h2), Some(&9));
    }

    #[test]
    fn retain_defers_release_to_zero() {
        let mut arena: Arena<u32> = Arena::new();
        let h = arena.insert(1);
        arena.retain(h);
        assert_eq!(arena.release(h), None, "still one outstanding reference");
        assert_eq!(arena.get(h), Some(&1));
        assert_eq!(arena.release(h), Some(1));
        assert_eq!(arena.get(h), None);
    }
}
