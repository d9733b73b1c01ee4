//! String Cache (§3.1): deduplicating interner from `(SGUID, format-args)` to an owned
//! `String`.
//!
//! Passes borrow this during [`crate::pass::InstrumentationPass::handle`] to compose
//! human-readable message text without re-allocating per message. Identity is a hash of
//! the formatted key, not the key itself: passes never need to retain the args that
//! produced a given string once it has been interned.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// `(SGUID, format-args)` hashed down to a single key. Computed by
/// [`SStringCache::intern`]'s caller via [`key_for`] rather than stored as a tuple, so the
/// cache never needs the args type to be `'static` or owned.
pub type StringKey = u64;

/// Hashes an SGUID together with a set of already-formatted argument strings into a
/// [`StringKey`]. Callers compose this once per distinct message shape; the cache itself
/// never re-derives it.
pub fn key_for(sguid: u32, args: &[&str]) -> StringKey {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    sguid.hash(&mut hasher);
    for arg in args {
        arg.hash(&mut hasher);
    }
    hasher.finish()
}

struct Inner {
    strings: HashMap<StringKey, String>,
}

/// Deduplicating interner, owned by the [`crate::report::Report`] that created it and
/// cleared when that report ends.
pub struct SStringCache {
    inner: Mutex<Inner>,
}

impl Default for SStringCache {
    fn default() -> Self {
        SStringCache {
            inner: Mutex::new(Inner {
                strings: HashMap::new(),
            }),
        }
    }
}

impl SStringCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the interned string for `key`, computing it with `format` on first miss.
    /// `format` is only invoked once per distinct key, even under contention: the lock is
    /// held across the miss path.
    pub fn intern(&self, key: StringKey, format: impl FnOnce() -> String) -> String {
        let mut inner = self.inner.lock();
        if let Some(existing) = inner.strings.get(&key) {
            return existing.clone();
        }
        let formatted = format();
        inner.strings.insert(key, formatted.clone());
        formatted
    }

    pub fn len(&self) -> usize {
        self.inner.lock().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every interned string. Called once the owning report ends.
    pub fn clear(&self) {
        self.inner.lock().strings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn repeated_intern_reuses_formatted_string() {
        let cache = SStringCache::new();
        let calls = Arc::new(AtomicU32::new(0));
        let key = key_for(7, &["buffer", "42"]);

        let format = || {
            calls.fetch_add(1, Ordering::Relaxed);
            "out of bounds read on buffer 42".to_string()
        };
        let first = cache.intern(key, format);
        let second = cache.intern(key, || {
            calls.fetch_add(1, Ordering::Relaxed);
            "out of bounds read on buffer 42".to_string()
        });

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::Relaxed), 1, "second call must hit the cache");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_args_hash_to_distinct_keys() {
        assert_ne!(key_for(7, &["a"]), key_for(7, &["b"]));
        assert_ne!(key_for(7, &["a"]), key_for(8, &["a"]));
    }

    #[test]
    fn clear_empties_the_cache() {
        let cache = SStringCache::new();
        cache.intern(key_for(1, &[]), || "x".into());
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
