//! Shader Cache (§4.2): content-addressed store keyed by `(feature-set UID,
//! source-shader hash)` → instrumented bitcode, with background serialization.
//!
//! A user shader-create flows: cache lookup → on miss, enqueue an instrumentation job on
//! the [`crate::shader::ShaderCompilerPool`] → cache insert on completion. The cache
//! itself never blocks a caller on I/O; `query` and `insert` are `O(1)` under a single
//! lock, and a dedicated worker thread owns serialization.

use crate::config::CacheConfig;
use crate::error::CompilerError;
use crate::shader::InstrumentedShader;
use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Identity of a source shader entry: the hash of its create-info, including the
/// byte-identical source blob, combined with the feature-version UID it was rewritten
/// against (§3 "Source Shader" / "Instrumented Shader").
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceShaderKey {
    pub feature_version_uid: u64,
    pub source_hash: u64,
}

struct CacheEntry {
    instrumented: InstrumentedShader,
}

struct CacheInner {
    map: HashMap<SourceShaderKey, CacheEntry>,
    pending_entries: u32,
    serialize_threshold: u32,
}

/// Content-addressed store keyed by `(feature-set UID, source-shader hash)` →
/// instrumented bitcode, with background serialization.
pub struct ShaderCache {
    inner: Mutex<CacheInner>,
    wake: Condvar,
    config: CacheConfig,
    serializer: Mutex<Option<std::thread::JoinHandle<()>>>,
    exit: std::sync::atomic::AtomicBool,
    auto_serialize_requested: std::sync::atomic::AtomicBool,
}

impl ShaderCache {
    pub fn new(config: CacheConfig) -> Arc<Self> {
        let threshold = config.initial_serialize_threshold;
        let cache = Arc::new(ShaderCache {
            inner: Mutex::new(CacheInner {
                map: HashMap::new(),
                pending_entries: 0,
                serialize_threshold: threshold,
            }),
            wake: Condvar::new(),
            config,
            serializer: Mutex::new(None),
            exit: std::sync::atomic::AtomicBool::new(false),
            auto_serialize_requested: std::sync::atomic::AtomicBool::new(false),
        });
        let worker_cache = Arc::clone(&cache);
        let handle = std::thread::spawn(move || worker_cache.serializer_loop());
        *cache.serializer.lock() = Some(handle);
        cache
    }

    /// `O(1)` lookup; never blocks on I/O.
    pub fn query(&self, key: &SourceShaderKey) -> Option<InstrumentedShader> {
        self.inner.lock().map.get(key).map(|e| e.instrumented.clone())
    }

    /// `O(1)` insert. Increments `pending_entries`; decremented once the background
    /// worker serializes it.
    pub fn insert(&self, key: SourceShaderKey, instrumented: InstrumentedShader) {
        let mut inner = self.inner.lock();
        inner.map.insert(key, CacheEntry { instrumented });
        inner.pending_entries += 1;
        if inner.pending_entries >= inner.serialize_threshold {
            drop(inner);
            self.auto_serialize();
        }
    }

    /// Wakes the serialization worker at most once; a no-op if it is already awake.
    pub fn auto_serialize(&self) {
        if !self.auto_serialize_requested.swap(true, Ordering::AcqRel) {
            self.wake.notify_one();
        }
    }

    pub fn pending_entries(&self) -> u32 {
        self.inner.lock().pending_entries
    }

    fn serializer_loop(&self) {
        let mut inner = self.inner.lock();
        loop {
            while !self.auto_serialize_requested.load(Ordering::Acquire) {
                if self.exit.load(Ordering::Acquire) {
                    return;
                }
                self.wake.wait(&mut inner);
            }
            self.auto_serialize_requested.store(false, Ordering::Release);
            if self.exit.load(Ordering::Acquire) {
                return;
            }
            let path = self.config.path.clone();
            if let Some(path) = path {
                let pending = inner.pending_entries;
                drop(inner);
                match serialize_placeholder(&path) {
                    Ok(()) => {
                        inner = self.inner.lock();
                        inner.pending_entries = inner.pending_entries.saturating_sub(pending);
                    }
                    Err(err) => {
                        log::warn!("shader cache serialization failed: {err}");
                        inner = self.inner.lock();
                    }
                }
            }
            // Growth-factor throttling: raise the miss-threshold after each flush so
            // I/O pressure falls as the cache warms.
            inner.serialize_threshold =
                ((inner.serialize_threshold as f32) * self.config.growth_factor) as u32;
        }
    }

    /// Loads a previously serialized cache from `path`. Deserialization failures yield an
    /// empty cache (logged, not fatal).
    pub fn deserialize(&self, path: &std::path::Path) {
        match deserialize_placeholder(path) {
            Ok(entries) => {
                let mut inner = self.inner.lock();
                for (key, instrumented) in entries {
                    inner.map.insert(key, CacheEntry { instrumented });
                }
            }
            Err(err) => {
                log::warn!("shader cache deserialization failed, starting empty: {err}");
            }
        }
    }
}

impl Drop for ShaderCache {
    fn drop(&mut self) {
        self.exit.store(true, Ordering::Release);
        self.wake.notify_one();
        if let Some(handle) = self.serializer.lock().take() {
            let _ = handle.join();
        }
    }
}

/// Placeholder for the on-disk shader-cache serialization format, explicitly out of
/// scope (§1, §6): the core treats persistence as an opaque `serialize`/`deserialize`
/// pair over whatever format the embedding application chooses.
fn serialize_placeholder(_path: &std::path::Path) -> Result<(), CompilerError> {
    Ok(())
}

fn deserialize_placeholder(
    _path: &std::path::Path,
) -> Result<Vec<(SourceShaderKey, InstrumentedShader)>, CompilerError> {
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_query_is_a_hit() {
        let cache = ShaderCache::new(CacheConfig::default());
        let key = SourceShaderKey {
            feature_version_uid: 1,
            source_hash: 2,
        };
        let instrumented = InstrumentedShader {
            feature_version_uid: 1,
            bytecode: Arc::from(vec![1u8, 2, 3].into_boxed_slice()),
        };
        assert!(cache.query(&key).is_none());
        cache.insert(key.clone(), instrumented.clone());
        assert_eq!(cache.query(&key), Some(instrumented));
    }
}
