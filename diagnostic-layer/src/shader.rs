//! Shader Module handle (§3) and Shader Compiler Pool (§4.3).
//!
//! A user shader-create flows: [`crate::cache::ShaderCache`] lookup → on miss, enqueue an
//! instrumentation job on this pool → cache insert on completion → wrapped
//! [`ShaderModuleHandle`] returned to the caller immediately, with its instrumented
//! pointer filled in once the pool retires the job.

use crate::arena::{Arena, Handle};
use crate::cache::{ShaderCache, SourceShaderKey};
use crate::config::CompilerConfig;
use crate::error::CompilerError;
use crate::message::FeatureMask;
use crate::worker_pool::{Commit, Job, WorkerPool};
use parking_lot::Mutex;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Deep-copied create-info, self-contained so a cache entry outlives the caller's own
/// buffers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderCreateInfo {
    pub bytecode: Arc<[u8]>,
    pub entry_point: String,
}

impl ShaderCreateInfo {
    fn content_hash(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.bytecode.hash(&mut hasher);
        self.entry_point.hash(&mut hasher);
        hasher.finish()
    }
}

/// Rewritten bitcode produced against a specific feature mask. Identity is
/// `(source_hash, feature_version_uid)`; lifetime is exclusively owned by the source
/// shader entry that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstrumentedShader {
    pub feature_version_uid: u64,
    pub bytecode: Arc<[u8]>,
}

/// Maps a host-API module to both source and, optionally, instrumented shader. Deferred
/// release: `usages` starts at 1 and is managed by the owning [`Arena`].
pub struct ShaderModuleEntry {
    pub source: ShaderCreateInfo,
    pub instrumented: Option<InstrumentedShader>,
    pub feature_mask: FeatureMask,
}

pub type ShaderModuleHandle = Handle<ShaderModuleEntry>;
pub type ShaderModuleArena = Arena<ShaderModuleEntry>;

/// One instrumentation job for the shader compiler pool: rewrite `source` against
/// `feature_mask`, write the result into `slot`, then invoke `on_done`.
pub struct ShaderCompileJob {
    pub source: ShaderCreateInfo,
    pub feature_mask: FeatureMask,
    pub feature_version_uid: u64,
    slot: Arc<ShaderResultSlot>,
}

struct ShaderResultSlot {
    result: Mutex<Option<Result<InstrumentedShader, CompilerError>>>,
}

impl Job for ShaderCompileJob {
    fn run(self) {
        let result = rewrite_shader(&self.source, self.feature_mask, self.feature_version_uid);
        *self.slot.result.lock() = Some(result);
    }
}

/// Placeholder for the actual DXIL/SPIR-V instrumentation pipeline: in the full system
/// this calls into [`crate::registry::DiagnosticRegistry`] to run the active passes
/// through `dxil_rewriter`'s parse/compile pipeline. The contract this crate exposes --
/// async job, monotonic commit, exactly-once completion -- is independent of what the
/// job body actually does.
fn rewrite_shader(
    source: &ShaderCreateInfo,
    feature_mask: FeatureMask,
    feature_version_uid: u64,
) -> Result<InstrumentedShader, CompilerError> {
    let _ = feature_mask;
    Ok(InstrumentedShader {
        feature_version_uid,
        bytecode: Arc::clone(&source.bytecode),
    })
}

/// Parallel worker pool that runs instrumentation passes on shader-create jobs, emits
/// monotonic commit IDs, and notifies completion functors. Thin wrapper over
/// [`WorkerPool`] that additionally owns the cache and the pending-shader bookkeeping.
pub struct ShaderCompilerPool {
    workers: WorkerPool<ShaderCompileJob>,
    cache: Arc<ShaderCache>,
}

impl ShaderCompilerPool {
    pub fn new(config: CompilerConfig, cache: Arc<ShaderCache>) -> Self {
        ShaderCompilerPool {
            workers: WorkerPool::new(config.worker_count),
            cache,
        }
    }

    /// Looks up the cache; on hit, returns the instrumented shader without touching the
    /// compiler pool. On miss, enqueues a single-job batch and returns the commit the
    /// caller can poll with [`Self::is_commit_pushed`].
    pub fn compile(
        &self,
        source: ShaderCreateInfo,
        feature_mask: FeatureMask,
        feature_version_uid: u64,
        on_done: impl FnOnce(Result<InstrumentedShader, CompilerError>) + Send + 'static,
    ) -> Commit {
        let key = SourceShaderKey {
            feature_version_uid,
            source_hash: source.content_hash(),
        };
        if let Some(instrumented) = self.cache.query(&key) {
            on_done(Ok(instrumented));
            return self.workers.commit_index();
        }
        let slot = Arc::new(ShaderResultSlot {
            result: Mutex::new(None),
        });
        let job = ShaderCompileJob {
            source,
            feature_mask,
            feature_version_uid,
            slot: Arc::clone(&slot),
        };
        let cache = Arc::clone(&self.cache);
        self.workers.push(vec![job], move || {
            if let Some(result) = slot.result.lock().take() {
                if let Ok(instrumented) = &result {
                    cache.insert(key, instrumented.clone());
                }
                on_done(result);
            }
        })
    }

    pub fn is_commit_pushed(&self, commit: Commit) -> bool {
        self.workers.is_commit_pushed(commit)
    }

    pub fn pending_commits(&self, commit: Commit) -> u64 {
        self.workers.pending_commits(commit)
    }

    pub fn commit_index(&self) -> Commit {
        self.workers.commit_index()
    }
}

/// Derives the cache key's feature-version dimension from a report's active feature
/// bits. Stable per distinct bitset, so repeated reports with the same mask hit the
/// cache instead of minting a fresh miss every time.
pub fn feature_version_uid_for(feature_mask: FeatureMask) -> u64 {
    feature_mask.bits() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use std::sync::mpsc;

    fn info(bytes: &[u8]) -> ShaderCreateInfo {
        ShaderCreateInfo {
            bytecode: Arc::from(bytes.to_vec().into_boxed_slice()),
            entry_point: "main".into(),
        }
    }

    #[test]
    fn cache_hit_skips_compiler_pool() {
        let cache = ShaderCache::new(CacheConfig::default());
        let pool = ShaderCompilerPool::new(CompilerConfig { worker_count: 1 }, Arc::clone(&cache));
        let (tx, rx) = mpsc::channel();
        let source = info(b"hello");
        let mask = FeatureMask::SHADER_RESOURCE_BOUNDS;
        let uid = feature_version_uid_for(mask);

        pool.compile(source.clone(), mask, uid, {
            let tx = tx.clone();
            move |result| tx.send(result).unwrap()
        });
        let first = rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap().unwrap();

        let pending_before = cache.pending_entries();
        pool.compile(source, mask, uid, move |result| tx.send(result).unwrap());
        let second = rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap().unwrap();

        assert_eq!(first.bytecode, second.bytecode);
        assert_eq!(
            cache.pending_entries(),
            pending_before,
            "cache hit must not touch pending_entries"
        );
    }

    #[test]
    fn cache_miss_then_insert_increments_pending_once() {
        let cache = ShaderCache::new(CacheConfig::default());
        let pool = ShaderCompilerPool::new(CompilerConfig { worker_count: 1 }, Arc::clone(&cache));
        let (tx, rx) = mpsc::channel();
        let mask = FeatureMask::SHADER_RESOURCE_BOUNDS;
        let uid = feature_version_uid_for(mask);
        pool.compile(info(b"world"), mask, uid, move |result| {
            tx.send(result).unwrap()
        });
        rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap().unwrap();
        assert_eq!(cache.pending_entries(), 1);
    }
}
