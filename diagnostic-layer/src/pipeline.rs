//! Pipeline Layout / Pipeline handles (§3) and Pipeline Compiler (§4.4).

use crate::arena::{Arena, Handle};
use crate::config::CompilerConfig;
use crate::descriptor::DescriptorSetLayoutHandle;
use crate::error::CompilerError;
use crate::message::FeatureMask;
use crate::shader::{InstrumentedShader, ShaderModuleHandle};
use crate::worker_pool::{Commit, Job, WorkerPool};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicPtr, Ordering};
use std::sync::Arc;

/// A reserved push-constant byte range one pass writes into, within the tail range the
/// pipeline layout reserves for instrumentation.
#[derive(Clone, Copy, Debug)]
pub struct PassPushConstantRange {
    pub pass_uid: u16,
    pub stage_mask: u32,
    pub offset: u32,
    pub size: u32,
}

/// Pipeline Layout Handle (§3): API layout, per-set cross-compatibility hashes,
/// enumerated push-constant stage ranges, and per-pass push-constant descriptors with
/// their byte offsets within a reserved tail range.
pub struct PipelineLayoutEntry {
    pub set_layouts: Vec<DescriptorSetLayoutHandle>,
    pub set_cross_compat_hashes: Vec<u64>,
    pub user_push_constant_ranges: Vec<(u32, u32, u32)>, // (stage_mask, offset, size)
    pub pass_push_constant_ranges: Vec<PassPushConstantRange>,
}

pub type PipelineLayoutHandle = Handle<PipelineLayoutEntry>;
pub type PipelineLayoutArena = Arena<PipelineLayoutEntry>;

impl PipelineLayoutEntry {
    /// Byte offset immediately after the user's own push-constant ranges: where the
    /// reserved instrumentation tail begins.
    pub fn reserved_tail_offset(&self) -> u32 {
        self.user_push_constant_ranges
            .iter()
            .map(|&(_, offset, size)| offset + size)
            .max()
            .unwrap_or(0)
    }

    /// Total byte size of the reserved tail, across all registered passes.
    pub fn reserved_tail_size(&self) -> u32 {
        self.pass_push_constant_ranges
            .iter()
            .map(|r| r.offset + r.size)
            .max()
            .unwrap_or(0)
            .saturating_sub(self.reserved_tail_offset())
    }
}

/// Pipeline type, as distinguished in the data model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineKind {
    Graphics,
    Compute,
}

/// Deep-copied create-info, self-contained and owned by a flat byte arena so the pipeline
/// job can outlive the caller's own buffers (they may be freed between enqueue and
/// execution, per §4.4).
#[derive(Clone, Debug)]
pub struct PipelineCreateInfo {
    pub kind: PipelineKind,
    /// The stages this pipeline references, each naming the shader-compiler commit that
    /// must retire before this pipeline's instrumented output can be written.
    pub stages: Vec<(ShaderModuleHandle, Commit)>,
    /// Opaque create-info bytes, deep-copied out of the caller's own allocation.
    pub arena: Arc<[u8]>,
}

/// Pipeline Handle (§3): source pipeline, atomic instrumented-pipeline pointer (nullable
/// until compilation completes), layout handle, module list, feature-mask, and the
/// deep-copied create-info.
pub struct PipelineEntry<B: crate::Backend> {
    pub source: B::Pipeline,
    instrumented: AtomicPtr<B::Pipeline>,
    pub layout: PipelineLayoutHandle,
    pub modules: Vec<ShaderModuleHandle>,
    pub feature_mask: FeatureMask,
    pub create_info: PipelineCreateInfo,
    pub kind: PipelineKind,
}

impl<B: crate::Backend> PipelineEntry<B> {
    pub fn new(
        source: B::Pipeline,
        layout: PipelineLayoutHandle,
        modules: Vec<ShaderModuleHandle>,
        feature_mask: FeatureMask,
        create_info: PipelineCreateInfo,
        kind: PipelineKind,
    ) -> Self {
        PipelineEntry {
            source,
            instrumented: AtomicPtr::new(std::ptr::null_mut()),
            layout,
            modules,
            feature_mask,
            create_info,
            kind,
        }
    }

    /// `None` until the pipeline compiler publishes a result.
    pub fn instrumented(&self) -> Option<B::Pipeline>
    where
        B::Pipeline: Copy,
    {
        let ptr = self.instrumented.load(Ordering::Acquire);
        if ptr.is_null() {
            None
        } else {
            // SAFETY: only `publish` ever stores a non-null pointer, and it always
            // points at a live, leaked `Box<B::Pipeline>` owned for the entry's
            // lifetime (freed in `Drop`).
            Some(unsafe { *ptr })
        }
    }

    fn publish(&self, pipeline: B::Pipeline) {
        let boxed = Box::into_raw(Box::new(pipeline));
        let previous = self.instrumented.swap(boxed, Ordering::AcqRel);
        if !previous.is_null() {
            // SAFETY: `previous` was itself produced by a prior `publish` and nothing
            // else ever frees it.
            unsafe {
                drop(Box::from_raw(previous));
            }
        }
    }
}

impl<B: crate::Backend> Drop for PipelineEntry<B> {
    fn drop(&mut self) {
        let ptr = *self.instrumented.get_mut();
        if !ptr.is_null() {
            unsafe {
                drop(Box::from_raw(ptr));
            }
        }
    }
}

pub type PipelineHandle<B> = Handle<PipelineEntry<B>>;
pub type PipelineArena<B> = Arena<PipelineEntry<B>>;

/// One pipeline-compile job. Unlike a shader job, this cooperatively waits (polling, not
/// blocking on a lock) until every referenced shader-compiler commit has published
/// before running, because the pipeline body depends on those instrumented shaders.
pub struct PipelineCompileJob<B: crate::Backend> {
    pub create_info: PipelineCreateInfo,
    pub shader_commits: Vec<Commit>,
    pub is_shader_commit_pushed: Arc<dyn Fn(Commit) -> bool + Send + Sync>,
    pub shader_instrumented: Arc<dyn Fn(ShaderModuleHandle) -> Option<InstrumentedShader> + Send + Sync>,
    pub slot: Arc<Mutex<Option<Result<B::Pipeline, CompilerError>>>>,
    pub build: Arc<dyn Fn(&PipelineCreateInfo, &[InstrumentedShader]) -> Result<B::Pipeline, CompilerError> + Send + Sync>,
}

impl<B: crate::Backend> Job for PipelineCompileJob<B> {
    fn run(self) {
        // Cooperative wait: spin with a short back-off rather than taking a lock, since
        // the shader commits this job depends on may retire on other worker threads at
        // any time and there is no meaningful "wait queue" to join.
        for &commit in &self.shader_commits {
            while !(self.is_shader_commit_pushed)(commit) {
                std::thread::yield_now();
            }
        }
        let instrumented: Vec<InstrumentedShader> = self
            .create_info
            .stages
            .iter()
            .filter_map(|(module, _)| (self.shader_instrumented)(*module))
            .collect();
        let result = (self.build)(&self.create_info, &instrumented);
        *self.slot.lock() = Some(result);
    }
}

/// Parallel worker pool at pipeline granularity, depending on shader-compiler outputs.
/// Same protocol as [`crate::shader::ShaderCompilerPool`]; kept as a distinct type
/// because its jobs carry the extra shader-commit dependency wait.
pub struct PipelineCompiler<B: crate::Backend> {
    workers: WorkerPool<PipelineCompileJob<B>>,
}

impl<B: crate::Backend> PipelineCompiler<B> {
    pub fn new(config: CompilerConfig) -> Self {
        PipelineCompiler {
            workers: WorkerPool::new(config.worker_count),
        }
    }

    pub fn push(&self, job: PipelineCompileJob<B>, completion: impl FnOnce() + Send + 'static) -> Commit {
        self.workers.push(vec![job], completion)
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

impl<B: crate::Backend> PipelineEntry<B> {
    /// Invoked by the completion functor once the pipeline job has produced a result:
    /// publishes a successful instrumented pipeline, or leaves the pointer null on
    /// failure (the source pipeline remains usable; see §7 "Compiler rejection").
    pub fn apply_result(&self, result: Result<B::Pipeline, CompilerError>) {
        match result {
            Ok(pipeline) => self.publish(pipeline),
            Err(err) => {
                log::warn!("pipeline instrumentation rejected: {err}");
            }
        }
    }
}
