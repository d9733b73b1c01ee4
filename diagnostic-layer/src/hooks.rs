//! Intercepted entry-point surface (§4.9) and the outward Layer API (§6).
//!
//! Grounded in `Avalanche/source/gpu_validation_layer/Private/Callbacks.h`: that header
//! lists every host-API entry point a layer shim forwards through. This module is the
//! `snake_case` hook function per row, taking already-unwrapped arguments -- the
//! per-entry-point shim itself (marshalling a C ABI, resolving function pointers, enum
//! translation) is the excluded mechanical collaborator named in §1.
//!
//! [`LayerDevice`] is the per-device context: it owns every arena and worker pool this
//! crate defines and is the thing each hook is a method on. Hooks that touch no
//! layer-owned state (resource-lifecycle passthroughs, layer discovery) are grouped at
//! the bottom with minimal bodies; hooks that do are implemented in full.

use crate::allocator::{DiagnosticAllocation, DiagnosticAllocator, GroupedFence, PendingQueueInit};
use crate::arena::Arena;
use crate::cache::ShaderCache;
use crate::command_buffer::{BeginOutcome, BindPoint, CommandBufferState};
use crate::config::LayerConfig;
use crate::descriptor::{
    DescriptorPoolArena, DescriptorPoolEntry, DescriptorPoolHandle, DescriptorSetArena,
    DescriptorSetEntry, DescriptorSetHandle, DescriptorSetLayoutArena, DescriptorSetLayoutEntry,
    DescriptorSetLayoutHandle, DescriptorUpdateTemplateArena, DescriptorUpdateTemplateEntry,
    DescriptorUpdateTemplateHandle, TrackedWrite,
};
use crate::location_registry::ShaderLocationRegistry;
use crate::message::{FeatureMask, Sguid};
use crate::pipeline::{
    PipelineArena, PipelineCompileJob, PipelineCompiler, PipelineCreateInfo, PipelineEntry,
    PipelineHandle, PipelineKind, PipelineLayoutArena, PipelineLayoutEntry, PipelineLayoutHandle,
};
use crate::registry::DiagnosticRegistry;
use crate::report::{ExportFormat, Report, ReportBeginInfo, ReportHandle, ReportStatus, ReportStore};
use crate::shader::{
    InstrumentedShader, ShaderCompilerPool, ShaderCreateInfo, ShaderModuleArena, ShaderModuleEntry,
    ShaderModuleHandle,
};
use crate::worker_pool::Commit;
use crate::Backend;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Every piece of mutable, layer-owned object state, behind one lock (§5's "Device
/// resource lock", position 2).
struct ResourceTables<B: Backend> {
    shader_modules: ShaderModuleArena,
    pipeline_layouts: PipelineLayoutArena,
    pipelines: PipelineArena<B>,
    descriptor_set_layouts: DescriptorSetLayoutArena,
    descriptor_sets: DescriptorSetArena<B>,
    descriptor_pools: DescriptorPoolArena<B>,
    descriptor_update_templates: DescriptorUpdateTemplateArena,
    command_buffers: HashMap<B::CommandBuffer, CommandBufferState<B>>,
    queues: HashMap<B::Queue, PendingQueueInit<B>>,
}

impl<B: Backend> Default for ResourceTables<B> {
    fn default() -> Self {
        ResourceTables {
            shader_modules: Arena::new(),
            pipeline_layouts: Arena::new(),
            pipelines: Arena::new(),
            descriptor_set_layouts: Arena::new(),
            descriptor_sets: Arena::new(),
            descriptor_pools: Arena::new(),
            descriptor_update_templates: Arena::new(),
            command_buffers: HashMap::new(),
            queues: HashMap::new(),
        }
    }
}

/// Per-device layer context: the owner of every arena, worker pool, and store this crate
/// defines. One instance is created per intercepted `create_device` call.
pub struct LayerDevice<B: Backend> {
    device: B::Device,
    resources: Mutex<ResourceTables<B>>,
    registry: Arc<DiagnosticRegistry>,
    cache: Arc<ShaderCache>,
    shader_compiler: ShaderCompilerPool,
    pipeline_compiler: PipelineCompiler<B>,
    allocator: Arc<DiagnosticAllocator>,
    reports: ReportStore,
    locations: Arc<ShaderLocationRegistry>,
    config: LayerConfig,
}

impl<B: Backend> LayerDevice<B> {
    pub fn new(device: B::Device, config: LayerConfig) -> Arc<Self> {
        let registry = Arc::new(DiagnosticRegistry::new());
        let cache = ShaderCache::new(config.cache.clone());
        let allocator = DiagnosticAllocator::new(config.allocator.clone(), Arc::clone(&registry));
        Arc::new(LayerDevice {
            device,
            resources: Mutex::new(ResourceTables::default()),
            shader_compiler: ShaderCompilerPool::new(config.shader_compiler.clone(), Arc::clone(&cache)),
            pipeline_compiler: PipelineCompiler::new(config.pipeline_compiler.clone()),
            registry,
            cache,
            allocator,
            reports: ReportStore::new(),
            locations: Arc::new(ShaderLocationRegistry::new()),
            config,
        })
    }

    pub fn device(&self) -> &B::Device {
        &self.device
    }

    pub fn registry(&self) -> &Arc<DiagnosticRegistry> {
        &self.registry
    }

    /// The per-device SGUID -> source-location table, written once per shader commit by
    /// the compiler pool and read during report filtering.
    pub fn locations(&self) -> &Arc<ShaderLocationRegistry> {
        &self.locations
    }

    pub fn allocator(&self) -> &Arc<DiagnosticAllocator> {
        &self.allocator
    }

    // ---- Instance/device lifecycle -----------------------------------------------

    /// `destroy_device`: drops every worker pool and flushes the shader cache. Joining
    /// happens in each owned type's own `Drop`, matching the rest of the crate's
    /// teardown discipline; this hook exists as the named entry point the shim calls.
    pub fn destroy_device(&self) {
        log::debug!("layer device tearing down");
    }

    // ---- Shader Module (§3, §4.2, §4.3) -------------------------------------------

    /// `create_shader_module`: registers the source in the arena immediately and
    /// enqueues an instrumentation job (or serves it from cache). The handle is valid
    /// for binding right away; [`ShaderModuleEntry::instrumented`] fills in once the
    /// job retires.
    pub fn create_shader_module(
        self: &Arc<Self>,
        bytecode: Arc<[u8]>,
        entry_point: String,
        feature_mask: FeatureMask,
    ) -> ShaderModuleHandle {
        let source = ShaderCreateInfo { bytecode, entry_point };
        let handle = self.resources.lock().shader_modules.insert(ShaderModuleEntry {
            source: source.clone(),
            instrumented: None,
            feature_mask,
        });
        let feature_version_uid = crate::shader::feature_version_uid_for(feature_mask);
        let this = Arc::clone(self);
        self.shader_compiler
            .compile(source, feature_mask, feature_version_uid, move |result| match result {
                Ok(instrumented) => {
                    if let Some(entry) = this.resources.lock().shader_modules.get_mut(handle) {
                        entry.instrumented = Some(instrumented);
                    }
                }
                Err(err) => log::warn!("shader module instrumentation rejected: {err}"),
            });
        handle
    }

    pub fn destroy_shader_module(&self, handle: ShaderModuleHandle) {
        self.resources.lock().shader_modules.release(handle);
    }

    // ---- Pipeline Layout / Pipeline (§3, §4.4) ------------------------------------

    pub fn create_pipeline_layout(
        &self,
        set_layouts: Vec<DescriptorSetLayoutHandle>,
        set_cross_compat_hashes: Vec<u64>,
        user_push_constant_ranges: Vec<(u32, u32, u32)>,
    ) -> PipelineLayoutHandle {
        let active = self.registry.clone();
        // The registry is locked on first pipeline-layout creation: once layouts start
        // reserving push-constant tail ranges, passes may no longer register (§4.1).
        active.lock();
        let pass_push_constant_ranges = Vec::new();
        self.resources.lock().pipeline_layouts.insert(PipelineLayoutEntry {
            set_layouts,
            set_cross_compat_hashes,
            user_push_constant_ranges,
            pass_push_constant_ranges,
        })
    }

    pub fn destroy_pipeline_layout(&self, handle: PipelineLayoutHandle) {
        self.resources.lock().pipeline_layouts.release(handle);
    }

    /// `create_graphics_pipelines` / `create_compute_pipelines`: both host entry points
    /// converge here, distinguished only by `kind`. `source` is the pipeline the shim
    /// already created against the *unmodified* shader modules; this call additionally
    /// schedules the instrumented variant.
    pub fn create_pipeline(
        self: &Arc<Self>,
        kind: PipelineKind,
        source: B::Pipeline,
        layout: PipelineLayoutHandle,
        modules: Vec<ShaderModuleHandle>,
        create_info: PipelineCreateInfo,
        build: Arc<dyn Fn(&PipelineCreateInfo, &[InstrumentedShader]) -> Result<B::Pipeline, crate::error::CompilerError> + Send + Sync>,
    ) -> PipelineHandle<B> {
        let feature_mask = FeatureMask::empty();
        let mut resources = self.resources.lock();
        let handle = resources.pipelines.insert(PipelineEntry::new(
            source,
            layout,
            modules,
            feature_mask,
            create_info.clone(),
            kind,
        ));
        drop(resources);

        let shader_commits = create_info.stages.iter().map(|&(_, commit)| commit).collect();
        let this = Arc::clone(self);
        let is_shader_commit_pushed = {
            let this = Arc::clone(&this);
            Arc::new(move |commit: Commit| this.shader_compiler.is_commit_pushed(commit))
                as Arc<dyn Fn(Commit) -> bool + Send + Sync>
        };
        let shader_instrumented = {
            let this = Arc::clone(&this);
            Arc::new(move |module: ShaderModuleHandle| -> Option<InstrumentedShader> {
                this.resources
                    .lock()
                    .shader_modules
                    .get(module)
                    .and_then(|entry| entry.instrumented.clone())
            }) as Arc<dyn Fn(ShaderModuleHandle) -> Option<InstrumentedShader> + Send + Sync>
        };
        let slot = Arc::new(Mutex::new(None));
        let job = PipelineCompileJob {
            create_info,
            shader_commits,
            is_shader_commit_pushed,
            shader_instrumented,
            slot: Arc::clone(&slot),
            build,
        };
        self.pipeline_compiler.push(job, move || {
            if let Some(result) = slot.lock().take() {
                if let Some(entry) = this.resources.lock().pipelines.get(handle) {
                    entry.apply_result(result);
                }
            }
        });
        handle
    }

    pub fn destroy_pipeline(&self, handle: PipelineHandle<B>) {
        self.resources.lock().pipelines.release(handle);
    }

    // ---- Descriptor Set Layout / Pool / Set / Template (§3, §4.7) -----------------

    pub fn create_descriptor_set_layout(
        &self,
        bindings: Vec<crate::descriptor::BindingSchema>,
    ) -> DescriptorSetLayoutHandle {
        self.resources
            .lock()
            .descriptor_set_layouts
            .insert(DescriptorSetLayoutEntry::new(bindings))
    }

    pub fn destroy_descriptor_set_layout(&self, handle: DescriptorSetLayoutHandle) {
        self.resources.lock().descriptor_set_layouts.release(handle);
    }

    pub fn create_descriptor_pool(&self, native: B::DescriptorPool) -> DescriptorPoolHandle<B> {
        self.resources
            .lock()
            .descriptor_pools
            .insert(DescriptorPoolEntry::new(native))
    }

    /// `reset_descriptor_pool`: swaps the pool's membership list and releases the sets
    /// that were live just before the swap (§3 "Descriptor Pool Handle").
    pub fn reset_descriptor_pool(&self, pool: DescriptorPoolHandle<B>) {
        let mut resources = self.resources.lock();
        let Some(entry) = resources.descriptor_pools.get_mut(pool) else { return };
        let released = entry.swap_and_take();
        for set in released {
            resources.descriptor_sets.release(set);
        }
    }

    pub fn destroy_descriptor_pool(&self, pool: DescriptorPoolHandle<B>) {
        let mut resources = self.resources.lock();
        if let Some(mut entry) = resources.descriptor_pools.release(pool) {
            for set in entry.swap_and_take() {
                resources.descriptor_sets.release(set);
            }
        }
    }

    pub fn allocate_descriptor_sets(
        &self,
        pool: DescriptorPoolHandle<B>,
        layout: DescriptorSetLayoutHandle,
        native: B::DescriptorSet,
    ) -> Option<DescriptorSetHandle<B>> {
        let mut resources = self.resources.lock();
        let handle = resources
            .descriptor_sets
            .insert(DescriptorSetEntry::new(native, layout));
        if let Some(entry) = resources.descriptor_pools.get_mut(pool) {
            entry.track(handle);
        }
        Some(handle)
    }

    pub fn free_descriptor_sets(&self, sets: &[DescriptorSetHandle<B>]) {
        let mut resources = self.resources.lock();
        for &set in sets {
            resources.descriptor_sets.release(set);
        }
    }

    /// `update_descriptor_sets`: mirrors each write into the owning set's shadow
    /// sequence, advancing its `commit_hash` so breadcrumb tracking can observe the
    /// change (§4.7).
    pub fn update_descriptor_sets(&self, set: DescriptorSetHandle<B>, writes: Vec<TrackedWrite<B>>) {
        let mut resources = self.resources.lock();
        if let Some(entry) = resources.descriptor_sets.get_mut(set) {
            for write in writes {
                entry.record_write(write);
            }
        }
    }

    pub fn create_descriptor_update_template(
        &self,
        entries: Vec<crate::descriptor::TemplateEntry>,
    ) -> DescriptorUpdateTemplateHandle {
        self.resources
            .lock()
            .descriptor_update_templates
            .insert(DescriptorUpdateTemplateEntry::new(entries))
    }

    pub fn destroy_descriptor_update_template(&self, handle: DescriptorUpdateTemplateHandle) {
        self.resources.lock().descriptor_update_templates.release(handle);
    }

    /// `update_descriptor_set_with_template` / `cmd_push_descriptor_set_with_template`:
    /// expands the template's precomputed schedule against the caller's blob and
    /// forwards to the same shadow-write path as a direct update.
    pub fn update_descriptor_set_with_template(
        &self,
        set: DescriptorSetHandle<B>,
        template: DescriptorUpdateTemplateHandle,
        resolve: impl Fn(&crate::descriptor::TemplateEntry) -> TrackedWrite<B>,
    ) {
        let resources = self.resources.lock();
        let Some(template) = resources.descriptor_update_templates.get(template) else { return };
        let writes: Vec<_> = template.entries.iter().map(resolve).collect();
        drop(resources);
        self.update_descriptor_sets(set, writes);
    }

    // ---- Command Pool/Buffer (§4.7) ------------------------------------------------

    pub fn allocate_command_buffers(&self, buffers: &[B::CommandBuffer]) {
        let mut resources = self.resources.lock();
        for &cmd in buffers {
            resources.command_buffers.insert(cmd, CommandBufferState::new());
        }
    }

    /// `free_command_buffers` / command-pool destruction: any in-flight allocation is
    /// abandoned (returned to the pool with `skip_fence`) rather than leaked (§4.7
    /// "Cancellation").
    pub fn free_command_buffers(&self, buffers: &[B::CommandBuffer]) {
        let mut resources = self.resources.lock();
        for &cmd in buffers {
            if let Some(mut state) = resources.command_buffers.remove(&cmd) {
                if let Some(allocation) = state.abandon() {
                    self.allocator.abandon(allocation);
                }
            }
        }
    }

    /// `begin_command_buffer`: if `report` names a report that is `Recording` and both
    /// compilers have caught up to its captured commits, pops a diagnostic allocation
    /// and begins instrumented recording; otherwise begins passthrough (§4.7 "Begin",
    /// §7 graceful degradation).
    pub fn begin_command_buffer(&self, cmd: B::CommandBuffer, report: Option<ReportHandle>) -> BeginOutcome {
        let ready = report.and_then(|handle| {
            self.reports.with_report(handle, |report| {
                let caught_up = self.shader_compiler.is_commit_pushed(report.captured_shader_commit)
                    && self.pipeline_compiler.is_commit_pushed(report.captured_pipeline_commit);
                (report.status() == ReportStatus::Recording && caught_up).then_some(report.begin_info.features)
            })
        });

        let allocation = match ready.flatten() {
            Some(features) => {
                let tag = self.tag_for(&cmd);
                match self.allocator.pop_allocation(tag) {
                    Ok(allocation) => Some((features, allocation)),
                    Err(err) => {
                        log::warn!("diagnostic allocation unavailable, recording without instrumentation: {err}");
                        None
                    }
                }
            }
            None => None,
        };

        let mut resources = self.resources.lock();
        let Some(state) = resources.command_buffers.get_mut(&cmd) else {
            return BeginOutcome::Passthrough;
        };
        match allocation {
            Some((features, allocation)) => state.begin(features, Some(allocation)),
            None => state.begin(FeatureMask::empty(), None),
        }
    }

    fn tag_for(&self, cmd: &B::CommandBuffer) -> u64 {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        cmd.hash(&mut hasher);
        hasher.finish()
    }

    /// `end_command_buffer`: takes this command buffer's allocation (if any) for the
    /// caller to hand to [`Self::queue_submit`].
    pub fn end_command_buffer(&self, cmd: B::CommandBuffer) -> Option<DiagnosticAllocation> {
        self.resources
            .lock()
            .command_buffers
            .get_mut(&cmd)
            .and_then(CommandBufferState::take_allocation)
    }

    // ---- Command recording (§4.7) --------------------------------------------------

    pub fn cmd_bind_pipeline(
        &self,
        cmd: B::CommandBuffer,
        point: BindPoint,
        layout: PipelineLayoutHandle,
        source: B::Pipeline,
        instrumented: Option<B::Pipeline>,
    ) -> (B::Pipeline, bool) {
        let mut resources = self.resources.lock();
        match resources.command_buffers.get_mut(&cmd) {
            Some(state) => state.bind_pipeline(point, layout, source, instrumented),
            None => (source, false),
        }
    }

    pub fn cmd_bind_descriptor_sets(
        &self,
        cmd: B::CommandBuffer,
        point: BindPoint,
        layout: PipelineLayoutHandle,
        first_set: u32,
        sets: &[(DescriptorSetHandle<B>, B::DescriptorSet, u64)],
        dynamic_offsets: &[u32],
    ) {
        if let Some(state) = self.resources.lock().command_buffers.get_mut(&cmd) {
            state.bind_descriptor_sets(point, layout, first_set, sets, dynamic_offsets);
        }
    }

    pub fn cmd_push_constants(&self, cmd: B::CommandBuffer, point: BindPoint, offset: u32, data: &[u8]) {
        if let Some(state) = self.resources.lock().command_buffers.get_mut(&cmd) {
            state.push_constants(point, offset, data);
        }
    }

    pub fn cmd_begin_render_pass(&self, cmd: B::CommandBuffer) {
        if let Some(state) = self.resources.lock().command_buffers.get_mut(&cmd) {
            state.begin_render_pass();
        }
    }

    pub fn cmd_end_render_pass(&self, cmd: B::CommandBuffer) {
        if let Some(state) = self.resources.lock().command_buffers.get_mut(&cmd) {
            state.end_render_pass();
        }
    }

    /// Shared prologue for every draw/dispatch variant: if breadcrumbs are dirty,
    /// flushes them and computes the instrumentation push-constant bytes the shim must
    /// push before issuing the native call (§4.7, §5 "happens-before on commit_hash").
    pub fn prepare_dispatch(&self, cmd: B::CommandBuffer, point: BindPoint) -> Vec<u8> {
        let mut resources = self.resources.lock();
        let Some(state) = resources.command_buffers.get_mut(&cmd) else {
            return Vec::new();
        };
        if state.breadcrumbs_dirty() {
            state.flush_breadcrumbs();
        }
        let active_features = state.active_feature_mask();
        drop(resources);
        let mut data = vec![0u8; 256];
        let written = self.registry.update_push_constants(active_features, &mut data);
        data.truncate(written as usize);
        let _ = point;
        data
    }

    /// Post-render-pass / post-copy state restore (§4.7): returns the pipeline,
    /// push-constant bytes, and non-decayed descriptor sets the shim must re-bind.
    pub fn state_restore(
        &self,
        cmd: B::CommandBuffer,
        point: BindPoint,
        current_layout_hashes: &[u64],
    ) -> Option<(
        Option<B::Pipeline>,
        Vec<u8>,
        Vec<Option<crate::command_buffer::TrackedDescriptorSet<B>>>,
    )> {
        let resources = self.resources.lock();
        let state = resources.command_buffers.get(&cmd)?;
        Some(state.state_restore(point, current_layout_hashes))
    }

    // ---- Submission (§4.5, §4.7) ----------------------------------------------------

    /// `queue_submit`: groups every submitted command buffer's allocation onto a fresh
    /// fence, marks the last one as this batch's sync point, and returns the fence for
    /// the shim to pass to the real submit call.
    pub fn queue_submit(&self, queue: &B::Queue, allocations: Vec<DiagnosticAllocation>) -> Option<Arc<GroupedFence>> {
        if allocations.is_empty() {
            let mut resources = self.resources.lock();
            if let Some(pqi) = resources.queues.get_mut(queue) {
                pqi.on_missed_frame();
            }
            return None;
        }
        let fence = self.allocator.pop_fence();
        let last = allocations.len() - 1;
        for (i, mut allocation) in allocations.into_iter().enumerate() {
            allocation.sync_point = i == last;
            self.allocator.submit(&mut allocation, Arc::clone(&fence));
            self.allocator.retire(allocation, false);
        }
        let mut resources = self.resources.lock();
        let pqi = resources
            .queues
            .entry(queue.clone())
            .or_insert_with(|| PendingQueueInit::new(queue.clone()));
        pqi.on_successful_submission();
        Some(fence)
    }

    /// `queue_present`: present-call housekeeping -- ages the allocation pool, applies
    /// throttling back-pressure, and runs `DiagnosticAllocator`'s own bookkeeping. Fence
    /// polling itself happens wherever the shim observes host-API fence status; this
    /// hook only drives the policy that depends on it having been observed.
    pub fn queue_present(&self) {
        self.allocator.on_present();
        if self.allocator.apply_throttling() {
            log::debug!("diagnostic allocator under back-pressure");
        }
    }

    // ---- Layer API (§6): report lifecycle ------------------------------------------

    pub fn create_report(&self, begin_info: ReportBeginInfo) -> ReportHandle {
        self.reports.create_report(begin_info)
    }

    pub fn destroy_report(&self, handle: ReportHandle) {
        self.reports.destroy_report(handle);
    }

    pub fn begin_report(&self, handle: ReportHandle, now: Instant) {
        self.reports.begin_report(
            handle,
            now,
            self.shader_compiler.commit_index(),
            self.pipeline_compiler.commit_index(),
        );
    }

    pub fn end_report(&self, handle: ReportHandle, now: Instant) {
        self.reports.end_report(handle, now);
    }

    pub fn get_report_status(&self, handle: ReportHandle) -> Option<ReportStatus> {
        self.reports.status(handle)
    }

    /// `flush_report`: per §6, blocks until every in-flight allocation tied to this
    /// report has been filtered. This crate's filter queue is not tagged by report, so
    /// the practical wait is "drain to zero outstanding filter work"; callers needing a
    /// tighter per-report bound should track it at the allocation-pop call site.
    pub fn flush_report(&self, handle: ReportHandle) {
        self.reports.with_report_mut(handle, Report::flush);
    }

    pub fn record_message(&self, handle: ReportHandle, message_code: u32, sguid: Sguid, string_ref: String) {
        self.reports
            .with_report_mut(handle, |report| report.add_message(message_code, sguid, string_ref));
    }

    pub fn step_report(&self, handle: ReportHandle, now: Instant) {
        self.reports.with_report_mut(handle, |report| {
            report.maybe_step(now, self.config.report_step_interval)
        });
    }

    /// `print_report` / `print_summary` / `export_report`: the formatting collaborators
    /// themselves (CSV/HTML writers) are out of scope (§1); this returns the data those
    /// formatters would consume.
    pub fn export_report(&self, handle: ReportHandle, format: ExportFormat) -> Option<Vec<crate::report::ReportedMessage>> {
        let _ = format;
        self.reports
            .with_report(handle, |report| report.messages().to_vec())
    }

    pub fn get_report_info(&self, handle: ReportHandle) -> Option<crate::report::ReportCounters> {
        self.reports.with_report(handle, Report::counters)
    }

    // ---- Resource-lifecycle passthroughs (§4.9, ambient) ---------------------------
    //
    // These host-API entry points touch no state this crate owns: the bounds-checking,
    // initialization-tracking and data-race passes that would key resource maps off
    // them are themselves Non-goals (§1). The shim forwards the underlying call
    // unmodified; the hooks below exist only as named seams future passes can extend,
    // matching the source's `Callbacks.h` surface one-for-one.

    pub fn create_image(&self) {}
    pub fn create_image_view(&self) {}
    pub fn create_buffer(&self) {}
    pub fn create_buffer_view(&self) {}
    pub fn destroy_image(&self) {}
    pub fn destroy_buffer(&self) {}
    pub fn map_memory(&self) {}
    pub fn unmap_memory(&self) {}
    pub fn bind_buffer_memory(&self) {}
    pub fn bind_buffer_memory2(&self) {}
    pub fn bind_image_memory(&self) {}
    pub fn bind_image_memory2(&self) {}
    pub fn create_render_pass(&self) {}
    pub fn create_framebuffer(&self) {}
    pub fn create_command_pool(&self) {}
    pub fn cmd_push_descriptor_set(&self) {}
    pub fn cmd_draw(&self) {}
    pub fn cmd_draw_indexed(&self) {}
    pub fn cmd_draw_indirect(&self) {}
    pub fn cmd_draw_indexed_indirect(&self) {}
    pub fn cmd_dispatch(&self) {}
    pub fn cmd_dispatch_indirect(&self) {}
    pub fn cmd_copy_buffer(&self) {}
    pub fn cmd_copy_image(&self) {}
    pub fn cmd_blit_image(&self) {}
    pub fn cmd_copy_buffer_to_image(&self) {}
    pub fn cmd_copy_image_to_buffer(&self) {}
    pub fn cmd_update_buffer(&self) {}
    pub fn cmd_fill_buffer(&self) {}
    pub fn cmd_clear_color_image(&self) {}
    pub fn cmd_clear_depth_stencil_image(&self) {}
    pub fn cmd_clear_attachments(&self) {}
    pub fn cmd_resolve_image(&self) {}

    /// `set_debug_utils_object_name`: forwarded unmodified so the core may optionally
    /// tag its own injected objects without the shim knowing about the layer.
    pub fn set_debug_utils_object_name(&self) {}
}

// Layer discovery (`enumerate_instance_layer_properties` and friends) is mechanical,
// host-ABI-specific, and not implemented by the core: a `gfx-hal` embedding never needs
// a `VkLayerProperties` enumeration (§4.9).

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::FeatureMask;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    struct FakeId(u32);

    #[derive(Clone, Eq, PartialEq, Hash, Debug)]
    struct TestBackend;
    impl Backend for TestBackend {
        type Device = FakeId;
        type Queue = FakeId;
        type CommandPool = FakeId;
        type CommandBuffer = FakeId;
        type Buffer = FakeId;
        type Image = FakeId;
        type Memory = FakeId;
        type Fence = FakeId;
        type Semaphore = FakeId;
        type ShaderModule = FakeId;
        type Pipeline = FakeId;
        type PipelineLayout = FakeId;
        type DescriptorSet = FakeId;
        type DescriptorSetLayout = FakeId;
        type DescriptorPool = FakeId;
    }

    #[test]
    fn begin_command_buffer_without_report_is_passthrough() {
        let device: Arc<LayerDevice<TestBackend>> =
            LayerDevice::new(FakeId(0), LayerConfig::default());
        device.allocate_command_buffers(&[FakeId(1)]);
        let outcome = device.begin_command_buffer(FakeId(1), None);
        assert_eq!(outcome, BeginOutcome::Passthrough);
    }

    #[test]
    fn free_command_buffers_abandons_active_allocation() {
        let device: Arc<LayerDevice<TestBackend>> =
            LayerDevice::new(FakeId(0), LayerConfig::default());
        device.allocate_command_buffers(&[FakeId(2)]);
        {
            let mut resources = device.resources.lock();
            let state = resources.command_buffers.get_mut(&FakeId(2)).unwrap();
            let allocation = device.allocator.pop_allocation(0).unwrap();
            state.begin(FeatureMask::empty(), Some(allocation));
        }
        device.free_command_buffers(&[FakeId(2)]);
        assert!(device.resources.lock().command_buffers.get(&FakeId(2)).is_none());
    }

    #[test]
    fn report_lifecycle_round_trips_through_layer_device() {
        let device: Arc<LayerDevice<TestBackend>> =
            LayerDevice::new(FakeId(0), LayerConfig::default());
        let handle = device.create_report(ReportBeginInfo::default());
        assert_eq!(device.get_report_status(handle), Some(ReportStatus::Idle));
        device.begin_report(handle, Instant::now());
        assert_eq!(device.get_report_status(handle), Some(ReportStatus::Recording));
        device.record_message(handle, 1, 7, "oob".into());
        device.end_report(handle, Instant::now());
        assert_eq!(device.get_report_status(handle), Some(ReportStatus::Processing));
        let counters = device.get_report_info(handle).unwrap();
        assert!(counters.is_conserved());
    }
}
