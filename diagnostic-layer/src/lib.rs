//! GPU-assisted validation layer.
//!
//! Intercepts a low-level graphics API, generically over [`Backend`], to transparently
//! rewrite user shaders and pipelines so that invalid GPU-side operations are trapped at
//! dispatch time and surfaced to the host as structured diagnostic messages. Applications
//! use the host graphics API unmodified; instrumentation is injected at shader-module,
//! pipeline, descriptor-set and command-buffer boundaries.
//!
//! The crate is organised the way the subsystems in the design are coupled: the
//! [`registry`] decides which messages are possible, the [`allocator`] sizes the GPU
//! buffer for them, the [`command_buffer`] interceptor routes descriptors at the right
//! time, and the [`report`] filter translates results back into host-visible diagnostics.

#[macro_use]
extern crate bitflags;

pub mod allocator;
pub mod arena;
pub mod cache;
pub mod command_buffer;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod hooks;
pub mod location_registry;
pub mod message;
pub mod pass;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod shader;
pub mod string_cache;
pub mod worker_pool;

use std::fmt::Debug;
use std::hash::Hash;

/// The subset of a host graphics API this crate must be able to drive in order to
/// instrument it.
///
/// This is deliberately smaller than a full hardware-abstraction trait: the layer never
/// issues a draw call or allocates a swapchain image on the application's behalf, it only
/// needs enough of the API surface to create its own scratch resources, submit transfer
/// work, and wrap/unwrap the application's own handles. Associated types mirror the handle
/// kinds named in the data model.
pub trait Backend: 'static + Sized + Eq + Clone + Hash + Debug {
    /// Opaque device handle.
    type Device: Clone + Debug;
    /// Opaque queue handle.
    type Queue: Clone + Copy + Eq + Hash + Debug;
    /// Opaque command-pool handle.
    type CommandPool: Clone + Copy + Eq + Hash + Debug;
    /// Opaque command-buffer handle.
    type CommandBuffer: Clone + Copy + Eq + Hash + Debug;
    /// Opaque buffer handle.
    type Buffer: Clone + Copy + Eq + Hash + Debug;
    /// Opaque image handle.
    type Image: Clone + Copy + Eq + Hash + Debug;
    /// Opaque device-memory handle.
    type Memory: Clone + Copy + Eq + Hash + Debug;
    /// Opaque fence handle.
    type Fence: Clone + Copy + Eq + Hash + Debug;
    /// Opaque semaphore handle.
    type Semaphore: Clone + Copy + Eq + Hash + Debug;
    /// Opaque shader-module handle.
    type ShaderModule: Clone + Copy + Eq + Hash + Debug;
    /// Opaque pipeline handle (graphics or compute).
    type Pipeline: Clone + Copy + Eq + Hash + Debug;
    /// Opaque pipeline-layout handle.
    type PipelineLayout: Clone + Copy + Eq + Hash + Debug;
    /// Opaque descriptor-set handle.
    type DescriptorSet: Clone + Copy + Eq + Hash + Debug;
    /// Opaque descriptor-set-layout handle.
    type DescriptorSetLayout: Clone + Copy + Eq + Hash + Debug;
    /// Opaque descriptor-pool handle.
    type DescriptorPool: Clone + Copy + Eq + Hash + Debug;
}

/// Re-exports of the most commonly used types, following the convention set by
/// `hal::prelude`.
pub mod prelude {
    pub use crate::allocator::DiagnosticAllocator;
    pub use crate::command_buffer::CommandBufferState;
    pub use crate::config::LayerConfig;
    pub use crate::location_registry::ShaderLocationRegistry;
    pub use crate::pass::InstrumentationPass;
    pub use crate::registry::DiagnosticRegistry;
    pub use crate::report::{Report, ReportHandle};
    pub use crate::string_cache::SStringCache;
    pub use crate::Backend;
}
