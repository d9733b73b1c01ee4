//! Layer-wide configuration.
//!
//! There is no environment-variable coupling beyond the optional shader-cache path; the
//! embedding application constructs a [`LayerConfig`] up front and hands it to the device
//! context at creation time.

use std::path::PathBuf;
use std::time::Duration;

/// Tunables for the diagnostic allocator's pooling and growth policy.
#[derive(Clone, Debug, PartialEq)]
pub struct AllocatorConfig {
    /// Multiplier applied to the observed latent message count when sizing a new pool
    /// entry or selecting an existing one.
    pub growth_factor: f32,
    /// Number of present-call frames an allocation may sit idle in the pool before it is
    /// destroyed and its heap range freed.
    pub dead_allocation_threshold: u32,
    /// Weight of the most recent observation in the exponential moving average used for
    /// `average_message_count`.
    pub average_message_weight: f32,
    /// Ceiling the throttle threshold is allowed to climb to under sustained back-pressure.
    pub throttle_threshold_limit: u32,
    /// Minimum heap-block size requested from the host allocator, in bytes.
    pub min_heap_block_size: u64,
    /// Enables overlap checks between proposed and live ranges during defragmentation.
    /// Mirrors `DIAGNOSTIC_ALLOCATOR_DEFRAGMENTATION_CHECK`; meant for debug builds.
    pub defragmentation_check: bool,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        AllocatorConfig {
            growth_factor: 1.5,
            dead_allocation_threshold: 120,
            average_message_weight: 0.1,
            throttle_threshold_limit: 1 << 16,
            min_heap_block_size: 4 * 1024 * 1024,
            defragmentation_check: cfg!(debug_assertions),
        }
    }
}

/// Tunables for the shader and pipeline compiler pools.
#[derive(Clone, Debug, PartialEq)]
pub struct CompilerConfig {
    /// Number of worker threads lazily spawned on first `push`. `0` defers to the number
    /// of logical CPUs.
    pub worker_count: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig { worker_count: 0 }
    }
}

/// Tunables for the shader cache's background serialization.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheConfig {
    /// Optional on-disk path the cache serializes to and deserializes from at startup.
    /// `None` keeps the cache purely in-memory.
    pub path: Option<PathBuf>,
    /// Initial miss-count threshold before `auto_serialize` wakes the serialization
    /// worker.
    pub initial_serialize_threshold: u32,
    /// Multiplier applied to the threshold after each flush.
    pub growth_factor: f32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            path: None,
            initial_serialize_threshold: 64,
            growth_factor: 2.0,
        }
    }
}

/// Top-level layer configuration, constructed once by the embedding application.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerConfig {
    /// Allocator pooling and growth tunables.
    pub allocator: AllocatorConfig,
    /// Shader compiler pool tunables.
    pub shader_compiler: CompilerConfig,
    /// Pipeline compiler pool tunables.
    pub pipeline_compiler: CompilerConfig,
    /// Shader cache tunables.
    pub cache: CacheConfig,
    /// Interval between report "step" snapshots.
    pub report_step_interval: Duration,
}

impl Default for LayerConfig {
    fn default() -> Self {
        LayerConfig {
            allocator: AllocatorConfig::default(),
            shader_compiler: CompilerConfig::default(),
            pipeline_compiler: CompilerConfig::default(),
            cache: CacheConfig::default(),
            report_step_interval: Duration::from_millis(250),
        }
    }
}
