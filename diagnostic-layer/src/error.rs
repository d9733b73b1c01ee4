//! Error kinds surfaced by the core, per the error-handling design.
//!
//! Two idioms coexist deliberately: [`AllocatorError`] and [`RegistryError`] follow the
//! hand-rolled `Display` + `std::error::Error` style used by `hal::device`, while the
//! newer-vintage [`CompilerError`] and [`CacheError`] use `thiserror`, matching
//! `external_memory::errors`. Neither ever becomes a host-API error directly; see the
//! propagation policy on each hook in [`crate::hooks`].

use std::fmt;

/// The heap cannot grow to satisfy a request, on either the host or device side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutOfMemory;

impl fmt::Display for OutOfMemory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "out of memory")
    }
}

impl std::error::Error for OutOfMemory {}

/// Errors produced by the diagnostic allocator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocatorError {
    /// Heap growth failed; see [`OutOfMemory`].
    OutOfMemory,
    /// No pool entry satisfies the requested message limit and the heap has no budget to
    /// grow one. The caller degrades to running without instrumentation on this command
    /// buffer.
    AllocationExhausted,
    /// A fence that was expected to still be live was not found in the in-flight set.
    UnknownFence,
}

impl fmt::Display for AllocatorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AllocatorError::OutOfMemory => write!(f, "diagnostic allocator out of memory"),
            AllocatorError::AllocationExhausted => {
                write!(f, "no diagnostic allocation available and none could be grown")
            }
            AllocatorError::UnknownFence => write!(f, "fence not found among in-flight allocations"),
        }
    }
}

impl std::error::Error for AllocatorError {}

impl From<OutOfMemory> for AllocatorError {
    fn from(_: OutOfMemory) -> Self {
        AllocatorError::OutOfMemory
    }
}

/// Errors produced by the diagnostic registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// A UID category has been exhausted; allocating further would alias existing
    /// messages.
    UidSpaceExhausted,
    /// A pass was registered after passes had already been compiled into a pipeline.
    LateRegistration,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RegistryError::UidSpaceExhausted => write!(f, "UID space exhausted for this category"),
            RegistryError::LateRegistration => {
                write!(f, "pass registered after compilation had already begun")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Errors produced by the shader and pipeline compiler pools.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CompilerError {
    /// The IR rewriter encountered an unsupported construct. The affected module or
    /// pipeline is marked non-instrumentable; its instrumented pointer remains null and
    /// user operations continue unaffected.
    #[error("rewrite rejected: {0}")]
    Rejected(String),
    /// A dependency commit this job was waiting on will never retire (pool shut down).
    #[error("dependency commit {0} abandoned: pool shutting down")]
    DependencyAbandoned(u64),
}

/// Errors produced by the shader cache.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CacheError {
    /// Serialization to the configured path failed. Logged; the pending-entry count is
    /// left unchanged.
    #[error("cache serialization failed: {0}")]
    SerializeFailed(String),
    /// Deserialization from the configured path failed at startup; the cache starts
    /// empty.
    #[error("cache deserialization failed: {0}")]
    DeserializeFailed(String),
}
