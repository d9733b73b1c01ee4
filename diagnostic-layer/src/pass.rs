//! Instrumentation passes: the plug-ins the [`registry`](crate::registry) fans into a
//! single IR-optimizer run. Per §1, the individual passes (bounds check, initialization,
//! data-race) are themselves out of scope — this module only specifies the seam they
//! plug into.

use crate::message::{FeatureMask, Message};
use crate::report::Report;

/// Two-phase export protocol shared by `enumerate_{storage,descriptors,push_constants}`:
/// callers first ask for a count, then pass a slice of exactly that length to receive the
/// records. Kept as a plain enum (rather than an `Option<&mut [T]>`) so call sites read
/// the same as the source's `nullptr`-means-count-only convention.
pub enum Enumerate<'a, T> {
    Count,
    Export(&'a mut [T]),
}

/// A storage-resource descriptor a pass needs bound alongside the user's own resources
/// (e.g. a bounds-check pass's per-binding metadata buffer).
#[derive(Clone, Debug)]
pub struct StorageDescriptor {
    pub uid: u16,
    pub byte_size: u64,
}

/// A reserved push-constant range a pass writes into at dispatch time.
#[derive(Clone, Copy, Debug)]
pub struct PushConstantDescriptor {
    pub uid: u16,
    pub offset: u32,
    pub byte_size: u32,
}

/// One instrumentation pass, registered against a single feature bit.
///
/// Implementations are out of this crate's scope (§1); this trait is the contract the
/// registry, allocator and command-buffer interceptor program against.
pub trait InstrumentationPass: Send + Sync {
    /// The single feature bit this pass serves.
    fn feature(&self) -> FeatureMask;

    /// The message-type UIDs this pass owns; used to populate the registry's
    /// message-type-to-pass lookup table.
    fn message_types(&self) -> &[u8];

    /// Number of storage descriptors this pass needs bound; the count half of the
    /// two-phase protocol.
    fn storage_count(&self) -> usize {
        0
    }

    /// Number of push-constant ranges this pass reserves; the count half of the
    /// two-phase protocol.
    fn push_constant_count(&self) -> usize {
        0
    }

    /// Two-phase enumeration of the storage descriptors this pass needs bound. Called
    /// with `Enumerate::Export(slice)` where `slice.len() == self.storage_count()`.
    fn enumerate_storage(&self, out: Enumerate<StorageDescriptor>);

    /// Two-phase enumeration of the push-constant ranges this pass reserves. Called with
    /// `Enumerate::Export(slice)` where `slice.len() == self.push_constant_count()`.
    fn enumerate_push_constants(&self, out: Enumerate<PushConstantDescriptor>);

    /// Appends this pass's bytes at its reserved push-constant offset. Returns the
    /// number of bytes written.
    fn update_push_constants(&self, feature_set: FeatureMask, data: &mut [u8]) -> u32;

    /// Handles one GPU-written message whose type this pass owns. Returns `true` if the
    /// message should be retained in the report (deduplication, suppression, etc. are
    /// the pass's own business).
    fn handle(&self, message: Message) -> bool;

    /// Appends this pass's own findings into a report at report-generation time.
    fn generate_report(&self, _report: &mut Report) {}

    /// Appends this pass's rolling counters into a step snapshot.
    fn step_report(&self, _report: &mut Report) {}

    /// Clears any accumulated per-report state (called on `flush_report`).
    fn flush(&self) {}
}
