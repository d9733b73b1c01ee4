//! Diagnostic Registry (§4.1): namespace for message/storage/descriptor/push-constant
//! IDs, routing of GPU messages to their owning pass, and the fan-in point that combines
//! all active passes into a single IR-optimizer invocation.

use crate::error::RegistryError;
use crate::message::{FeatureMask, Message};
use crate::pass::{Enumerate, InstrumentationPass, PushConstantDescriptor, StorageDescriptor};
use crate::report::Report;
use parking_lot::RwLock;
use std::sync::Arc;

/// At most 64 message kinds: the message wire format's type field is 6 bits (§3).
const MAX_MESSAGE_TYPES: usize = 64;

/// Monotonically increasing 16-bit UID allocator for one namespace (message, storage,
/// descriptor, descriptor-storage or push-constant categories). Allocating past the
/// `u16` head is fatal: a wrapped UID would alias an already-issued one.
#[derive(Default)]
struct UidAllocator {
    next: u32,
}

impl UidAllocator {
    fn allocate(&mut self, count: u32) -> Result<u16, RegistryError> {
        let start = self.next;
        let end = start + count;
        if end > u16::MAX as u32 + 1 {
            return Err(RegistryError::UidSpaceExhausted);
        }
        self.next = end;
        Ok(start as u16)
    }
}

struct RegisteredPass {
    pass: Arc<dyn InstrumentationPass>,
    feature: FeatureMask,
}

/// Namespace and dispatch table for instrumentation passes.
///
/// Passes are appended in registration order and never removed: the registry is built up
/// once, before the first pipeline is compiled, and frozen thereafter (`locked`).
/// Registering after lock is rejected with [`RegistryError::LateRegistration`], matching
/// the source's refusal to accept passes that arrive after compilation has already begun.
pub struct DiagnosticRegistry {
    inner: RwLock<Inner>,
}

struct Inner {
    passes: Vec<RegisteredPass>,
    /// message type -> index into `passes`.
    message_table: [Option<usize>; MAX_MESSAGE_TYPES],
    message_uids: UidAllocator,
    storage_uids: UidAllocator,
    descriptor_uids: UidAllocator,
    descriptor_storage_uids: UidAllocator,
    push_constant_uids: UidAllocator,
    locked: bool,
}

impl Default for DiagnosticRegistry {
    fn default() -> Self {
        DiagnosticRegistry {
            inner: RwLock::new(Inner {
                passes: Vec::new(),
                message_table: [None; MAX_MESSAGE_TYPES],
                message_uids: UidAllocator::default(),
                storage_uids: UidAllocator::default(),
                descriptor_uids: UidAllocator::default(),
                descriptor_storage_uids: UidAllocator::default(),
                push_constant_uids: UidAllocator::default(),
                locked: false,
            }),
        }
    }
}

impl DiagnosticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `pass` to the active list, recording the feature bit it serves, and
    /// claims its message-type UIDs in the fixed-size lookup table.
    pub fn register(
        &self,
        feature: FeatureMask,
        pass: Arc<dyn InstrumentationPass>,
    ) -> Result<(), RegistryError> {
        let mut inner = self.inner.write();
        if inner.locked {
            return Err(RegistryError::LateRegistration);
        }
        let index = inner.passes.len();
        for &ty in pass.message_types() {
            if inner.message_table[ty as usize].is_some() {
                return Err(RegistryError::UidSpaceExhausted);
            }
        }
        for &ty in pass.message_types() {
            inner.message_table[ty as usize] = Some(index);
        }
        inner.passes.push(RegisteredPass { pass, feature });
        Ok(())
    }

    /// Freezes the registry: subsequent `register` calls are rejected. Called once the
    /// first pipeline is handed to a compiler.
    pub fn lock(&self) {
        self.inner.write().locked = true;
    }

    /// Allocates `count` contiguous message-type UIDs. Exhaustion is fatal: a wrapped UID
    /// would alias messages already issued to another pass.
    pub fn allocate_message_uids(&self, count: u32) -> Result<u16, RegistryError> {
        self.inner.write().message_uids.allocate(count)
    }

    /// Allocates `count` contiguous storage-resource UIDs.
    pub fn allocate_storage_uids(&self, count: u32) -> Result<u16, RegistryError> {
        self.inner.write().storage_uids.allocate(count)
    }

    /// Allocates `count` contiguous descriptor UIDs.
    pub fn allocate_descriptor_uids(&self, count: u32) -> Result<u16, RegistryError> {
        self.inner.write().descriptor_uids.allocate(count)
    }

    /// Allocates `count` contiguous descriptor-storage UIDs.
    pub fn allocate_descriptor_storage_uids(&self, count: u32) -> Result<u16, RegistryError> {
        self.inner.write().descriptor_storage_uids.allocate(count)
    }

    /// Allocates `count` contiguous push-constant UIDs.
    pub fn allocate_push_constant_uids(&self, count: u32) -> Result<u16, RegistryError> {
        self.inner.write().push_constant_uids.allocate(count)
    }

    /// Returns the pass serving `feature_id` iff that bit is set in `active_features`
    /// and a pass is actually registered for it.
    pub fn get(
        &self,
        active_features: FeatureMask,
        feature_id: FeatureMask,
    ) -> Option<Arc<dyn InstrumentationPass>> {
        if !active_features.contains(feature_id) {
            return None;
        }
        let inner = self.inner.read();
        inner
            .passes
            .iter()
            .find(|p| p.feature == feature_id)
            .map(|p| Arc::clone(&p.pass))
    }

    fn active_passes(&self, active_features: FeatureMask) -> Vec<Arc<dyn InstrumentationPass>> {
        self.inner
            .read()
            .passes
            .iter()
            .filter(|p| active_features.contains(p.feature))
            .map(|p| Arc::clone(&p.pass))
            .collect()
    }

    /// Two-phase enumeration of storage descriptors across all active passes: first
    /// `storage_count()` sizes each pass's slice, then `enumerate_storage` fills it.
    pub fn enumerate_storage(&self, active_features: FeatureMask) -> Vec<StorageDescriptor> {
        let passes = self.active_passes(active_features);
        let mut out = Vec::with_capacity(passes.iter().map(|p| p.storage_count()).sum());
        for pass in &passes {
            let mut slice = vec![
                StorageDescriptor { uid: 0, byte_size: 0 };
                pass.storage_count()
            ];
            pass.enumerate_storage(Enumerate::Export(&mut slice));
            out.extend(slice);
        }
        out
    }

    /// Two-phase enumeration of push-constant descriptors across all active passes.
    pub fn enumerate_push_constants(
        &self,
        active_features: FeatureMask,
    ) -> Vec<PushConstantDescriptor> {
        let passes = self.active_passes(active_features);
        let mut out = Vec::with_capacity(passes.iter().map(|p| p.push_constant_count()).sum());
        for pass in &passes {
            let mut slice = vec![
                PushConstantDescriptor { uid: 0, offset: 0, byte_size: 0 };
                pass.push_constant_count()
            ];
            pass.enumerate_push_constants(Enumerate::Export(&mut slice));
            out.extend(slice);
        }
        out
    }

    /// Writes each active pass's bytes at its reserved push-constant offset; returns the
    /// total bytes written.
    pub fn update_push_constants(&self, active_features: FeatureMask, data: &mut [u8]) -> u32 {
        let mut written = 0u32;
        for pass in self.active_passes(active_features) {
            written += pass.update_push_constants(active_features, data);
        }
        written
    }

    /// Dispatches each message to its owning pass by `message_type`, in the order
    /// messages appear in the GPU buffer. Returns the number of messages the passes
    /// elected to keep.
    pub fn handle(&self, messages: &[Message]) -> u32 {
        let inner = self.inner.read();
        let mut retained = 0u32;
        for &message in messages {
            let ty = message.message_type() as usize;
            if let Some(index) = inner.message_table.get(ty).copied().flatten() {
                if inner.passes[index].pass.handle(message) {
                    retained += 1;
                }
            }
        }
        retained
    }

    /// Fans out to every registered pass (not just those active for a single report),
    /// matching the source's `GenerateReport` behaviour across the whole registry.
    pub fn generate_report(&self, report: &mut Report) {
        for pass in &self.inner.read().passes {
            pass.pass.generate_report(report);
        }
    }

    pub fn step_report(&self, report: &mut Report) {
        for pass in &self.inner.read().passes {
            pass.pass.step_report(report);
        }
    }

    pub fn flush(&self) {
        for pass in &self.inner.read().passes {
            pass.pass.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};

    struct CountingPass {
        feature: FeatureMask,
        types: Vec<u8>,
        handled: AtomicU32,
    }

    impl InstrumentationPass for CountingPass {
        fn feature(&self) -> FeatureMask {
            self.feature
        }
        fn message_types(&self) -> &[u8] {
            &self.types
        }
        fn enumerate_storage(&self, _out: Enumerate<StorageDescriptor>) {}
        fn enumerate_push_constants(&self, _out: Enumerate<PushConstantDescriptor>) {}
        fn update_push_constants(&self, _active: FeatureMask, _data: &mut [u8]) -> u32 {
            0
        }
        fn handle(&self, _message: Message) -> bool {
            self.handled.fetch_add(1, AtomicOrdering::Relaxed);
            true
        }
    }

    #[test]
    fn get_returns_none_when_feature_inactive() {
        let registry = DiagnosticRegistry::new();
        let pass = Arc::new(CountingPass {
            feature: FeatureMask::SHADER_RESOURCE_BOUNDS,
            types: vec![3],
            handled: AtomicU32::new(0),
        });
        registry
            .register(FeatureMask::SHADER_RESOURCE_BOUNDS, pass)
            .unwrap();
        assert!(registry
            .get(FeatureMask::empty(), FeatureMask::SHADER_RESOURCE_BOUNDS)
            .is_none());
        assert!(registry
            .get(
                FeatureMask::SHADER_RESOURCE_BOUNDS,
                FeatureMask::SHADER_RESOURCE_BOUNDS
            )
            .is_some());
    }

    #[test]
    fn handle_dispatches_by_message_type_in_order() {
        let registry = DiagnosticRegistry::new();
        let pass = Arc::new(CountingPass {
            feature: FeatureMask::SHADER_RESOURCE_BOUNDS,
            types: vec![3],
            handled: AtomicU32::new(0),
        });
        registry
            .register(FeatureMask::SHADER_RESOURCE_BOUNDS, Arc::clone(&pass))
            .unwrap();
        let messages = [Message::pack(3, 0), Message::pack(9, 0), Message::pack(3, 1)];
        let retained = registry.handle(&messages);
        assert_eq!(retained, 2, "message type 9 has no owning pass");
        assert_eq!(pass.handled.load(AtomicOrdering::Relaxed), 2);
    }

    #[test]
    fn late_registration_after_lock_is_rejected() {
        let registry = DiagnosticRegistry::new();
        registry.lock();
        let pass = Arc::new(CountingPass {
            feature: FeatureMask::SHADER_EXPORT,
            types: vec![1],
            handled: AtomicU32::new(0),
        });
        assert_eq!(
            registry.register(FeatureMask::SHADER_EXPORT, pass),
            Err(RegistryError::LateRegistration)
        );
    }

    #[test]
    fn uid_allocation_exhausts_cleanly() {
        let registry = DiagnosticRegistry::new();
        assert_eq!(registry.allocate_message_uids(10).unwrap(), 0);
        assert_eq!(registry.allocate_message_uids(5).unwrap(), 10);
        assert_eq!(
            registry.allocate_message_uids(u32::from(u16::MAX)),
            Err(RegistryError::UidSpaceExhausted)
        );
    }
}
