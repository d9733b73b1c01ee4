//! Descriptor-set, -layout, -pool and -update-template wrappers (§3, §4.7 "Descriptor
//! Set Handle").
//!
//! Descriptor writes are shadowed so the layer can introspect application state from
//! the CPU without a GPU round-trip: every `vkUpdateDescriptorSet`-style call is mirrored
//! into an ordered [`TrackedWrite`] sequence on the owning [`DescriptorSetEntry`].

use crate::arena::{Arena, Handle};
use smallvec::SmallVec;

/// The three descriptor-info shapes the host API discriminates by `DescriptorType`,
/// represented as a tagged variant per the design notes (replacing the source's
/// `STrackedWrite` / `SDiagnosticDescriptor` union).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DescriptorPayload<B: crate::Backend> {
    ImageInfo {
        sampler: Option<()>,
        image: Option<B::Image>,
        layout: u32,
    },
    BufferInfo {
        buffer: B::Buffer,
        offset: u64,
        range: u64,
    },
    TexelBufferView {
        buffer: B::Buffer,
    },
}

/// One tracked descriptor write: binding, array-element, type-discriminated payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackedWrite<B: crate::Backend> {
    pub binding: u32,
    pub array_element: u32,
    pub payload: DescriptorPayload<B>,
}

/// Public set-layout plus per-binding descriptor schema used to compute cross-compat
/// hashes and to drive shadow-write validation.
#[derive(Clone, Debug)]
pub struct BindingSchema {
    pub binding: u32,
    pub descriptor_type: u32,
    pub count: u32,
    /// Byte offset into the serialized descriptor blob used by update templates.
    pub blob_offset: u32,
    pub array_stride: u32,
}

/// Descriptor Set Layout Handle (§3): public set-layout + per-binding schema, top
/// binding/count, and a cross-compatibility hash.
///
/// The cross-compatibility hash of the synthetic diagnostic set is always `0`; every
/// other layout's hash is derived purely from its public shape (binding, type, count
/// tuples) so that two layouts with identical visible shape, but different internal
/// layer bookkeeping, are considered compatible.
pub struct DescriptorSetLayoutEntry {
    pub bindings: Vec<BindingSchema>,
    pub top_binding: u32,
    pub top_count: u32,
    pub cross_compat_hash: u64,
}

pub type DescriptorSetLayoutHandle = Handle<DescriptorSetLayoutEntry>;
pub type DescriptorSetLayoutArena = Arena<DescriptorSetLayoutEntry>;

/// The reserved synthetic diagnostic set always hashes to 0, so any two devices'
/// layer-injected sets are considered cross-compatible regardless of their private
/// shape.
pub const DIAGNOSTIC_SET_CROSS_COMPAT_HASH: u64 = 0;

/// Computes the cross-compatibility hash of a set layout from its public shape alone:
/// the `(binding, type, count)` tuples, in binding order. Two layouts with identical
/// visible bindings hash identically even if their serialized blob layout differs.
pub fn compute_cross_compat_hash(bindings: &[BindingSchema]) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for binding in bindings {
        binding.binding.hash(&mut hasher);
        binding.descriptor_type.hash(&mut hasher);
        binding.count.hash(&mut hasher);
    }
    hasher.finish()
}

impl DescriptorSetLayoutEntry {
    pub fn new(bindings: Vec<BindingSchema>) -> Self {
        let top_binding = bindings.iter().map(|b| b.binding).max().unwrap_or(0);
        let top_count = bindings
            .iter()
            .find(|b| b.binding == top_binding)
            .map(|b| b.count)
            .unwrap_or(0);
        let cross_compat_hash = compute_cross_compat_hash(&bindings);
        DescriptorSetLayoutEntry {
            bindings,
            top_binding,
            top_count,
            cross_compat_hash,
        }
    }
}

/// Descriptor Set Handle (§3): API set + layout + shadow writes.
///
/// Invariants: if `valid` is `false` the set must not be dispatched with; `commit_hash`
/// monotonically increases on every accepted update; `commit_index` is the compiler
/// commit this set was last validated against.
pub struct DescriptorSetEntry<B: crate::Backend> {
    pub native: B::DescriptorSet,
    pub layout: DescriptorSetLayoutHandle,
    pub writes: SmallVec<[TrackedWrite<B>; 8]>,
    pub valid: bool,
    pub commit_hash: u64,
    pub commit_index: u64,
}

pub type DescriptorSetHandle<B> = Handle<DescriptorSetEntry<B>>;
pub type DescriptorSetArena<B> = Arena<DescriptorSetEntry<B>>;

impl<B: crate::Backend> DescriptorSetEntry<B> {
    pub fn new(native: B::DescriptorSet, layout: DescriptorSetLayoutHandle) -> Self {
        DescriptorSetEntry {
            native,
            layout,
            writes: SmallVec::new(),
            valid: true,
            commit_hash: 0,
            commit_index: 0,
        }
    }

    /// Records one shadow write and advances `commit_hash`. `commit_hash` must
    /// monotonically increase on every *accepted* update so breadcrumb tracking
    /// (§4.7) can detect "did this set change since I last saw it" with a single
    /// integer comparison.
    pub fn record_write(&mut self, write: TrackedWrite<B>) {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.commit_hash.hash(&mut hasher);
        write.binding.hash(&mut hasher);
        write.array_element.hash(&mut hasher);
        self.commit_hash = hasher.finish();
        self.writes.push(write);
    }
}

/// Descriptor Pool Handle (§3): API pool + owned sets + an internal lock + a swap-index
/// used to snapshot pool membership for deferred destruction.
///
/// The swap-index doubles the membership list: `reset`/`free_descriptor_sets` publish
/// into the inactive slot and flip `active`, so a concurrent reader iterating the pool's
/// membership for deferred release never observes a half-mutated list.
pub struct DescriptorPoolEntry<B: crate::Backend> {
    pub native: B::DescriptorPool,
    members: [Vec<DescriptorSetHandle<B>>; 2],
    active: usize,
}

pub type DescriptorPoolHandle<B> = Handle<DescriptorPoolEntry<B>>;
pub type DescriptorPoolArena<B> = Arena<DescriptorPoolEntry<B>>;

impl<B: crate::Backend> DescriptorPoolEntry<B> {
    pub fn new(native: B::DescriptorPool) -> Self {
        DescriptorPoolEntry {
            native,
            members: [Vec::new(), Vec::new()],
            active: 0,
        }
    }

    pub fn members(&self) -> &[DescriptorSetHandle<B>] {
        &self.members[self.active]
    }

    pub fn track(&mut self, set: DescriptorSetHandle<B>) {
        self.members[self.active].push(set);
    }

    /// Snapshots the current membership into the inactive slot, clears it, and flips
    /// the active index. Returns the sets that were members just before the swap, for
    /// the caller to release.
    pub fn swap_and_take(&mut self) -> Vec<DescriptorSetHandle<B>> {
        let previous = self.active;
        self.active = 1 - self.active;
        self.members[self.active].clear();
        std::mem::take(&mut self.members[previous])
    }
}

/// One entry in a descriptor update template's precomputed schedule: a byte offset into
/// the caller-supplied data blob, mapped to the descriptor write it produces.
#[derive(Clone, Copy, Debug)]
pub struct TemplateEntry {
    pub blob_offset: u32,
    pub binding: u32,
    pub array_element: u32,
    pub descriptor_type: u32,
}

/// Descriptor Update Template Handle (§3): precomputed top-level descriptor schedule and
/// the blob byte-size it requires.
///
/// Per design notes' open question, the source's `m_TopBlobSize` (top-level) vs
/// `m_BlobSize` (flattened) distinction is undocumented; both are computed from the
/// entry list here and [`DescriptorUpdateTemplateEntry::validate`] checks they agree,
/// rather than trusting a caller-supplied pair.
pub struct DescriptorUpdateTemplateEntry {
    pub entries: Vec<TemplateEntry>,
    pub top_blob_size: u32,
    pub blob_size: u32,
}

pub type DescriptorUpdateTemplateHandle = Handle<DescriptorUpdateTemplateEntry>;
pub type DescriptorUpdateTemplateArena = Arena<DescriptorUpdateTemplateEntry>;

impl DescriptorUpdateTemplateEntry {
    /// Computes both sizes from `entries`. `top_blob_size` counts distinct top-level
    /// bindings the template writes; `blob_size` is the flattened per-entry byte extent.
    /// For a well-formed template -- one blob slot per binding, no duplicate or
    /// out-of-order `blob_offset`s -- the two agree; [`validate`](Self::validate) is the
    /// caller-facing check that catches the malformed case where they don't.
    pub fn new(entries: Vec<TemplateEntry>) -> Self {
        let top_blob_size = entries
            .iter()
            .map(|e| e.binding)
            .collect::<std::collections::HashSet<_>>()
            .len() as u32;
        let blob_size = entries.iter().map(|e| e.blob_offset + 1).max().unwrap_or(0);
        DescriptorUpdateTemplateEntry {
            entries,
            top_blob_size,
            blob_size,
        }
    }

    /// True if the top-level binding count and the flattened blob extent agree -- the
    /// shape every entry list built from a real descriptor set layout has. A mismatch
    /// means some binding's `blob_offset`s are duplicated or leave a gap.
    pub fn validate(&self) -> bool {
        self.top_blob_size == self.blob_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_set_hash_is_zero_by_convention() {
        assert_eq!(DIAGNOSTIC_SET_CROSS_COMPAT_HASH, 0);
    }

    #[test]
    fn identical_shape_hashes_identically() {
        let a = vec![BindingSchema {
            binding: 0,
            descriptor_type: 1,
            count: 1,
            blob_offset: 0,
            array_stride: 4,
        }];
        let b = vec![BindingSchema {
            binding: 0,
            descriptor_type: 1,
            count: 1,
            blob_offset: 99, // differs, but not part of the public shape
            array_stride: 8,
        }];
        assert_eq!(compute_cross_compat_hash(&a), compute_cross_compat_hash(&b));
    }

    #[test]
    fn different_shape_hashes_differently() {
        let a = vec![BindingSchema {
            binding: 0,
            descriptor_type: 1,
            count: 1,
            blob_offset: 0,
            array_stride: 4,
        }];
        let b = vec![BindingSchema {
            binding: 0,
            descriptor_type: 1,
            count: 2,
            blob_offset: 0,
            array_stride: 4,
        }];
        assert_ne!(compute_cross_compat_hash(&a), compute_cross_compat_hash(&b));
    }

    #[test]
    fn template_with_one_slot_per_binding_validates() {
        let entries = vec![
            TemplateEntry {
                blob_offset: 0,
                binding: 0,
                array_element: 0,
                descriptor_type: 1,
            },
            TemplateEntry {
                blob_offset: 1,
                binding: 1,
                array_element: 0,
                descriptor_type: 1,
            },
        ];
        let template = DescriptorUpdateTemplateEntry::new(entries);
        assert_eq!(template.top_blob_size, 2);
        assert_eq!(template.blob_size, 2);
        assert!(template.validate());
    }

    #[test]
    fn template_with_duplicated_binding_fails_validation() {
        // Two entries writing the same binding at different blob offsets: one distinct
        // binding, but a flattened extent of 2. The flattened and top-level views
        // disagree, which is exactly the malformed shape `validate` exists to catch.
        let entries = vec![
            TemplateEntry {
                blob_offset: 0,
                binding: 0,
                array_element: 0,
                descriptor_type: 1,
            },
            TemplateEntry {
                blob_offset: 1,
                binding: 0,
                array_element: 1,
                descriptor_type: 1,
            },
        ];
        let template = DescriptorUpdateTemplateEntry::new(entries);
        assert_eq!(template.top_blob_size, 1);
        assert_eq!(template.blob_size, 2);
        assert!(!template.validate());
    }
}
