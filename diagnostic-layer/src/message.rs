//! Wire format for GPU-written diagnostic messages.

/// Shader Globally Unique ID attached to a source location, carried through messages.
pub type Sguid = u32;

/// Physical/Persistent Unique ID of a resource, packed into a resource token.
pub type Puid = u32;

/// `kPUIDInvalidOutOfBounds`: substituted for a resource token when the descriptor-heap
/// index computed for it falls outside the bound range.
pub const PUID_INVALID_OUT_OF_BOUNDS: Puid = 0xffff_fffe;
/// `kPUIDInvalidTableNotBound`: substituted when the owning descriptor table was never
/// bound at all.
pub const PUID_INVALID_TABLE_NOT_BOUND: Puid = 0xffff_ffff;

bitflags! {
    /// Bitset of instrumentation passes enabled for a report.
    pub struct FeatureMask: u32 {
        /// Out-of-bounds buffer/texture access detection.
        const SHADER_RESOURCE_BOUNDS = 1 << 0;
        /// Uninitialized-resource-read detection.
        const SHADER_RESOURCE_INITIALIZATION = 1 << 1;
        /// Concurrent resource data-race detection.
        const SHADER_RESOURCE_DATA_RACE = 1 << 2;
        /// Per-shader export-counter instrumentation (diagnostics about the
        /// instrumentation itself, e.g. dynamic instruction counts).
        const SHADER_EXPORT = 1 << 3;
    }
}

/// A packed 32-bit diagnostic record: a 6-bit type discriminant (at most 64 message
/// kinds) and a 26-bit body whose interpretation is owned by the pass that registered the
/// type. `size_of::<Message>() == 4` is load-bearing: the GPU and CPU must agree on the
/// record stride without any padding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct Message(u32);

const TYPE_BITS: u32 = 6;
const TYPE_MASK: u32 = (1 << TYPE_BITS) - 1;

impl Message {
    /// Packs a message type (must fit in 6 bits) and body (must fit in 26 bits).
    pub fn pack(message_type: u8, body: u32) -> Self {
        debug_assert!((message_type as u32) <= TYPE_MASK);
        debug_assert!(body <= (u32::MAX >> TYPE_BITS));
        Message(((message_type as u32) & TYPE_MASK) | (body << TYPE_BITS))
    }

    /// The 6-bit message-type discriminant, used by the registry to dispatch to a pass.
    pub fn message_type(self) -> u8 {
        (self.0 & TYPE_MASK) as u8
    }

    /// The 26-bit body, interpreted by the owning pass.
    pub fn body(self) -> u32 {
        self.0 >> TYPE_BITS
    }

    /// The raw packed representation, as written by the GPU.
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Reconstructs a `Message` from its raw packed representation.
    pub fn from_raw(raw: u32) -> Self {
        Message(raw)
    }
}

const _: () = assert!(std::mem::size_of::<Message>() == 4);

/// Mirrors the GPU-resident `DiagnosticData` layout: a small header followed by the
/// message records themselves. `message_count` is the GPU's own atomically-incremented
/// write cursor; `message_limit` is fixed at allocation time; `transferred_count` is
/// filled in only on the async-transfer path, where the transfer queue may copy fewer
/// bytes than were ultimately written if it raced the GPU's last increment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiagnosticDataHeader {
    /// Number of messages the GPU believes it wrote. May exceed `message_limit`
    /// (an "overshoot"); the CPU must clamp before indexing `messages`.
    pub message_count: u32,
    /// Capacity of the `messages` array this header fronts.
    pub message_limit: u32,
    /// Number of messages actually copied by the async-transfer path.
    /// `transferred_count <= min(message_count, message_limit)`.
    pub transferred_count: u32,
    /// Free-form debug word the GPU may use for sanity-checking the mirror layout.
    pub debug_word: u32,
}

impl DiagnosticDataHeader {
    /// `true` if the GPU wrote more messages than the buffer could hold.
    pub fn is_overshoot(&self) -> bool {
        self.message_count > self.message_limit
    }

    /// `true` if fewer messages were transferred than the (clamped) count the GPU wrote.
    pub fn is_undershoot(&self) -> bool {
        self.transferred_count < self.message_count.min(self.message_limit)
    }

    /// The number of messages safe to read out of the mirror buffer.
    pub fn readable_count(&self) -> u32 {
        self.message_count.min(self.message_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_roundtrips_type_and_body() {
        let m = Message::pack(5, 0x03ff_ffff);
        assert_eq!(m.message_type(), 5);
        assert_eq!(m.body(), 0x03ff_ffff);
    }

    #[test]
    fn header_overshoot_and_undershoot() {
        let h = DiagnosticDataHeader {
            message_count: 10,
            message_limit: 8,
            transferred_count: 8,
            debug_word: 0,
        };
        assert!(h.is_overshoot());
        assert!(!h.is_undershoot());
        assert_eq!(h.readable_count(), 8);
    }
}
