//! Stable IL identifiers and the relative-ID arithmetic LLVM bitcode encodes operands
//! with.
//!
//! Per the design notes: "relative-ID bitcode encoding" is encapsulated in two small
//! value types, [`RelativeRef`] and [`ForwardRef`], whose constructors and accessors
//! enforce the sign/bias rules at compile time instead of leaving `anchor - relative`
//! arithmetic scattered across the parser and the stitcher.

use crate::error::ParseError;
use std::collections::HashMap;

/// A stable identifier assigned to an LLVM value (and, after translation, to the IL
/// instruction it lowers to) in definition order.
pub type ValueId = u32;

/// An LLVM operand encoded relative to the anchor of the record that references it:
/// `absolute = anchor - relative`. Used for backward references (the common case, since
/// most operands refer to already-defined values).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RelativeRef(u32);

impl RelativeRef {
    /// Encodes an already-resolved absolute id relative to `anchor`. Panics if `absolute
    /// > anchor`, since that would require a forward reference instead.
    pub fn encode(anchor: ValueId, absolute: ValueId) -> Self {
        assert!(
            absolute <= anchor,
            "backward reference must not exceed its anchor ({} > {})",
            absolute,
            anchor
        );
        RelativeRef(anchor - absolute)
    }

    /// Resolves back to an absolute id given the anchor in effect at decode time.
    pub fn resolve(self, anchor: ValueId) -> Result<ValueId, ParseError> {
        anchor
            .checked_sub(self.0)
            .ok_or(ParseError::RelativeRefUnderflow(self))
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// A reference to a value whose definition has not yet been visited: phi incoming
/// values, branch targets, and self-recursive calls.
///
/// Unlike [`RelativeRef`], a forward reference's *absolute* id is already known at
/// decode time: LLVM assigns value ids strictly in record order, so "the value defined
/// `magnitude` records after this anchor" is a precise prediction, not a placeholder.
/// No id is reserved here -- [`IdMap::define`] will hand out that exact id in due
/// course; this type only names the predicted id so [`IdMap::track_forward_use`] and
/// [`IdMap::resolve_forward_ref`] have something stable to key on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ForwardRef(ValueId);

impl ForwardRef {
    /// Predicts the absolute id of a value defined `magnitude` records after `anchor`.
    pub fn predict(anchor: ValueId, magnitude: ValueId) -> Self {
        ForwardRef(anchor + magnitude)
    }

    pub fn target_id(self) -> ValueId {
        self.0
    }

    /// Inverse of [`predict`](Self::predict): names a forward reference to an already-known
    /// target id, for the write pass re-encoding a value it parsed as forward (a loop-carried
    /// phi, a self-recursive call) back into bitcode. Panics if `target` does not actually lie
    /// past `anchor`, since that is a backward reference instead.
    pub fn encode(anchor: ValueId, target: ValueId) -> Self {
        assert!(
            target > anchor,
            "forward reference must exceed its anchor ({} <= {})",
            target,
            anchor
        );
        ForwardRef(target)
    }

    /// The "records past anchor" magnitude [`predict`](Self::predict) would have been given
    /// to reconstruct this reference.
    pub fn magnitude(self, anchor: ValueId) -> ValueId {
        self.0 - anchor
    }
}

/// Assigns stable IL identifiers to LLVM values in definition order, with patchable
/// forward references.
///
/// Multi-function modules need per-function id spaces that never collide, so the map
/// supports a snapshot/branch/revert protocol: [`create_snapshot`](Self::create_snapshot)
/// captures the current head, [`branch`](Self::branch) opens a scratch copy seeded from
/// that snapshot for one function's parse, and [`revert`](Self::revert) discards it (the
/// merged result is read back out of the branch before reverting, it is not folded back
/// into the parent automatically).
#[derive(Clone, Debug, Default)]
pub struct IdMap {
    head: ValueId,
    forward_refs: HashMap<ValueId, Vec<PendingUse>>,
}

/// One outstanding use of a forward reference, recorded so it can be rewritten once the
/// real definition is known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingUse {
    pub user: ValueId,
    pub operand_index: u32,
}

impl IdMap {
    pub fn new() -> Self {
        IdMap::default()
    }

    /// The next id that would be assigned; equivalently, the count of ids assigned so
    /// far.
    pub fn head(&self) -> ValueId {
        self.head
    }

    /// Assigns a fresh id to a newly-defined value, advancing the head.
    pub fn define(&mut self) -> ValueId {
        let id = self.head;
        self.head += 1;
        id
    }

    /// Records that `user`'s operand at `operand_index` still points at the value
    /// `forward_ref` predicts. Does not reserve an id -- the predicted id will be
    /// handed out by an ordinary [`define`](Self::define) call when the parser reaches
    /// that value's actual defining record.
    pub fn track_forward_use(&mut self, forward_ref: ForwardRef, user: ValueId, operand_index: u32) {
        self.forward_refs
            .entry(forward_ref.target_id())
            .or_default()
            .push(PendingUse { user, operand_index });
    }

    /// Called once `defined_id` (just returned by [`define`](Self::define)) turns out to
    /// be the target some earlier forward reference predicted. Returns every outstanding
    /// use that must now be rewritten to point at `defined_id`.
    pub fn resolve_forward_ref(&mut self, defined_id: ValueId) -> Vec<PendingUse> {
        self.forward_refs.remove(&defined_id).unwrap_or_default()
    }

    /// True once every forward reference tracked in this map has been resolved. Checked
    /// at the end of a function parse; an outstanding entry means some phi/branch/call
    /// never saw its definition, which is malformed bitcode.
    pub fn all_resolved(&self) -> bool {
        self.forward_refs.is_empty()
    }

    /// How many forward-reference ids still have outstanding uses. Used to report
    /// `ParseError::UnpatchedForwardRefs` at the end of a function parse.
    pub fn outstanding_forward_refs(&self) -> usize {
        self.forward_refs.len()
    }

    /// Snapshots the current head so a child function parse can branch from it without
    /// aliasing ids already assigned to prior functions in the module.
    pub fn create_snapshot(&self) -> IdMapSnapshot {
        IdMapSnapshot { head: self.head }
    }

    /// Opens a scratch `IdMap` seeded from `snapshot`, for one function's isolated id
    /// space.
    pub fn branch(snapshot: IdMapSnapshot) -> IdMap {
        IdMap {
            head: snapshot.head,
            forward_refs: HashMap::new(),
        }
    }

    /// Discards a branched id map once its function has been fully parsed and stitched.
    /// The parent map's head is advanced to the branch's final head so subsequent
    /// functions never reuse ids.
    pub fn revert(&mut self, branch: IdMap) {
        self.head = self.head.max(branch.head);
    }
}

/// Opaque checkpoint produced by [`IdMap::create_snapshot`].
#[derive(Clone, Copy, Debug)]
pub struct IdMapSnapshot {
    head: ValueId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_ref_round_trips() {
        let anchor = 40;
        let absolute = 17;
        let rel = RelativeRef::encode(anchor, absolute);
        assert_eq!(rel.resolve(anchor).unwrap(), absolute);
    }

    #[test]
    fn relative_ref_underflow_is_reported() {
        let rel = RelativeRef::encode(40, 40);
        assert!(matches!(
            rel.resolve(10),
            Err(ParseError::RelativeRefUnderflow(_))
        ));
    }

    #[test]
    fn forward_ref_tracks_and_resolves_uses() {
        let mut map = IdMap::new();
        let fref = ForwardRef::predict(map.head(), 2);
        map.track_forward_use(fref, 5, 0);
        map.track_forward_use(fref, 6, 1);
        assert!(!map.all_resolved());
        map.define();
        let defined = map.define();
        assert_eq!(defined, fref.target_id());
        let uses = map.resolve_forward_ref(defined);
        assert_eq!(uses.len(), 2);
        assert!(map.all_resolved());
    }

    #[test]
    fn forward_ref_encode_is_the_inverse_of_predict() {
        let anchor = 10;
        let predicted = ForwardRef::predict(anchor, 3);
        let encoded = ForwardRef::encode(anchor, predicted.target_id());
        assert_eq!(encoded.target_id(), predicted.target_id());
        assert_eq!(encoded.magnitude(anchor), 3);
    }

    #[test]
    #[should_panic(expected = "forward reference must exceed its anchor")]
    fn forward_ref_encode_rejects_backward_targets() {
        ForwardRef::encode(10, 10);
    }

    #[test]
    fn branch_does_not_alias_parent_ids() {
        let mut parent = IdMap::new();
        parent.define();
        parent.define();
        let snap = parent.create_snapshot();
        let mut child = IdMap::branch(snap);
        let first_child_id = child.define();
        assert_eq!(first_child_id, 2);
        parent.revert(child);
        assert_eq!(parent.head(), 3);
    }
}
