//! Scalar-Vector-Or-Struct (SVOX) emulation: the adapter between DXIL's scalarized
//! values and the backend IL's vector-aware values.
//!
//! Every multi-lane DXIL value (a `float4` buffer load, a `GetDimensions` struct return,
//! a packed `ThreadId`) arrives in the parser as one or more scalar LLVM values. The
//! rewriter tags the resulting IL id with how those lanes are actually represented, and
//! every later consumer (the compiler, resource-token lowering, the optimizer handles
//! this crate materializes) goes through [`SvoxTable`] rather than re-deriving the shape.

use crate::error::CompileError;
use crate::ids::ValueId;
use crate::il::{ChainIndex, Instruction, Type};
use std::collections::HashMap;

/// How an SVOX value's lanes are physically represented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SvoxTag {
    /// A single scalar; `extract_svox_element` returns the value itself at index 0.
    Singular,
    /// A genuine IL vector/struct value; lane `i` is `ExtractValue(id, i)`.
    VectorOnStruct,
    /// `n` lanes are separate IL ids allocated contiguously starting at `first`; the
    /// SVOX id itself is a vector-typed aggregate of them.
    VectorOnSequential { first: ValueId, count: u32 },
    /// Same contiguous-allocation shape as `VectorOnSequential`, but the aggregate type
    /// is a struct (used for `GetDimensions`/resource-token metadata packing) rather
    /// than a vector.
    StructOnSequential { first: ValueId, count: u32 },
}

impl SvoxTag {
    pub fn count(self) -> u32 {
        match self {
            SvoxTag::Singular => 1,
            SvoxTag::VectorOnStruct => 0, // resolved via the table's recorded width
            SvoxTag::VectorOnSequential { count, .. } => count,
            SvoxTag::StructOnSequential { count, .. } => count,
        }
    }
}

/// Per-id record of an SVOX value's tag, lane width and element type.
#[derive(Clone, Copy, Debug)]
struct SvoxEntry {
    tag: SvoxTag,
    width: u32,
    element_ty: ElementTypeSlot,
}

/// Stored separately from [`SvoxEntry`] because `Type` is not `Copy`.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ElementTypeSlot(Type);

/// Per-function table of SVOX tags. One-shot assignment: a tag, once recorded for an
/// id, is never overwritten -- this is a validated invariant, not just a convention.
#[derive(Clone, Debug, Default)]
pub struct SvoxTable {
    entries: HashMap<ValueId, (SvoxTag, u32, Type)>,
}

impl SvoxTable {
    pub fn new() -> Self {
        SvoxTable::default()
    }

    /// Records `id` as a plain scalar. Most IL ids take this path implicitly; passes
    /// that only care about multi-lane values may skip calling this for scalars.
    pub fn mark_singular(&mut self, id: ValueId, element_ty: Type) {
        self.insert_once(id, SvoxTag::Singular, 1, element_ty);
    }

    pub fn mark_vector_on_struct(&mut self, id: ValueId, width: u32, element_ty: Type) {
        self.insert_once(id, SvoxTag::VectorOnStruct, width, element_ty);
    }

    /// Allocates one IL id for the aggregate plus `n` scalar ids at a contiguous range,
    /// and tags the aggregate as `VectorOnSequential`. `x`/`y`/`z`/`w` name the per-lane
    /// source values this aggregate packs, for instructions that need to record them
    /// (e.g. `StoreBuffer` assembling 1-4 scalar channels).
    pub fn allocate_svo_sequential(
        &mut self,
        ids: &mut crate::ids::IdMap,
        n: u32,
        element_ty: Type,
        as_struct: bool,
    ) -> (ValueId, ValueId) {
        let aggregate = ids.define();
        let first = ids.define();
        for _ in 1..n {
            ids.define();
        }
        let tag = if as_struct {
            SvoxTag::StructOnSequential { first, count: n }
        } else {
            SvoxTag::VectorOnSequential { first, count: n }
        };
        self.insert_once(aggregate, tag, n, element_ty);
        (aggregate, first)
    }

    fn insert_once(&mut self, id: ValueId, tag: SvoxTag, width: u32, element_ty: Type) {
        debug_assert!(
            !self.entries.contains_key(&id),
            "SVOX tag for id {} assigned twice",
            id
        );
        self.entries.insert(id, (tag, width, element_ty));
    }

    pub fn is_svox(&self, id: ValueId) -> bool {
        self.entries
            .get(&id)
            .map(|(tag, _, _)| !matches!(tag, SvoxTag::Singular))
            .unwrap_or(false)
    }

    pub fn svox_count(&self, id: ValueId) -> u32 {
        self.entries.get(&id).map(|(_, w, _)| *w).unwrap_or(1)
    }

    fn element_type(&self, id: ValueId) -> Type {
        self.entries
            .get(&id)
            .map(|(_, _, ty)| ty.clone())
            .unwrap_or(Type::Unexposed)
    }

    /// Extracts lane `i` of an SVOX value, emitting whatever IL instruction the tag
    /// requires. Returns the value id of lane `i` plus, when a new `ExtractValue`
    /// instruction had to be emitted, that instruction for the caller to insert.
    pub fn extract_svox_element(
        &self,
        ids: &mut crate::ids::IdMap,
        id: ValueId,
        i: u32,
    ) -> Result<(ValueId, Option<(ValueId, Instruction)>), CompileError> {
        let (tag, width, ty) = self
            .entries
            .get(&id)
            .cloned()
            .unwrap_or((SvoxTag::Singular, 1, Type::Unexposed));
        if i >= width.max(1) {
            return Err(CompileError::SvoxWidthMismatch {
                id,
                expected: width,
                actual: i,
            });
        }
        match tag {
            SvoxTag::Singular => Ok((id, None)),
            SvoxTag::VectorOnStruct => {
                let extract_id = ids.define();
                let inst = Instruction::ExtractValue {
                    aggregate: id,
                    index: ChainIndex::Constant(i as i64),
                    ty,
                };
                Ok((extract_id, Some((extract_id, inst))))
            }
            SvoxTag::VectorOnSequential { first, .. } | SvoxTag::StructOnSequential { first, .. } => {
                Ok((first + i, None))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::IdMap;

    #[test]
    fn singular_extracts_itself() {
        let table = SvoxTable::new();
        let mut ids = IdMap::new();
        let (value, extra) = table.extract_svox_element(&mut ids, 3, 0).unwrap();
        assert_eq!(value, 3);
        assert!(extra.is_none());
    }

    #[test]
    fn sequential_extract_is_contiguous_and_preserves_width() {
        let mut table = SvoxTable::new();
        let mut ids = IdMap::new();
        let (aggregate, first) = table.allocate_svo_sequential(&mut ids, 4, Type::Float32, false);
        assert_eq!(table.svox_count(aggregate), 4);
        for lane in 0..4 {
            let (value, extra) = table.extract_svox_element(&mut ids, aggregate, lane).unwrap();
            assert_eq!(value, first + lane);
            assert!(extra.is_none());
        }
    }

    #[test]
    fn out_of_width_extract_errs() {
        let mut table = SvoxTable::new();
        let mut ids = IdMap::new();
        let (aggregate, _) = table.allocate_svo_sequential(&mut ids, 2, Type::Float32, false);
        assert!(table.extract_svox_element(&mut ids, aggregate, 2).is_err());
    }
}
