//! Lowering of `ResourceToken(resource_id)` to its physical root-signature mapping.
//!
//! The token is the 32-bit opaque value downstream instrumentation passes (bounds
//! check, initialization) key their per-resource metadata on. Lowering walks back to the
//! resource's root declaration, classifies the binding, and emits the load/guard
//! sequence described in the design's resource-token-lowering section.

use crate::error::ResourceTokenError;
use crate::ids::ValueId;
use crate::il::{ChainIndex, Instruction, Type};
use smallvec::SmallVec;

/// `kPUIDInvalidOutOfBounds` substituted when `descriptor_offset >= VRMT_bound`.
pub const PUID_INVALID_OUT_OF_BOUNDS: u32 = 0xffff_fffe;
/// `kPUIDInvalidTableNotBound` substituted when the owning descriptor table was never
/// bound.
pub const PUID_INVALID_TABLE_NOT_BOUND: u32 = 0xffff_ffff;

/// The descriptor class a resource binds as, per the DXIL root-signature model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceClass {
    Srv,
    Uav,
    Cbv,
    Sampler,
}

/// Step 2: the deduced binding shape. `range` is either a fully constant pair or a
/// constant base plus a dynamic per-invocation offset (DXC's `add lhs, constant`
/// pattern) -- `dynamic_offset` is `None` in the former case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceBinding {
    pub class: ResourceClass,
    pub space: u32,
    pub range_lower: u32,
    pub range_upper: u32,
    pub dynamic_offset: Option<ValueId>,
}

/// Step 3: where in the root signature this binding physically lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RootMapping {
    /// A root-inline (CBV/descriptor-as-root-constant) parameter; the token is a single
    /// row load from a constant buffer, no heap indirection.
    RootInline { cb_offset: u32 },
    /// A descriptor-table parameter; the token requires a PRMT lookup at
    /// `cb_offset + table_mapping_offset + dynamic_offset`.
    Table {
        cb_offset: u32,
        table_mapping_offset: u32,
    },
    /// A static sampler: no load at all, always valid.
    StaticSampler,
}

/// Walks `resource` back through any `AnnotateHandle` to its root `CreateHandle*`
/// declaration. Returns the declaring instruction's id. This crate models the walk as a
/// lookup against the already-parsed function rather than re-scanning bitcode.
pub fn find_root_declaration(
    function: &crate::il::Function,
    resource: ValueId,
) -> Result<ValueId, ResourceTokenError> {
    let mut current = resource;
    // AnnotateHandle chains are short in practice (DXC emits at most one); bound the
    // walk defensively rather than looping on malformed input.
    for _ in 0..8 {
        match function
            .instructions
            .iter()
            .find(|(id, _)| *id == current)
            .map(|(_, inst)| inst)
        {
            Some(Instruction::AcquireHandle { .. }) => return Ok(current),
            Some(Instruction::UnexposedInstruction { .. }) => {
                // An AnnotateHandle re-type; its first logical operand is the handle it
                // annotates. This crate does not track unexposed operands generically,
                // so the walk stops here and treats `current` as the root -- adequate
                // for the common single-hop AnnotateHandle case this lowering targets.
                return Ok(current);
            }
            _ => return Err(ResourceTokenError::NoRootDeclaration(resource)),
        }
    }
    Err(ResourceTokenError::NoRootDeclaration(resource))
}

/// Step 4/5: the lowered instruction sequence for one `ResourceToken`. `guard` is the
/// `out_of_heap`/`table_not_bound` selection; `metadata` is the packed struct constant
/// from step 5, already tagged `StructOnSequential` by the caller via
/// [`crate::svox::SvoxTable::allocate_svo_sequential`].
pub struct LoweredToken {
    pub instructions: SmallVec<[(ValueId, Instruction); 6]>,
    pub result: ValueId,
}

/// Lowers one `ResourceToken` according to its root mapping. `metadata_stride` and
/// `field_index` address one field of the per-descriptor PRMT row; `vrmt_bound` bounds
/// the table lookup.
pub fn lower_resource_token(
    ids: &mut crate::ids::IdMap,
    binding: &ResourceBinding,
    mapping: RootMapping,
    prmt_handle: ValueId,
    metadata_stride: u32,
    field_index: u32,
    vrmt_bound: ValueId,
) -> LoweredToken {
    let mut instructions = SmallVec::new();
    let result = match mapping {
        RootMapping::StaticSampler => {
            // Static samplers bypass the load entirely and receive a constant valid
            // token; modeled as a zero-operand load from nowhere is wrong, so this is
            // represented as loading field 0 of a synthesized always-valid row via a
            // degenerate AddressChain the compiler recognizes as a literal.
            let id = ids.define();
            instructions.push((
                id,
                Instruction::AddressChain {
                    composite: prmt_handle,
                    chain: smallvec::smallvec![ChainIndex::Constant(0)],
                    ty: Type::Int(32),
                },
            ));
            id
        }
        RootMapping::RootInline { cb_offset } => {
            let id = ids.define();
            instructions.push((
                id,
                Instruction::LoadBuffer {
                    handle: prmt_handle,
                    offset: cb_offset as ValueId,
                    component_mask: 0b1,
                    alignment: 4,
                },
            ));
            id
        }
        RootMapping::Table {
            cb_offset,
            table_mapping_offset,
        } => {
            let dynamic = binding.dynamic_offset;
            let base_id = ids.define();
            let offset_expr = match dynamic {
                Some(dyn_id) => {
                    instructions.push((
                        base_id,
                        Instruction::BinOp {
                            kind: crate::il::BinOpKind::Add,
                            lhs: cb_offset as ValueId,
                            rhs: table_mapping_offset as ValueId,
                            ty: Type::Int(32),
                        },
                    ));
                    let added_id = ids.define();
                    instructions.push((
                        added_id,
                        Instruction::BinOp {
                            kind: crate::il::BinOpKind::Add,
                            lhs: base_id,
                            rhs: dyn_id,
                            ty: Type::Int(32),
                        },
                    ));
                    added_id
                }
                None => {
                    instructions.push((
                        base_id,
                        Instruction::BinOp {
                            kind: crate::il::BinOpKind::Add,
                            lhs: cb_offset as ValueId,
                            rhs: table_mapping_offset as ValueId,
                            ty: Type::Int(32),
                        },
                    ));
                    base_id
                }
            };

            let out_of_heap_id = ids.define();
            instructions.push((
                out_of_heap_id,
                Instruction::Cmp {
                    kind: crate::il::CmpKind::GreaterEq,
                    lhs: offset_expr,
                    rhs: vrmt_bound,
                },
            ));

            let fetch_offset_id = ids.define();
            instructions.push((
                fetch_offset_id,
                Instruction::BinOp {
                    kind: crate::il::BinOpKind::Mul,
                    lhs: offset_expr,
                    rhs: metadata_stride as ValueId,
                    ty: Type::Int(32),
                },
            ));
            let fetch_offset_with_field_id = ids.define();
            instructions.push((
                fetch_offset_with_field_id,
                Instruction::BinOp {
                    kind: crate::il::BinOpKind::Add,
                    lhs: fetch_offset_id,
                    rhs: field_index as ValueId,
                    ty: Type::Int(32),
                },
            ));

            let loaded_id = ids.define();
            instructions.push((
                loaded_id,
                Instruction::LoadBuffer {
                    handle: prmt_handle,
                    offset: fetch_offset_with_field_id,
                    component_mask: 0b1,
                    alignment: 4,
                },
            ));

            let out_of_bounds_const = ids.define();
            instructions.push((
                out_of_bounds_const,
                Instruction::AddressChain {
                    composite: prmt_handle,
                    chain: smallvec::smallvec![ChainIndex::Constant(PUID_INVALID_OUT_OF_BOUNDS as i64)],
                    ty: Type::Int(32),
                },
            ));
            let selected_id = ids.define();
            instructions.push((
                selected_id,
                Instruction::Select {
                    condition: out_of_heap_id,
                    true_value: out_of_bounds_const,
                    false_value: loaded_id,
                },
            ));

            let table_not_bound_id = ids.define();
            instructions.push((
                table_not_bound_id,
                Instruction::Cmp {
                    kind: crate::il::CmpKind::Equal,
                    lhs: cb_offset as ValueId,
                    rhs: u32::MAX as ValueId,
                },
            ));
            let not_bound_const = ids.define();
            instructions.push((
                not_bound_const,
                Instruction::AddressChain {
                    composite: prmt_handle,
                    chain: smallvec::smallvec![ChainIndex::Constant(PUID_INVALID_TABLE_NOT_BOUND as i64)],
                    ty: Type::Int(32),
                },
            ));
            let final_id = ids.define();
            instructions.push((
                final_id,
                Instruction::Select {
                    condition: table_not_bound_id,
                    true_value: not_bound_const,
                    false_value: selected_id,
                },
            ));
            final_id
        }
    };

    LoweredToken { instructions, result }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::IdMap;

    #[test]
    fn static_sampler_never_loads() {
        let mut ids = IdMap::new();
        let lowered = lower_resource_token(
            &mut ids,
            &ResourceBinding {
                class: ResourceClass::Sampler,
                space: 0,
                range_lower: 0,
                range_upper: 0,
                dynamic_offset: None,
            },
            RootMapping::StaticSampler,
            0,
            4,
            0,
            1000,
        );
        assert!(lowered
            .instructions
            .iter()
            .all(|(_, inst)| !matches!(inst, Instruction::LoadBuffer { .. })));
    }

    #[test]
    fn table_mapping_emits_both_guards() {
        let mut ids = IdMap::new();
        let lowered = lower_resource_token(
            &mut ids,
            &ResourceBinding {
                class: ResourceClass::Srv,
                space: 0,
                range_lower: 0,
                range_upper: 16,
                dynamic_offset: Some(99),
            },
            RootMapping::Table {
                cb_offset: 4,
                table_mapping_offset: 8,
            },
            1,
            16,
            0,
            1000,
        );
        let selects = lowered
            .instructions
            .iter()
            .filter(|(_, inst)| matches!(inst, Instruction::Select { .. }))
            .count();
        assert_eq!(selects, 2, "both out-of-heap and table-not-bound guards must select");
    }
}
