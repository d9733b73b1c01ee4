//! Lowers a [`Function`] back to LLVM bitcode records: the allocation pass followed by
//! the write pass.

use crate::bitcode::Record;
use crate::error::CompileError;
use crate::ids::ValueId;
use crate::il::{ChainIndex, Function, HandleKind, Instruction};
use crate::intrinsics::DxilOpcode;
use crate::ShadingModel;
use std::collections::{HashMap, HashSet};

/// Maps an IL [`ValueId`] to the bitcode result id it was allocated, built by the
/// allocation pass and consumed by the write pass.
#[derive(Clone, Debug, Default)]
pub struct Remapper {
    il_to_bitcode: HashMap<ValueId, ValueId>,
    next_bitcode_id: ValueId,
}

impl Remapper {
    pub fn reserve(&mut self, il_id: ValueId) {
        self.il_to_bitcode.insert(il_id, self.next_bitcode_id);
        self.next_bitcode_id += 1;
    }

    pub fn get(&self, il_id: ValueId) -> Result<ValueId, CompileError> {
        self.il_to_bitcode
            .get(&il_id)
            .copied()
            .ok_or(CompileError::UnallocatedValue(il_id))
    }
}

/// Pass 1: walk the IL function once, reserving one bitcode result id per instruction
/// that produces a value (every [`Instruction`] variant here does). Building this table
/// up front is what lets the write pass encode both backward *and* forward bitcode
/// references relative to each record's own anchor.
pub fn allocate(function: &Function) -> Remapper {
    let mut remapper = Remapper::default();
    for (il_id, _inst) in &function.instructions {
        remapper.reserve(*il_id);
    }
    remapper
}

/// Tracks which intrinsic declarations were actually emitted during the write pass, so
/// unused ones can be trimmed before stitching.
#[derive(Clone, Debug, Default)]
pub struct UsedDeclarations {
    used: HashSet<DxilOpcode>,
}

impl UsedDeclarations {
    pub fn mark(&mut self, opcode: DxilOpcode) {
        self.used.insert(opcode);
    }

    pub fn is_used(&self, opcode: DxilOpcode) -> bool {
        self.used.contains(&opcode)
    }
}

/// Pass 2: walk the function again, emitting one LLVM record per instruction. Operands
/// are remapped through `remapper`; the record's own anchor is the id_map head the
/// parser will see when it re-visits this record, i.e. the record's own bitcode id
/// (ids are defined strictly in record order, so that head equals this record's id).
pub fn write(
    function: &Function,
    remapper: &Remapper,
    shading_model: ShadingModel,
) -> Result<(Vec<Record>, UsedDeclarations), CompileError> {
    let mut records = Vec::with_capacity(function.instructions.len());
    let mut used = UsedDeclarations::default();

    for (il_id, inst) in &function.instructions {
        let anchor = remapper.get(*il_id)?;
        let record = write_instruction(inst, remapper, anchor, shading_model, &mut used)?;
        records.push(record);
    }

    Ok((records, used))
}

fn encode_backward(anchor: ValueId, target: ValueId) -> u64 {
    debug_assert!(target <= anchor, "encode_backward called on a forward target");
    ((anchor - target) as u64) << 1
}

/// Mirrors [`crate::ids::ForwardRef`]'s decode-side magnitude, for a loop-carried phi
/// operand or a self-recursive call whose target bitcode id lies past its own anchor.
fn encode_forward(anchor: ValueId, target: ValueId) -> u64 {
    let magnitude = crate::ids::ForwardRef::encode(anchor, target).magnitude(anchor);
    ((magnitude as u64) << 1) | 1
}

fn write_instruction(
    inst: &Instruction,
    remapper: &Remapper,
    anchor: ValueId,
    shading_model: ShadingModel,
    used: &mut UsedDeclarations,
) -> Result<Record, CompileError> {
    let enc = |id: ValueId, remapper: &Remapper, anchor: ValueId| -> Result<u64, CompileError> {
        let target = remapper.get(id)?;
        Ok(if target <= anchor {
            encode_backward(anchor, target)
        } else {
            encode_forward(anchor, target)
        })
    };

    Ok(match inst {
        Instruction::BinOp { kind, lhs, rhs, .. } => Record::new(
            2,
            vec![enc(*lhs, remapper, anchor)?, enc(*rhs, remapper, anchor)?, *kind as u64],
        ),
        Instruction::Cmp { kind, lhs, rhs } => Record::new(
            28,
            vec![enc(*lhs, remapper, anchor)?, enc(*rhs, remapper, anchor)?, *kind as u64],
        ),
        Instruction::Cast { kind, value, .. } => {
            Record::new(3, vec![enc(*value, remapper, anchor)?, *kind as u64])
        }
        Instruction::AddressChain { composite, chain, .. } => {
            let mut operands = vec![enc(*composite, remapper, anchor)?];
            operands.extend(chain.iter().map(|c| match c {
                ChainIndex::Constant(v) => *v as u64,
                ChainIndex::Dynamic(id) => *id as u64,
            }));
            Record::new(4, operands)
        }
        Instruction::Phi { incoming, .. } => {
            let mut operands = Vec::with_capacity(incoming.len() * 2);
            for entry in incoming {
                operands.push(enc(entry.value, remapper, anchor)?);
                operands.push(entry.predecessor_block as u64);
            }
            Record::new(16, operands)
        }
        Instruction::Branch { target } => Record::new(11, vec![*target as u64]),
        Instruction::BranchConditional {
            condition,
            true_target,
            false_target,
        } => Record::new(
            11,
            vec![*true_target as u64, *false_target as u64, enc(*condition, remapper, anchor)?],
        ),
        Instruction::Switch { value, default, cases } => {
            let mut operands = vec![enc(*value, remapper, anchor)?, *default as u64];
            for (v, target) in cases {
                operands.push(*v as u64);
                operands.push(*target as u64);
            }
            Record::new(12, operands)
        }
        Instruction::Return { value } => match value {
            Some(v) => Record::new(10, vec![enc(*v, remapper, anchor)?]),
            None => Record::new(10, vec![]),
        },
        Instruction::Load { address, .. } => Record::new(20, vec![enc(*address, remapper, anchor)?]),
        Instruction::Store { address, value } => {
            Record::new(44, vec![enc(*address, remapper, anchor)?, enc(*value, remapper, anchor)?])
        }
        Instruction::Alloca { .. } => Record::new(19, vec![]),
        Instruction::ExtractValue { aggregate, index, .. } => Record::new(
            26,
            vec![
                enc(*aggregate, remapper, anchor)?,
                match index {
                    ChainIndex::Constant(v) => *v as u64,
                    ChainIndex::Dynamic(id) => *id as u64,
                },
            ],
        ),
        Instruction::InsertValue { aggregate, value, index } => Record::new(
            27,
            vec![
                enc(*aggregate, remapper, anchor)?,
                enc(*value, remapper, anchor)?,
                match index {
                    ChainIndex::Constant(v) => *v as u64,
                    ChainIndex::Dynamic(id) => *id as u64,
                },
            ],
        ),
        Instruction::Select {
            condition,
            true_value,
            false_value,
        } => Record::new(
            29,
            vec![
                enc(*true_value, remapper, anchor)?,
                enc(*false_value, remapper, anchor)?,
                enc(*condition, remapper, anchor)?,
            ],
        ),
        Instruction::LoadBuffer { handle, offset, .. } => {
            used.mark(DxilOpcode::BufferLoad);
            Record::new(34, vec![68, enc(*handle, remapper, anchor)?, enc(*offset, remapper, anchor)?])
        }
        Instruction::StoreBuffer { handle, offset, value, .. } => {
            used.mark(DxilOpcode::BufferStore);
            Record::new(
                34,
                vec![
                    69,
                    enc(*handle, remapper, anchor)?,
                    enc(*offset, remapper, anchor)?,
                    enc(*value, remapper, anchor)?,
                ],
            )
        }
        Instruction::LoadTexture { handle, coords, offset } => {
            used.mark(DxilOpcode::TextureLoad);
            let mut operands = vec![66, enc(*handle, remapper, anchor)?, enc(*coords, remapper, anchor)?];
            if let Some(off) = offset {
                operands.push(enc(*off, remapper, anchor)?);
            }
            Record::new(34, operands)
        }
        Instruction::StoreTexture { handle, coords, texel } => {
            used.mark(DxilOpcode::TextureStore);
            Record::new(
                34,
                vec![
                    67,
                    enc(*handle, remapper, anchor)?,
                    enc(*coords, remapper, anchor)?,
                    enc(*texel, remapper, anchor)?,
                ],
            )
        }
        Instruction::SampleTexture {
            handle,
            sampler,
            coords,
            mode,
        } => {
            used.mark(sample_opcode(*mode));
            Record::new(
                34,
                vec![
                    sample_opcode_constant(*mode),
                    enc(*handle, remapper, anchor)?,
                    enc(*sampler, remapper, anchor)?,
                    enc(*coords, remapper, anchor)?,
                ],
            )
        }
        Instruction::Atomic {
            kind,
            handle,
            address,
            operands: ops,
            ..
        } => {
            let opcode = if matches!(kind, crate::il::AtomicOpKind::CompareExchange) {
                DxilOpcode::AtomicCompareExchange
            } else {
                DxilOpcode::AtomicBinOp
            };
            used.mark(opcode);
            let mut operands = vec![
                if opcode == DxilOpcode::AtomicCompareExchange { 79 } else { 78 },
                enc(*handle, remapper, anchor)?,
                enc(*address, remapper, anchor)?,
            ];
            for op in ops {
                operands.push(enc(*op, remapper, anchor)?);
            }
            Record::new(34, operands)
        }
        Instruction::IsNaN { value } => {
            used.mark(DxilOpcode::IsNaN);
            Record::new(34, vec![8, enc(*value, remapper, anchor)?])
        }
        Instruction::IsInf { value } => {
            used.mark(DxilOpcode::IsInf);
            Record::new(34, vec![9, enc(*value, remapper, anchor)?])
        }
        Instruction::Wave { operands: ops, .. } => {
            let mut operands = vec![118];
            for op in ops {
                operands.push(enc(*op, remapper, anchor)?);
            }
            Record::new(34, operands)
        }
        Instruction::ResourceSize { handle } => {
            used.mark(DxilOpcode::GetDimensions);
            Record::new(34, vec![72, enc(*handle, remapper, anchor)?])
        }
        Instruction::KernelValue { .. } => {
            used.mark(DxilOpcode::ThreadId);
            Record::new(34, vec![93])
        }
        Instruction::ResourceToken { resource } => {
            Record::new(200, vec![enc(*resource, remapper, anchor)?])
        }
        Instruction::AcquireHandle { kind } => {
            let (opcode, code) = handle_creation_opcode(*kind, shading_model)?;
            used.mark(opcode);
            Record::new(34, vec![code])
        }
        Instruction::UnexposedInstruction { backend_opcode, .. } => Record::new(*backend_opcode, vec![]),
    })
}

fn sample_opcode(mode: crate::il::SampleMode) -> DxilOpcode {
    use crate::il::SampleMode::*;
    match mode {
        Plain => DxilOpcode::Sample,
        Level => DxilOpcode::SampleLevel,
        Bias => DxilOpcode::SampleBias,
        Grad => DxilOpcode::SampleGrad,
        Cmp => DxilOpcode::SampleCmp,
        CmpLevelZero => DxilOpcode::SampleCmpLevelZero,
    }
}

fn sample_opcode_constant(mode: crate::il::SampleMode) -> u64 {
    use crate::il::SampleMode::*;
    match mode {
        Plain => 60,
        Level => 62,
        Bias => 61,
        Grad => 63,
        Cmp => 64,
        CmpLevelZero => 65,
    }
}

/// Chooses between the SM 6.6+ `CreateHandleFromBinding` + `AnnotateHandle` pair and the
/// pre-6.6 `CreateHandle` call, per the module's declared shading model.
fn handle_creation_opcode(kind: HandleKind, shading_model: ShadingModel) -> Result<(DxilOpcode, u64), CompileError> {
    match shading_model {
        ShadingModel::Sm66OrLater => Ok((DxilOpcode::CreateHandleFromBinding, 218)),
        ShadingModel::PreSm66 => Ok((DxilOpcode::CreateHandle, 57)),
        ShadingModel::Unknown => Err(CompileError::NoHandleCreationPath(kind, shading_model)),
    }
}

/// Removes intrinsic declarations from `declared` that `used` never referenced, the
/// last step before stitching.
pub fn trim_unused_declarations(declared: &[DxilOpcode], used: &UsedDeclarations) -> Vec<DxilOpcode> {
    declared.iter().copied().filter(|op| used.is_used(*op)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::il::{BinOpKind, Type};

    #[test]
    fn allocation_assigns_ids_in_visiting_order() {
        let mut function = Function::default();
        function.push(0, Instruction::Alloca { pointee: Type::Int(32) });
        function.push(
            1,
            Instruction::BinOp {
                kind: BinOpKind::Add,
                lhs: 0,
                rhs: 0,
                ty: Type::Int(32),
            },
        );
        let remapper = allocate(&function);
        assert_eq!(remapper.get(0).unwrap(), 0);
        assert_eq!(remapper.get(1).unwrap(), 1);
    }

    #[test]
    fn write_pass_encodes_backward_refs_relative_to_anchor() {
        let mut function = Function::default();
        function.push(0, Instruction::Alloca { pointee: Type::Int(32) });
        function.push(
            1,
            Instruction::BinOp {
                kind: BinOpKind::Add,
                lhs: 0,
                rhs: 0,
                ty: Type::Int(32),
            },
        );
        let remapper = allocate(&function);
        let (records, _used) = write(&function, &remapper, ShadingModel::PreSm66).unwrap();
        // anchor for the BinOp record is its own bitcode id, 1; lhs target is
        // bitcode id 0, so the encoded backward distance is (1 - 0) << 1 = 2.
        assert_eq!(records[1].operands[0], 2);
    }

    #[test]
    fn write_pass_encodes_forward_refs_past_their_anchor() {
        // id 0: Phi whose incoming value (id 1) is only defined by the next record -- the
        // loop-carried-value shape a backward-only encoder can't represent.
        let mut function = Function::default();
        function.push(
            0,
            Instruction::Phi {
                incoming: smallvec::smallvec![crate::il::PhiIncoming {
                    value: 1,
                    predecessor_block: 0,
                }],
                ty: Type::Int(32),
            },
        );
        function.push(
            1,
            Instruction::BinOp {
                kind: BinOpKind::Add,
                lhs: 0,
                rhs: 0,
                ty: Type::Int(32),
            },
        );
        let remapper = allocate(&function);
        let (records, _used) = write(&function, &remapper, ShadingModel::PreSm66).unwrap();
        // anchor for the Phi record is its own bitcode id, 0; target is bitcode id 1, a
        // forward reference one record past anchor: (1 << 1) | 1 = 3.
        assert_eq!(records[0].operands[0], 3);
    }

    #[test]
    fn unused_declarations_are_trimmed() {
        let declared = vec![DxilOpcode::BufferLoad, DxilOpcode::BufferStore];
        let mut used = UsedDeclarations::default();
        used.mark(DxilOpcode::BufferLoad);
        let trimmed = trim_unused_declarations(&declared, &used);
        assert_eq!(trimmed, vec![DxilOpcode::BufferLoad]);
    }
}
