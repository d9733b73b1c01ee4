//! Parses one function block's LLVM records into a [`crate::il::Function`].
//!
//! One function body in LLVM bitcode corresponds to one user function in the backend
//! IL. Records are walked in file order; each record that defines a value gets an id
//! from a single linear [`IdMap`](crate::ids::IdMap), and operands are decoded relative
//! to the record's own anchor (the id_map head at the time the record is visited).

use crate::bitcode::Record;
use crate::error::ParseError;
use crate::ids::{ForwardRef, IdMap, ValueId};
use crate::il::{
    AtomicOpKind, BinOpKind, CastKind, ChainIndex, CmpKind, Function, HandleKind, Instruction,
    KernelValueKind, PhiIncoming, Type,
};
use crate::intrinsics::{atomic_op_from_sub_operation, kernel_value_for, sample_mode, wave_op_from_sub_operation, DxilOpcode};
use crate::svox::SvoxTable;
use smallvec::smallvec;
use std::collections::HashMap;

/// LLVM function-block record codes this parser recognizes. Named after the
/// corresponding `FUNC_CODE_INST_*` constants; only the subset the design's
/// record-to-IL-op table covers is listed, everything else degrades to
/// [`Instruction::UnexposedInstruction`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FuncRecordKind {
    BinOp,
    Cmp,
    Cast,
    Gep,
    Phi,
    Br,
    Switch,
    Ret,
    Load,
    Store,
    Alloca,
    Call,
    ExtractVal,
    InsertVal,
    ExtractElt,
    InsertElt,
    VSelect,
}

impl FuncRecordKind {
    fn from_code(code: u32) -> Option<Self> {
        use FuncRecordKind::*;
        Some(match code {
            2 => BinOp,
            28 => Cmp,
            3 => Cast,
            4 => Gep,
            16 => Phi,
            11 => Br,
            12 => Switch,
            10 => Ret,
            20 => Load,
            44 => Store,
            19 => Alloca,
            34 => Call,
            26 => ExtractVal,
            27 => InsertVal,
            6 => ExtractElt,
            7 => InsertElt,
            29 => VSelect,
            _ => return None,
        })
    }
}

fn binop_kind(raw: u64) -> Option<BinOpKind> {
    use BinOpKind::*;
    Some(match raw {
        0 => Add,
        1 => Sub,
        2 => Mul,
        3 => Div,
        4 => Rem,
        5 => BitShiftLeft,
        6 => BitShiftRight,
        7 => And,
        8 => Or,
        9 => BitXOr,
        _ => return None,
    })
}

fn cmp_kind(raw: u64) -> Option<CmpKind> {
    use CmpKind::*;
    Some(match raw {
        0 => Equal,
        1 => NotEqual,
        2 => Less,
        3 => LessEq,
        4 => Greater,
        5 => GreaterEq,
        _ => return None,
    })
}

fn cast_kind(raw: u64) -> Option<CastKind> {
    use CastKind::*;
    Some(match raw {
        0 => BitCast,
        1 => Trunc,
        2 => FloatToInt,
        3 => IntToFloat,
        _ => return None,
    })
}

/// Parses the records of one function block into IL.
///
/// `constants` resolves an already-defined value id to its compile-time-constant value,
/// needed to recognize a `dx.op.*` call's opcode selector argument. Callers populate it
/// incrementally from the global constants block plus whatever
/// [`crate::constant_migration::migrate_constants`] hoisted out of this very function.
pub struct FunctionParser<'a> {
    ids: &'a mut IdMap,
    svox: SvoxTable,
    constants: &'a HashMap<ValueId, u64>,
}

impl<'a> FunctionParser<'a> {
    pub fn new(ids: &'a mut IdMap, constants: &'a HashMap<ValueId, u64>) -> Self {
        FunctionParser {
            ids,
            svox: SvoxTable::new(),
            constants,
        }
    }

    pub fn into_svox_table(self) -> SvoxTable {
        self.svox
    }

    /// Parses every record in `records` into `function`, in order.
    pub fn parse(&mut self, records: &[Record], function: &mut Function) -> Result<(), ParseError> {
        for record in records {
            self.parse_record(record, function)?;
        }
        if !self.ids.all_resolved() {
            // Every tracked forward ref must have been patched by the time the block
            // ends; an outstanding one means a phi/branch/self-call never saw its
            // definition.
            return Err(ParseError::UnpatchedForwardRefs(self.ids.outstanding_forward_refs()));
        }
        Ok(())
    }

    fn anchor(&self) -> ValueId {
        self.ids.head()
    }

    /// Decodes one operand encoded relative to `anchor`. Bit 0 of `raw` is the forward
    /// bit (the inverse sign encoding the design calls for); when set, the remaining
    /// bits name how far past the anchor the real definition lies and a provisional id
    /// is tracked until that definition is visited. When clear, `raw >> 1` is resolved
    /// as an ordinary backward reference through [`RelativeRef`](crate::ids::RelativeRef).
    fn resolve_operand(&mut self, anchor: ValueId, raw: u64, result_id: ValueId, operand_index: u32) -> ValueId {
        let forward = raw & 1 != 0;
        let magnitude = (raw >> 1) as u32;
        if forward {
            let fref = ForwardRef::predict(anchor, magnitude);
            self.ids.track_forward_use(fref, result_id, operand_index);
            fref.target_id()
        } else {
            let rel = crate::ids::RelativeRef::encode(anchor, anchor.saturating_sub(magnitude));
            rel.resolve(anchor).unwrap_or(0)
        }
    }

    fn parse_record(&mut self, record: &Record, function: &mut Function) -> Result<(), ParseError> {
        let anchor = self.anchor();
        let kind = match FuncRecordKind::from_code(record.code) {
            Some(k) => k,
            None => {
                return self.emit_unexposed(record, function, None);
            }
        };

        match kind {
            FuncRecordKind::BinOp => {
                let id = self.ids.define();
                let lhs = self.resolve_operand(anchor, record.operands.get(0).copied().unwrap_or(0), id, 0);
                let rhs = self.resolve_operand(anchor, record.operands.get(1).copied().unwrap_or(0), id, 1);
                let op = binop_kind(record.operands.get(2).copied().unwrap_or(0));
                match op {
                    Some(kind) => function.push(
                        id,
                        Instruction::BinOp {
                            kind,
                            lhs,
                            rhs,
                            ty: Type::Unexposed,
                        },
                    ),
                    None => function.push(id, self.unexposed(record)),
                }
            }
            FuncRecordKind::Cmp => {
                let id = self.ids.define();
                let lhs = self.resolve_operand(anchor, record.operands.get(0).copied().unwrap_or(0), id, 0);
                let rhs = self.resolve_operand(anchor, record.operands.get(1).copied().unwrap_or(0), id, 1);
                match cmp_kind(record.operands.get(2).copied().unwrap_or(0)) {
                    Some(kind) => function.push(id, Instruction::Cmp { kind, lhs, rhs }),
                    None => function.push(id, self.unexposed(record)),
                }
            }
            FuncRecordKind::Cast => {
                let id = self.ids.define();
                let value = self.resolve_operand(anchor, record.operands.get(0).copied().unwrap_or(0), id, 0);
                match cast_kind(record.operands.get(1).copied().unwrap_or(0)) {
                    Some(kind) => function.push(
                        id,
                        Instruction::Cast {
                            kind,
                            value,
                            ty: Type::Unexposed,
                        },
                    ),
                    None => function.push(id, self.unexposed(record)),
                }
            }
            FuncRecordKind::Gep => {
                let id = self.ids.define();
                let composite = self.resolve_operand(anchor, record.operands.get(0).copied().unwrap_or(0), id, 0);
                let chain = record.operands[1..]
                    .iter()
                    .map(|&raw| ChainIndex::Constant(raw as i64))
                    .collect();
                function.push(
                    id,
                    Instruction::AddressChain {
                        composite,
                        chain,
                        ty: Type::Unexposed,
                    },
                );
            }
            FuncRecordKind::Phi => {
                let id = self.ids.define();
                let mut incoming = smallvec![];
                let mut i = 0;
                while i + 1 < record.operands.len() {
                    let raw = record.operands[i];
                    let block = record.operands[i + 1] as u32;
                    let value = self.resolve_operand(anchor, raw, id, (i / 2) as u32);
                    incoming.push(PhiIncoming {
                        value,
                        predecessor_block: block,
                    });
                    i += 2;
                }
                function.push(
                    id,
                    Instruction::Phi {
                        incoming,
                        ty: Type::Unexposed,
                    },
                );
            }
            FuncRecordKind::Br => {
                let id = self.ids.define();
                if record.operands.len() >= 3 {
                    let true_target = record.operands[0] as u32;
                    let false_target = record.operands[1] as u32;
                    let condition = self.resolve_operand(anchor, record.operands[2], id, 0);
                    function.push(
                        id,
                        Instruction::BranchConditional {
                            condition,
                            true_target,
                            false_target,
                        },
                    );
                } else {
                    let target = record.operands.get(0).copied().unwrap_or(0) as u32;
                    function.push(id, Instruction::Branch { target });
                }
            }
            FuncRecordKind::Switch => {
                let id = self.ids.define();
                let value = self.resolve_operand(anchor, record.operands.get(0).copied().unwrap_or(0), id, 0);
                let default = record.operands.get(1).copied().unwrap_or(0) as u32;
                let mut cases = smallvec![];
                let mut i = 2;
                while i + 1 < record.operands.len() {
                    cases.push((record.operands[i] as i64, record.operands[i + 1] as u32));
                    i += 2;
                }
                function.push(
                    id,
                    Instruction::Switch {
                        value,
                        default,
                        cases,
                    },
                );
            }
            FuncRecordKind::Ret => {
                let id = self.ids.define();
                let value = record
                    .operands
                    .get(0)
                    .map(|&raw| self.resolve_operand(anchor, raw, id, 0));
                function.push(id, Instruction::Return { value });
            }
            FuncRecordKind::Load => {
                let id = self.ids.define();
                let address = self.resolve_operand(anchor, record.operands.get(0).copied().unwrap_or(0), id, 0);
                function.push(
                    id,
                    Instruction::Load {
                        address,
                        ty: Type::Unexposed,
                    },
                );
            }
            FuncRecordKind::Store => {
                let id = self.ids.define();
                let address = self.resolve_operand(anchor, record.operands.get(0).copied().unwrap_or(0), id, 0);
                let value = self.resolve_operand(anchor, record.operands.get(1).copied().unwrap_or(0), id, 1);
                function.push(id, Instruction::Store { address, value });
            }
            FuncRecordKind::Alloca => {
                let id = self.ids.define();
                function.push(id, Instruction::Alloca { pointee: Type::Unexposed });
            }
            FuncRecordKind::Call => {
                let id = self.ids.define();
                self.parse_call(record, anchor, id, function)?;
            }
            FuncRecordKind::ExtractVal => {
                let id = self.ids.define();
                let aggregate = self.resolve_operand(anchor, record.operands.get(0).copied().unwrap_or(0), id, 0);
                let index = ChainIndex::Constant(record.operands.get(1).copied().unwrap_or(0) as i64);
                function.push(
                    id,
                    Instruction::ExtractValue {
                        aggregate,
                        index,
                        ty: Type::Unexposed,
                    },
                );
            }
            FuncRecordKind::InsertVal => {
                let id = self.ids.define();
                let aggregate = self.resolve_operand(anchor, record.operands.get(0).copied().unwrap_or(0), id, 0);
                let value = self.resolve_operand(anchor, record.operands.get(1).copied().unwrap_or(0), id, 1);
                let index = ChainIndex::Constant(record.operands.get(2).copied().unwrap_or(0) as i64);
                function.push(id, Instruction::InsertValue { aggregate, value, index });
            }
            FuncRecordKind::ExtractElt => {
                let id = self.ids.define();
                let aggregate = self.resolve_operand(anchor, record.operands.get(0).copied().unwrap_or(0), id, 0);
                let index_raw = self.resolve_operand(anchor, record.operands.get(1).copied().unwrap_or(0), id, 1);
                function.push(
                    id,
                    Instruction::ExtractValue {
                        aggregate,
                        index: ChainIndex::Dynamic(index_raw),
                        ty: Type::Unexposed,
                    },
                );
            }
            FuncRecordKind::InsertElt => {
                let id = self.ids.define();
                let aggregate = self.resolve_operand(anchor, record.operands.get(0).copied().unwrap_or(0), id, 0);
                let value = self.resolve_operand(anchor, record.operands.get(1).copied().unwrap_or(0), id, 1);
                let index_raw = self.resolve_operand(anchor, record.operands.get(2).copied().unwrap_or(0), id, 2);
                function.push(
                    id,
                    Instruction::InsertValue {
                        aggregate,
                        value,
                        index: ChainIndex::Dynamic(index_raw),
                    },
                );
            }
            FuncRecordKind::VSelect => {
                let id = self.ids.define();
                let true_value = self.resolve_operand(anchor, record.operands.get(0).copied().unwrap_or(0), id, 0);
                let false_value = self.resolve_operand(anchor, record.operands.get(1).copied().unwrap_or(0), id, 1);
                let condition = self.resolve_operand(anchor, record.operands.get(2).copied().unwrap_or(0), id, 2);
                function.push(
                    id,
                    Instruction::Select {
                        condition,
                        true_value,
                        false_value,
                    },
                );
            }
        }

        // A definition may resolve forward references that were waiting on it.
        self.patch_if_defined(function);
        Ok(())
    }

    fn patch_if_defined(&mut self, function: &mut Function) {
        if let Some(&(last_id, _)) = function.instructions.last() {
            let uses = self.ids.resolve_forward_ref(last_id);
            for pending in uses {
                rewrite_use(function, pending, last_id);
            }
        }
    }

    fn parse_call(&mut self, record: &Record, anchor: ValueId, id: ValueId, function: &mut Function) -> Result<(), ParseError> {
        if record.operands.is_empty() {
            function.push(id, self.unexposed(record));
            return Ok(());
        }
        let opcode_operand = self.resolve_operand(anchor, record.operands[0], id, 0);
        let opcode_raw = *self
            .constants
            .get(&opcode_operand)
            .ok_or(ParseError::NonConstantIntrinsicOpcode)?;
        let opcode = match DxilOpcode::from_constant(opcode_raw) {
            Some(op) => op,
            None => {
                function.push(id, self.unexposed(record));
                return Ok(());
            }
        };
        let args: Vec<ValueId> = record.operands[1..]
            .iter()
            .enumerate()
            .map(|(i, &raw)| self.resolve_operand(anchor, raw, id, (i + 1) as u32))
            .collect();

        let inst = self.translate_intrinsic(opcode, &args);
        function.push(id, inst);
        Ok(())
    }

    fn translate_intrinsic(&mut self, opcode: DxilOpcode, args: &[ValueId]) -> Instruction {
        use DxilOpcode::*;
        match opcode {
            CreateHandle | CreateHandleFromBinding | CreateHandleFromHeap => {
                Instruction::AcquireHandle {
                    kind: HandleKind::DescriptorHandle,
                }
            }
            AnnotateHandle => Instruction::UnexposedInstruction {
                backend_opcode: 0,
                symbol: Some("dx.op.annotateHandle".into()),
                traits: Default::default(),
            },
            BufferLoad | RawBufferLoad => Instruction::LoadBuffer {
                handle: args.get(0).copied().unwrap_or(0),
                offset: args.get(1).copied().unwrap_or(0),
                component_mask: 0b1111,
                alignment: 4,
            },
            BufferStore | RawBufferStore => Instruction::StoreBuffer {
                handle: args.get(0).copied().unwrap_or(0),
                offset: args.get(1).copied().unwrap_or(0),
                value: args.get(2).copied().unwrap_or(0),
                component_mask: 0b1111,
            },
            TextureLoad => Instruction::LoadTexture {
                handle: args.get(0).copied().unwrap_or(0),
                coords: args.get(1).copied().unwrap_or(0),
                offset: args.get(2).copied(),
            },
            TextureStore => Instruction::StoreTexture {
                handle: args.get(0).copied().unwrap_or(0),
                coords: args.get(1).copied().unwrap_or(0),
                texel: args.get(2).copied().unwrap_or(0),
            },
            Sample | SampleLevel | SampleBias | SampleGrad | SampleCmp | SampleCmpLevelZero => {
                Instruction::SampleTexture {
                    handle: args.get(0).copied().unwrap_or(0),
                    sampler: args.get(1).copied().unwrap_or(0),
                    coords: args.get(2).copied().unwrap_or(0),
                    mode: sample_mode(opcode).unwrap_or(crate::il::SampleMode::Plain),
                }
            }
            AtomicBinOp => {
                let sub_op = args.get(1).copied().unwrap_or(0) as u64;
                let (kind, signed) = atomic_op_from_sub_operation(sub_op, false)
                    .unwrap_or((AtomicOpKind::Add, false));
                Instruction::Atomic {
                    kind,
                    handle: args.get(0).copied().unwrap_or(0),
                    address: args.get(2).copied().unwrap_or(0),
                    operands: args.get(3..).unwrap_or(&[]).iter().copied().collect(),
                    signed,
                }
            }
            AtomicCompareExchange => Instruction::Atomic {
                kind: AtomicOpKind::CompareExchange,
                handle: args.get(0).copied().unwrap_or(0),
                address: args.get(1).copied().unwrap_or(0),
                operands: args.get(2..).unwrap_or(&[]).iter().copied().collect(),
                signed: false,
            },
            IsNaN => Instruction::IsNaN {
                value: args.get(0).copied().unwrap_or(0),
            },
            IsInf => Instruction::IsInf {
                value: args.get(0).copied().unwrap_or(0),
            },
            WaveReadLaneFirst | WaveAnyTrue | WaveAllTrue | WaveActiveBallot | WaveReadLaneAt
            | WaveActiveAllEqual | WaveActiveBit | WaveActiveOp | WavePrefixOp => {
                let sub_op = args.get(1).copied().unwrap_or(0) as u64;
                Instruction::Wave {
                    op: wave_op_from_sub_operation(opcode, sub_op).unwrap_or(crate::il::WaveOp::Read),
                    operands: args.iter().copied().collect(),
                }
            }
            GetDimensions => Instruction::ResourceSize {
                handle: args.get(0).copied().unwrap_or(0),
            },
            ThreadId => Instruction::KernelValue {
                kind: kernel_value_for(opcode).unwrap_or(KernelValueKind::DispatchThreadID),
            },
        }
    }

    fn unexposed(&self, record: &Record) -> Instruction {
        Instruction::UnexposedInstruction {
            backend_opcode: record.code,
            symbol: None,
            traits: Default::default(),
        }
    }

    fn emit_unexposed(&mut self, record: &Record, function: &mut Function, _reason: Option<()>) -> Result<(), ParseError> {
        // A record with no recognized opcode but still shaped as a value-producing
        // record lowers to an unexposed instruction rather than erroring -- only a
        // record the scanner could not even classify as function-block data would be
        // fatal, and that case never reaches this parser (the scanner is out of scope).
        let id = self.ids.define();
        function.push(id, self.unexposed(record));
        Ok(())
    }
}

fn rewrite_use(function: &mut Function, pending: crate::ids::PendingUse, resolved: ValueId) {
    if let Some((_, inst)) = function
        .instructions
        .iter_mut()
        .find(|(id, _)| *id == pending.user)
    {
        rewrite_operand(inst, pending.operand_index, resolved);
    }
}

fn rewrite_operand(inst: &mut Instruction, operand_index: u32, resolved: ValueId) {
    match (inst, operand_index) {
        (Instruction::BinOp { lhs, .. }, 0) => *lhs = resolved,
        (Instruction::BinOp { rhs, .. }, 1) => *rhs = resolved,
        (Instruction::Phi { incoming, .. }, i) => {
            if let Some(entry) = incoming.get_mut(i as usize) {
                entry.value = resolved;
            }
        }
        _ => {}
    }
}
