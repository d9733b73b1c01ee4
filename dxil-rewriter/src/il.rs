//! The backend intermediate language (IL) every LLVM record is lowered to, and back.
//!
//! DXIL is scalarized; the backend IL is vector-aware, hence [`crate::svox`] sits
//! alongside this module as the adapter between the two. IL instructions reference
//! operands by [`ValueId`] (always absolute here -- the anchor-relative encoding is a
//! bitcode-only concern, confined to [`crate::parse`] and [`crate::stitch`]).

use crate::ids::ValueId;
use smallvec::SmallVec;

/// IL type graph, walked by [`BinOp`]/[`AddressChain`] translation to compute result
/// types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    Void,
    Bool,
    Int(u32),
    Float32,
    Float64,
    Pointer(Box<Type>),
    Array(Box<Type>, u32),
    Vector(Box<Type>, u32),
    Matrix(Box<Type>, u32, u32),
    Struct(Vec<Type>),
    /// A type this rewriter has no native IL representation for; carried through so
    /// [`Instruction::UnexposedInstruction`] still type-checks downstream.
    Unexposed,
}

pub type InstructionId = ValueId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitShiftLeft,
    BitShiftRight,
    And,
    Or,
    BitXOr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmpKind {
    Equal,
    NotEqual,
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastKind {
    BitCast,
    Trunc,
    FloatToInt,
    IntToFloat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AtomicOpKind {
    Add,
    And,
    Or,
    XOr,
    Min,
    Max,
    Exchange,
    CompareExchange,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleMode {
    Plain,
    Level,
    Bias,
    Grad,
    Cmp,
    CmpLevelZero,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveOp {
    ReadFirst,
    AnyTrue,
    AllTrue,
    Ballot,
    Read,
    AllEqual,
    BitAnd,
    BitOr,
    BitXOr,
    CountBits,
    Sum,
    Product,
    Min,
    Max,
    PrefixSum,
    PrefixProduct,
    PrefixCountBits,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KernelValueKind {
    DispatchThreadID,
}

/// Which kind of instrumentation handle [`crate::compile`] must materialize at function
/// entry, and therefore which shading-model-dependent creation path applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleKind {
    ShaderExportCounter,
    StreamExport,
    PrmtResource,
    PrmtSampler,
    DescriptorHandle,
    EventHandle,
    ConstantsHandle,
    PerShaderDataDescriptor,
}

/// A chain index in an [`Instruction::AddressChain`]: either a compile-time-constant
/// struct/array index or a dynamically-computed one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChainIndex {
    Constant(i64),
    Dynamic(ValueId),
}

/// One (value, predecessor-block) pair in a [`Instruction::Phi`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhiIncoming {
    pub value: ValueId,
    pub predecessor_block: u32,
}

/// Trait bits carried on an [`Instruction::UnexposedInstruction`], driven by the fixed
/// DXIL opcode tables -- downstream analyses (outside this crate's scope) consult these
/// instead of re-deriving them from the opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct UnexposedTraits {
    pub foldable_with_immediates: bool,
    pub divergent: bool,
}

/// The backend IL instruction set. One value per LLVM record that has a result; see the
/// LLVM-record -> IL-op table in [`crate::parse`] for the forward translation, and
/// [`crate::compile`] for the reverse.
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    BinOp {
        kind: BinOpKind,
        lhs: ValueId,
        rhs: ValueId,
        ty: Type,
    },
    Cmp {
        kind: CmpKind,
        lhs: ValueId,
        rhs: ValueId,
    },
    Cast {
        kind: CastKind,
        value: ValueId,
        ty: Type,
    },
    AddressChain {
        composite: ValueId,
        chain: SmallVec<[ChainIndex; 4]>,
        ty: Type,
    },
    Phi {
        incoming: SmallVec<[PhiIncoming; 4]>,
        ty: Type,
    },
    Branch {
        target: u32,
    },
    BranchConditional {
        condition: ValueId,
        true_target: u32,
        false_target: u32,
    },
    Switch {
        value: ValueId,
        default: u32,
        cases: SmallVec<[(i64, u32); 8]>,
    },
    Return {
        value: Option<ValueId>,
    },
    Load {
        address: ValueId,
        ty: Type,
    },
    Store {
        address: ValueId,
        value: ValueId,
    },
    Alloca {
        pointee: Type,
    },
    ExtractValue {
        aggregate: ValueId,
        index: ChainIndex,
        ty: Type,
    },
    InsertValue {
        aggregate: ValueId,
        value: ValueId,
        index: ChainIndex,
    },
    Select {
        condition: ValueId,
        true_value: ValueId,
        false_value: ValueId,
    },

    // --- dx.op intrinsic lowerings ---
    LoadBuffer {
        handle: ValueId,
        offset: ValueId,
        component_mask: u8,
        alignment: u32,
    },
    StoreBuffer {
        handle: ValueId,
        offset: ValueId,
        value: ValueId,
        component_mask: u8,
    },
    LoadTexture {
        handle: ValueId,
        coords: ValueId,
        offset: Option<ValueId>,
    },
    StoreTexture {
        handle: ValueId,
        coords: ValueId,
        texel: ValueId,
    },
    SampleTexture {
        handle: ValueId,
        sampler: ValueId,
        coords: ValueId,
        mode: SampleMode,
    },
    Atomic {
        kind: AtomicOpKind,
        handle: ValueId,
        address: ValueId,
        operands: SmallVec<[ValueId; 2]>,
        signed: bool,
    },
    IsNaN {
        value: ValueId,
    },
    IsInf {
        value: ValueId,
    },
    Wave {
        op: WaveOp,
        operands: SmallVec<[ValueId; 2]>,
    },
    ResourceSize {
        handle: ValueId,
    },
    KernelValue {
        kind: KernelValueKind,
    },
    /// `ResourceToken(resource_id)`: a 32-bit opaque token identifying a bound resource.
    /// Lowered per the resource-token algorithm in [`crate::resource_token`].
    ResourceToken {
        resource: ValueId,
    },
    /// Materializes one of [`HandleKind`] at function entry.
    AcquireHandle {
        kind: HandleKind,
    },

    /// An LLVM record this rewriter has no translation for. `backend_opcode` and
    /// `symbol` are carried verbatim so [`crate::compile`] can re-emit byte-identical
    /// output; `traits` drives downstream analyses that would otherwise need to re-derive
    /// them.
    UnexposedInstruction {
        backend_opcode: u32,
        symbol: Option<String>,
        traits: UnexposedTraits,
    },
}

/// One function body: its parameter count, its instructions in IL id order, and its
/// block-entry map (local block index -> first instruction id in that block), used to
/// resolve `Branch`/`Switch` targets.
#[derive(Clone, Debug, Default)]
pub struct Function {
    pub instructions: Vec<(InstructionId, Instruction)>,
    pub block_entries: Vec<InstructionId>,
}

impl Function {
    pub fn push(&mut self, id: InstructionId, inst: Instruction) {
        self.instructions.push((id, inst));
    }
}
