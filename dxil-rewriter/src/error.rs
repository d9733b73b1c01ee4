//! Error kinds surfaced by the rewriter. This is a "newer-vintage" module per the
//! ambient-stack note in the crate root: it uses `thiserror` throughout, matching
//! `external_memory::errors` rather than the hand-rolled `Display` impls used by the
//! allocator/registry modules in `diagnostic-layer`.

use crate::ids::RelativeRef;

/// Failures while parsing a physical block.
///
/// Per the failure semantics in the design: an unknown *record* in the function block is
/// fatal (the bitcode is malformed and parsing cannot continue meaningfully); an unknown
/// *opcode* inside an otherwise-recognized record degrades to `UnexposedInstruction`
/// rather than an error. Only the former surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("block {0:?} ended with {1} bytes of unconsumed record data")]
    TrailingData(crate::bitcode::BlockId, usize),
    #[error("function block referenced block-local abbreviation {0} after constant migration stripped it")]
    DanglingAbbreviation(u32),
    #[error("unknown record code {code} in function block (malformed bitcode)")]
    UnknownRecord { code: u32 },
    #[error("relative reference {0:?} underflows the current id_map head")]
    RelativeRefUnderflow(RelativeRef),
    #[error("{0} forward reference(s) in this function block were never patched by their definition")]
    UnpatchedForwardRefs(usize),
    #[error("branch target {0} is not a known block index in this function")]
    UnknownBranchTarget(u32),
    #[error("call to unresolvable callee (indirect or missing symbol)")]
    UnresolvableCallee,
    #[error("dx.op intrinsic opcode operand was not a resolvable constant")]
    NonConstantIntrinsicOpcode,
}

/// Failures while lowering IL back into bitcode records.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("IL value {0} has no reserved bitcode id (allocation pass did not visit it)")]
    UnallocatedValue(u32),
    #[error("SVOX value {0} has inconsistent width: tag says {expected}, extract requested {actual}")]
    SvoxWidthMismatch {
        id: u32,
        expected: u32,
        actual: u32,
    },
    #[error("instrumentation handle kind {0:?} has no creation path for shading model {1:?}")]
    NoHandleCreationPath(crate::il::HandleKind, crate::ShadingModel),
}

/// Failures while resolving a resource token back to its physical/virtual mapping.
#[derive(Debug, thiserror::Error)]
pub enum ResourceTokenError {
    #[error("could not walk resource {0} back to a root declaration (no AnnotateHandle/CreateHandle chain found)")]
    NoRootDeclaration(u32),
    #[error("dynamic offset on resource {0} was not a recognized `add lhs, constant` pattern")]
    UnrecognizedDynamicOffset(u32),
}

/// The top-level error returned by [`crate::rewrite_function`].
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    ResourceToken(#[from] ResourceTokenError),
}
