//! Stitches rewritten functions back into a [`Module`]'s bitcode record stream.
//!
//! Each function's IL is compiled independently (see [`crate::compile`]), but their
//! bitcode ids must never collide: this is where the id_map's snapshot/branch/revert
//! protocol from [`crate::ids`] actually gets driven across a whole module.

use crate::bitcode::{Block, Module};
use crate::compile::{self, UsedDeclarations};
use crate::error::CompileError;
use crate::ids::IdMap;
use crate::il::Function;
use crate::intrinsics::DxilOpcode;
use crate::ShadingModel;

/// Compiles and stitches every function in `functions` (in module order) into `module`,
/// using `ids` as the module-wide id space. Each function branches its own isolated
/// segment off `ids`, compiles against it, then reverts -- so a later function's ids
/// never alias an earlier one's even though every function's IL was numbered starting
/// at 0 independently by the parser.
///
/// Returns the union of every intrinsic declaration actually used across the module, for
/// the caller to pass to [`compile::trim_unused_declarations`] against the module's
/// declared intrinsic list.
pub fn stitch_module(
    module: &mut Module,
    functions: &[Function],
    ids: &mut IdMap,
    shading_model: ShadingModel,
) -> Result<UsedDeclarations, CompileError> {
    let mut module_used = UsedDeclarations::default();
    module.functions.clear();

    for function in functions {
        let snapshot = ids.create_snapshot();
        let mut branch = IdMap::branch(snapshot);

        // The branch gets its own remapper, so bitcode ids restart at 0 within each
        // function body regardless of where the module-wide id_map head sits -- bitcode
        // function blocks are always numbered from the function's own argument list.
        let remapper = compile::allocate(function);
        let (records, used) = compile::write(function, &remapper, shading_model)?;

        for opcode in [
            DxilOpcode::CreateHandle,
            DxilOpcode::CreateHandleFromBinding,
            DxilOpcode::BufferLoad,
            DxilOpcode::BufferStore,
            DxilOpcode::TextureLoad,
            DxilOpcode::TextureStore,
            DxilOpcode::AtomicBinOp,
            DxilOpcode::AtomicCompareExchange,
            DxilOpcode::IsNaN,
            DxilOpcode::IsInf,
            DxilOpcode::GetDimensions,
            DxilOpcode::ThreadId,
        ] {
            if used.is_used(opcode) {
                module_used.mark(opcode);
            }
        }

        module.functions.push(Block { records });

        // Advance past however many ids this function's parse originally consumed so
        // the next function's snapshot starts clean; the branch's own head tracks the
        // parser's id count, not the bitcode remapper's, so this is exact.
        let consumed = function.instructions.len() as u32;
        for _ in 0..consumed {
            branch.define();
        }
        ids.revert(branch);
    }

    Ok(module_used)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::il::{BinOpKind, Instruction, Type};

    fn single_binop_function() -> Function {
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
        function
    }

    #[test]
    fn functions_stitch_without_id_collisions() {
        let mut module = Module::default();
        let mut ids = IdMap::new();
        let functions = vec![single_binop_function(), single_binop_function()];
        let used = stitch_module(&mut module, &functions, &mut ids, ShadingModel::PreSm66).unwrap();
        assert_eq!(module.functions.len(), 2);
        assert!(!used.is_used(DxilOpcode::BufferLoad));
    }

    #[test]
    fn id_map_head_advances_across_stitched_functions() {
        let mut module = Module::default();
        let mut ids = IdMap::new();
        let functions = vec![single_binop_function(), single_binop_function()];
        stitch_module(&mut module, &functions, &mut ids, ShadingModel::PreSm66).unwrap();
        assert_eq!(ids.head(), 4);
    }
}
