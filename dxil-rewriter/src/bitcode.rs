//! Physical-block model of an LLVM bitcode module.
//!
//! The scanner below the function block (type, metadata, symbol, and string-table
//! blocks) is out of this crate's detailed scope -- those blocks are carried here as
//! opaque [`Record`] sequences, round-tripped byte-for-byte unless the function block's
//! contract (constant migration, see [`crate::constant_migration`]) needs to touch them.
//! Only [`BlockId::Function`] is parsed into instructions.

use std::fmt;

/// Which physical block a [`Record`] belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockId {
    /// The outermost block scan; carries the module-level wrapper records.
    Scan,
    /// Type table.
    Type,
    /// Global variables and the top-level constants block.
    GlobalConstants,
    /// Module/function metadata (debug info among it).
    Metadata,
    /// Value symbol table.
    Symbol,
    /// Per-function attribute groups.
    FunctionAttribute,
    /// A single function body. This is the block this crate rewrites in detail.
    Function,
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One LLVM bitcode record: an opcode and its operand list.
///
/// This is a record-level representation rather than a literal bitstream of abbreviated
/// fields -- the abbreviation/VBR encoding that produces records is the mechanical
/// scanner excluded from this specification's detailed scope. `abbreviated` marks
/// whether this record used a block-local abbreviation, which matters only because
/// [`crate::constant_migration`] must strip it when relocating a record out of its
/// originating block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub code: u32,
    pub operands: Vec<u64>,
    pub abbreviated: bool,
}

impl Record {
    pub fn new(code: u32, operands: Vec<u64>) -> Self {
        Record {
            code,
            operands,
            abbreviated: false,
        }
    }

    /// Strips the block-local abbreviation, if any. Safe to call unconditionally.
    pub fn strip_abbreviation(&mut self) {
        self.abbreviated = false;
    }
}

/// One physical block: its kind plus the records it contains, in file order.
#[derive(Clone, Debug, Default)]
pub struct Block {
    pub records: Vec<Record>,
}

/// A parsed (or in-progress) bitcode module, organized by physical block.
#[derive(Clone, Debug, Default)]
pub struct Module {
    pub scan: Block,
    pub types: Block,
    pub global_constants: Block,
    pub metadata: Block,
    pub symbols: Block,
    pub function_attributes: Block,
    pub functions: Vec<Block>,
    /// The module's declared shading model, read out of the scan block at load time.
    /// Drives the handle-creation path choice in [`crate::compile`].
    pub shading_model: crate::ShadingModel,
}

impl Module {
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        match id {
            BlockId::Scan => Some(&self.scan),
            BlockId::Type => Some(&self.types),
            BlockId::GlobalConstants => Some(&self.global_constants),
            BlockId::Metadata => Some(&self.metadata),
            BlockId::Symbol => Some(&self.symbols),
            BlockId::FunctionAttribute => Some(&self.function_attributes),
            // Multiple function blocks exist; callers iterate `functions` directly.
            BlockId::Function => None,
        }
    }
}
