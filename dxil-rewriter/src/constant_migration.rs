//! Hoists per-function constant blocks into the global constants block.
//!
//! Rationale (per the design): the host bitcode reader has a forward-reference bug for
//! metadata values that only manifests when constants are defined inside a function
//! block. Running this as a one-shot pre-pass before function parsing means the parser
//! itself never has to special-case function-local constants.

use crate::bitcode::{Module, Record};
use crate::ids::ValueId;
use std::collections::HashMap;

/// Maps a constant's anchor in its original (function-local) block to the id it was
/// relocated to in the global constants block. Consulted at stitch time so operands
/// that referenced the old anchor resolve to the new one.
#[derive(Clone, Debug, Default)]
pub struct ConstantRelocation {
    moved: HashMap<(usize, ValueId), ValueId>,
}

impl ConstantRelocation {
    pub fn lookup(&self, function_index: usize, source_anchor: ValueId) -> Option<ValueId> {
        self.moved.get(&(function_index, source_anchor)).copied()
    }

    fn record(&mut self, function_index: usize, source_anchor: ValueId, mapped: ValueId) {
        self.moved.insert((function_index, source_anchor), mapped);
    }
}

/// Constant-block records embedded in a function body, recognized by record code.
/// Mirrors the CONSTANTS_BLOCK record codes the LLVM bitcode reader assigns; listed here
/// rather than imported since the physical scanner that would otherwise supply them is
/// out of this crate's detailed scope.
const CONSTANT_RECORD_CODES: &[u32] = &[/* SETTYPE */ 1, /* CST_INTEGER */ 4, /* CST_FLOAT */ 6, /* CST_AGGREGATE */ 7];

fn is_constant_record(record: &Record) -> bool {
    CONSTANT_RECORD_CODES.contains(&record.code)
}

/// Runs the migration over every function block in `module`, returning the relocation
/// table stitching consults afterward. Idempotent: a function with no embedded constant
/// block is left untouched and contributes no relocation entries.
pub fn migrate_constants(module: &mut Module) -> ConstantRelocation {
    let mut relocation = ConstantRelocation::default();
    for (function_index, function) in module.functions.iter_mut().enumerate() {
        let mut anchor: ValueId = 0;
        let mut kept = Vec::with_capacity(function.records.len());
        for mut record in function.records.drain(..) {
            anchor += 1;
            if is_constant_record(&record) {
                record.strip_abbreviation();
                let mapped = (module.global_constants.records.len()) as ValueId;
                module.global_constants.records.push(record);
                relocation.record(function_index, anchor, mapped);
            } else {
                kept.push(record);
            }
        }
        function.records = kept;
    }
    relocation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitcode::Block;

    #[test]
    fn constant_records_are_hoisted_and_relocation_recorded() {
        let mut module = Module::default();
        module.functions.push(Block {
            records: vec![
                Record::new(4, vec![7]),
                Record::new(100, vec![1, 2]),
                Record::new(6, vec![3]),
            ],
        });
        let relocation = migrate_constants(&mut module);
        assert_eq!(module.functions[0].records.len(), 1);
        assert_eq!(module.global_constants.records.len(), 2);
        assert!(relocation.lookup(0, 1).is_some());
        assert!(relocation.lookup(0, 3).is_some());
        assert!(relocation.lookup(0, 2).is_none());
    }

    #[test]
    fn moved_records_lose_their_abbreviation() {
        let mut module = Module::default();
        let mut rec = Record::new(4, vec![1]);
        rec.abbreviated = true;
        module.functions.push(Block { records: vec![rec] });
        migrate_constants(&mut module);
        assert!(!module.global_constants.records[0].abbreviated);
    }
}
