//! End-to-end round-trip and SVOX-preservation scenarios (E5 / property 7).

use dxil_rewriter::bitcode::Record;
use dxil_rewriter::compile;
use dxil_rewriter::ids::IdMap;
use dxil_rewriter::il::{Function, Type};
use dxil_rewriter::parse::FunctionParser;
use dxil_rewriter::svox::SvoxTable;
use dxil_rewriter::ShadingModel;
use std::collections::HashMap;

/// A tiny function: `%0 = alloca; %1 = add %0, %0; ret %1`. Backward operand encodings
/// are hand-computed the way a real bitcode writer would produce them: for a record
/// whose anchor is `a` and whose operand's absolute id is `t`, the relative-encoded raw
/// value is `(a - t) << 1`.
fn sample_function_records() -> Vec<Record> {
    vec![
        Record::new(19, vec![]),       // %0 = alloca, anchor 0
        Record::new(2, vec![2, 2, 0]), // %1 = add %0, %0, anchor 1
        Record::new(10, vec![2]),      // ret %1, anchor 2
    ]
}

#[test]
fn parse_compile_parse_round_trip_is_isomorphic() {
    let constants = HashMap::new();

    let mut ids = IdMap::new();
    let mut original = Function::default();
    FunctionParser::new(&mut ids, &constants)
        .parse(&sample_function_records(), &mut original)
        .expect("sample records are well-formed");

    let remapper = compile::allocate(&original);
    let (records, _used) = compile::write(&original, &remapper, ShadingModel::PreSm66).expect("compiles");

    let mut reparse_ids = IdMap::new();
    let mut reparsed = Function::default();
    FunctionParser::new(&mut reparse_ids, &constants)
        .parse(&records, &mut reparsed)
        .expect("compiled records are well-formed");

    assert_eq!(
        original.instructions, reparsed.instructions,
        "compile(parse(m)) must reparse to the same instruction sequence"
    );
}

#[test]
fn svox_sequential_values_preserve_width_and_element_type() {
    let mut ids = IdMap::new();
    let mut table = SvoxTable::new();

    let (aggregate, _first) = table.allocate_svo_sequential(&mut ids, 4, Type::Float32, false);
    assert_eq!(table.svox_count(aggregate), 4);

    for lane in 0..4 {
        let (_value, extra) = table
            .extract_svox_element(&mut ids, aggregate, lane)
            .expect("lane within width must extract cleanly");
        assert!(extra.is_none(), "sequential lanes are already separate ids, no instruction needed");
    }

    assert!(table.extract_svox_element(&mut ids, aggregate, 4).is_err());
}
