use proptest::prelude::*;

/// One mutation of the tree under test.
#[derive(Clone, Debug)]
pub enum Op<K> {
    Insert(K),
    Remove(K),
}

pub fn small_int_ops() -> impl Strategy<Value = Vec<Op<u16>>> {
    prop::collection::vec(
        prop_oneof![
            (0u16..1024).prop_map(Op::Insert),
            (0u16..1024).prop_map(Op::Remove),
        ],
        0..512,
    )
}

pub fn dup_heavy_ops() -> impl Strategy<Value = Vec<Op<u8>>> {
    // a tiny key domain so that equal keys pile up
    prop::collection::vec(
        prop_oneof![
            3 => (0u8..8).prop_map(Op::Insert),
            2 => (0u8..8).prop_map(Op::Remove),
        ],
        0..256,
    )
}

pub fn short_strings() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{0,2}", 0..256)
}
