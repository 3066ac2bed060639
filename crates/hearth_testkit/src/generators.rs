//! Property-based test generators using proptest.

use proptest::prelude::*;

/// Strategy for arbitrary record names, including empty and non-ASCII ones.
pub fn record_name_strategy() -> impl Strategy<Value = String> {
    any::<String>()
}

/// Strategy for short printable record names.
pub fn simple_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9_./-]{1,32}").expect("Invalid regex")
}

/// Strategy for record payloads (arbitrary bytes, possibly empty).
pub fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..4096)
}

/// An operation against a store.
#[derive(Debug, Clone)]
pub enum StoreOperation {
    /// Write a record.
    Write {
        /// Record name
        name: String,
        /// Record content
        data: Vec<u8>,
    },
    /// Delete a record.
    Delete {
        /// Record name
        name: String,
    },
    /// Read a record.
    Read {
        /// Record name
        name: String,
    },
}

/// Strategy for a single operation over a small name pool.
///
/// The pool keeps collisions frequent so deletes and reads hit records.
pub fn operation_strategy() -> impl Strategy<Value = StoreOperation> {
    let name = prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(String::from);
    prop_oneof![
        (name.clone(), prop::collection::vec(any::<u8>(), 0..64))
            .prop_map(|(name, data)| StoreOperation::Write { name, data }),
        name.clone().prop_map(|name| StoreOperation::Delete { name }),
        name.prop_map(|name| StoreOperation::Read { name }),
    ]
}

/// Strategy for a sequence of operations.
pub fn operation_sequence_strategy(len: usize) -> impl Strategy<Value = Vec<StoreOperation>> {
    prop::collection::vec(operation_strategy(), 1..=len)
}
