//! Per-node saved state
//!
//! Every node that takes part in an install transaction records its work in
//! a [`NodeState`]: a JSON object carrying any unit-specific fields plus two
//! reserved fields maintained by the engine itself, the index of the last
//! child whose install was attempted and the ordered list of per-child
//! states. Unknown fields are preserved across read-modify-write cycles so
//! newer producers can coexist with older consumers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, corrupt_state, fields_missing};

/// Reserved field: index of the last child whose install was attempted
pub const LAST_ATTEMPTED_KEY: &str = "_last_attempted";

/// Reserved field: ordered per-child saved states
pub const NESTED_STATES_KEY: &str = "_nested_states";

/// Saved state of a single node in the install tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeState {
    fields: Map<String, Value>,
}

impl NodeState {
    /// Creates an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the state carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Stores a unit-specific field
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Reads a unit-specific field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Reads a unit-specific string field
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Field names excluding the reserved pair, for display purposes
    pub fn custom_keys(&self) -> impl Iterator<Item = &str> {
        self.fields
            .keys()
            .map(String::as_str)
            .filter(|k| *k != LAST_ATTEMPTED_KEY && *k != NESTED_STATES_KEY)
    }

    /// Whether both reserved fields are present
    pub fn has_reserved_fields(&self) -> bool {
        self.fields.contains_key(LAST_ATTEMPTED_KEY) && self.fields.contains_key(NESTED_STATES_KEY)
    }

    /// Records the index of the last child whose install was attempted.
    /// -1 means the walk never reached the first child.
    pub fn set_last_attempted(&mut self, index: i64) {
        self.fields
            .insert(LAST_ATTEMPTED_KEY.to_string(), Value::from(index));
    }

    /// The recorded last-attempted index, if present and well-typed
    pub fn last_attempted(&self) -> Option<i64> {
        self.fields.get(LAST_ATTEMPTED_KEY).and_then(Value::as_i64)
    }

    /// Drops the last-attempted marker. The commit phase does this once the
    /// transaction no longer needs to support rollback positioning.
    pub fn clear_last_attempted(&mut self) {
        self.fields.remove(LAST_ATTEMPTED_KEY);
    }

    /// Stores the ordered per-child states
    pub fn set_nested(&mut self, nested: Vec<NodeState>) {
        let values: Vec<Value> = nested.into_iter().map(|s| Value::Object(s.fields)).collect();
        self.fields
            .insert(NESTED_STATES_KEY.to_string(), Value::Array(values));
    }

    /// Number of recorded per-child states, if the field is present and
    /// well-shaped
    pub fn nested_len(&self) -> Option<usize> {
        self.fields
            .get(NESTED_STATES_KEY)
            .and_then(Value::as_array)
            .map(Vec::len)
    }

    /// Extracts the ordered per-child states, leaving the field absent until
    /// [`set_nested`](Self::set_nested) writes the walked states back.
    ///
    /// Fails when the field is missing or when any entry is not an object;
    /// a malformed record is reported, never repaired.
    pub fn take_nested(&mut self) -> Result<Vec<NodeState>> {
        let value = self
            .fields
            .remove(NESTED_STATES_KEY)
            .ok_or_else(fields_missing)?;
        let Value::Array(entries) = value else {
            return Err(corrupt_state("nested child states are not a sequence"));
        };
        let mut nested = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            let Value::Object(fields) = entry else {
                return Err(corrupt_state(format!(
                    "nested child state at index {index} is not an object"
                )));
            };
            nested.push(NodeState { fields });
        }
        Ok(nested)
    }
}
