use crate::data::{FieldType, Value};
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub field_type: FieldType,
    pub default_value: Value,
    /// Values that mean "nothing set". The first entry is what gets written
    /// when an inherited field is reset.
    pub empty_values: SmallVec<[Value; 2]>,
    pub rank: i64,
    pub inheritable: bool,
}

impl FieldSchema {
    /// Strings and references start with their blank value as the only empty
    /// sentinel. Numbers, booleans and timestamps start with none, so zero and
    /// `false` are real values unless declared otherwise.
    pub fn new(field_type: impl Into<FieldType>, default_value: Value, rank: i64) -> Self {
        let empty_values = match default_value {
            Value::String(_) => smallvec![Value::String(String::new())],
            Value::EntityReference(_) => smallvec![Value::EntityReference(None)],
            _ => SmallVec::new(),
        };

        FieldSchema {
            field_type: field_type.into(),
            default_value,
            empty_values,
            rank,
            inheritable: false,
        }
    }

    pub fn string(field_type: impl Into<FieldType>, rank: i64) -> Self {
        Self::new(field_type, Value::String(String::new()), rank)
    }

    pub fn int(field_type: impl Into<FieldType>, rank: i64) -> Self {
        Self::new(field_type, Value::Int(0), rank)
    }

    pub fn float(field_type: impl Into<FieldType>, rank: i64) -> Self {
        Self::new(field_type, Value::Float(0.0), rank)
    }

    pub fn bool(field_type: impl Into<FieldType>, rank: i64) -> Self {
        Self::new(field_type, Value::Bool(false), rank)
    }

    pub fn entity_reference(field_type: impl Into<FieldType>, rank: i64) -> Self {
        Self::new(field_type, Value::EntityReference(None), rank)
    }

    pub fn inheritable(mut self) -> Self {
        self.inheritable = true;
        self
    }

    /// Declare an additional empty sentinel for this field.
    pub fn with_empty_value(mut self, value: Value) -> Self {
        if !self.is_empty(&value) {
            self.empty_values.push(value);
        }
        self
    }

    pub fn is_empty(&self, value: &Value) -> bool {
        self.empty_values.iter().any(|empty| empty.same_value(value))
    }

    /// The value written for a field that is reset to empty.
    pub fn empty_value(&self) -> &Value {
        self.empty_values.first().unwrap_or(&self.default_value)
    }

    pub fn accepts(&self, value: &Value) -> bool {
        self.default_value.same_kind(value)
    }
}
