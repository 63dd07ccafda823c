use crate::data::{EntityId, Timestamp, epoch};
use crate::{BadValueCast, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    EntityReference(Option<EntityId>),
    Float(f64),
    Int(i64),
    String(String),
    Timestamp(Timestamp),
}

impl Value {
    /// True when both values are of the same variant, regardless of content.
    pub fn same_kind(&self, other: &Value) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Equality used for emptiness and change tracking. Floats compare by
    /// bit pattern, so a NaN equals itself.
    pub fn same_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            _ => self == other,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        if let Value::Int(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    pub fn as_entity_reference(&self) -> Option<&Option<EntityId>> {
        if let Value::EntityReference(e) = self {
            Some(e)
        } else {
            None
        }
    }

    pub fn expect_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            _ => Err(BadValueCast(self.clone(), Value::Bool(false)).into()),
        }
    }

    pub fn expect_int(&self) -> Result<i64> {
        self.as_int()
            .ok_or_else(|| BadValueCast(self.clone(), Value::Int(0)).into())
    }

    pub fn expect_float(&self) -> Result<f64> {
        match self {
            Value::Float(f) => Ok(*f),
            _ => Err(BadValueCast(self.clone(), Value::Float(0.0)).into()),
        }
    }

    pub fn expect_string(&self) -> Result<&str> {
        self.as_string()
            .ok_or_else(|| BadValueCast(self.clone(), Value::String(String::new())).into())
    }

    pub fn expect_entity_reference(&self) -> Result<Option<EntityId>> {
        self.as_entity_reference()
            .copied()
            .ok_or_else(|| BadValueCast(self.clone(), Value::EntityReference(None)).into())
    }

    pub fn expect_timestamp(&self) -> Result<Timestamp> {
        match self {
            Value::Timestamp(t) => Ok(*t),
            _ => Err(BadValueCast(self.clone(), Value::Timestamp(epoch())).into()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Option<EntityId>> for Value {
    fn from(e: Option<EntityId>) -> Self {
        Value::EntityReference(e)
    }
}
