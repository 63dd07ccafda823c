use std::error;
use std::fmt;

use crate::data::{EntityId, EntityType, FieldType, Value};

#[derive(Debug, Clone)]
pub struct EntityTypeNotFound(pub EntityType);
impl error::Error for EntityTypeNotFound {}
impl fmt::Display for EntityTypeNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown entity type: {}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct EntityNotFound(pub EntityId);
impl error::Error for EntityNotFound {}
impl fmt::Display for EntityNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity not found: {}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct FieldNotFound(pub EntityType, pub FieldType);
impl error::Error for FieldNotFound {}
impl fmt::Display for FieldNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field not found for entity type {}: {}", self.0, self.1)
    }
}

/// Stored type and the type an update tried to write.
#[derive(Debug, Clone)]
pub struct EntityTypeChanged(pub EntityId, pub EntityType, pub EntityType);
impl error::Error for EntityTypeChanged {}
impl fmt::Display for EntityTypeChanged {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Entity {} is a {} and cannot be written as a {}",
            self.0, self.1, self.2
        )
    }
}

/// Field schema default (expected) and offending value.
#[derive(Debug, Clone)]
pub struct ValueTypeMismatch(pub EntityType, pub FieldType, pub Value, pub Value);
impl error::Error for ValueTypeMismatch {}
impl fmt::Display for ValueTypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Value type mismatch for entity type {} field {}: expected {:?}, got {:?}",
            self.0, self.1, self.2, self.3
        )
    }
}

#[derive(Debug, Clone)]
pub struct BadValueCast(pub Value, pub Value);
impl error::Error for BadValueCast {}
impl fmt::Display for BadValueCast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cannot cast {:?} to the kind of {:?}", self.0, self.1)
    }
}

#[derive(Debug, Clone)]
pub struct FieldNotInheritable(pub EntityType, pub FieldType);
impl error::Error for FieldNotInheritable {}
impl fmt::Display for FieldNotInheritable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field {} of entity type {} is not inheritable", self.1, self.0)
    }
}

/// Raised when a type is registered with inheritable fields it cannot support.
#[derive(Debug, Clone)]
pub struct InheritanceNotSupported {
    pub entity_type: EntityType,
    pub reason: String,
}

impl InheritanceNotSupported {
    pub fn new(entity_type: &EntityType, reason: impl Into<String>) -> Self {
        InheritanceNotSupported {
            entity_type: entity_type.clone(),
            reason: reason.into(),
        }
    }
}

impl error::Error for InheritanceNotSupported {}
impl fmt::Display for InheritanceNotSupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Entity type {} cannot support field inheritance: {}",
            self.entity_type, self.reason
        )
    }
}

/// The ancestor chain for an entity could not be fetched.
#[derive(Debug)]
pub struct ResolutionFailed {
    pub entity_type: EntityType,
    pub entity_id: Option<EntityId>,
    pub source: Box<dyn error::Error>,
}

impl error::Error for ResolutionFailed {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl fmt::Display for ResolutionFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entity_id {
            Some(id) => write!(
                f,
                "Failed to resolve inherited fields for {} {}: {}",
                self.entity_type, id, self.source
            ),
            None => write!(
                f,
                "Failed to resolve inherited fields for unsaved {}: {}",
                self.entity_type, self.source
            ),
        }
    }
}
