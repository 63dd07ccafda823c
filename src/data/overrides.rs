use serde::{Deserialize, Serialize};

use crate::data::{FieldType, InheritableEntity, Value};
use crate::{FieldNotInheritable, Result, ValueTypeMismatch};

/// How one inheritable field looks to an editing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideState {
    pub field_type: FieldType,
    /// Checked "override" box: the entity holds its own value.
    pub overridden: bool,
    pub value: Option<Value>,
    pub placeholder: Option<Value>,
}

/// A submitted override decision for one inheritable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOverride {
    pub field_type: FieldType,
    pub overridden: bool,
    /// New own value; `None` keeps the current one.
    pub value: Option<Value>,
}

impl FieldOverride {
    pub fn inherit(field_type: impl Into<FieldType>) -> Self {
        FieldOverride {
            field_type: field_type.into(),
            overridden: false,
            value: None,
        }
    }

    pub fn set(field_type: impl Into<FieldType>, value: Value) -> Self {
        FieldOverride {
            field_type: field_type.into(),
            overridden: true,
            value: Some(value),
        }
    }
}

impl InheritableEntity {
    pub fn override_states(&self) -> Vec<OverrideState> {
        self.declared_inheritable_fields()
            .into_iter()
            .map(|field_type| OverrideState {
                overridden: !self.is_inherited(&field_type),
                value: self.resolved_value(&field_type).cloned(),
                placeholder: self.placeholder(&field_type).cloned(),
                field_type,
            })
            .collect()
    }
}

/// Translates override decisions into field changes.
///
/// Not overriding an inherited field puts back the inherited value, so the
/// field is not dirty and gets emptied on save. Not overriding a field that
/// held its own value clears it, so inheritance resumes after the save.
/// Every submission is checked before any field changes.
pub fn apply_overrides(entity: &mut InheritableEntity, submissions: &[FieldOverride]) -> Result<()> {
    let mut changes = Vec::with_capacity(submissions.len());

    for submission in submissions {
        let field_type = &submission.field_type;
        let field_schema = entity
            .schema
            .field(field_type)
            .filter(|schema| schema.inheritable)
            .ok_or_else(|| FieldNotInheritable(entity.entity_type().clone(), field_type.clone()))?;

        let change = if submission.overridden {
            match &submission.value {
                Some(value) if !field_schema.accepts(value) => {
                    return Err(ValueTypeMismatch(
                        entity.entity_type().clone(),
                        field_type.clone(),
                        field_schema.default_value.clone(),
                        value.clone(),
                    )
                    .into());
                }
                Some(value) => Some(value.clone()),
                None => None,
            }
        } else if entity.is_inherited(field_type) {
            entity.baseline.get(field_type).cloned()
        } else {
            Some(field_schema.empty_value().clone())
        };

        if let Some(value) = change {
            changes.push((field_type.clone(), value));
        }
    }

    for (field_type, value) in changes {
        entity.set_value(field_type, value);
    }

    Ok(())
}
