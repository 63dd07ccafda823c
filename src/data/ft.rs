use crate::data::FieldType;

pub const NAME: &str = "Name";
pub const PARENT: &str = "Parent";

pub fn name() -> FieldType {
    FieldType::from(NAME)
}

pub fn parent() -> FieldType {
    FieldType::from(PARENT)
}
