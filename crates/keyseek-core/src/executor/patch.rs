use crate::{
    error::{ConfigurationError, Error, OperationError},
    model::{AttributeKind, EntityModel},
    store::Record,
    value::Value,
};
use std::collections::BTreeMap;

///
/// RecordPatch
///
/// Scalar values to copy onto every record matched by a bulk update.
/// Null entries are skipped and the primary key is never overwritten.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordPatch {
    values: BTreeMap<String, Value>,
}

impl RecordPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn set(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(attribute.into(), value.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.values().all(Value::is_null)
    }

    /// Check every non-null value against the entity model.
    pub fn validate(&self, model: &EntityModel) -> Result<(), Error> {
        for (attribute, value) in self.non_null() {
            match model.attribute(attribute) {
                Some(AttributeKind::Scalar(ty)) => {
                    if !ty.accepts(value) {
                        return Err(OperationError::UnsupportedPatchValue {
                            field: attribute.to_string(),
                            value: value.to_string(),
                            ty: ty.name(),
                        }
                        .into());
                    }
                }
                Some(AttributeKind::Association { .. }) => {
                    return Err(ConfigurationError::NonScalarTarget {
                        path: attribute.to_string(),
                        segment: attribute.to_string(),
                    }
                    .into());
                }
                None => {
                    return Err(ConfigurationError::UnknownAttribute {
                        entity: model.name.clone(),
                        attribute: attribute.to_string(),
                        path: attribute.to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Copy the non-null values onto `record`; returns how many were set.
    pub(crate) fn apply(&self, record: &mut Record, model: &EntityModel) -> usize {
        let mut applied = 0;
        for (attribute, value) in self.non_null() {
            if *attribute == model.primary_key {
                continue;
            }
            record.set(attribute, value.clone());
            applied += 1;
        }

        applied
    }

    fn non_null(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter().filter(|(_, value)| !value.is_null())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::blog_metamodel;

    #[test]
    fn nulls_and_primary_key_are_skipped() {
        let metamodel = blog_metamodel();
        let model = metamodel.entity("Article").unwrap();
        let patch = RecordPatch::new()
            .set("id", 99)
            .set("title", "Renamed")
            .set("rating", Value::Null);

        let mut record = Record::new("Article", "id", 1).with("rating", 4.5);
        patch.validate(model).unwrap();
        let applied = patch.apply(&mut record, model);

        assert_eq!(applied, 1);
        assert_eq!(record.key(), &Value::Int(1));
        assert_eq!(record.scalar("title"), Some(&Value::from("Renamed")));
        assert_eq!(record.scalar("rating"), Some(&Value::Float(4.5)));
    }

    #[test]
    fn type_mismatches_are_rejected() {
        let metamodel = blog_metamodel();
        let model = metamodel.entity("Article").unwrap();

        let err = RecordPatch::new()
            .set("view_count", "many")
            .validate(model)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Operation(OperationError::UnsupportedPatchValue { .. })
        ));

        let err = RecordPatch::new()
            .set("status", Value::Enum("DELETED".into()))
            .validate(model)
            .unwrap_err();
        assert!(err.is_rejection());
    }

    #[test]
    fn unknown_and_association_attributes_are_rejected() {
        let metamodel = blog_metamodel();
        let model = metamodel.entity("Article").unwrap();

        assert!(RecordPatch::new().set("nope", 1).validate(model).is_err());
        assert!(RecordPatch::new().set("author", 1).validate(model).is_err());
        assert!(RecordPatch::new().set("author", Value::Null).validate(model).is_ok());
    }
}
