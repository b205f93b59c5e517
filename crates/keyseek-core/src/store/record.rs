use crate::{error::StoreError, value::Value};
use std::collections::BTreeMap;

static NULL: Value = Value::Null;

///
/// FieldValue
///
/// Materialized attribute of a record: a scalar, a to-one association, or a
/// to-many association.
///

#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Scalar(Value),
    One(Option<Box<Record>>),
    Many(Vec<Record>),
}

///
/// Record
///
/// One persisted entity instance with its associations materialized.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    entity: String,
    key_field: String,
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new(
        entity: impl Into<String>,
        key_field: impl Into<String>,
        key: impl Into<Value>,
    ) -> Self {
        let key_field = key_field.into();
        let mut fields = BTreeMap::new();
        fields.insert(key_field.clone(), FieldValue::Scalar(key.into()));

        Self {
            entity: entity.into(),
            key_field,
            fields,
        }
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value.into());
        self
    }

    #[must_use]
    pub fn with_one(mut self, name: impl Into<String>, record: Option<Self>) -> Self {
        self.fields
            .insert(name.into(), FieldValue::One(record.map(Box::new)));
        self
    }

    #[must_use]
    pub fn with_many(mut self, name: impl Into<String>, records: Vec<Self>) -> Self {
        self.fields.insert(name.into(), FieldValue::Many(records));
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), FieldValue::Scalar(value));
    }

    #[must_use]
    pub fn entity(&self) -> &str {
        &self.entity
    }

    #[must_use]
    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    #[must_use]
    pub fn key(&self) -> &Value {
        self.scalar(&self.key_field).unwrap_or(&NULL)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn scalar(&self, name: &str) -> Option<&Value> {
        match self.fields.get(name) {
            Some(FieldValue::Scalar(value)) => Some(value),
            _ => None,
        }
    }

    /// Extract the single native value at `path`, following to-one
    /// associations. A missing association or attribute yields `Null`;
    /// crossing a to-many association is an error.
    pub fn value_at(&self, path: &str) -> Result<Value, StoreError> {
        let mut current = self;
        let mut segments = path.split('.').peekable();

        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                return Ok(current.scalar(segment).cloned().unwrap_or(Value::Null));
            }

            match current.fields.get(segment) {
                Some(FieldValue::One(Some(next))) => current = next,
                Some(FieldValue::Many(_)) => {
                    return Err(StoreError::UnjoinedCollection {
                        path: path.to_string(),
                        segment: segment.to_string(),
                    });
                }
                _ => return Ok(Value::Null),
            }
        }

        Ok(Value::Null)
    }
}
