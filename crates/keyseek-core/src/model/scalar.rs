use crate::value::Value;
use std::{fmt, sync::Arc};

///
/// ScalarType
///
/// Attribute type surface needed by coercion and operator validation.
/// Deliberately smaller than a full type system.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScalarType {
    Bool,
    Char,
    Date,
    DateTime,
    Enum(Arc<EnumModel>),
    Float,
    Int,
    Text,
}

impl ScalarType {
    /// Build an enum type from its declared variants.
    pub fn enumeration<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(Arc::new(EnumModel::new(name, variants)))
    }

    /// Ordering gate for GREATER/LESS and range operators.
    #[must_use]
    pub const fn supports_ordering(&self) -> bool {
        !matches!(self, Self::Bool)
    }

    /// Pattern operators are only defined over text.
    #[must_use]
    pub const fn is_textual(&self) -> bool {
        matches!(self, Self::Text)
    }

    /// Whether a native value can be stored in an attribute of this type.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null)
            | (Self::Bool, Value::Bool(_))
            | (Self::Char, Value::Char(_))
            | (Self::Date, Value::Date(_))
            | (Self::DateTime, Value::DateTime(_))
            | (Self::Float, Value::Float(_) | Value::Int(_))
            | (Self::Int, Value::Int(_))
            | (Self::Text, Value::Text(_)) => true,
            (Self::Enum(model), Value::Enum(variant)) => model.variants.contains(variant),
            _ => false,
        }
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Char => write!(f, "char"),
            Self::Date => write!(f, "date"),
            Self::DateTime => write!(f, "datetime"),
            Self::Enum(model) => write!(f, "enum {}", model.name),
            Self::Float => write!(f, "float"),
            Self::Int => write!(f, "int"),
            Self::Text => write!(f, "text"),
        }
    }
}

///
/// EnumModel
///
/// Declared variants of an enum attribute, in declaration order.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumModel {
    pub name: String,
    pub variants: Vec<String>,
}

impl EnumModel {
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }
}
