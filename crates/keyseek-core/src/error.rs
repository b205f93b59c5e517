use crate::query::Operator;
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Crate-level error. Each kind wraps transparently so the original message
/// (naming field, operator and value) reaches the caller untouched.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Configuration(_) => ErrorClass::Configuration,
            Self::Operation(_) => ErrorClass::Operation,
            Self::Parse(_) => ErrorClass::Parse,
            Self::Store(_) => ErrorClass::Store,
            Self::Validation(_) => ErrorClass::Validation,
        }
    }

    /// True when the error should surface as a rejection of the caller's
    /// request rather than as a server-side failure.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self.class(),
            ErrorClass::Operation | ErrorClass::Parse | ErrorClass::Validation
        )
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorClass {
    Configuration,
    Operation,
    Parse,
    Store,
    Validation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configuration => "configuration",
            Self::Operation => "operation",
            Self::Parse => "parse",
            Self::Store => "store",
            Self::Validation => "validation",
        };

        write!(f, "{label}")
    }
}

///
/// ConfigurationError
///
/// Caller or deployment defects: unresolvable fields and paths, schemas that
/// disagree with the metamodel, invalid engine configuration.
///

#[remain::sorted]
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConfigurationError {
    #[error("entity '{entity}' association '{attribute}' targets unknown entity '{target}'")]
    DanglingAssociation {
        entity: String,
        attribute: String,
        target: String,
    },

    #[error("search schema for '{entity}' declares field '{field}' twice")]
    DuplicateField { entity: String, field: String },

    #[error("invalid engine configuration: {message}")]
    InvalidConfig { message: String },

    #[error("entity '{entity}' declares primary key '{field}' that is not a scalar attribute")]
    InvalidPrimaryKey { entity: String, field: String },

    #[error("path '{path}' ends at association '{segment}'; a scalar attribute is required")]
    NonScalarTarget { path: String, segment: String },

    #[error("path '{path}' traverses scalar attribute '{segment}' as if it were an association")]
    NotAnAssociation { path: String, segment: String },

    #[error("no search schema registered for entity '{entity}'")]
    SchemaNotRegistered { entity: String },

    #[error("entity '{entity}' has no attribute '{attribute}' (path '{path}')")]
    UnknownAttribute {
        entity: String,
        attribute: String,
        path: String,
    },

    #[error("unknown entity '{entity}'")]
    UnknownEntity { entity: String },

    #[error("unknown search field '{field}'")]
    UnknownField { field: String },

    #[error("field '{field}' declares operator {operator} which {ty} values do not support")]
    UnsupportedOperatorForType {
        field: String,
        operator: Operator,
        ty: String,
    },
}

///
/// OperationError
///
/// A condition cannot be translated: bad arity, incompatible field type,
/// failed coercion or an empty membership collection.
///

#[remain::sorted]
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum OperationError {
    #[error("{operator} on field '{field}' cannot coerce value {value}: {source}")]
    Coercion {
        field: String,
        operator: Operator,
        value: String,
        source: ParseError,
    },

    #[error("{operator} on field '{field}' requires a non-empty collection")]
    EmptyCollection { field: String, operator: Operator },

    #[error("{operator} on field '{field}' requires a value")]
    MissingValue { field: String, operator: Operator },

    #[error("{operator} on field '{field}' requires a collection, got {value}")]
    NotACollection {
        field: String,
        operator: Operator,
        value: String,
    },

    #[error("{operator} on field '{field}' requires a text field, found {ty}")]
    NotTextual {
        field: String,
        operator: Operator,
        ty: String,
    },

    #[error("{operator} on field '{field}' requires exactly two bounds, got {value}")]
    RangeArity {
        field: String,
        operator: Operator,
        value: String,
    },

    #[error("{operator} on field '{field}' takes no value, got {value}")]
    UnexpectedValue {
        field: String,
        operator: Operator,
        value: String,
    },

    #[error("{operator} on field '{field}' requires an orderable type, found {ty}")]
    Unorderable {
        field: String,
        operator: Operator,
        ty: String,
    },

    #[error("patch value {value} does not fit {ty} attribute '{field}'")]
    UnsupportedPatchValue {
        field: String,
        value: String,
        ty: String,
    },
}

///
/// ValidationError
///
/// Requests that are well-formed but break a declared rule of the schema or
/// the pagination contract.
///

#[remain::sorted]
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ValidationError {
    #[error("sort field '{field}' crosses collection-valued path '{path}'")]
    CollectionSort { field: String, path: String },

    #[error("cursor carries {found} values but the sort has {expected} keys")]
    CursorArity { expected: usize, found: usize },

    #[error("cursor value {value} at position {position} does not fit {ty} sort key '{path}'")]
    CursorValue {
        position: usize,
        path: String,
        value: String,
        ty: String,
    },

    #[error("paged searches require a non-empty sort")]
    EmptySort,

    #[error("field '{field}' is not sortable")]
    NotSortable { field: String },

    #[error("operator {operator} is not allowed on field '{field}'")]
    OperatorNotAllowed { field: String, operator: Operator },

    #[error("page size {size} exceeds the maximum of {max}")]
    PageSizeTooLarge { size: i64, max: u32 },
}

///
/// ParseError
///
/// A textual or JSON literal cannot be converted to the target type.
///

#[remain::sorted]
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ParseError {
    #[error("'{value}' is not a boolean")]
    InvalidBoolean { value: String },

    #[error("'{value}' is not a single character")]
    InvalidChar { value: String },

    #[error("'{value}' is not a valid {ty}")]
    InvalidNumber { value: String, ty: &'static str },

    #[error("'{value}' does not match any known {ty} format")]
    InvalidTemporal { value: String, ty: &'static str },

    #[error("expected {expected}, got {value}")]
    UnexpectedLiteral { value: String, expected: &'static str },

    #[error("'{value}' is not a variant of enum {name}")]
    UnknownEnumVariant { value: String, name: String },
}

///
/// StoreError
///
/// Failures reported by the underlying store.
///

#[remain::sorted]
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum StoreError {
    #[error("store backend failure: {message}")]
    Backend { message: String },

    #[error("path '{path}' crosses collection '{segment}' without a join")]
    UnjoinedCollection { path: String, segment: String },
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}
