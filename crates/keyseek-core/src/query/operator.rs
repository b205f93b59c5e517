use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Operator
///
/// Closed operator set for conditions. Serialized in SCREAMING_SNAKE_CASE,
/// which is also the form used in error messages.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterEqualThan,
    LessThan,
    LessEqualThan,
    Contains,
    NotContains,
    StartsWith,
    NotStartsWith,
    EndsWith,
    NotEndsWith,
    IsNull,
    IsNotNull,
    In,
    NotIn,
    Between,
    NotBetween,
}

impl Operator {
    pub const ALL: [Self; 18] = [
        Self::Equals,
        Self::NotEquals,
        Self::GreaterThan,
        Self::GreaterEqualThan,
        Self::LessThan,
        Self::LessEqualThan,
        Self::Contains,
        Self::NotContains,
        Self::StartsWith,
        Self::NotStartsWith,
        Self::EndsWith,
        Self::NotEndsWith,
        Self::IsNull,
        Self::IsNotNull,
        Self::In,
        Self::NotIn,
        Self::Between,
        Self::NotBetween,
    ];

    #[must_use]
    pub const fn family(self) -> OperatorFamily {
        match self {
            Self::Equals | Self::NotEquals => OperatorFamily::Equality,
            Self::GreaterThan | Self::GreaterEqualThan | Self::LessThan | Self::LessEqualThan => {
                OperatorFamily::Ordering
            }
            Self::Contains
            | Self::NotContains
            | Self::StartsWith
            | Self::NotStartsWith
            | Self::EndsWith
            | Self::NotEndsWith => OperatorFamily::Pattern,
            Self::IsNull | Self::IsNotNull => OperatorFamily::Null,
            Self::In | Self::NotIn => OperatorFamily::Membership,
            Self::Between | Self::NotBetween => OperatorFamily::Range,
        }
    }

    /// True for the NOT_ variants, which compile to the negation of their base test.
    #[must_use]
    pub const fn is_negated(self) -> bool {
        matches!(
            self,
            Self::NotEquals
                | Self::NotContains
                | Self::NotStartsWith
                | Self::NotEndsWith
                | Self::IsNotNull
                | Self::NotIn
                | Self::NotBetween
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "EQUALS",
            Self::NotEquals => "NOT_EQUALS",
            Self::GreaterThan => "GREATER_THAN",
            Self::GreaterEqualThan => "GREATER_EQUAL_THAN",
            Self::LessThan => "LESS_THAN",
            Self::LessEqualThan => "LESS_EQUAL_THAN",
            Self::Contains => "CONTAINS",
            Self::NotContains => "NOT_CONTAINS",
            Self::StartsWith => "STARTS_WITH",
            Self::NotStartsWith => "NOT_STARTS_WITH",
            Self::EndsWith => "ENDS_WITH",
            Self::NotEndsWith => "NOT_ENDS_WITH",
            Self::IsNull => "IS_NULL",
            Self::IsNotNull => "IS_NOT_NULL",
            Self::In => "IN",
            Self::NotIn => "NOT_IN",
            Self::Between => "BETWEEN",
            Self::NotBetween => "NOT_BETWEEN",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// OperatorFamily
///
/// Groups operators that share value arity and field-type requirements.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperatorFamily {
    Equality,
    Ordering,
    Range,
    Pattern,
    Null,
    Membership,
}

impl OperatorFamily {
    #[must_use]
    pub const fn takes_value(self) -> bool {
        !matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn requires_ordering(self) -> bool {
        matches!(self, Self::Ordering | Self::Range)
    }

    #[must_use]
    pub const fn requires_text(self) -> bool {
        matches!(self, Self::Pattern)
    }
}
