use crate::value::Value;
use std::{
    fmt,
    ops::{BitAnd, BitOr, Not},
};

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

///
/// Expr
///
/// The store's native boolean predicate algebra. Paths are storage paths
/// relative to the query root; evaluation follows SQL three-valued logic.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    True,
    False,
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
    Compare {
        path: String,
        op: CompareOp,
        value: Value,
    },
    Between {
        path: String,
        low: Value,
        high: Value,
    },
    Like {
        path: String,
        pattern: String,
        escape: char,
        case_insensitive: bool,
    },
    IsNull {
        path: String,
    },
    IsNotNull {
        path: String,
    },
    In {
        path: String,
        values: Vec<Value>,
    },
}

impl Expr {
    // --- Logical ---

    /// Conjunction; nested conjunctions are flattened.
    #[must_use]
    pub fn and(self, rhs: Self) -> Self {
        let mut children = match self {
            Self::And(children) => children,
            other => vec![other],
        };
        match rhs {
            Self::And(more) => children.extend(more),
            other => children.push(other),
        }

        Self::And(children)
    }

    /// Disjunction; nested disjunctions are flattened.
    #[must_use]
    pub fn or(self, rhs: Self) -> Self {
        let mut children = match self {
            Self::Or(children) => children,
            other => vec![other],
        };
        match rhs {
            Self::Or(more) => children.extend(more),
            other => children.push(other),
        }

        Self::Or(children)
    }

    /// Conjunction of all parts; `True` when empty.
    #[must_use]
    pub fn all(parts: Vec<Self>) -> Self {
        parts.into_iter().reduce(Self::and).unwrap_or(Self::True)
    }

    /// Disjunction of all parts; `False` when empty.
    #[must_use]
    pub fn any(parts: Vec<Self>) -> Self {
        parts.into_iter().reduce(Self::or).unwrap_or(Self::False)
    }

    #[must_use]
    pub fn negate(self) -> Self {
        match self {
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }

    // --- Comparison ---

    pub fn compare(path: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Compare {
            path: path.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Eq, value)
    }

    pub fn ne(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Ne, value)
    }

    pub fn lt(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Lt, value)
    }

    pub fn le(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Le, value)
    }

    pub fn gt(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Gt, value)
    }

    pub fn ge(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Ge, value)
    }

    pub fn between(path: impl Into<String>, low: Value, high: Value) -> Self {
        Self::Between {
            path: path.into(),
            low,
            high,
        }
    }

    // --- Text / Null / Membership ---

    pub fn like_ci(path: impl Into<String>, pattern: impl Into<String>, escape: char) -> Self {
        Self::Like {
            path: path.into(),
            pattern: pattern.into(),
            escape,
            case_insensitive: true,
        }
    }

    pub fn is_null(path: impl Into<String>) -> Self {
        Self::IsNull { path: path.into() }
    }

    pub fn is_not_null(path: impl Into<String>) -> Self {
        Self::IsNotNull { path: path.into() }
    }

    pub fn in_list(path: impl Into<String>, values: Vec<Value>) -> Self {
        Self::In {
            path: path.into(),
            values,
        }
    }
}

impl BitAnd for Expr {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl BitOr for Expr {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl Not for Expr {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, parts: &[Expr], sep: &str) -> fmt::Result {
            write!(f, "(")?;
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    write!(f, " {sep} ")?;
                }
                write!(f, "{part}")?;
            }
            write!(f, ")")
        }

        match self {
            Self::True => write!(f, "TRUE"),
            Self::False => write!(f, "FALSE"),
            Self::And(parts) => join(f, parts, "AND"),
            Self::Or(parts) => join(f, parts, "OR"),
            Self::Not(inner) => write!(f, "NOT {inner}"),
            Self::Compare { path, op, value } => write!(f, "{path} {} {value}", op.symbol()),
            Self::Between { path, low, high } => write!(f, "{path} BETWEEN {low} AND {high}"),
            Self::Like {
                path,
                pattern,
                escape,
                case_insensitive,
            } => {
                let op = if *case_insensitive { "ILIKE" } else { "LIKE" };
                write!(f, "{path} {op} '{pattern}' ESCAPE '{escape}'")
            }
            Self::IsNull { path } => write!(f, "{path} IS NULL"),
            Self::IsNotNull { path } => write!(f, "{path} IS NOT NULL"),
            Self::In { path, values } => write!(f, "{path} IN {}", Value::List(values.clone())),
        }
    }
}
