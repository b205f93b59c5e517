use crate::query::operator::Operator;
use serde::{Deserialize, Serialize};

/// Caller-supplied literal as it arrived on the wire.
pub type Literal = serde_json::Value;

///
/// Combinator
///
/// How a node combines with whatever precedes it in its parent's list.
/// Absent on the first sibling.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    /// Effective fold operator for a combinator tag: OR only when tagged OR.
    #[must_use]
    pub const fn effective(tag: Option<Self>) -> Self {
        match tag {
            Some(Self::Or) => Self::Or,
            Some(Self::And) | None => Self::And,
        }
    }
}

///
/// Node
///
/// Filter tree node. The node set is closed; every consumer matches it exhaustively.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Condition(Condition),
    Group(Group),
}

impl Node {
    #[must_use]
    pub const fn combinator(&self) -> Option<Combinator> {
        match self {
            Self::Condition(condition) => condition.combinator,
            Self::Group(group) => group.combinator,
        }
    }

    pub const fn set_combinator(&mut self, combinator: Option<Combinator>) {
        match self {
            Self::Condition(condition) => condition.combinator = combinator,
            Self::Group(group) => group.combinator = combinator,
        }
    }

    #[must_use]
    pub fn with_combinator(mut self, combinator: Option<Combinator>) -> Self {
        self.set_combinator(combinator);
        self
    }

    #[must_use]
    pub fn and(self) -> Self {
        self.with_combinator(Some(Combinator::And))
    }

    #[must_use]
    pub fn or(self) -> Self {
        self.with_combinator(Some(Combinator::Or))
    }

    /// Visit every condition in the subtree, depth first.
    pub fn for_each_condition<'a>(&'a self, f: &mut impl FnMut(&'a Condition)) {
        match self {
            Self::Condition(condition) => f(condition),
            Self::Group(group) => {
                for child in &group.children {
                    child.for_each_condition(f);
                }
            }
        }
    }

    /// Mutable variant of [`Node::for_each_condition`].
    pub fn for_each_condition_mut<E>(
        &mut self,
        f: &mut impl FnMut(&mut Condition) -> Result<(), E>,
    ) -> Result<(), E> {
        match self {
            Self::Condition(condition) => f(condition),
            Self::Group(group) => {
                for child in &mut group.children {
                    child.for_each_condition_mut(f)?;
                }
                Ok(())
            }
        }
    }
}

impl From<Condition> for Node {
    fn from(condition: Condition) -> Self {
        Self::Condition(condition)
    }
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

///
/// Condition
///
/// A single field/operator/value test. `path` is filled in by field
/// resolution; a JSON `null` value is treated as no value at all.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Condition {
    pub field: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    pub operator: Operator,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Literal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_to: Option<Literal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combinator: Option<Combinator>,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator) -> Self {
        Self {
            field: field.into(),
            path: None,
            operator,
            value: None,
            value_to: None,
            combinator: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<Literal>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_range(mut self, from: impl Into<Literal>, to: impl Into<Literal>) -> Self {
        self.value = Some(from.into());
        self.value_to = Some(to.into());
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Primary value, with JSON `null` folded into "absent".
    #[must_use]
    pub fn primary(&self) -> Option<&Literal> {
        self.value.as_ref().filter(|v| !v.is_null())
    }

    /// Secondary (upper bound) value, with JSON `null` folded into "absent".
    #[must_use]
    pub fn secondary(&self) -> Option<&Literal> {
        self.value_to.as_ref().filter(|v| !v.is_null())
    }

    /// Storage path if resolved, else the logical field name.
    #[must_use]
    pub fn storage_path(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.field)
    }
}

///
/// Group
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Group {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combinator: Option<Combinator>,

    #[serde(default)]
    pub children: Vec<Node>,
}

impl Group {
    #[must_use]
    pub const fn new(children: Vec<Node>) -> Self {
        Self {
            combinator: None,
            children,
        }
    }
}
