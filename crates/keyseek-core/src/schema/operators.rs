use crate::{model::ScalarType, query::Operator};
use derive_more::{Deref, IntoIterator};
use std::collections::BTreeSet;

///
/// OperatorSet
///
/// Operators a search field accepts.
///

#[derive(Clone, Debug, Default, Deref, Eq, IntoIterator, PartialEq)]
pub struct OperatorSet(BTreeSet<Operator>);

impl OperatorSet {
    /// Every operator the scalar type can support.
    #[must_use]
    pub fn defaults_for(ty: &ScalarType) -> Self {
        Operator::ALL
            .into_iter()
            .filter(|op| type_supports(ty, *op))
            .collect()
    }

    #[must_use]
    pub fn allows(&self, operator: Operator) -> bool {
        self.0.contains(&operator)
    }
}

impl FromIterator<Operator> for OperatorSet {
    fn from_iter<I: IntoIterator<Item = Operator>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Type-capability check shared by schema validation and the compiler.
#[must_use]
pub fn type_supports(ty: &ScalarType, operator: Operator) -> bool {
    let family = operator.family();

    (!family.requires_ordering() || ty.supports_ordering())
        && (!family.requires_text() || ty.is_textual())
}

///
/// TESTS
///
