use crate::{
    error::StoreError,
    query::SortDirection,
    store::{Expr, OrderTerm, Record},
    value::Value,
};
use derive_more::Deref;
use serde::{Deserialize, Serialize};

///
/// Cursor
///
/// Sort-key values of one record, one per order term, in order.
///

#[derive(Clone, Debug, Deref, Deserialize, PartialEq, Serialize)]
pub struct Cursor(Vec<Value>);

impl Cursor {
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Extract the cursor of `record` under `order`.
    pub fn from_record(record: &Record, order: &[OrderTerm]) -> Result<Self, StoreError> {
        order
            .iter()
            .map(|term| record.value_at(&term.path))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.0
    }
}

///
/// SeekDirection
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SeekDirection {
    #[default]
    Forward,
    Backward,
}

/// Predicate matching every row strictly after (or, backward, strictly
/// before) `cursor` under `order`.
///
/// Expands to the usual disjunction of conjunctions: for each key `i`, the
/// keys before `i` equal the cursor and key `i` is strictly beyond it.
/// Nulls sort lowest, so a null cursor value equals only null, every
/// non-null value is greater than it, and nothing is less.
#[must_use]
pub fn seek_predicate(order: &[OrderTerm], cursor: &Cursor, direction: SeekDirection) -> Expr {
    let backward = direction == SeekDirection::Backward;
    let mut disjuncts = Vec::with_capacity(order.len());

    for (i, (term, value)) in order.iter().zip(cursor.iter()).enumerate() {
        let greater = (term.direction == SortDirection::Asc) != backward;
        let Some(beyond) = strictly_beyond(&term.path, value, greater) else {
            continue;
        };

        let mut conjuncts: Vec<Expr> = order
            .iter()
            .zip(cursor.iter())
            .take(i)
            .map(|(prior, prior_value)| equal_to(&prior.path, prior_value))
            .collect();
        conjuncts.push(beyond);

        disjuncts.push(Expr::all(conjuncts));
    }

    Expr::any(disjuncts)
}

fn equal_to(path: &str, value: &Value) -> Expr {
    if value.is_null() {
        Expr::is_null(path)
    } else {
        Expr::eq(path, value.clone())
    }
}

fn strictly_beyond(path: &str, value: &Value, greater: bool) -> Option<Expr> {
    match (value.is_null(), greater) {
        (true, true) => Some(Expr::is_not_null(path)),
        (true, false) => None,
        (false, true) => Some(Expr::gt(path, value.clone())),
        (false, false) => Some(Expr::lt(path, value.clone()) | Expr::is_null(path)),
    }
}

///
/// TESTS
///
