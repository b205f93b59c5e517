use crate::value::Value;
use std::cmp::Ordering;

/// Strict comparator used by predicate evaluation.
///
/// Returns `None` for nulls, mismatched variants and NaN floats.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn strict_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Char(a), Value::Char(b)) => Some(a.cmp(b)),
        (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
        (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
        (Value::Enum(a), Value::Enum(b)) | (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
        (Value::List(a), Value::List(b)) => strict_cmp_list(a, b),
        _ => None,
    }
}

fn strict_cmp_list(left: &[Value], right: &[Value]) -> Option<Ordering> {
    for (a, b) in left.iter().zip(right) {
        match strict_cmp(a, b)? {
            Ordering::Equal => {}
            other => return Some(other),
        }
    }

    Some(left.len().cmp(&right.len()))
}

/// Total canonical comparator used for sorting.
///
/// Ordering rules:
/// 1. Null sorts lowest
/// 2. Canonical variant rank (Int and Float share the numeric rank)
/// 3. Variant-specific comparison for same-ranked values
///
/// Must agree with [`strict_cmp`] wherever the latter is defined, otherwise
/// seek predicates and store ordering would disagree on the boundary.
#[must_use]
pub fn canonical_cmp(left: &Value, right: &Value) -> Ordering {
    let rank = canonical_rank(left).cmp(&canonical_rank(right));
    if rank != Ordering::Equal {
        return rank;
    }

    match (left, right) {
        (Value::Float(a), Value::Float(b)) => unsigned_zero(*a).total_cmp(&unsigned_zero(*b)),
        (Value::List(a), Value::List(b)) => a
            .iter()
            .zip(b)
            .map(|(x, y)| canonical_cmp(x, y))
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len())),
        _ => strict_cmp(left, right).unwrap_or(Ordering::Equal),
    }
}

// total_cmp orders -0.0 below 0.0; strict comparison treats them as equal
fn unsigned_zero(f: f64) -> f64 {
    if f == 0.0 { 0.0 } else { f }
}

const fn canonical_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Int(_) | Value::Float(_) => 2,
        Value::Char(_) => 3,
        Value::Text(_) => 4,
        Value::Enum(_) => 5,
        Value::Date(_) => 6,
        Value::DateTime(_) => 7,
        Value::List(_) => 8,
    }
}
