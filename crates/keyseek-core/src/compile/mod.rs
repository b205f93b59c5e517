//! Module: compile
//! Responsibility: filter tree → native predicate, including literal coercion
//! and LIKE pattern construction.
//! Does not own: field whitelists, join planning, or execution.
//! Boundary: the only place caller literals become native values.

mod coerce;
mod compiler;
mod pattern;


pub use coerce::{CoercionCache, Coercer};
pub use compiler::PredicateCompiler;
pub use pattern::{LIKE_ESCAPE, PatternShape, escape_like, like_pattern};
