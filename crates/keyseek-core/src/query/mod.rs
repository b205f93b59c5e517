//! Module: query
//! Responsibility: the serializable filter/sort model and its normalization rules.
//! Does not own: field resolution, compilation, or execution.
//! Boundary: the shape external collaborators hand to the engine.

mod node;
mod normalize;
mod operator;
mod sort;
mod spec;

pub use node::{Combinator, Condition, Group, Literal, Node};
pub use normalize::normalize;
pub use operator::{Operator, OperatorFamily};
pub use sort::{SortDirection, SortOrder};
pub use spec::SearchSpec;
