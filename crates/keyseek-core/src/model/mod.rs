//! Module: model
//! Responsibility: entity metamodel introspection (attribute types, association cardinality).
//! Does not own: searchable-field whitelists (see `schema`) or record storage.
//! Boundary: read-only metadata consumed by the join planner and the predicate compiler.

pub mod entity;
pub mod metamodel;
pub mod scalar;

pub use entity::{AttributeKind, Cardinality, EntityModel, EntityModelBuilder};
pub use metamodel::{Metamodel, PathStep, ResolvedPath};
pub use scalar::{EnumModel, ScalarType};
