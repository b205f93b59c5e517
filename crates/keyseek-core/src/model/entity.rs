use crate::model::scalar::ScalarType;
use derive_more::Display;
use std::collections::BTreeMap;

///
/// Cardinality
///
/// Association multiplicity as seen from the owning entity.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Cardinality {
    One,
    Many,
}

///
/// AttributeKind
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AttributeKind {
    Scalar(ScalarType),
    Association {
        target: String,
        cardinality: Cardinality,
    },
}

impl AttributeKind {
    #[must_use]
    pub const fn scalar_type(&self) -> Option<&ScalarType> {
        match self {
            Self::Scalar(ty) => Some(ty),
            Self::Association { .. } => None,
        }
    }
}

///
/// EntityModel
/// Runtime metadata for one persisted entity type.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EntityModel {
    /// Stable external name used by schemas and stores.
    pub name: String,
    /// Primary key attribute (points at an entry in `attributes`).
    pub primary_key: String,
    pub attributes: BTreeMap<String, AttributeKind>,
}

impl EntityModel {
    pub fn builder(name: impl Into<String>, primary_key: impl Into<String>) -> EntityModelBuilder {
        EntityModelBuilder {
            model: Self {
                name: name.into(),
                primary_key: primary_key.into(),
                attributes: BTreeMap::new(),
            },
        }
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeKind> {
        self.attributes.get(name)
    }

    /// Scalar attribute names, used when copying patch values.
    pub fn scalar_attributes(&self) -> impl Iterator<Item = (&str, &ScalarType)> {
        self.attributes
            .iter()
            .filter_map(|(name, kind)| kind.scalar_type().map(|ty| (name.as_str(), ty)))
    }

    /// Association targets in attribute order.
    pub fn associations(&self) -> impl Iterator<Item = (&str, &str, Cardinality)> {
        self.attributes.iter().filter_map(|(name, kind)| match kind {
            AttributeKind::Association {
                target,
                cardinality,
            } => Some((name.as_str(), target.as_str(), *cardinality)),
            AttributeKind::Scalar(_) => None,
        })
    }
}

///
/// EntityModelBuilder
///

#[derive(Debug)]
pub struct EntityModelBuilder {
    model: EntityModel,
}

impl EntityModelBuilder {
    #[must_use]
    pub fn scalar(mut self, name: impl Into<String>, ty: ScalarType) -> Self {
        self.model
            .attributes
            .insert(name.into(), AttributeKind::Scalar(ty));
        self
    }

    #[must_use]
    pub fn one(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.model.attributes.insert(
            name.into(),
            AttributeKind::Association {
                target: target.into(),
                cardinality: Cardinality::One,
            },
        );
        self
    }

    #[must_use]
    pub fn many(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.model.attributes.insert(
            name.into(),
            AttributeKind::Association {
                target: target.into(),
                cardinality: Cardinality::Many,
            },
        );
        self
    }

    #[must_use]
    pub fn build(self) -> EntityModel {
        self.model
    }
}
