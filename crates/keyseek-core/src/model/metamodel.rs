use crate::{
    error::ConfigurationError,
    model::{
        entity::{AttributeKind, Cardinality, EntityModel},
        scalar::ScalarType,
    },
};
use std::collections::{BTreeMap, BTreeSet};

///
/// Metamodel
///
/// Registry of entity models. Answers the two questions the planner and the
/// compiler ask: what type sits at the end of a path, and which prefixes of
/// that path traverse single- or collection-valued associations.
///

#[derive(Clone, Debug, Default)]
pub struct Metamodel {
    entities: BTreeMap<String, EntityModel>,
}

impl Metamodel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, model: EntityModel) -> Self {
        self.register(model);
        self
    }

    pub fn register(&mut self, model: EntityModel) {
        self.entities.insert(model.name.clone(), model);
    }

    pub fn entity(&self, name: &str) -> Result<&EntityModel, ConfigurationError> {
        self.entities
            .get(name)
            .ok_or_else(|| ConfigurationError::UnknownEntity {
                entity: name.to_string(),
            })
    }

    /// Resolve a dot-separated storage path starting at `root`.
    pub fn resolve_path(&self, root: &str, path: &str) -> Result<ResolvedPath, ConfigurationError> {
        let mut entity = self.entity(root)?;
        let mut steps = Vec::new();
        let segments: Vec<&str> = path.split('.').collect();
        let last = segments.len() - 1;

        for (i, segment) in segments.iter().enumerate() {
            let kind = entity
                .attribute(segment)
                .ok_or_else(|| ConfigurationError::UnknownAttribute {
                    entity: entity.name.clone(),
                    attribute: (*segment).to_string(),
                    path: path.to_string(),
                })?;

            match kind {
                AttributeKind::Scalar(ty) if i == last => {
                    return Ok(ResolvedPath {
                        path: path.to_string(),
                        steps,
                        leaf: ty.clone(),
                    });
                }
                AttributeKind::Scalar(_) => {
                    return Err(ConfigurationError::NotAnAssociation {
                        path: path.to_string(),
                        segment: (*segment).to_string(),
                    });
                }
                AttributeKind::Association { .. } if i == last => {
                    return Err(ConfigurationError::NonScalarTarget {
                        path: path.to_string(),
                        segment: (*segment).to_string(),
                    });
                }
                AttributeKind::Association {
                    target,
                    cardinality,
                } => {
                    steps.push(PathStep {
                        prefix: segments[..=i].join("."),
                        target: target.clone(),
                        cardinality: *cardinality,
                    });
                    entity = self.entity(target)?;
                }
            }
        }

        // split always yields at least one segment, so the loop returns
        Err(ConfigurationError::UnknownAttribute {
            entity: root.to_string(),
            attribute: path.to_string(),
            path: path.to_string(),
        })
    }

    /// Check every registered entity: primary keys are scalar and every
    /// association target is registered.
    ///
    /// The association graph is walked from each entity with a visited set so
    /// self-referential and cyclic graphs terminate.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for model in self.entities.values() {
            if !matches!(
                model.attribute(&model.primary_key),
                Some(AttributeKind::Scalar(_))
            ) {
                return Err(ConfigurationError::InvalidPrimaryKey {
                    entity: model.name.clone(),
                    field: model.primary_key.clone(),
                });
            }
        }

        let mut visited = BTreeSet::new();
        for name in self.entities.keys() {
            self.walk(name, &mut visited)?;
        }

        Ok(())
    }

    fn walk<'a>(
        &'a self,
        name: &'a str,
        visited: &mut BTreeSet<&'a str>,
    ) -> Result<(), ConfigurationError> {
        if !visited.insert(name) {
            return Ok(());
        }

        let model = self.entity(name)?;
        for (attribute, target, _) in model.associations() {
            if !self.entities.contains_key(target) {
                return Err(ConfigurationError::DanglingAssociation {
                    entity: model.name.clone(),
                    attribute: attribute.to_string(),
                    target: target.to_string(),
                });
            }
            self.walk(target, visited)?;
        }

        Ok(())
    }
}

///
/// PathStep
///
/// One association traversal along a resolved path.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PathStep {
    /// Path prefix up to and including this association, e.g. `author.org`.
    pub prefix: String,
    pub target: String,
    pub cardinality: Cardinality,
}

///
/// ResolvedPath
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedPath {
    pub path: String,
    pub steps: Vec<PathStep>,
    pub leaf: ScalarType,
}

impl ResolvedPath {
    /// First collection-valued prefix along the path, if any.
    #[must_use]
    pub fn collection_prefix(&self) -> Option<&str> {
        self.steps
            .iter()
            .find(|step| step.cardinality == Cardinality::Many)
            .map(|step| step.prefix.as_str())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::blog_metamodel;

    #[test]
    fn resolves_scalar_path_across_associations() {
        let metamodel = blog_metamodel();
        let resolved = metamodel
            .resolve_path("Article", "author.organization.name")
            .expect("path should resolve");

        assert_eq!(resolved.leaf, ScalarType::Text);
        assert_eq!(
            resolved
                .steps
                .iter()
                .map(|s| s.prefix.as_str())
                .collect::<Vec<_>>(),
            vec!["author", "author.organization"]
        );
        assert_eq!(resolved.collection_prefix(), None);
    }

    #[test]
    fn collection_prefix_is_reported() {
        let metamodel = blog_metamodel();
        let resolved = metamodel
            .resolve_path("Article", "tags.label")
            .expect("path should resolve");

        assert_eq!(resolved.collection_prefix(), Some("tags"));
    }

    #[test]
    fn unknown_attribute_names_the_segment() {
        let metamodel = blog_metamodel();
        let err = metamodel
            .resolve_path("Article", "author.nickname")
            .unwrap_err();

        assert_eq!(
            err,
            ConfigurationError::UnknownAttribute {
                entity: "Author".into(),
                attribute: "nickname".into(),
                path: "author.nickname".into(),
            }
        );
    }

    #[test]
    fn association_leaf_is_rejected() {
        let metamodel = blog_metamodel();
        let err = metamodel.resolve_path("Article", "author").unwrap_err();

        assert!(matches!(err, ConfigurationError::NonScalarTarget { .. }));
    }

    #[test]
    fn scalar_cannot_be_traversed() {
        let metamodel = blog_metamodel();
        let err = metamodel.resolve_path("Article", "title.length").unwrap_err();

        assert!(matches!(err, ConfigurationError::NotAnAssociation { .. }));
    }

    #[test]
    fn validate_terminates_on_self_reference() {
        let metamodel = blog_metamodel();

        metamodel.validate().expect("cyclic graph should validate");
    }

    #[test]
    fn validate_reports_dangling_targets() {
        let metamodel = Metamodel::new().with(
            EntityModel::builder("Orphan", "id")
                .scalar("id", ScalarType::Int)
                .one("parent", "Missing")
                .build(),
        );

        let err = metamodel.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::DanglingAssociation { ref target, .. } if target == "Missing"
        ));
    }
}
