//! Module: schema
//! Responsibility: explicit per-entity tables of searchable fields
//! (logical name → storage path, allowed operators, sortable flag).
//! Does not own: metamodel introspection or predicate construction.
//! Boundary: validated once at registration, then used to bind each request.

mod operators;


pub use operators::{OperatorSet, type_supports};

use crate::{
    error::{ConfigurationError, Error, ValidationError},
    model::{Metamodel, ScalarType},
    query::{Operator, SearchSpec, SortOrder, normalize},
};
use std::collections::BTreeMap;

///
/// FieldResolver
///
/// Maps a logical field name to its dot-separated storage path.
///

pub trait FieldResolver {
    fn resolve(&self, field: &str) -> Result<String, ConfigurationError>;
}

///
/// DirectPaths
///
/// Identity resolver for callers whose logical names already are storage paths.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct DirectPaths;

impl FieldResolver for DirectPaths {
    fn resolve(&self, field: &str) -> Result<String, ConfigurationError> {
        Ok(field.to_string())
    }
}

///
/// FieldDef
///
/// Declaration of one searchable field, before validation.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldDef {
    name: String,
    path: String,
    operators: Option<Vec<Operator>>,
    sortable: bool,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            operators: None,
            sortable: false,
        }
    }

    /// Restrict the field to an explicit operator set.
    #[must_use]
    pub fn operators(mut self, operators: impl IntoIterator<Item = Operator>) -> Self {
        self.operators = Some(operators.into_iter().collect());
        self
    }

    #[must_use]
    pub const fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }
}

///
/// SearchField
///
/// A validated searchable field.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchField {
    pub name: String,
    pub path: String,
    pub ty: ScalarType,
    pub operators: OperatorSet,
    pub sortable: bool,
    /// First collection-valued prefix on the path, if any.
    pub collection: Option<String>,
}

///
/// SearchSchema
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchSchema {
    entity: String,
    primary_key: String,
    fields: BTreeMap<String, SearchField>,
}

impl SearchSchema {
    pub fn builder(entity: impl Into<String>) -> SearchSchemaBuilder {
        SearchSchemaBuilder {
            entity: entity.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn entity(&self) -> &str {
        &self.entity
    }

    #[must_use]
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&SearchField> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &SearchField> {
        self.fields.values()
    }

    fn lookup(&self, name: &str) -> Result<&SearchField, ConfigurationError> {
        self.fields
            .get(name)
            .ok_or_else(|| ConfigurationError::UnknownField {
                field: name.to_string(),
            })
    }

    /// Bind a request to this schema.
    ///
    /// Resolves logical names to storage paths, enforces the operator and
    /// sortable whitelists, normalizes the filter tree and, when
    /// `tie_break` is set, appends the primary key so every sort is total.
    pub fn bind(&self, spec: SearchSpec, tie_break: bool) -> Result<SearchSpec, Error> {
        let SearchSpec {
            mut filter,
            sort,
            page,
            size,
        } = spec;

        for node in &mut filter {
            node.for_each_condition_mut(&mut |condition| -> Result<(), Error> {
                let field = self.lookup(&condition.field)?;
                if !field.operators.allows(condition.operator) {
                    return Err(ValidationError::OperatorNotAllowed {
                        field: condition.field.clone(),
                        operator: condition.operator,
                    }
                    .into());
                }
                condition.path = Some(field.path.clone());

                Ok(())
            })?;
        }

        let mut bound_sort = Vec::with_capacity(sort.len() + 1);
        for order in sort {
            let field = self.lookup(&order.field)?;
            if !field.sortable {
                return Err(ValidationError::NotSortable { field: order.field }.into());
            }
            if let Some(path) = &field.collection {
                return Err(ValidationError::CollectionSort {
                    field: order.field,
                    path: path.clone(),
                }
                .into());
            }
            let path = field.path.clone();
            bound_sort.push(order.with_path(path));
        }

        if tie_break
            && !bound_sort
                .iter()
                .any(|order| order.storage_path() == self.primary_key)
        {
            bound_sort.push(SortOrder::asc(&self.primary_key).with_path(&self.primary_key));
        }

        Ok(SearchSpec {
            filter: normalize(filter),
            sort: bound_sort,
            page,
            size,
        })
    }
}

impl FieldResolver for SearchSchema {
    fn resolve(&self, field: &str) -> Result<String, ConfigurationError> {
        self.lookup(field).map(|f| f.path.clone())
    }
}

///
/// SearchSchemaBuilder
///

#[derive(Clone, Debug)]
pub struct SearchSchemaBuilder {
    entity: String,
    fields: Vec<FieldDef>,
}

impl SearchSchemaBuilder {
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Validate every declaration against the metamodel.
    pub fn build(self, metamodel: &Metamodel) -> Result<SearchSchema, ConfigurationError> {
        let model = metamodel.entity(&self.entity)?;
        let mut fields = BTreeMap::new();

        for def in self.fields {
            let resolved = metamodel.resolve_path(&self.entity, &def.path)?;
            let operators = match def.operators {
                None => OperatorSet::defaults_for(&resolved.leaf),
                Some(declared) => {
                    if let Some(op) = declared
                        .iter()
                        .find(|op| !type_supports(&resolved.leaf, **op))
                    {
                        return Err(ConfigurationError::UnsupportedOperatorForType {
                            field: def.name,
                            operator: *op,
                            ty: resolved.leaf.name(),
                        });
                    }
                    declared.into_iter().collect()
                }
            };

            let field = SearchField {
                name: def.name.clone(),
                path: def.path,
                collection: resolved.collection_prefix().map(str::to_string),
                ty: resolved.leaf,
                operators,
                sortable: def.sortable,
            };

            if fields.insert(def.name.clone(), field).is_some() {
                return Err(ConfigurationError::DuplicateField {
                    entity: self.entity,
                    field: def.name,
                });
            }
        }

        Ok(SearchSchema {
            primary_key: model.primary_key.clone(),
            entity: self.entity,
            fields,
        })
    }
}
