use crate::{
    error::ConfigurationError,
    model::{Cardinality, Metamodel, PathStep},
};
use std::collections::{BTreeMap, BTreeSet};

///
/// JoinKind
///
/// `Fetch` joins also materialize the association on the returned root;
/// `Plain` joins exist only so predicates can reach across them.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum JoinKind {
    Fetch,
    Plain,
}

///
/// QueryPurpose
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QueryPurpose {
    Select,
    Count,
}

///
/// Join
///
/// One LEFT join along an association path prefix.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Join {
    pub path: String,
    pub target: String,
    pub kind: JoinKind,
    pub cardinality: Cardinality,
}

impl Join {
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.matches('.').count()
    }

    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.cardinality == Cardinality::Many
    }
}

///
/// JoinPlan
///
/// Joins ordered parent-before-child, at most one per path prefix.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct JoinPlan {
    joins: Vec<Join>,
    distinct: bool,
}

impl JoinPlan {
    #[must_use]
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    /// Set whenever a collection join can multiply root rows.
    #[must_use]
    pub const fn distinct(&self) -> bool {
        self.distinct
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Join> {
        self.joins.iter().find(|join| join.path == path)
    }

    pub fn collection_joins(&self) -> impl Iterator<Item = &Join> {
        self.joins.iter().filter(|join| join.is_collection())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joins.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.joins.len()
    }
}

///
/// JoinPlanner
///
/// Derives the join set for one query root from the storage paths its
/// filter and sort reference.
///

#[derive(Clone, Copy, Debug)]
pub struct JoinPlanner<'m> {
    metamodel: &'m Metamodel,
    root: &'m str,
}

impl<'m> JoinPlanner<'m> {
    #[must_use]
    pub const fn new(metamodel: &'m Metamodel, root: &'m str) -> Self {
        Self { metamodel, root }
    }

    /// Plan joins for `paths`.
    ///
    /// Single-valued associations are fetched; only the first collection in
    /// (depth, path) order is fetched, later ones stay plain, and anything
    /// below a plain join stays plain. Count queries never fetch.
    pub fn plan<'p>(
        &self,
        paths: impl IntoIterator<Item = &'p str>,
        purpose: QueryPurpose,
    ) -> Result<JoinPlan, ConfigurationError> {
        let mut steps: BTreeMap<String, PathStep> = BTreeMap::new();
        for path in paths.into_iter().collect::<BTreeSet<_>>() {
            let resolved = self.metamodel.resolve_path(self.root, path)?;
            for step in resolved.steps {
                steps.entry(step.prefix.clone()).or_insert(step);
            }
        }

        let mut ordered: Vec<PathStep> = steps.into_values().collect();
        ordered.sort_by(|a, b| {
            depth(&a.prefix)
                .cmp(&depth(&b.prefix))
                .then_with(|| a.prefix.cmp(&b.prefix))
        });

        let mut joins = Vec::with_capacity(ordered.len());
        let mut plain: BTreeSet<String> = BTreeSet::new();
        let mut fetched_collection = false;

        for step in ordered {
            let below_plain = plain
                .iter()
                .any(|prefix| is_descendant(&step.prefix, prefix));

            let kind = if purpose == QueryPurpose::Count || below_plain {
                JoinKind::Plain
            } else {
                match step.cardinality {
                    Cardinality::One => JoinKind::Fetch,
                    Cardinality::Many if !fetched_collection => {
                        fetched_collection = true;
                        JoinKind::Fetch
                    }
                    Cardinality::Many => JoinKind::Plain,
                }
            };

            if kind == JoinKind::Plain {
                plain.insert(step.prefix.clone());
            }

            joins.push(Join {
                path: step.prefix,
                target: step.target,
                kind,
                cardinality: step.cardinality,
            });
        }

        let distinct = joins.iter().any(Join::is_collection);

        Ok(JoinPlan { joins, distinct })
    }
}

fn depth(prefix: &str) -> usize {
    prefix.matches('.').count()
}

fn is_descendant(path: &str, ancestor: &str) -> bool {
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path.as_bytes()[ancestor.len()] == b'.'
}

///
/// TESTS
///
