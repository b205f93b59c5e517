//! Module: plan
//! Responsibility: join planning and the per-request search plan handed to the store.
//! Does not own: predicate compilation or page assembly.
//! Boundary: consumes bound filter/sort paths, emits native queries.

mod join;

pub use join::{Join, JoinKind, JoinPlan, JoinPlanner, QueryPurpose};

use crate::{
    error::ConfigurationError,
    model::Metamodel,
    query::{Node, SortOrder},
    store::{Expr, NativeQuery, OrderTerm},
};
use std::collections::BTreeSet;

///
/// SearchPlan
///
/// Everything the store needs for one request: the compiled predicate,
/// the resolved ordering and two join plans (fetching for selects, plain
/// for counts).
///

#[derive(Clone, Debug, PartialEq)]
pub struct SearchPlan {
    pub entity: String,
    pub filter: Option<Expr>,
    pub order: Vec<OrderTerm>,
    pub select_joins: JoinPlan,
    pub count_joins: JoinPlan,
}

impl SearchPlan {
    /// Plan a bound request. `filter` must already carry resolved paths.
    pub fn build(
        metamodel: &Metamodel,
        entity: &str,
        filter: &[Node],
        compiled: Option<Expr>,
        sort: &[SortOrder],
    ) -> Result<Self, ConfigurationError> {
        let planner = JoinPlanner::new(metamodel, entity);
        let filter_paths = filter_paths(filter);

        let count_joins = planner.plan(filter_paths.iter().copied(), QueryPurpose::Count)?;
        let select_joins = planner.plan(
            filter_paths
                .iter()
                .copied()
                .chain(sort.iter().map(SortOrder::storage_path)),
            QueryPurpose::Select,
        )?;

        let order = sort
            .iter()
            .map(|order| OrderTerm::new(order.storage_path(), order.direction))
            .collect();

        Ok(Self {
            entity: entity.to_string(),
            filter: compiled,
            order,
            select_joins,
            count_joins,
        })
    }

    #[must_use]
    pub fn select_query(&self) -> NativeQuery {
        NativeQuery::new(&self.entity, self.select_joins.clone())
            .filter(self.filter.clone())
            .order(self.order.clone())
    }

    #[must_use]
    pub fn count_query(&self) -> NativeQuery {
        NativeQuery::new(&self.entity, self.count_joins.clone()).filter(self.filter.clone())
    }
}

/// Distinct storage paths referenced by the conditions of a filter tree.
#[must_use]
pub fn filter_paths(filter: &[Node]) -> BTreeSet<&str> {
    let mut paths = BTreeSet::new();
    for node in filter {
        node.for_each_condition(&mut |condition| {
            paths.insert(condition.storage_path());
        });
    }

    paths
}

///
/// TESTS
///
