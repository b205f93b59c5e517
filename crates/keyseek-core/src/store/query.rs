use crate::{plan::JoinPlan, query::SortDirection, store::expr::Expr};

///
/// OrderTerm
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OrderTerm {
    pub path: String,
    pub direction: SortDirection,
}

impl OrderTerm {
    pub fn new(path: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            path: path.into(),
            direction,
        }
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.path.clone(), self.direction.reversed())
    }
}

///
/// NativeQuery
///
/// A fully planned store query. Nulls sort lowest under every order term,
/// so DESC places them last.
///

#[derive(Clone, Debug, PartialEq)]
pub struct NativeQuery {
    pub entity: String,
    pub joins: JoinPlan,
    pub filter: Option<Expr>,
    pub order: Vec<OrderTerm>,
    pub offset: u64,
    pub limit: Option<u64>,
}

impl NativeQuery {
    pub fn new(entity: impl Into<String>, joins: JoinPlan) -> Self {
        Self {
            entity: entity.into(),
            joins,
            filter: None,
            order: Vec::new(),
            offset: 0,
            limit: None,
        }
    }

    #[must_use]
    pub fn filter(mut self, filter: Option<Expr>) -> Self {
        self.filter = filter;
        self
    }

    /// Conjoin `expr` with the existing filter.
    #[must_use]
    pub fn and_filter(mut self, expr: Expr) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    #[must_use]
    pub fn order(mut self, order: Vec<OrderTerm>) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn distinct(&self) -> bool {
        self.joins.distinct()
    }
}
