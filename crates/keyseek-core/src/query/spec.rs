use crate::query::{node::Node, normalize::normalize, sort::SortOrder};
use serde::{Deserialize, Serialize};

///
/// SearchSpec
///
/// One request's filter tree, sort and page window. Built once per request,
/// consumed once by the engine.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SearchSpec {
    #[serde(default)]
    pub filter: Vec<Node>,

    #[serde(default)]
    pub sort: Vec<SortOrder>,

    #[serde(default)]
    pub page: i64,

    #[serde(default)]
    pub size: i64,
}

impl SearchSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filter(mut self, node: impl Into<Node>) -> Self {
        self.filter.push(node.into());
        self
    }

    #[must_use]
    pub fn sort(mut self, order: SortOrder) -> Self {
        self.sort.push(order);
        self
    }

    #[must_use]
    pub const fn page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    #[must_use]
    pub const fn size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }

    /// Apply filter-tree normalization in place.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.filter = normalize(std::mem::take(&mut self.filter));
        self
    }
}
