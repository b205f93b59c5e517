//! Filter-tree compilation and page-numbered keyset pagination over a
//! relational object store.
//!
//! A request arrives as a [`query::SearchSpec`]: a tree of conditions over
//! logical field names, a sort, and a page window. The engine binds it to a
//! registered [`schema::SearchSchema`], compiles the tree into a native
//! [`store::Expr`], plans the joins it needs, and serves the page by seeking
//! past the last row of the previous page instead of skipping rows.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod compile;
pub mod config;
pub mod error;
pub mod executor;
pub mod model;
pub mod obs;
pub mod page;
pub mod plan;
pub mod query;
pub mod schema;
pub mod store;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

pub use error::Error;

///
/// CONSTANTS
///

/// Page size used when neither the request nor the configuration names one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

///
/// Prelude
///
/// Request vocabulary plus the engine entry point. Compilation and planning
/// internals stay one module level down.
///

pub mod prelude {
    pub use crate::{
        config::{CountMode, EngineConfig},
        error::Error,
        executor::{RecordPatch, SearchEngine},
        model::{EntityModel, Metamodel, ScalarType},
        page::{Cursor, Page, SeekDirection, Slice, TotalElements},
        query::{Combinator, Condition, Group, Node, Operator, SearchSpec, SortDirection, SortOrder},
        schema::{FieldDef, SearchSchema},
        store::{MemoryStore, Record, Store},
        value::Value,
    };
}
