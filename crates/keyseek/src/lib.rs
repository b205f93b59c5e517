//! ## Crate layout
//! - `core`: filter trees, metamodel, search schemas, predicate compiler,
//!   join planner, store primitives, cursor pagination and the engine.
//!
//! The `prelude` module carries what a caller needs to register a schema
//! and run searches; everything else stays under `core`.

pub use keyseek_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use crate::core::{DEFAULT_PAGE_SIZE, Error};

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::prelude::*;
    pub use crate::core::{
        obs::{SearchTraceEvent, SearchTraceSink},
        page::PageRequest,
        query::Literal,
    };
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use serde_json::json;

    #[test]
    fn version_matches_manifest() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn prelude_runs_a_search_end_to_end() {
        let metamodel = Metamodel::new().with(
            EntityModel::builder("Book", "id")
                .scalar("id", ScalarType::Int)
                .scalar("title", ScalarType::Text)
                .build(),
        );
        let store = MemoryStore::new();
        store
            .insert_all(
                ["Dune", "Emma", "Ulysses"]
                    .into_iter()
                    .zip(1_i64..)
                    .map(|(title, id)| Record::new("Book", "id", id).with("title", title)),
            )
            .unwrap();

        let mut engine = SearchEngine::new(metamodel, store, EngineConfig::default()).unwrap();
        engine
            .register(
                SearchSchema::builder("Book")
                    .field(FieldDef::new("id", "id").sortable())
                    .field(FieldDef::new("title", "title").sortable()),
            )
            .unwrap();

        let spec: SearchSpec = serde_json::from_value(json!({
            "filter": [{ "type": "condition", "field": "title", "operator": "CONTAINS", "value": "u" }],
            "sort": [{ "field": "title", "direction": "DESC" }],
            "size": 1
        }))
        .unwrap();
        let page = engine.search("Book", spec).unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page.content()[0].scalar("title"), Some(&Value::from("Ulysses")));
        assert_eq!(page.total_elements(), TotalElements::Known(2));
        assert!(page.has_next());
    }
}
