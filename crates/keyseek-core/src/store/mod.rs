//! Module: store
//! Responsibility: the native query surface (predicate algebra, planned
//! queries, records) and the `Store` trait the engine executes against.
//! Does not own: compilation from filter trees or pagination.
//! Boundary: everything below this trait is storage; everything above is search.

mod expr;
mod memory;
mod query;
mod record;


pub use expr::{CompareOp, Expr};
pub use memory::MemoryStore;
pub use query::{NativeQuery, OrderTerm};
pub use record::{FieldValue, Record};

use crate::{error::StoreError, value::Value};
use std::sync::Arc;

///
/// Store
///
/// Executes planned queries. Implementations must apply LEFT-join
/// semantics, three-valued predicate logic, distinct roots when the join
/// plan asks for it, and a deterministic order for equal sort keys.
///

pub trait Store {
    fn select(&self, query: &NativeQuery) -> Result<Vec<Record>, StoreError>;

    fn count(&self, query: &NativeQuery) -> Result<u64, StoreError>;

    fn exists(&self, query: &NativeQuery) -> Result<bool, StoreError> {
        let probe = query.clone().offset(0).limit(1);

        Ok(!self.select(&probe)?.is_empty())
    }

    /// Delete every root matched by `query`; returns the number removed.
    fn delete(&self, query: &NativeQuery) -> Result<u64, StoreError>;

    fn find(&self, entity: &str, key: &Value) -> Result<Option<Record>, StoreError>;

    /// Insert or replace by primary key.
    fn save(&self, record: Record) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> Store for &S {
    fn select(&self, query: &NativeQuery) -> Result<Vec<Record>, StoreError> {
        (**self).select(query)
    }

    fn count(&self, query: &NativeQuery) -> Result<u64, StoreError> {
        (**self).count(query)
    }

    fn exists(&self, query: &NativeQuery) -> Result<bool, StoreError> {
        (**self).exists(query)
    }

    fn delete(&self, query: &NativeQuery) -> Result<u64, StoreError> {
        (**self).delete(query)
    }

    fn find(&self, entity: &str, key: &Value) -> Result<Option<Record>, StoreError> {
        (**self).find(entity, key)
    }

    fn save(&self, record: Record) -> Result<(), StoreError> {
        (**self).save(record)
    }
}

impl<S: Store + ?Sized> Store for Arc<S> {
    fn select(&self, query: &NativeQuery) -> Result<Vec<Record>, StoreError> {
        (**self).select(query)
    }

    fn count(&self, query: &NativeQuery) -> Result<u64, StoreError> {
        (**self).count(query)
    }

    fn exists(&self, query: &NativeQuery) -> Result<bool, StoreError> {
        (**self).exists(query)
    }

    fn delete(&self, query: &NativeQuery) -> Result<u64, StoreError> {
        (**self).delete(query)
    }

    fn find(&self, entity: &str, key: &Value) -> Result<Option<Record>, StoreError> {
        (**self).find(entity, key)
    }

    fn save(&self, record: Record) -> Result<(), StoreError> {
        (**self).save(record)
    }
}
