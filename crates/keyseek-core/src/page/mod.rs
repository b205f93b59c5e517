//! Module: page
//! Responsibility: page-window normalization, cursor extraction, seek
//! predicates, and cursor-based page assembly.
//! Does not own: filter compilation or join planning.
//! Boundary: at most three sequential store round trips per page
//! (boundary → window → count).

mod cursor;
mod paginator;
mod request;
mod result;

pub use cursor::{Cursor, SeekDirection, seek_predicate};
pub use paginator::Slice;
pub use request::PageRequest;
pub use result::{Page, TotalElements};

pub(crate) use paginator::CursorPaginator;
