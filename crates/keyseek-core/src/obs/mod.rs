//! Search tracing boundary.
//!
//! Tracing is optional, injected by the caller, and must not affect execution
//! semantics. Every event is also forwarded to `tracing` so a process-wide
//! subscriber sees the same record without a sink.

use std::{fmt, sync::Arc};

///
/// SearchTraceSink
///

pub trait SearchTraceSink: Send + Sync {
    fn on_event(&self, event: &SearchTraceEvent);
}

///
/// TracePhase
///
/// Store round-trip that produced an event.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TracePhase {
    Head,
    Boundary,
    Seek,
    Count,
    Exists,
    Delete,
    Update,
}

impl fmt::Display for TracePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Head => "head",
            Self::Boundary => "boundary",
            Self::Seek => "seek",
            Self::Count => "count",
            Self::Exists => "exists",
            Self::Delete => "delete",
            Self::Update => "update",
        };

        f.write_str(label)
    }
}

///
/// SearchTraceEvent
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SearchTraceEvent {
    Compiled {
        entity: String,
        joins: usize,
        distinct: bool,
        filtered: bool,
    },
    StoreRoundTrip {
        entity: String,
        phase: TracePhase,
        rows: u64,
    },
    BoundaryMissing {
        entity: String,
        page: u64,
        offset: u64,
    },
    Degraded {
        entity: String,
        page: u64,
        phase: TracePhase,
        error: String,
    },
    PageAssembled {
        entity: String,
        page: u64,
        rows: usize,
        has_next: bool,
        total: Option<u64>,
    },
}

///
/// Tracer
///
/// Request-scoped emitter: logs through `tracing`, then hands the event to
/// the injected sink if there is one.
///

#[derive(Clone, Default)]
pub(crate) struct Tracer {
    sink: Option<Arc<dyn SearchTraceSink>>,
}

impl Tracer {
    pub(crate) const fn new(sink: Option<Arc<dyn SearchTraceSink>>) -> Self {
        Self { sink }
    }

    pub(crate) fn emit(&self, event: SearchTraceEvent) {
        log_event(&event);

        if let Some(sink) = &self.sink {
            sink.on_event(&event);
        }
    }
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

fn log_event(event: &SearchTraceEvent) {
    match event {
        SearchTraceEvent::Compiled {
            entity,
            joins,
            distinct,
            filtered,
        } => tracing::debug!(%entity, joins, distinct, filtered, "search compiled"),
        SearchTraceEvent::StoreRoundTrip {
            entity,
            phase,
            rows,
        } => tracing::trace!(%entity, %phase, rows, "store round trip"),
        SearchTraceEvent::BoundaryMissing {
            entity,
            page,
            offset,
        } => tracing::debug!(%entity, page, offset, "no boundary record; page is empty"),
        SearchTraceEvent::Degraded {
            entity,
            page,
            phase,
            error,
        } => tracing::warn!(%entity, page, %phase, %error, "pagination degraded to an empty page"),
        SearchTraceEvent::PageAssembled {
            entity,
            page,
            rows,
            has_next,
            total,
        } => tracing::debug!(%entity, page, rows, has_next, ?total, "page assembled"),
    }
}
