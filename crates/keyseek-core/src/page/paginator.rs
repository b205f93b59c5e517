use crate::{
    config::CountMode,
    error::{Error, StoreError, ValidationError},
    obs::{SearchTraceEvent, TracePhase, Tracer},
    page::{
        cursor::{Cursor, SeekDirection, seek_predicate},
        request::PageRequest,
        result::{Page, TotalElements},
    },
    plan::SearchPlan,
    store::{Record, Store},
};

///
/// Slice
///
/// Result of a continuation seek: rows in the requested sort order plus the
/// cursors needed to continue in either direction.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Slice<T> {
    pub content: Vec<T>,
    /// More rows exist beyond this slice in the direction of travel.
    pub has_more: bool,
    pub first_cursor: Option<Cursor>,
    pub last_cursor: Option<Cursor>,
}

///
/// CursorPaginator
///
/// Page-numbered keyset pagination. Page `n > 0` is served by locating the
/// last row of page `n - 1` with a one-row point query, then seeking past
/// it; the store never skips more than that single boundary row scan.
///

pub(crate) struct CursorPaginator<'a, S: ?Sized> {
    store: &'a S,
    tracer: &'a Tracer,
    count_mode: CountMode,
}

impl<'a, S: Store + ?Sized> CursorPaginator<'a, S> {
    pub(crate) const fn new(store: &'a S, tracer: &'a Tracer, count_mode: CountMode) -> Self {
        Self {
            store,
            tracer,
            count_mode,
        }
    }

    /// Serve one page. Store failures on the boundary or window queries
    /// degrade to an empty page with an unknown total; count failures
    /// propagate.
    pub(crate) fn paginate(
        &self,
        plan: &SearchPlan,
        request: PageRequest,
    ) -> Result<Page<Record>, Error> {
        require_order(plan)?;
        let window = request.size.saturating_add(1);

        let (query, phase) = if request.page == 0 {
            (plan.select_query(), TracePhase::Head)
        } else {
            let Some(offset) = request.boundary_offset() else {
                return self.past_the_end(plan, request, u64::MAX);
            };

            let boundary = match self.boundary(plan, offset) {
                Ok(Some(record)) => record,
                Ok(None) => return self.past_the_end(plan, request, offset),
                Err(err) => return Ok(self.degraded(plan, request, TracePhase::Boundary, &err)),
            };
            let cursor = match Cursor::from_record(&boundary, &plan.order) {
                Ok(cursor) => cursor,
                Err(err) => return Ok(self.degraded(plan, request, TracePhase::Boundary, &err)),
            };

            let seek = seek_predicate(&plan.order, &cursor, SeekDirection::Forward);
            (plan.select_query().and_filter(seek), TracePhase::Seek)
        };

        let mut rows = match self.store.select(&query.limit(window)) {
            Ok(rows) => rows,
            Err(err) => return Ok(self.degraded(plan, request, phase, &err)),
        };
        self.round_trip(plan, phase, rows.len());

        let has_next = rows.len() as u64 > request.size;
        rows.truncate(usize::try_from(request.size).unwrap_or(usize::MAX));

        let total = self.total(plan)?;
        let next_cursor = rows
            .last()
            .and_then(|last| Cursor::from_record(last, &plan.order).ok());

        self.tracer.emit(SearchTraceEvent::PageAssembled {
            entity: plan.entity.clone(),
            page: request.page,
            rows: rows.len(),
            has_next,
            total: total.known(),
        });

        Ok(Page::assemble(rows, request, has_next, total, next_cursor))
    }

    /// Continue from `cursor` (or from the start when `None`) in either
    /// direction. Backward seeks run against the reversed order and restore
    /// the requested order before returning.
    pub(crate) fn seek(
        &self,
        plan: &SearchPlan,
        cursor: Option<&Cursor>,
        direction: SeekDirection,
        size: u64,
    ) -> Result<Slice<Record>, Error> {
        require_order(plan)?;

        let order = match direction {
            SeekDirection::Forward => plan.order.clone(),
            SeekDirection::Backward => plan.order.iter().map(|term| term.reversed()).collect(),
        };

        let mut query = plan.select_query().order(order);
        if let Some(cursor) = cursor {
            query = query.and_filter(seek_predicate(&plan.order, cursor, direction));
        }

        let mut rows = self.store.select(&query.limit(size.saturating_add(1)))?;
        self.round_trip(plan, TracePhase::Seek, rows.len());

        let has_more = rows.len() as u64 > size;
        rows.truncate(usize::try_from(size).unwrap_or(usize::MAX));
        if direction == SeekDirection::Backward {
            rows.reverse();
        }

        let first_cursor = rows
            .first()
            .map(|row| Cursor::from_record(row, &plan.order))
            .transpose()?;
        let last_cursor = rows
            .last()
            .map(|row| Cursor::from_record(row, &plan.order))
            .transpose()?;

        Ok(Slice {
            content: rows,
            has_more,
            first_cursor,
            last_cursor,
        })
    }

    fn boundary(&self, plan: &SearchPlan, offset: u64) -> Result<Option<Record>, StoreError> {
        let query = plan.select_query().offset(offset).limit(1);
        let mut rows = self.store.select(&query)?;
        self.round_trip(plan, TracePhase::Boundary, rows.len());

        Ok(rows.pop())
    }

    fn total(&self, plan: &SearchPlan) -> Result<TotalElements, Error> {
        match self.count_mode {
            CountMode::Skip => Ok(TotalElements::Unknown),
            CountMode::Exact => {
                let total = self.store.count(&plan.count_query())?;
                self.tracer.emit(SearchTraceEvent::StoreRoundTrip {
                    entity: plan.entity.clone(),
                    phase: TracePhase::Count,
                    rows: total,
                });

                Ok(TotalElements::Known(total))
            }
        }
    }

    fn past_the_end(
        &self,
        plan: &SearchPlan,
        request: PageRequest,
        offset: u64,
    ) -> Result<Page<Record>, Error> {
        self.tracer.emit(SearchTraceEvent::BoundaryMissing {
            entity: plan.entity.clone(),
            page: request.page,
            offset,
        });

        Ok(Page::empty(request, self.total(plan)?))
    }

    fn degraded(
        &self,
        plan: &SearchPlan,
        request: PageRequest,
        phase: TracePhase,
        err: &StoreError,
    ) -> Page<Record> {
        self.tracer.emit(SearchTraceEvent::Degraded {
            entity: plan.entity.clone(),
            page: request.page,
            phase,
            error: err.to_string(),
        });

        Page::empty(request, TotalElements::Unknown)
    }

    fn round_trip(&self, plan: &SearchPlan, phase: TracePhase, rows: usize) {
        self.tracer.emit(SearchTraceEvent::StoreRoundTrip {
            entity: plan.entity.clone(),
            phase,
            rows: rows as u64,
        });
    }
}

// Keyset seeks need at least one sort key to position against.
fn require_order(plan: &SearchPlan) -> Result<(), ValidationError> {
    if plan.order.is_empty() {
        return Err(ValidationError::EmptySort);
    }

    Ok(())
}
