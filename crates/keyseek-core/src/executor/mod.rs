//! Module: executor
//! Responsibility: request-level composition (bind → compile → plan →
//! paginate) and the filter-only operations sharing that pipeline.
//! Does not own: storage semantics or page arithmetic.
//! Boundary: the public entry point callers hold for the engine's lifetime.

mod patch;


pub use patch::RecordPatch;

use crate::{
    compile::{Coercer, CoercionCache, PredicateCompiler},
    config::EngineConfig,
    error::{ConfigurationError, Error, ValidationError},
    model::Metamodel,
    obs::{SearchTraceEvent, SearchTraceSink, TracePhase, Tracer},
    page::{Cursor, CursorPaginator, Page, PageRequest, SeekDirection, Slice},
    plan::SearchPlan,
    query::{Node, SearchSpec, SortOrder},
    schema::{SearchSchema, SearchSchemaBuilder},
    store::{Record, Store},
};
use std::{collections::BTreeMap, sync::Arc};

///
/// SearchEngine
///
/// Owns the metamodel, the registered search schemas, the coercion cache
/// and the store handle. Each call builds its own compiler and plan; the
/// engine holds no per-request state.
///

pub struct SearchEngine<S> {
    metamodel: Arc<Metamodel>,
    store: S,
    config: EngineConfig,
    schemas: BTreeMap<String, SearchSchema>,
    cache: Arc<CoercionCache>,
    tracer: Tracer,
}

impl<S: Store> SearchEngine<S> {
    /// Validate the metamodel and configuration and build an engine.
    pub fn new(
        metamodel: impl Into<Arc<Metamodel>>,
        store: S,
        config: EngineConfig,
    ) -> Result<Self, ConfigurationError> {
        let metamodel = metamodel.into();
        metamodel.validate()?;
        config.validate()?;

        Ok(Self {
            metamodel,
            store,
            config,
            schemas: BTreeMap::new(),
            cache: Arc::new(CoercionCache::new()),
            tracer: Tracer::default(),
        })
    }

    #[must_use]
    pub fn with_trace_sink(mut self, sink: Arc<dyn SearchTraceSink>) -> Self {
        self.tracer = Tracer::new(Some(sink));
        self
    }

    /// Share a coercion cache with other engines over the same configuration.
    #[must_use]
    pub fn with_coercion_cache(mut self, cache: Arc<CoercionCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Validate and register a search schema, replacing any previous one
    /// for the same entity.
    pub fn register(&mut self, schema: SearchSchemaBuilder) -> Result<(), ConfigurationError> {
        let schema = schema.build(&self.metamodel)?;
        tracing::debug!(
            entity = schema.entity(),
            fields = schema.fields().count(),
            "search schema registered"
        );
        self.schemas.insert(schema.entity().to_string(), schema);

        Ok(())
    }

    pub fn schema(&self, entity: &str) -> Result<&SearchSchema, ConfigurationError> {
        self.schemas
            .get(entity)
            .ok_or_else(|| ConfigurationError::SchemaNotRegistered {
                entity: entity.to_string(),
            })
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn metamodel(&self) -> &Metamodel {
        &self.metamodel
    }

    // ------------------------------------------------------------------
    // Paged search
    // ------------------------------------------------------------------

    /// Run one paginated search.
    pub fn search(&self, entity: &str, spec: SearchSpec) -> Result<Page<Record>, Error> {
        let request = PageRequest::normalize(spec.page, spec.size, &self.config)?;
        let plan = self.plan(entity, spec.filter, spec.sort)?;

        self.paginator().paginate(&plan, request)
    }

    /// Continue from a cursor returned by an earlier page or slice.
    /// `spec.page` is ignored; `spec.size` is normalized as for `search`.
    pub fn seek(
        &self,
        entity: &str,
        spec: SearchSpec,
        cursor: Option<&Cursor>,
        direction: SeekDirection,
    ) -> Result<Slice<Record>, Error> {
        let request = PageRequest::normalize(0, spec.size, &self.config)?;
        let plan = self.plan(entity, spec.filter, spec.sort)?;
        if let Some(cursor) = cursor {
            self.check_cursor(entity, &plan, cursor)?;
        }

        self.paginator()
            .seek(&plan, cursor, direction, request.size)
    }

    // ------------------------------------------------------------------
    // Filter-only operations
    // ------------------------------------------------------------------

    pub fn count(&self, entity: &str, filter: Vec<Node>) -> Result<u64, Error> {
        let plan = self.plan(entity, filter, Vec::new())?;
        let total = self.store.count(&plan.count_query())?;
        self.round_trip(entity, TracePhase::Count, total);

        Ok(total)
    }

    pub fn exists(&self, entity: &str, filter: Vec<Node>) -> Result<bool, Error> {
        let plan = self.plan(entity, filter, Vec::new())?;
        let found = self.store.exists(&plan.count_query())?;
        self.round_trip(entity, TracePhase::Exists, u64::from(found));

        Ok(found)
    }

    /// Delete every matching root; returns the number removed.
    pub fn delete_all(&self, entity: &str, filter: Vec<Node>) -> Result<u64, Error> {
        let plan = self.plan(entity, filter, Vec::new())?;
        let removed = self.store.delete(&plan.count_query())?;
        self.round_trip(entity, TracePhase::Delete, removed);

        Ok(removed)
    }

    /// Load each matching record, copy the patch's non-null scalars onto
    /// it and save it back; returns the number of records saved.
    pub fn update_all(
        &self,
        entity: &str,
        filter: Vec<Node>,
        patch: &RecordPatch,
    ) -> Result<u64, Error> {
        let model = self.metamodel.entity(entity)?;
        patch.validate(model)?;

        let plan = self.plan(entity, filter, Vec::new())?;
        let matched = self.store.select(&plan.count_query())?;

        let mut updated = 0;
        for hit in &matched {
            let Some(mut record) = self.store.find(entity, hit.key())? else {
                continue;
            };
            patch.apply(&mut record, model);
            self.store.save(record)?;
            updated += 1;
        }
        self.round_trip(entity, TracePhase::Update, updated);

        Ok(updated)
    }

    // ------------------------------------------------------------------
    // Pipeline
    // ------------------------------------------------------------------

    fn plan(
        &self,
        entity: &str,
        filter: Vec<Node>,
        sort: Vec<SortOrder>,
    ) -> Result<SearchPlan, Error> {
        let schema = self.schema(entity)?;
        let bound = schema.bind(
            SearchSpec {
                filter,
                sort,
                ..SearchSpec::default()
            },
            self.config.primary_key_tie_break,
        )?;

        let compiler = PredicateCompiler::new(
            &self.metamodel,
            entity,
            schema,
            Coercer::new(&self.cache, &self.config.temporal_formats),
        );
        let compiled = compiler.compile_all(&bound.filter)?;
        let plan = SearchPlan::build(
            &self.metamodel,
            entity,
            &bound.filter,
            compiled,
            &bound.sort,
        )?;

        self.tracer.emit(SearchTraceEvent::Compiled {
            entity: entity.to_string(),
            joins: plan.select_joins.len(),
            distinct: plan.select_joins.distinct(),
            filtered: plan.filter.is_some(),
        });

        Ok(plan)
    }

    /// Reject caller cursors that cannot be positioned against the plan's
    /// order: wrong arity, or a non-null value the sort key cannot hold.
    fn check_cursor(&self, entity: &str, plan: &SearchPlan, cursor: &Cursor) -> Result<(), Error> {
        if cursor.len() != plan.order.len() {
            return Err(ValidationError::CursorArity {
                expected: plan.order.len(),
                found: cursor.len(),
            }
            .into());
        }

        for (position, (term, value)) in plan.order.iter().zip(cursor.iter()).enumerate() {
            let leaf = self.metamodel.resolve_path(entity, &term.path)?.leaf;
            if !leaf.accepts(value) {
                return Err(ValidationError::CursorValue {
                    position,
                    path: term.path.clone(),
                    value: value.to_string(),
                    ty: leaf.name(),
                }
                .into());
            }
        }

        Ok(())
    }

    fn paginator(&self) -> CursorPaginator<'_, S> {
        CursorPaginator::new(&self.store, &self.tracer, self.config.count_mode)
    }

    fn round_trip(&self, entity: &str, phase: TracePhase, rows: u64) {
        self.tracer.emit(SearchTraceEvent::StoreRoundTrip {
            entity: entity.to_string(),
            phase,
            rows,
        });
    }
}
