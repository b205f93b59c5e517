//! Shared fixture for integration tests: fifty posts with repeated view
//! counts, missing scores and missing authors, so ties and nulls show up
//! under every sort.
#![allow(dead_code)]

use keyseek_core::{
    config::EngineConfig,
    executor::SearchEngine,
    model::{EntityModel, Metamodel, ScalarType},
    query::Operator,
    schema::{FieldDef, SearchSchema},
    store::{MemoryStore, Record},
    value::Value,
};
use tracing_subscriber::EnvFilter;

pub const POSTS: i64 = 50;

const AUTHORS: [&str; 3] = ["Ada", "Brian", "Cleo"];

/// Route engine logs to the test harness; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn metamodel() -> Metamodel {
    Metamodel::new()
        .with(
            EntityModel::builder("Post", "id")
                .scalar("id", ScalarType::Int)
                .scalar("title", ScalarType::Text)
                .scalar(
                    "status",
                    ScalarType::enumeration("Status", ["DRAFT", "PUBLISHED", "ARCHIVED"]),
                )
                .scalar("view_count", ScalarType::Int)
                .scalar("score", ScalarType::Float)
                .one("author", "Author")
                .build(),
        )
        .with(
            EntityModel::builder("Author", "id")
                .scalar("id", ScalarType::Int)
                .scalar("name", ScalarType::Text)
                .build(),
        )
}

pub fn schema() -> keyseek_core::schema::SearchSchemaBuilder {
    SearchSchema::builder("Post")
        .field(FieldDef::new("id", "id").sortable())
        .field(FieldDef::new("title", "title").sortable())
        .field(FieldDef::new("status", "status").sortable())
        .field(FieldDef::new("viewCount", "view_count").sortable())
        .field(FieldDef::new("score", "score").sortable())
        .field(FieldDef::new("authorName", "author.name").sortable())
        .field(FieldDef::new("exactTitle", "title").operators([Operator::Equals]))
}

pub fn post(
    id: i64,
    title: &str,
    status: &str,
    view_count: i64,
    score: Option<f64>,
    author: Option<usize>,
) -> Record {
    let author = author.map(|index| {
        Record::new("Author", "id", i64::try_from(index).unwrap_or_default())
            .with("name", AUTHORS[index % AUTHORS.len()])
    });

    Record::new("Post", "id", id)
        .with("title", title)
        .with("status", Value::Enum(status.to_string()))
        .with("view_count", view_count)
        .with("score", score)
        .with_one("author", author)
}

/// Odd ids are PUBLISHED; view counts repeat every seven posts, every fifth
/// post has no score and every sixth has no author.
pub fn posts() -> Vec<Record> {
    (1..=POSTS)
        .map(|id| {
            let status = match id {
                id if id % 2 == 1 => "PUBLISHED",
                id if id % 4 == 0 => "DRAFT",
                _ => "ARCHIVED",
            };
            #[allow(clippy::cast_precision_loss)]
            let score = (id % 5 != 0).then(|| (id % 9) as f64 / 2.0);
            let author = (id % 6 != 0).then(|| usize::try_from(id % 3).unwrap_or_default());

            post(
                id,
                &format!("Post {id:02}"),
                status,
                (id % 7) * 100,
                score,
                author,
            )
        })
        .collect()
}

pub fn engine_over(records: Vec<Record>, config: EngineConfig) -> SearchEngine<MemoryStore> {
    init_tracing();

    let store = MemoryStore::new();
    store.insert_all(records).expect("fixture insert");

    let mut engine = SearchEngine::new(metamodel(), store, config).expect("fixture engine");
    engine.register(schema()).expect("fixture schema");

    engine
}

pub fn engine() -> SearchEngine<MemoryStore> {
    engine_over(posts(), EngineConfig::default())
}

pub fn ids(records: &[Record]) -> Vec<i64> {
    records
        .iter()
        .filter_map(|record| match record.key() {
            Value::Int(id) => Some(*id),
            _ => None,
        })
        .collect()
}
