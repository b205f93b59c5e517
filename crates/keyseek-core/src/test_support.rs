//! Shared fixtures for unit tests: a small blog domain with a self-referential
//! author graph, a to-many tag and comment set, and every scalar type.

use crate::{
    model::{EntityModel, Metamodel, ScalarType},
    obs::{SearchTraceEvent, SearchTraceSink},
    query::Operator,
    schema::{FieldDef, SearchSchema, SearchSchemaBuilder},
    store::{MemoryStore, Record},
    value::Value,
};
use std::sync::Mutex;
use time::{
    Date, PrimitiveDateTime,
    macros::{date, datetime},
};

pub(crate) fn blog_metamodel() -> Metamodel {
    Metamodel::new()
        .with(
            EntityModel::builder("Article", "id")
                .scalar("id", ScalarType::Int)
                .scalar("title", ScalarType::Text)
                .scalar(
                    "status",
                    ScalarType::enumeration("Status", ["DRAFT", "PUBLISHED", "ARCHIVED"]),
                )
                .scalar("view_count", ScalarType::Int)
                .scalar("rating", ScalarType::Float)
                .scalar("featured", ScalarType::Bool)
                .scalar("published_on", ScalarType::Date)
                .scalar("created_at", ScalarType::DateTime)
                .scalar("initial", ScalarType::Char)
                .one("author", "Author")
                .many("tags", "Tag")
                .many("comments", "Comment")
                .build(),
        )
        .with(
            EntityModel::builder("Author", "id")
                .scalar("id", ScalarType::Int)
                .scalar("name", ScalarType::Text)
                .scalar("email", ScalarType::Text)
                .one("organization", "Organization")
                .one("mentor", "Author")
                .build(),
        )
        .with(
            EntityModel::builder("Organization", "id")
                .scalar("id", ScalarType::Int)
                .scalar("name", ScalarType::Text)
                .build(),
        )
        .with(
            EntityModel::builder("Tag", "id")
                .scalar("id", ScalarType::Int)
                .scalar("label", ScalarType::Text)
                .build(),
        )
        .with(
            EntityModel::builder("Comment", "id")
                .scalar("id", ScalarType::Int)
                .scalar("body", ScalarType::Text)
                .one("author", "Author")
                .build(),
        )
}

pub(crate) fn article_schema_builder() -> SearchSchemaBuilder {
    SearchSchema::builder("Article")
        .field(FieldDef::new("id", "id").sortable())
        .field(FieldDef::new("title", "title").sortable())
        .field(FieldDef::new("status", "status").sortable())
        .field(FieldDef::new("viewCount", "view_count").sortable())
        .field(FieldDef::new("rating", "rating").sortable())
        .field(FieldDef::new("featured", "featured"))
        .field(FieldDef::new("publishedOn", "published_on").sortable())
        .field(FieldDef::new("createdAt", "created_at").sortable())
        .field(FieldDef::new("initial", "initial"))
        .field(FieldDef::new("authorName", "author.name").sortable())
        .field(FieldDef::new("organization", "author.organization.name"))
        .field(FieldDef::new("mentorName", "author.mentor.name"))
        .field(FieldDef::new("tag", "tags.label").sortable())
        .field(FieldDef::new("commentBody", "comments.body"))
        .field(FieldDef::new("commentAuthor", "comments.author.name"))
        .field(FieldDef::new("exactTitle", "title").operators([Operator::Equals]))
}

pub(crate) fn article_schema() -> SearchSchema {
    article_schema_builder()
        .build(&blog_metamodel())
        .expect("fixture schema should validate")
}

fn organization(id: i64, name: &str) -> Record {
    Record::new("Organization", "id", id).with("name", name)
}

fn author(id: i64, name: &str, email: Option<&str>, org: Option<Record>) -> Record {
    Record::new("Author", "id", id)
        .with("name", name)
        .with("email", email)
        .with_one("organization", org)
}

fn tag(id: i64, label: &str) -> Record {
    Record::new("Tag", "id", id).with("label", label)
}

fn comment(id: i64, body: &str, by: Record) -> Record {
    Record::new("Comment", "id", id)
        .with("body", body)
        .with_one("author", Some(by))
}

#[allow(clippy::too_many_arguments)]
fn article(
    id: i64,
    title: &str,
    status: &str,
    view_count: i64,
    rating: Option<f64>,
    featured: bool,
    published_on: Option<Date>,
    created_at: PrimitiveDateTime,
    initial: char,
) -> Record {
    Record::new("Article", "id", id)
        .with("title", title)
        .with("status", Value::Enum(status.to_string()))
        .with("view_count", view_count)
        .with("rating", rating)
        .with("featured", featured)
        .with("published_on", published_on)
        .with("created_at", created_at)
        .with("initial", initial)
}

/// Six articles. Ids 1 and 6 share view_count and rating so tie-breaking
/// is observable; article 5 has no author and article 3 no rating.
pub(crate) fn blog_records() -> Vec<Record> {
    let acme = organization(1, "Acme");
    let globex = organization(2, "Globex");

    let ada = author(1, "Ada", Some("ada@acme.io"), Some(acme));
    let brian = author(2, "Brian", Some("brian@globex.io"), Some(globex))
        .with_one("mentor", Some(ada.clone()));
    let cleo = author(3, "Cleo", None, None);

    let rust = tag(1, "rust");
    let db = tag(2, "db");
    let web = tag(3, "web");

    vec![
        article(
            1,
            "Rust ownership in practice",
            "PUBLISHED",
            1500,
            Some(4.5),
            true,
            Some(date!(2024-01-15)),
            datetime!(2024-01-15 09:30),
            'R',
        )
        .with_one("author", Some(ada.clone()))
        .with_many("tags", vec![rust.clone(), db.clone()])
        .with_many("comments", vec![comment(1, "Great read", brian.clone())]),
        article(
            2,
            "Indexing 101",
            "PUBLISHED",
            320,
            Some(3.8),
            false,
            Some(date!(2024-02-03)),
            datetime!(2024-02-03 14:00),
            'I',
        )
        .with_one("author", Some(brian.clone()))
        .with_many("tags", vec![db])
        .with_many("comments", vec![]),
        article(
            3,
            "Draft: async traits",
            "DRAFT",
            0,
            None,
            false,
            None,
            datetime!(2024-03-01 08:00),
            'D',
        )
        .with_one("author", Some(ada.clone()))
        .with_many("tags", vec![rust.clone()])
        .with_many("comments", vec![]),
        article(
            4,
            "50% faster builds",
            "PUBLISHED",
            980,
            Some(4.1),
            true,
            Some(date!(2024-03-20)),
            datetime!(2024-03-20 17:45:30),
            '5',
        )
        .with_one("author", Some(cleo.clone()))
        .with_many("tags", vec![rust.clone(), web.clone()])
        .with_many(
            "comments",
            vec![
                comment(2, "Nice", ada.clone()),
                comment(3, "Needs numbers", cleo),
            ],
        ),
        article(
            5,
            "Web_scale myths",
            "ARCHIVED",
            45,
            Some(2.9),
            false,
            Some(date!(2023-11-11)),
            datetime!(2023-11-11 11:11),
            'W',
        )
        .with_one("author", None)
        .with_many("tags", vec![web])
        .with_many("comments", vec![]),
        article(
            6,
            "Rusty pipes",
            "PUBLISHED",
            1500,
            Some(4.5),
            false,
            Some(date!(2024-04-02)),
            datetime!(2024-04-02 10:00),
            'P',
        )
        .with_one("author", Some(brian))
        .with_many("tags", vec![rust])
        .with_many("comments", vec![comment(4, "Great pun", ada)]),
    ]
}

pub(crate) fn blog_store() -> MemoryStore {
    let store = MemoryStore::new();
    store
        .insert_all(blog_records())
        .expect("fixture insert should succeed");

    store
}

/// Primary keys of records, in order.
pub(crate) fn ids(records: &[Record]) -> Vec<i64> {
    records
        .iter()
        .filter_map(|record| match record.key() {
            Value::Int(id) => Some(*id),
            _ => None,
        })
        .collect()
}

///
/// RecordingSink
///

#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<SearchTraceEvent>>,
}

impl RecordingSink {
    pub(crate) fn events(&self) -> Vec<SearchTraceEvent> {
        self.events.lock().expect("sink lock").clone()
    }
}

impl SearchTraceSink for RecordingSink {
    fn on_event(&self, event: &SearchTraceEvent) {
        self.events.lock().expect("sink lock").push(event.clone());
    }
}
