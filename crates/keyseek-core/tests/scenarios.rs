mod common;

use common::{engine, engine_over, ids, post};
use keyseek_core::{
    config::{CountMode, EngineConfig},
    error::{Error, OperationError, ValidationError},
    page::{Cursor, SeekDirection, TotalElements},
    query::{Condition, Operator, SearchSpec, SortOrder},
    value::Value,
};
use serde_json::json;

fn published_by_title(page: i64, size: i64) -> SearchSpec {
    SearchSpec::new()
        .filter(Condition::new("status", Operator::Equals).with_value("PUBLISHED"))
        .sort(SortOrder::asc("title"))
        .page(page)
        .size(size)
}

#[test]
fn first_page_of_published_posts() {
    let page = engine().search("Post", published_by_title(0, 5)).unwrap();

    assert_eq!(ids(page.content()), [1, 3, 5, 7, 9]);
    assert!(page.has_next());
    assert!(!page.has_previous());
    assert!(page.is_first());
    assert_eq!(page.total_elements(), TotalElements::Known(25));
    assert_eq!(page.total_pages(), Some(5));
}

#[test]
fn last_page_of_published_posts() {
    let page = engine().search("Post", published_by_title(4, 5)).unwrap();

    assert_eq!(ids(page.content()), [41, 43, 45, 47, 49]);
    assert!(!page.has_next());
    assert!(page.is_last());
    assert!(page.has_previous());
}

#[test]
fn page_far_past_the_end() {
    let page = engine().search("Post", published_by_title(100, 5)).unwrap();

    assert!(page.is_empty());
    assert!(!page.has_next());
    assert!(page.has_previous());
    assert!(page.is_last());
    assert_eq!(page.total_elements(), TotalElements::Known(25));
}

#[test]
fn tied_leading_key_continues_with_the_next_tied_row() {
    let engine = engine_over(
        vec![
            post(1, "Gamma", "PUBLISHED", 900, None, None),
            post(2, "Beta", "PUBLISHED", 500, None, None),
            post(3, "Alpha", "PUBLISHED", 500, None, None),
            post(4, "Delta", "PUBLISHED", 100, None, None),
        ],
        EngineConfig::default(),
    );
    let spec = |page| {
        SearchSpec::new()
            .sort(SortOrder::desc("viewCount"))
            .sort(SortOrder::asc("title"))
            .page(page)
            .size(2)
    };

    let first = engine.search("Post", spec(0)).unwrap();
    let second = engine.search("Post", spec(1)).unwrap();
    assert_eq!(ids(first.content()), [1, 3]);
    assert_eq!(ids(second.content()), [2, 4]);

    let after_alpha = engine
        .seek("Post", spec(0), first.next_cursor(), SeekDirection::Forward)
        .unwrap();
    assert_eq!(ids(&after_alpha.content), [2, 4]);
}

#[test]
fn operator_outside_the_declared_set_is_rejected() {
    let spec = SearchSpec::new()
        .filter(Condition::new("exactTitle", Operator::Contains).with_value("Post"));

    let err = engine().search("Post", spec).unwrap_err();

    assert!(matches!(
        err,
        Error::Validation(ValidationError::OperatorNotAllowed { .. })
    ));
    let message = err.to_string();
    assert!(message.contains("exactTitle"), "{message}");
    assert!(message.contains("CONTAINS"), "{message}");
}

#[test]
fn empty_membership_collection_is_an_operation_error() {
    let spec = SearchSpec::new().filter(Condition::new("id", Operator::In).with_value(json!([])));

    let err = engine().search("Post", spec).unwrap_err();

    assert!(matches!(
        err,
        Error::Operation(OperationError::EmptyCollection { .. })
    ));
    assert!(err.is_rejection());
}

#[test]
fn uncounted_pages_report_unknown_total() {
    let config = EngineConfig {
        count_mode: CountMode::Skip,
        ..EngineConfig::default()
    };
    let engine = engine_over(common::posts(), config);

    let middle = engine.search("Post", published_by_title(2, 5)).unwrap();
    let last = engine.search("Post", published_by_title(4, 5)).unwrap();

    assert_eq!(ids(middle.content()), [21, 23, 25, 27, 29]);
    assert_eq!(middle.total_elements(), TotalElements::Unknown);
    assert_eq!(middle.total_pages(), None);
    assert!(!middle.is_last());
    assert!(last.is_last());
}

#[test]
fn backward_seek_returns_the_previous_window() {
    let engine = engine();

    let third = engine.search("Post", published_by_title(2, 5)).unwrap();
    let cursor = third.content().first().map(|record| {
        Cursor::new(vec![
            record.scalar("title").cloned().unwrap_or(Value::Null),
            record.key().clone(),
        ])
    });

    let previous = engine
        .seek(
            "Post",
            published_by_title(0, 5),
            cursor.as_ref(),
            SeekDirection::Backward,
        )
        .unwrap();

    assert_eq!(ids(&previous.content), [11, 13, 15, 17, 19]);
    assert!(previous.has_more);
}

#[test]
fn sorting_across_a_to_one_path_puts_missing_authors_first() {
    let spec = SearchSpec::new()
        .sort(SortOrder::asc("authorName"))
        .size(8);

    let page = engine().search("Post", spec).unwrap();

    // posts 6, 12, ..., 48 have no author; ids break the tie
    assert_eq!(ids(page.content()), [6, 12, 18, 24, 30, 36, 42, 48]);
}
