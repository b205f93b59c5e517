mod common;

use common::{POSTS, engine, ids};
use keyseek_core::query::{Combinator, Condition, Group, Node, Operator, SearchSpec, SortOrder};
use proptest::prelude::*;

const SORTABLE: [&str; 6] = ["id", "title", "status", "viewCount", "score", "authorName"];

fn arb_sort() -> impl Strategy<Value = Vec<SortOrder>> {
    prop::collection::vec(
        (prop::sample::select(SORTABLE.to_vec()), any::<bool>()).prop_map(|(field, asc)| {
            if asc {
                SortOrder::asc(field)
            } else {
                SortOrder::desc(field)
            }
        }),
        0..3,
    )
}

fn arb_condition() -> impl Strategy<Value = Condition> {
    prop_oneof![
        prop::sample::select(vec!["DRAFT", "PUBLISHED", "ARCHIVED"])
            .prop_map(|status| Condition::new("status", Operator::Equals).with_value(status)),
        (0_i64..7).prop_map(|n| {
            Condition::new("viewCount", Operator::GreaterEqualThan).with_value(n * 100)
        }),
        Just(Condition::new("score", Operator::IsNull)),
        Just(Condition::new("authorName", Operator::IsNotNull)),
        prop::sample::select(vec!["Ada", "Brian", "Cleo"])
            .prop_map(|name| Condition::new("authorName", Operator::NotEquals).with_value(name)),
        (1_i64..=POSTS, 1_i64..=POSTS).prop_map(|(a, b)| {
            Condition::new("id", Operator::Between).with_range(a.min(b), a.max(b))
        }),
    ]
}

fn arb_filter() -> impl Strategy<Value = Vec<Node>> {
    prop::collection::vec((arb_condition(), any::<bool>()), 0..3).prop_map(|conditions| {
        conditions
            .into_iter()
            .enumerate()
            .map(|(index, (condition, or))| {
                let tag = match (index, or) {
                    (0, _) => None,
                    (_, true) => Some(Combinator::Or),
                    (_, false) => Some(Combinator::And),
                };
                Node::from(condition).with_combinator(tag)
            })
            .collect()
    })
}

fn spec(filter: &[Node], sort: &[SortOrder], page: i64, size: i64) -> SearchSpec {
    SearchSpec {
        filter: filter.to_vec(),
        sort: sort.to_vec(),
        page,
        size,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn concatenated_pages_match_the_unpaginated_slice(
        filter in arb_filter(),
        sort in arb_sort(),
        size in 1_i64..8,
        pages in 1_i64..6,
    ) {
        let engine = engine();
        let full = engine.search("Post", spec(&filter, &sort, 0, POSTS)).unwrap();

        let mut walked = Vec::new();
        for page in 0..pages {
            let page = engine.search("Post", spec(&filter, &sort, page, size)).unwrap();
            walked.extend(ids(page.content()));
        }

        let expected: Vec<i64> = ids(full.content())
            .into_iter()
            .take(usize::try_from(pages * size).unwrap())
            .collect();
        prop_assert_eq!(walked, expected);
    }

    #[test]
    fn recompiling_the_same_request_is_idempotent(
        filter in arb_filter(),
        sort in arb_sort(),
    ) {
        let engine = engine();

        let first = engine.search("Post", spec(&filter, &sort, 0, POSTS)).unwrap();
        let second = engine.search("Post", spec(&filter, &sort, 0, POSTS)).unwrap();

        prop_assert_eq!(ids(first.content()), ids(second.content()));
        prop_assert_eq!(first.total_elements(), second.total_elements());
    }

    #[test]
    fn json_round_trip_preserves_results(
        filter in arb_filter(),
        nested in arb_filter(),
    ) {
        let engine = engine();
        let mut tree = filter;
        if !nested.is_empty() {
            tree.push(Node::from(Group::new(nested)).with_combinator(
                (!tree.is_empty()).then_some(Combinator::And),
            ));
        }
        let original = spec(&tree, &[], 0, POSTS);

        let json = serde_json::to_string(&original).unwrap();
        let parsed: SearchSpec = serde_json::from_str(&json).unwrap();

        let left = engine.search("Post", original).unwrap();
        let right = engine.search("Post", parsed).unwrap();
        prop_assert_eq!(ids(left.content()), ids(right.content()));
    }
}
