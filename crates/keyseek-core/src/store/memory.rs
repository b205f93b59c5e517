use crate::{
    error::StoreError,
    plan::Join,
    store::{
        Store,
        expr::{CompareOp, Expr},
        query::NativeQuery,
        record::{FieldValue, Record},
    },
    query::SortDirection,
    value::{Value, canonical_cmp},
};
use std::{
    cmp::Ordering,
    collections::BTreeMap,
    sync::{PoisonError, RwLock},
};

///
/// MemoryStore
///
/// In-process reference store. Rows are kept per entity in insertion order,
/// which is also the tie order for equal sort keys.
///

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<BTreeMap<String, Vec<Record>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace records, keyed by entity and primary key.
    pub fn insert_all(&self, records: impl IntoIterator<Item = Record>) -> Result<(), StoreError> {
        let mut tables = self.tables.write().map_err(poisoned)?;
        for record in records {
            upsert(&mut tables, record);
        }

        Ok(())
    }

    pub fn len(&self, entity: &str) -> Result<usize, StoreError> {
        let tables = self.tables.read().map_err(poisoned)?;

        Ok(tables.get(entity).map_or(0, Vec::len))
    }

    fn matching(
        table: &[Record],
        query: &NativeQuery,
    ) -> Result<Vec<usize>, StoreError> {
        let collections: Vec<&Join> = query.joins.collection_joins().collect();
        let mut matched = Vec::new();

        for (index, root) in table.iter().enumerate() {
            let rows = expand(root, &collections)?;
            let mut hits = 0;
            for row in &rows {
                let keep = match &query.filter {
                    Some(filter) => eval(filter, row)? == Some(true),
                    None => true,
                };
                if keep {
                    hits += 1;
                }
            }

            let emitted = if query.distinct() { hits.min(1) } else { hits };
            matched.extend(std::iter::repeat_n(index, emitted));
        }

        Ok(matched)
    }
}

impl Store for MemoryStore {
    fn select(&self, query: &NativeQuery) -> Result<Vec<Record>, StoreError> {
        let tables = self.tables.read().map_err(poisoned)?;
        let Some(table) = tables.get(&query.entity) else {
            return Ok(Vec::new());
        };

        let mut keyed = Vec::new();
        for index in Self::matching(table, query)? {
            let record = &table[index];
            let keys = query
                .order
                .iter()
                .map(|term| record.value_at(&term.path))
                .collect::<Result<Vec<_>, _>>()?;
            keyed.push((keys, record));
        }

        keyed.sort_by(|(a, _), (b, _)| {
            query
                .order
                .iter()
                .zip(a.iter().zip(b))
                .map(|(term, (x, y))| match term.direction {
                    SortDirection::Asc => canonical_cmp(x, y),
                    SortDirection::Desc => canonical_cmp(y, x),
                })
                .find(|ord| ord.is_ne())
                .unwrap_or(Ordering::Equal)
        });

        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let limit = query
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));

        Ok(keyed
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(_, record)| record.clone())
            .collect())
    }

    fn count(&self, query: &NativeQuery) -> Result<u64, StoreError> {
        let tables = self.tables.read().map_err(poisoned)?;
        let Some(table) = tables.get(&query.entity) else {
            return Ok(0);
        };

        Ok(Self::matching(table, query)?.len() as u64)
    }

    fn delete(&self, query: &NativeQuery) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().map_err(poisoned)?;
        let Some(table) = tables.get_mut(&query.entity) else {
            return Ok(0);
        };

        let mut doomed = Self::matching(table, query)?;
        doomed.dedup();

        let mut index = 0;
        table.retain(|_| {
            let keep = doomed.binary_search(&index).is_err();
            index += 1;
            keep
        });

        Ok(doomed.len() as u64)
    }

    fn find(&self, entity: &str, key: &Value) -> Result<Option<Record>, StoreError> {
        let tables = self.tables.read().map_err(poisoned)?;

        Ok(tables.get(entity).and_then(|table| {
            table
                .iter()
                .find(|record| canonical_cmp(record.key(), key).is_eq())
                .cloned()
        }))
    }

    fn save(&self, record: Record) -> Result<(), StoreError> {
        let mut tables = self.tables.write().map_err(poisoned)?;
        upsert(&mut tables, record);

        Ok(())
    }
}

fn upsert(tables: &mut BTreeMap<String, Vec<Record>>, record: Record) {
    let table = tables.entry(record.entity().to_string()).or_default();
    match table
        .iter_mut()
        .find(|existing| canonical_cmp(existing.key(), record.key()).is_eq())
    {
        Some(existing) => *existing = record,
        None => table.push(record),
    }
}

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::backend("memory store lock poisoned")
}

///
/// Row
///
/// One joined row: the root plus a binding for every collection join
/// (`None` when the LEFT join found nothing).
///

#[derive(Clone)]
struct Row<'r> {
    root: &'r Record,
    bindings: BTreeMap<&'r str, Option<&'r Record>>,
}

impl<'r> Row<'r> {
    /// Record reached by walking `prefix` from the root.
    fn record_at(&self, prefix: &str) -> Result<Option<&'r Record>, StoreError> {
        if prefix.is_empty() {
            return Ok(Some(self.root));
        }

        let mut current = self.root;
        let mut end = 0;
        for segment in prefix.split('.') {
            end += segment.len();
            let walked = &prefix[..end];
            end += 1;

            if let Some(bound) = self.bindings.get(walked) {
                match *bound {
                    Some(record) => current = record,
                    None => return Ok(None),
                }
                continue;
            }

            match current.get(segment) {
                Some(FieldValue::One(Some(next))) => current = next,
                Some(FieldValue::Many(_)) => {
                    return Err(StoreError::UnjoinedCollection {
                        path: prefix.to_string(),
                        segment: segment.to_string(),
                    });
                }
                _ => return Ok(None),
            }
        }

        Ok(Some(current))
    }

    fn value(&self, path: &str) -> Result<Value, StoreError> {
        let (prefix, leaf) = path.rsplit_once('.').unwrap_or(("", path));

        Ok(self
            .record_at(prefix)?
            .and_then(|record| record.scalar(leaf))
            .cloned()
            .unwrap_or(Value::Null))
    }
}

/// LEFT-join expansion of one root across the collection joins, in plan order.
fn expand<'r>(root: &'r Record, collections: &[&'r Join]) -> Result<Vec<Row<'r>>, StoreError> {
    let mut rows = vec![Row {
        root,
        bindings: BTreeMap::new(),
    }];

    for &join in collections {
        let path = join.path.as_str();
        let (parent, leaf) = path.rsplit_once('.').unwrap_or(("", path));
        let mut next = Vec::with_capacity(rows.len());

        for row in rows {
            let children: &[Record] = match row.record_at(parent)?.and_then(|r| r.get(leaf)) {
                Some(FieldValue::Many(children)) => children,
                _ => &[],
            };

            if children.is_empty() {
                let mut row = row;
                row.bindings.insert(path, None);
                next.push(row);
                continue;
            }

            for child in children {
                let mut bound = row.clone();
                bound.bindings.insert(path, Some(child));
                next.push(bound);
            }
        }

        rows = next;
    }

    Ok(rows)
}

/// Three-valued evaluation; `None` is SQL UNKNOWN.
fn eval(expr: &Expr, row: &Row<'_>) -> Result<Option<bool>, StoreError> {
    Ok(match expr {
        Expr::True => Some(true),
        Expr::False => Some(false),
        Expr::And(parts) => {
            let mut result = Some(true);
            for part in parts {
                match eval(part, row)? {
                    Some(false) => return Ok(Some(false)),
                    None => result = None,
                    Some(true) => {}
                }
            }
            result
        }
        Expr::Or(parts) => {
            let mut result = Some(false);
            for part in parts {
                match eval(part, row)? {
                    Some(true) => return Ok(Some(true)),
                    None => result = None,
                    Some(false) => {}
                }
            }
            result
        }
        Expr::Not(inner) => eval(inner, row)?.map(|b| !b),
        Expr::Compare { path, op, value } => {
            let actual = row.value(path)?;
            actual.compare(value).map(|ord| match op {
                CompareOp::Eq => ord.is_eq(),
                CompareOp::Ne => ord.is_ne(),
                CompareOp::Lt => ord.is_lt(),
                CompareOp::Le => ord.is_le(),
                CompareOp::Gt => ord.is_gt(),
                CompareOp::Ge => ord.is_ge(),
            })
        }
        Expr::Between { path, low, high } => {
            let actual = row.value(path)?;
            let above = actual.compare(low).map(Ordering::is_ge);
            let below = actual.compare(high).map(Ordering::is_le);
            match (above, below) {
                (Some(false), _) | (_, Some(false)) => Some(false),
                (Some(true), Some(true)) => Some(true),
                _ => None,
            }
        }
        Expr::Like {
            path,
            pattern,
            escape,
            case_insensitive,
        } => match row.value(path)? {
            Value::Text(text) if *case_insensitive => Some(like(
                &text.to_lowercase(),
                &pattern.to_lowercase(),
                *escape,
            )),
            Value::Text(text) => Some(like(&text, pattern, *escape)),
            _ => None,
        },
        Expr::IsNull { path } => Some(row.value(path)?.is_null()),
        Expr::IsNotNull { path } => Some(!row.value(path)?.is_null()),
        Expr::In { path, values } => {
            let actual = row.value(path)?;
            if actual.is_null() {
                None
            } else {
                let mut result = Some(false);
                for candidate in values {
                    match actual.matches(candidate) {
                        Some(true) => return Ok(Some(true)),
                        None => result = None,
                        Some(false) => {}
                    }
                }
                result
            }
        }
    })
}

///
/// LikeToken
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum LikeToken {
    Char(char),
    One,
    Many,
}

fn tokenize(pattern: &str, escape: char) -> Vec<LikeToken> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        let token = match c {
            c if c == escape => LikeToken::Char(chars.next().unwrap_or(escape)),
            '%' => LikeToken::Many,
            '_' => LikeToken::One,
            c => LikeToken::Char(c),
        };
        tokens.push(token);
    }

    tokens
}

/// SQL LIKE with `%`, `_` and a single-character escape.
fn like(text: &str, pattern: &str, escape: char) -> bool {
    let tokens = tokenize(pattern, escape);
    let text: Vec<char> = text.chars().collect();

    // matched[j]: text[..i] matches tokens[..j]
    let mut matched = vec![false; tokens.len() + 1];
    matched[0] = true;
    for (j, token) in tokens.iter().enumerate() {
        matched[j + 1] = matched[j] && *token == LikeToken::Many;
    }

    for c in &text {
        let mut next = vec![false; tokens.len() + 1];
        for (j, token) in tokens.iter().enumerate() {
            next[j + 1] = match token {
                LikeToken::Many => next[j] || matched[j + 1],
                LikeToken::One => matched[j],
                LikeToken::Char(expected) => matched[j] && expected == c,
            };
        }
        matched = next;
    }

    matched[tokens.len()]
}

///
/// TESTS
///

#[cfg(test)]
mod like_tests {
    use super::like;

    #[test]
    fn wildcards_and_escapes() {
        assert!(like("hello world", "%lo w%", '\\'));
        assert!(like("hello", "h_llo", '\\'));
        assert!(!like("hello", "h_lo", '\\'));
        assert!(like("", "%", '\\'));
        assert!(like("50%", "50\\%", '\\'));
        assert!(!like("500", "50\\%", '\\'));
        assert!(like("a_b", "%\\_%", '\\'));
        assert!(!like("ab", "%\\_%", '\\'));
        assert!(like("back\\slash", "%\\\\%", '\\'));
    }
}
