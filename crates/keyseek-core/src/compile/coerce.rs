use crate::{
    config::TemporalFormats,
    error::ParseError,
    model::{EnumModel, ScalarType},
    query::Literal,
    value::Value,
};
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset,
    format_description::{OwnedFormatItem, parse_owned, well_known::Rfc3339},
};

const ISO_DATE: &str = "[year]-[month]-[day]";
const ISO_DATETIME: &str =
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]";

///
/// CoercionCache
///
/// Engine-lifetime memo of parsed temporal format descriptions and
/// lower-cased enum variant tables. Safe to share across threads.
///

#[derive(Debug, Default)]
pub struct CoercionCache {
    formats: RwLock<HashMap<String, Option<Arc<OwnedFormatItem>>>>,
    enums: RwLock<HashMap<String, Arc<HashMap<String, String>>>>,
}

impl CoercionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parsed format description, or `None` when the description is invalid.
    fn format(&self, description: &str) -> Option<Arc<OwnedFormatItem>> {
        if let Some(cached) = self
            .formats
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(description)
        {
            return cached.clone();
        }

        let parsed = parse_owned::<2>(description).ok().map(Arc::new);
        self.formats
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(description.to_string(), parsed.clone());

        parsed
    }

    fn variants(&self, model: &EnumModel) -> Arc<HashMap<String, String>> {
        if let Some(table) = self
            .enums
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&model.name)
        {
            return Arc::clone(table);
        }

        let table: Arc<HashMap<String, String>> = Arc::new(
            model
                .variants
                .iter()
                .map(|variant| (variant.to_lowercase(), variant.clone()))
                .collect(),
        );
        self.enums
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(model.name.clone(), Arc::clone(&table));

        table
    }

    #[cfg(test)]
    pub(crate) fn cached_formats(&self) -> usize {
        self.formats
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

///
/// Coercer
///
/// Converts caller literals to native values of an attribute's type.
///

#[derive(Clone, Copy, Debug)]
pub struct Coercer<'a> {
    cache: &'a CoercionCache,
    formats: &'a TemporalFormats,
}

impl<'a> Coercer<'a> {
    #[must_use]
    pub const fn new(cache: &'a CoercionCache, formats: &'a TemporalFormats) -> Self {
        Self { cache, formats }
    }

    pub fn coerce(&self, literal: &Literal, ty: &ScalarType) -> Result<Value, ParseError> {
        match ty {
            ScalarType::Bool => coerce_bool(literal),
            ScalarType::Char => coerce_char(literal),
            ScalarType::Date => self.coerce_date(literal),
            ScalarType::DateTime => self.coerce_datetime(literal),
            ScalarType::Enum(model) => self.coerce_enum(literal, model),
            ScalarType::Float => coerce_float(literal),
            ScalarType::Int => coerce_int(literal),
            ScalarType::Text => coerce_text(literal).map(Value::Text),
        }
    }

    fn coerce_enum(&self, literal: &Literal, model: &EnumModel) -> Result<Value, ParseError> {
        let text = expect_str(literal, "an enum variant name")?;
        let table = self.cache.variants(model);

        table
            .get(&text.trim().to_lowercase())
            .map(|variant| Value::Enum(variant.clone()))
            .ok_or_else(|| ParseError::UnknownEnumVariant {
                value: text.to_string(),
                name: model.name.clone(),
            })
    }

    fn coerce_date(&self, literal: &Literal) -> Result<Value, ParseError> {
        let text = expect_str(literal, "a date string")?.trim();

        self.parse_date(text)
            .or_else(|| self.parse_datetime(text).map(PrimitiveDateTime::date))
            .map(Value::Date)
            .ok_or_else(|| invalid_temporal(text, "date"))
    }

    fn coerce_datetime(&self, literal: &Literal) -> Result<Value, ParseError> {
        if let Some(millis) = literal.as_i64() {
            return from_epoch_millis(millis)
                .map(Value::DateTime)
                .ok_or_else(|| invalid_temporal(&millis.to_string(), "datetime"));
        }

        let text = expect_str(literal, "a datetime string or epoch milliseconds")?.trim();

        self.parse_datetime(text)
            .or_else(|| {
                self.parse_date(text)
                    .map(|date| PrimitiveDateTime::new(date, Time::MIDNIGHT))
            })
            .map(Value::DateTime)
            .ok_or_else(|| invalid_temporal(text, "datetime"))
    }

    fn parse_date(&self, text: &str) -> Option<Date> {
        std::iter::once(ISO_DATE)
            .chain(self.formats.date.iter().map(String::as_str))
            .find_map(|description| {
                let format = self.cache.format(description)?;
                Date::parse(text, &*format).ok()
            })
    }

    fn parse_datetime(&self, text: &str) -> Option<PrimitiveDateTime> {
        if let Ok(offset) = OffsetDateTime::parse(text, &Rfc3339) {
            let utc = offset.to_offset(UtcOffset::UTC);
            return Some(PrimitiveDateTime::new(utc.date(), utc.time()));
        }

        std::iter::once(ISO_DATETIME)
            .chain(self.formats.datetime.iter().map(String::as_str))
            .find_map(|description| {
                let format = self.cache.format(description)?;
                PrimitiveDateTime::parse(text, &*format).ok()
            })
    }
}

fn expect_str<'l>(literal: &'l Literal, expected: &'static str) -> Result<&'l str, ParseError> {
    literal
        .as_str()
        .ok_or_else(|| ParseError::UnexpectedLiteral {
            value: literal.to_string(),
            expected,
        })
}

fn invalid_temporal(text: &str, ty: &'static str) -> ParseError {
    ParseError::InvalidTemporal {
        value: text.to_string(),
        ty,
    }
}

fn from_epoch_millis(millis: i64) -> Option<PrimitiveDateTime> {
    let nanos = i128::from(millis) * 1_000_000;
    let utc = OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()?;

    Some(PrimitiveDateTime::new(utc.date(), utc.time()))
}

/// Strip digit-grouping separators from a numeric string.
fn ungroup(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' ' | '\u{a0}'))
        .collect()
}

/// Text form of a literal: strings as-is, numbers and booleans rendered.
pub(crate) fn coerce_text(literal: &Literal) -> Result<String, ParseError> {
    match literal {
        Literal::String(text) => Ok(text.clone()),
        Literal::Number(number) => Ok(number.to_string()),
        Literal::Bool(flag) => Ok(flag.to_string()),
        other => Err(ParseError::UnexpectedLiteral {
            value: other.to_string(),
            expected: "text",
        }),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn coerce_int(literal: &Literal) -> Result<Value, ParseError> {
    let invalid = |value: String| ParseError::InvalidNumber { value, ty: "int" };

    match literal {
        Literal::Number(number) => number
            .as_i64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                    .map(|f| f as i64)
            })
            .map(Value::Int)
            .ok_or_else(|| invalid(number.to_string())),
        Literal::String(text) => ungroup(text)
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| invalid(text.clone())),
        other => Err(ParseError::UnexpectedLiteral {
            value: other.to_string(),
            expected: "an integer",
        }),
    }
}

fn coerce_float(literal: &Literal) -> Result<Value, ParseError> {
    let invalid = |value: String| ParseError::InvalidNumber {
        value,
        ty: "float",
    };

    match literal {
        Literal::Number(number) => number
            .as_f64()
            .map(Value::Float)
            .ok_or_else(|| invalid(number.to_string())),
        Literal::String(text) => ungroup(text)
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::Float)
            .ok_or_else(|| invalid(text.clone())),
        other => Err(ParseError::UnexpectedLiteral {
            value: other.to_string(),
            expected: "a number",
        }),
    }
}

fn coerce_bool(literal: &Literal) -> Result<Value, ParseError> {
    let invalid = || ParseError::InvalidBoolean {
        value: literal.to_string(),
    };

    match literal {
        Literal::Bool(flag) => Ok(Value::Bool(*flag)),
        Literal::Number(number) => match number.as_i64() {
            Some(1) => Ok(Value::Bool(true)),
            Some(0) => Ok(Value::Bool(false)),
            _ => Err(invalid()),
        },
        Literal::String(text) => match text.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
            "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
            _ => Err(invalid()),
        },
        _ => Err(invalid()),
    }
}

fn coerce_char(literal: &Literal) -> Result<Value, ParseError> {
    let text = expect_str(literal, "a single character")?;
    let mut chars = text.chars();

    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Value::Char(c)),
        _ => Err(ParseError::InvalidChar {
            value: text.to_string(),
        }),
    }
}

///
/// TESTS
///
