/// Escape character used in every generated LIKE pattern.
pub const LIKE_ESCAPE: char = '\\';

///
/// PatternShape
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PatternShape {
    Contains,
    StartsWith,
    EndsWith,
}

/// Escape LIKE metacharacters so `literal` only ever matches itself.
#[must_use]
pub fn escape_like(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }

    escaped
}

/// Build the full LIKE pattern for a literal and a pattern operator.
#[must_use]
pub fn like_pattern(literal: &str, shape: PatternShape) -> String {
    let escaped = escape_like(literal);

    match shape {
        PatternShape::Contains => format!("%{escaped}%"),
        PatternShape::StartsWith => format!("{escaped}%"),
        PatternShape::EndsWith => format!("%{escaped}"),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metacharacters_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn shapes_place_wildcards() {
        assert_eq!(like_pattern("ab", PatternShape::Contains), "%ab%");
        assert_eq!(like_pattern("ab", PatternShape::StartsWith), "ab%");
        assert_eq!(like_pattern("a_", PatternShape::EndsWith), "%a\\_");
        assert_eq!(like_pattern("", PatternShape::Contains), "%%");
    }
}
