//! Glob pattern compilation and path matching.
//!
//! A pattern is a `/`-separated sequence of segments. A segment is either the
//! double-star wildcard `**` (zero or more whole path segments), a
//! single-segment glob (`*`, `?`, `[...]` character classes, `\` escapes), or
//! a literal matched by string equality. Matching is case-sensitive and
//! anchored at both ends: `foo` matches only the path `foo`, never
//! `sub/foo` — use `**/foo` to match at any depth.

use thiserror::Error;

/// Characters that turn a segment into a glob instead of a literal.
const META_CHARS: &[char] = &['*', '?', '[', '\\'];

/// Error returned when a pattern is not a valid glob.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid glob pattern `{pattern}`: {reason}")]
pub struct PatternError {
    /// The offending pattern text.
    pub pattern: String,
    /// Why compilation failed.
    pub reason: String,
}

/// One compiled pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// `**`: matches zero or more whole path segments.
    AnySegments,
    /// A segment containing glob metacharacters, matched against exactly one
    /// path segment.
    Glob(String),
    /// A plain segment, matched against exactly one path segment by equality.
    Literal(String),
}

impl Segment {
    /// Match this segment against a single path segment. `AnySegments` is
    /// handled by the caller and never reaches this method.
    fn matches(&self, part: &str) -> bool {
        match self {
            Segment::AnySegments => unreachable!("`**` is matched at the segment-list level"),
            Segment::Glob(glob) => {
                let pattern: Vec<char> = glob.chars().collect();
                let text: Vec<char> = part.chars().collect();
                match_chars(&pattern, &text)
            }
            Segment::Literal(literal) => literal == part,
        }
    }
}

/// A compiled glob pattern.
///
/// Compile once with [`Pattern::new`] when matching many paths against the
/// same pattern; [`matches`] is a convenience for one-shot use.
///
/// ```
/// use path_filter::Pattern;
///
/// let pattern = Pattern::new("src/**/*.rs").unwrap();
/// assert!(pattern.matches("src/lib.rs"));
/// assert!(pattern.matches("src/filter/mod.rs"));
/// assert!(!pattern.matches("tests/filter.rs"));
/// ```
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    segments: Vec<Segment>,
}

impl Pattern {
    /// Compile a pattern.
    ///
    /// A trailing `/` is stripped before compilation, so the directory-style
    /// pattern `a/` is equivalent to `a`. A leading `/` marks an absolute
    /// pattern, which only matches absolute paths.
    ///
    /// # Errors
    /// Returns a [`PatternError`] if any segment is not a valid glob, for
    /// example an unterminated character class.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let trimmed = pattern.strip_suffix('/').unwrap_or(pattern);
        let mut segments = Vec::new();
        for part in trimmed.split('/') {
            let segment = if part == "**" {
                Segment::AnySegments
            } else if part.contains(META_CHARS) {
                validate_glob(pattern, part)?;
                Segment::Glob(part.to_string())
            } else {
                Segment::Literal(part.to_string())
            };
            segments.push(segment);
        }
        Ok(Pattern {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// Match a `/`-separated path against this pattern.
    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = path.split('/').collect();
        match_segments(&self.segments, &parts)
    }

    /// The pattern text this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Match a `/`-separated path against a glob pattern.
///
/// ```
/// use path_filter::matches;
///
/// assert!(matches("**/foo", "a/b/foo").unwrap());
/// assert!(matches("**", "anything/at/all").unwrap());
/// assert!(!matches("foo", "sub/foo").unwrap());
/// ```
///
/// # Errors
/// Returns a [`PatternError`] if the pattern is not a valid glob.
pub fn matches(pattern: &str, path: &str) -> Result<bool, PatternError> {
    Ok(Pattern::new(pattern)?.matches(path))
}

/// Whether a segment contains glob metacharacters.
pub(crate) fn is_glob_segment(segment: &str) -> bool {
    segment == "**" || segment.contains(META_CHARS)
}

/// Recursive segment-level matcher. `**` tries every split point of the
/// remaining path; all other segments consume exactly one path segment.
fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::AnySegments, rest)) => {
            (0..=path.len()).any(|skip| match_segments(rest, &path[skip..]))
        }
        Some((segment, rest)) => match path.split_first() {
            Some((head, tail)) => segment.matches(head) && match_segments(rest, tail),
            None => false,
        },
    }
}

/// Recursive single-segment matcher with backtracking for `*`. The segment
/// has already been validated, so character classes are well-formed.
fn match_chars(pattern: &[char], text: &[char]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some((&'*', rest)) => (0..=text.len()).any(|skip| match_chars(rest, &text[skip..])),
        Some((&'?', rest)) => !text.is_empty() && match_chars(rest, &text[1..]),
        Some((&'[', rest)) => {
            let Some((&head, tail)) = text.split_first() else {
                return false;
            };
            let (matched, consumed) = match_class(rest, head);
            matched && match_chars(&rest[consumed..], tail)
        }
        Some((&'\\', rest)) => match (rest.first(), text.first()) {
            (Some(escaped), Some(head)) if escaped == head => {
                match_chars(&rest[1..], &text[1..])
            }
            _ => false,
        },
        Some((&literal, rest)) => {
            text.first() == Some(&literal) && match_chars(rest, &text[1..])
        }
    }
}

/// Match `ch` against a character class. `pattern` starts just past the `[`;
/// returns whether the class matched and how many pattern characters it
/// spans, including the closing `]`.
fn match_class(pattern: &[char], ch: char) -> (bool, usize) {
    let mut idx = 0;
    let mut negate = false;
    if matches!(pattern.first(), Some(&('!' | '^'))) {
        negate = true;
        idx += 1;
    }

    // `]` as the first class character is a literal member.
    let first = idx;
    let mut matched = false;
    while idx < pattern.len() {
        let c = pattern[idx];
        if c == ']' && idx > first {
            return (matched != negate, idx + 1);
        }
        // Range such as `a-z`, unless the `-` directly precedes the closing
        // bracket (then it is a literal).
        if idx + 2 < pattern.len() && pattern[idx + 1] == '-' && pattern[idx + 2] != ']' {
            if ch >= c && ch <= pattern[idx + 2] {
                matched = true;
            }
            idx += 3;
            continue;
        }
        if c == ch {
            matched = true;
        }
        idx += 1;
    }

    // Unreachable for validated patterns.
    (false, idx)
}

/// Check that a glob segment is well-formed.
fn validate_glob(pattern: &str, segment: &str) -> Result<(), PatternError> {
    let error = |reason: &str| PatternError {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    };

    let chars: Vec<char> = segment.chars().collect();
    let mut idx = 0;
    while idx < chars.len() {
        match chars[idx] {
            '\\' => {
                if idx + 1 >= chars.len() {
                    return Err(error("trailing `\\` escapes nothing"));
                }
                idx += 2;
            }
            '[' => {
                let mut end = idx + 1;
                if matches!(chars.get(end), Some(&('!' | '^'))) {
                    end += 1;
                }
                if chars.get(end) == Some(&']') {
                    end += 1;
                }
                while end < chars.len() && chars[end] != ']' {
                    end += 1;
                }
                if end >= chars.len() {
                    return Err(error("unterminated character class"));
                }
                idx = end + 1;
            }
            _ => idx += 1,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::exact("foo", "foo", true)]
    #[case::anchored_no_descent("foo", "sub/foo", false)]
    #[case::anchored_no_prefix("foo", "foo/bar", false)]
    #[case::case_sensitive("Foo", "foo", false)]
    #[case::empty_pattern_empty_path("", "", true)]
    #[case::empty_pattern_nonempty_path("", "x", false)]
    #[case::trailing_slash_normalized("a/", "a", true)]
    #[case::multi_segment_literal("a/b/c", "a/b/c", true)]
    #[case::multi_segment_mismatch("a/b/c", "a/b", false)]
    fn literal_matching(#[case] pattern: &str, #[case] path: &str, #[case] expected: bool) {
        assert_eq!(matches(pattern, path).unwrap(), expected);
    }

    #[rstest]
    #[case::everything("**", "a/b/c", true)]
    #[case::everything_single("**", "x", true)]
    #[case::everything_empty("**", "", true)]
    #[case::everything_absolute("**", "/a/b", true)]
    #[case::prefix("**/foo", "a/b/foo", true)]
    #[case::prefix_zero_segments("**/foo", "foo", true)]
    #[case::prefix_mismatch("**/foo", "a/b/bar", false)]
    #[case::infix("a/**/z", "a/z", true)]
    #[case::infix_deep("a/**/z", "a/b/c/z", true)]
    #[case::infix_mismatch("a/**/z", "b/c/z", false)]
    #[case::double("**/a/**", "x/a/y/z", true)]
    #[case::suffix_zero_segments("a/**", "a", true)]
    #[case::suffix_deep("a/**", "a/b/c", true)]
    fn double_star_matching(#[case] pattern: &str, #[case] path: &str, #[case] expected: bool) {
        assert_eq!(matches(pattern, path).unwrap(), expected);
    }

    #[rstest]
    #[case::star_within_segment("*.go", "main.go", true)]
    #[case::star_does_not_cross_slash("*", "a/b", false)]
    #[case::star_empty_run("a*b", "ab", true)]
    #[case::star_long_run("a*b", "axxxb", true)]
    #[case::question("te?t", "test", true)]
    #[case::question_needs_char("te?t", "tet", false)]
    #[case::class("[abc]", "b", true)]
    #[case::class_miss("[abc]", "d", false)]
    #[case::class_range("x[0-9]", "x7", true)]
    #[case::class_range_miss("x[0-9]", "xa", false)]
    #[case::class_negated("[!abc]", "d", true)]
    #[case::class_negated_miss("[!abc]", "a", false)]
    #[case::class_caret_negated("[^abc]", "d", true)]
    #[case::class_literal_close("[]ab]", "]", true)]
    #[case::class_literal_dash("[a-]", "-", true)]
    #[case::escaped_star("\\*", "*", true)]
    #[case::escaped_star_miss("\\*", "x", false)]
    #[case::glob_per_segment("*/*", "foo/bar", true)]
    #[case::glob_per_segment_miss("*/*", "foo", false)]
    fn segment_glob_matching(#[case] pattern: &str, #[case] path: &str, #[case] expected: bool) {
        assert_eq!(matches(pattern, path).unwrap(), expected);
    }

    #[rstest]
    #[case::absolute_match("/voing/**", "/voing/x", true)]
    #[case::absolute_needs_absolute_path("/voing/**", "voing/x", false)]
    #[case::relative_rejects_absolute("voing/**", "/voing/x", false)]
    fn absolute_patterns(#[case] pattern: &str, #[case] path: &str, #[case] expected: bool) {
        assert_eq!(matches(pattern, path).unwrap(), expected);
    }

    #[rstest]
    #[case::double_open("[[")]
    #[case::bare_open("[")]
    #[case::empty_class("[]")]
    #[case::negated_unterminated("[!")]
    #[case::trailing_escape("foo\\")]
    #[case::nested_segment("src/[[")]
    fn invalid_patterns(#[case] pattern: &str) {
        let err = Pattern::new(pattern).unwrap_err();
        assert_eq!(err.pattern, pattern);
    }

    #[test]
    fn pattern_reports_raw_text() {
        let pattern = Pattern::new("a/**/*.rs").unwrap();
        assert_eq!(pattern.as_str(), "a/**/*.rs");
    }

    #[test]
    fn backtracking_terminates() {
        let pattern = format!("{}b", "*a".repeat(5));
        assert!(!matches(&pattern, &"a".repeat(15)).unwrap());
    }
}
