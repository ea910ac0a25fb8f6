//! Deriving literal walk roots from glob patterns.
//!
//! Every match of a pattern lies under the pattern's *base path*: the longest
//! wildcard-free directory prefix. Walking only the base paths of an include
//! set lets a directory walk skip every subtree that cannot contain a match,
//! which is the dominant saving for narrow patterns over large trees (e.g.
//! `/voing/**` confines the walk to `/voing`).

use indexmap::IndexSet;
use itertools::Itertools;

use crate::pattern::is_glob_segment;

/// The literal directory prefix guaranteed to contain every match of
/// `pattern`.
///
/// Leading wildcard-free segments accumulate into the result up to the first
/// segment containing a glob metacharacter. A fully literal pattern names a
/// single file, so its base path is the pattern's parent directory. The
/// degenerate results are `.` for relative patterns and `/` for absolute
/// ones.
///
/// ```
/// use path_filter::base_path;
///
/// assert_eq!(base_path("foo"), ".");
/// assert_eq!(base_path("test/foo*"), "test");
/// assert_eq!(base_path("**/*"), ".");
/// assert_eq!(base_path("/voing/**"), "/voing");
/// ```
pub fn base_path(pattern: &str) -> String {
    let trimmed = pattern.strip_suffix('/').unwrap_or(pattern);
    let mut literal = Vec::new();
    let mut fully_literal = true;
    for segment in trimmed.split('/') {
        if is_glob_segment(segment) {
            fully_literal = false;
            break;
        }
        literal.push(segment);
    }
    if fully_literal {
        // The pattern names a single file; its base is one level up.
        literal.pop();
    }
    if literal.is_empty() {
        ".".to_string()
    } else if literal == [""] {
        "/".to_string()
    } else {
        literal.iter().join("/")
    }
}

/// Fold the base paths of `patterns` into `existing`, returning the merged
/// insertion-ordered set.
///
/// Duplicates are dropped. `.` absorbs relative base paths: once `.` is
/// present, further relative bases are redundant, and when `.` arrives it
/// replaces all relative bases accumulated so far at the earliest of their
/// positions. Absolute base paths are kept distinct and never merged with
/// relative ones. No other subsumption is performed; `foo` and `foo/bar`
/// both survive.
///
/// ```
/// use path_filter::get_base_paths;
///
/// let bases = get_base_paths(Vec::new(), ["foo", "bar", "/voing/**"]);
/// assert_eq!(bases, [".", "/voing"]);
/// ```
pub fn get_base_paths<'a>(
    existing: Vec<String>,
    patterns: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let mut bases: IndexSet<String> = existing.into_iter().collect();
    for pattern in patterns {
        insert_base(&mut bases, base_path(pattern));
    }
    bases.into_iter().collect()
}

fn insert_base(bases: &mut IndexSet<String>, base: String) {
    let is_relative = |base: &str| !base.starts_with('/');

    if is_relative(&base) && base != "." && bases.contains(".") {
        return;
    }
    if base == "." && bases.iter().any(|existing| is_relative(existing)) {
        let mut merged = IndexSet::with_capacity(bases.len());
        for existing in bases.drain(..) {
            if is_relative(&existing) {
                merged.insert(".".to_string());
            } else {
                merged.insert(existing);
            }
        }
        *bases = merged;
        return;
    }
    bases.insert(base);
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::bare_literal("foo", ".")]
    #[case::nested_literal("test/foo", "test")]
    #[case::trailing_glob("test/foo*", "test")]
    #[case::glob_extension("test/*.**", "test")]
    #[case::leading_double_star("**/*", ".")]
    #[case::glob_in_first_segment("foo*/bar", ".")]
    #[case::double_star_infix("foo/**/bar", "foo")]
    #[case::absolute("/voing/**", "/voing")]
    #[case::absolute_literal("/a/b", "/a")]
    #[case::absolute_root("/**", "/")]
    #[case::question_mark("a?/b", ".")]
    #[case::character_class("logs/[0-9]*", "logs")]
    #[case::trailing_slash("test/foo/", "test")]
    fn base_path_cases(#[case] pattern: &str, #[case] expected: &str) {
        assert_eq!(base_path(pattern), expected);
    }

    #[rstest]
    #[case::single(vec!["foo"], vec!["."])]
    #[case::deduplicated(vec!["foo", "bar"], vec!["."])]
    #[case::absolute_kept(vec!["foo", "bar", "/voing/**"], vec![".", "/voing"])]
    #[case::dot_absorbs_relative(vec!["foo/**", "**"], vec!["."])]
    #[case::dot_absorbs_but_not_absolute(vec!["foo/**", "**", "/bar/**"], vec![".", "/bar"])]
    #[case::relative_after_dot(vec!["**", "foo/**"], vec!["."])]
    #[case::distinct_relatives(vec!["foo/**", "bar/**"], vec!["foo", "bar"])]
    fn get_base_paths_cases(#[case] patterns: Vec<&str>, #[case] expected: Vec<&str>) {
        assert_eq!(get_base_paths(Vec::new(), patterns), expected);
    }

    #[test]
    fn accumulator_is_merged() {
        let bases = get_base_paths(vec!["/voing".to_string()], ["test/foo*"]);
        assert_eq!(bases, ["/voing", "test"]);
    }

    #[test]
    fn accumulator_dot_absorbs_later_relatives() {
        let bases = get_base_paths(vec![".".to_string()], ["test/foo*", "/abs/**"]);
        assert_eq!(bases, [".", "/abs"]);
    }
}
