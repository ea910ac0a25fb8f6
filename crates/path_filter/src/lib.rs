#![deny(missing_docs)]
//! Select file paths with ordered include/exclude glob pattern sets.
//!
//! This crate filters paths — from an explicit list or by walking a
//! directory tree — using glob patterns with a double-star segment wildcard.
//! It provides:
//! - Matching a single path against a pattern ([`matches`], [`Pattern`])
//! - Deriving the literal walk roots of a pattern set ([`base_path`],
//!   [`get_base_paths`]), used to skip subtrees that cannot contain a match
//! - Combining include and exclude sets into a selection ([`files`],
//!   [`find`])
//!
//! # Pattern Syntax
//!
//! Patterns are `/`-separated. Within a segment, `*` matches any run of
//! non-separator characters, `?` matches one character, and `[...]` matches
//! POSIX-style character classes (ranges, `!`/`^` negation, a literal `]`
//! when first). A segment that is exactly `**` matches zero or more whole
//! segments. A trailing `/` is ignored (`a/` ≡ `a`); a leading `/` marks an
//! absolute pattern.
//!
//! Matching is case-sensitive and anchored: `foo` matches only the path
//! `foo`. No implicit `**` is added — write `**/foo` to match at any depth.
//!
//! # Filter Decision
//!
//! A path is selected iff it matches at least one include pattern (an empty
//! include set passes every path to the exclude side) and matches no exclude
//! pattern: exclude always wins. Calling [`files`] with neither includes nor
//! excludes selects nothing.
//!
//! # Degraded Errors
//!
//! A syntactically invalid pattern does not abort a filtering call: it
//! matches nothing, and the [`PatternError`] is reported on the returned
//! [`Selection`] so callers can surface a warning. Walk failures, by
//! contrast, are fatal to [`find`] and discard partial results.

mod base_path;
mod filter;
mod pattern;

pub use base_path::{base_path, get_base_paths};
pub use filter::{files, find, Selection, WalkError};
pub use pattern::{matches, Pattern, PatternError};
