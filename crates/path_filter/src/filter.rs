//! Combining include/exclude pattern sets into path selections.
//!
//! [`files`] filters an explicit path list; [`find`] walks a directory tree,
//! confining the walk to the base paths of the include set. Both apply the
//! same decision per candidate path: selected iff it matches at least one
//! include pattern (or no includes were given) and no exclude pattern —
//! exclude always wins.
//!
//! Invalid patterns degrade rather than abort: they match nothing, the call
//! still returns its best-effort selection, and the compile errors are
//! reported on the returned [`Selection`] so the caller can warn.

use std::path::{Path, PathBuf};

use fs_err as fs;
use indexmap::IndexSet;
use thiserror::Error;

use crate::base_path::get_base_paths;
use crate::pattern::{Pattern, PatternError};

/// Error returned when the directory listing primitive fails during a walk.
///
/// Fatal to the [`find`] call that encountered it: the walk stops and any
/// partially accumulated selection is discarded, since a truncated walk
/// cannot be trusted.
#[derive(Debug, Error)]
#[error("failed to walk `{}`", path.display())]
pub struct WalkError {
    /// The path whose listing or metadata read failed.
    pub path: PathBuf,
    /// The underlying I/O failure.
    #[source]
    pub source: std::io::Error,
}

/// The outcome of a filtering call.
#[derive(Debug, Default)]
pub struct Selection {
    /// Selected paths, in input order for [`files`] and walk order for
    /// [`find`].
    pub paths: Vec<String>,
    /// Patterns that failed to compile and were degraded to matching
    /// nothing.
    pub pattern_errors: Vec<PatternError>,
}

impl Selection {
    /// The first degraded pattern error, if any.
    pub fn first_error(&self) -> Option<&PatternError> {
        self.pattern_errors.first()
    }
}

/// Compiled include/exclude sets. Tracks whether any include pattern was
/// supplied at all, because an empty include set passes every path to the
/// exclude side while a non-empty one requires a match.
struct Decision {
    includes: Vec<Pattern>,
    any_includes: bool,
    excludes: Vec<Pattern>,
    any_excludes: bool,
}

impl Decision {
    fn new<'a>(
        includes: impl IntoIterator<Item = &'a str>,
        excludes: impl IntoIterator<Item = &'a str>,
        errors: &mut Vec<PatternError>,
    ) -> Self {
        let (includes, any_includes) = compile(includes, errors);
        let (excludes, any_excludes) = compile(excludes, errors);
        Decision {
            includes,
            any_includes,
            excludes,
            any_excludes,
        }
    }

    fn excluded(&self, path: &str) -> bool {
        self.excludes.iter().any(|pattern| pattern.matches(path))
    }

    fn selects(&self, path: &str) -> bool {
        let included =
            !self.any_includes || self.includes.iter().any(|pattern| pattern.matches(path));
        included && !self.excluded(path)
    }
}

/// Compile a pattern set, pushing compile failures onto `errors`. Returns the
/// compiled patterns and whether any pattern text was supplied.
fn compile<'a>(
    globs: impl IntoIterator<Item = &'a str>,
    errors: &mut Vec<PatternError>,
) -> (Vec<Pattern>, bool) {
    let mut patterns = Vec::new();
    let mut any = false;
    for glob in globs {
        any = true;
        match Pattern::new(glob) {
            Ok(pattern) => patterns.push(pattern),
            Err(err) => {
                tracing::debug!(pattern = glob, "invalid glob pattern matches nothing");
                errors.push(err);
            }
        }
    }
    (patterns, any)
}

/// Filter an explicit list of paths with include/exclude pattern sets.
///
/// Input order is preserved and the input is never mutated. Giving neither
/// includes nor excludes selects nothing: an absent include set means
/// "select nothing", not "select everything".
///
/// ```
/// use path_filter::files;
///
/// let selection = files(
///     ["main.cpp", "main.go", "foo.go"],
///     ["*"],
///     ["*.go"],
/// );
/// assert_eq!(selection.paths, ["main.cpp"]);
/// assert!(selection.pattern_errors.is_empty());
/// ```
pub fn files<'a>(
    paths: impl IntoIterator<Item = &'a str>,
    includes: impl IntoIterator<Item = &'a str>,
    excludes: impl IntoIterator<Item = &'a str>,
) -> Selection {
    let mut errors = Vec::new();
    let decision = Decision::new(includes, excludes, &mut errors);

    let mut selected = Vec::new();
    if decision.any_includes || decision.any_excludes {
        for path in paths {
            if decision.selects(path) {
                selected.push(path.to_string());
            }
        }
    }
    Selection {
        paths: selected,
        pattern_errors: errors,
    }
}

/// Walk the tree under `root` and select the files matching the
/// include/exclude pattern sets.
///
/// Only the base paths of the include set are traversed. Candidate paths are
/// `/`-separated and relative to `root` (candidates under an absolute base
/// path carry that absolute prefix, so they line up with the patterns that
/// produced it). Within each directory, entries are visited in lexicographic
/// name order, so results are deterministic regardless of the storage
/// listing order.
///
/// Directories are tested against the exclude set only: a directory matching
/// an exclude is pruned together with its whole subtree, while a directory
/// matching no include is still descended into. Directories never appear in
/// the selection; files are tested with the full decision.
///
/// # Errors
/// Returns a [`WalkError`] as soon as any directory listing fails (missing
/// path, permission denied, unreadable entry metadata). Partial results are
/// discarded.
pub fn find<'a>(
    root: impl AsRef<Path>,
    includes: impl IntoIterator<Item = &'a str>,
    excludes: impl IntoIterator<Item = &'a str>,
) -> Result<Selection, WalkError> {
    let root = root.as_ref();
    let includes: Vec<&str> = includes.into_iter().collect();

    let mut errors = Vec::new();
    let decision = Decision::new(includes.iter().copied(), excludes, &mut errors);

    let bases = get_base_paths(Vec::new(), includes.iter().copied());
    tracing::debug!(root = %root.display(), ?bases, "walking filter base paths");

    let mut selected = IndexSet::new();
    for base in &bases {
        let (dir, prefix) = if base == "." {
            (root.to_path_buf(), "")
        } else {
            (root.join(base.trim_start_matches('/')), base.as_str())
        };
        walk(&dir, prefix, &decision, &mut selected)?;
    }

    Ok(Selection {
        paths: selected.into_iter().collect(),
        pattern_errors: errors,
    })
}

/// Depth-first recursive walk. `rel` is the candidate-path prefix for
/// entries of `dir`.
fn walk(
    dir: &Path,
    rel: &str,
    decision: &Decision,
    selected: &mut IndexSet<String>,
) -> Result<(), WalkError> {
    tracing::trace!(dir = %dir.display(), "listing directory");
    let walk_err = |path: PathBuf| move |source| WalkError { path, source };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(walk_err(dir.to_path_buf()))? {
        entries.push(entry.map_err(walk_err(dir.to_path_buf()))?);
    }
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let candidate = if rel.is_empty() {
            name
        } else {
            format!("{rel}/{name}")
        };
        let file_type = entry.file_type().map_err(walk_err(entry.path()))?;
        if file_type.is_dir() {
            // Excluded directories prune their whole subtree.
            if !decision.excluded(&candidate) {
                walk(&entry.path(), &candidate, decision, selected)?;
            }
        } else if decision.selects(&candidate) {
            selected.insert(candidate);
        }
    }
    Ok(())
}
