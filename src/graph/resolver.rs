//! Path resolution for raw literal references.
//!
//! Strategies are tried in a fixed order and the first success wins:
//!
//! 1. relative to the referring script's directory, if the file exists;
//! 2. basename lookup in the global index, only when the reference has no
//!    path separator and exactly one file carries that basename;
//! 3. relative to the project root, if the file exists.
//!
//! Swapping this order changes which files silently "exist" for resolution,
//! so it is deliberately fixed. Ambiguous basenames are never guessed.
use std::collections::BTreeMap;
use std::path::Path;

/// Resolve a raw reference against a canonicalized project root.
///
/// Returns the project-relative path of the matched file, or `None` when no
/// strategy succeeds (the caller records the raw reference as unresolved).
#[must_use]
pub fn resolve(
    root: &Path,
    script_rel: &str,
    reference: &str,
    basenames: &BTreeMap<String, Vec<String>>,
) -> Option<String> {
    let candidate = Path::new(reference);

    if !candidate.is_absolute() {
        let script_abs = root.join(script_rel);
        let script_dir = script_abs.parent().unwrap_or(root);
        let joined = script_dir.join(candidate);
        if joined.exists() {
            if let Some(rel) = relative_under_root(root, &joined) {
                return Some(rel);
            }
        }
    }

    if !reference.contains('/') && !reference.contains('\\') {
        if let Some(matches) = basenames.get(reference) {
            if matches.len() == 1 {
                return Some(matches[0].clone());
            }
        }
    }

    if !candidate.is_absolute() {
        let joined = root.join(candidate);
        if joined.exists() {
            if let Some(rel) = relative_under_root(root, &joined) {
                return Some(rel);
            }
        }
    }

    None
}

/// Project-relative form of `path` if it lies within `root`, else `None`.
/// `root` must already be canonicalized.
#[must_use]
pub fn relative_under_root(root: &Path, path: &Path) -> Option<String> {
    let canon = path.canonicalize().ok()?;
    canon.strip_prefix(root).ok().map(|p| p.to_string_lossy().into_owned())
}
