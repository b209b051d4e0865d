//! File inventory for a directory tree.
//!
//! Walks the target root once, pruning skipped directories before descending
//! into them, and produces the sorted file inventory, the subset of analyzable
//! scripts, and a basename index used by path resolution and weak-edge
//! matching.
use chrono::{DateTime, Utc};
use log::warn;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Directory names never descended into, regardless of ignore files.
pub const BUILT_IN_SKIP_DIRS: [&str; 12] = [
    "venv",
    ".venv",
    "env",
    ".env",
    "__pycache__",
    "node_modules",
    "dist",
    "build",
    ".git",
    ".idea",
    ".vscode",
    "tmp",
];

/// Immutable traversal configuration, passed in explicitly so index
/// construction stays pure and testable.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Directory names pruned before recursion.
    pub skip_dirs: BTreeSet<String>,
    /// Extensions (without dot) identifying analyzable scripts.
    pub script_extensions: BTreeSet<String>,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            skip_dirs: BUILT_IN_SKIP_DIRS.iter().map(|s| (*s).to_string()).collect(),
            script_extensions: BTreeSet::from(["py".to_string()]),
        }
    }
}

/// Inventory of a directory tree: all files, the analyzable scripts, and a
/// basename -> paths index. Paths are project-relative and sorted.
#[derive(Debug, Clone, Default)]
pub struct FileIndex {
    pub files: Vec<String>,
    pub scripts: Vec<String>,
    pub basenames: BTreeMap<String, Vec<String>>,
}

/// Per-file metadata carried into manifest entries.
#[derive(Debug, Clone, Default)]
pub struct FileMetadata {
    pub size_bytes: u64,
    pub modified_at: String,
    pub extension: Option<String>,
}

/// Parse the `.gitignore` at `root` into additional skip-directory names.
///
/// Only a restricted subset is honored: comment and blank lines are skipped,
/// a trailing slash is stripped, patterns containing wildcards or path
/// separators are ignored as too complex, and negation patterns are ignored.
#[must_use]
pub fn parse_ignore_file(root: &Path) -> BTreeSet<String> {
    let path = root.join(".gitignore");
    let mut out = BTreeSet::new();
    if !path.exists() {
        return out;
    }
    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            warn!("failed to read {}: {e}", path.display());
            return out;
        }
    };
    for raw in content.lines() {
        let mut line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        line = line.strip_suffix('/').unwrap_or(line);
        if line.contains('*') || line.contains('/') {
            continue;
        }
        if line.is_empty() || line.starts_with('!') {
            continue;
        }
        out.insert(line.to_string());
    }
    out
}

/// Walk `root` and build the file inventory.
///
/// Skipped directories are pruned before recursion, so huge ignored trees
/// (dependency caches and the like) cost nothing. Unreadable entries are
/// skipped with a warning, never fatal. Output ordering is lexicographic on
/// the relative path.
#[must_use]
pub fn index_directory(root: &Path, config: &IndexerConfig) -> FileIndex {
    let mut files: Vec<String> = Vec::new();

    let walker = WalkDir::new(root).follow_links(false).into_iter().filter_entry(|e| {
        if e.depth() == 0 || !e.file_type().is_dir() {
            return true;
        }
        let name = e.file_name().to_string_lossy();
        !config.skip_dirs.contains(name.as_ref())
    });

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.path().strip_prefix(root) {
            Ok(rel) => files.push(rel.to_string_lossy().into_owned()),
            Err(_) => warn!("entry outside root: {}", entry.path().display()),
        }
    }
    files.sort();

    let scripts: Vec<String> = files
        .iter()
        .filter(|rel| {
            Path::new(rel)
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| config.script_extensions.contains(e))
        })
        .cloned()
        .collect();

    let mut basenames: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for rel in &files {
        basenames.entry(basename(rel).to_string()).or_default().push(rel.clone());
    }

    FileIndex { files, scripts, basenames }
}

/// Last path component of a relative path or raw reference string.
#[must_use]
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Collect size, mtime, and extension for one file. Failures degrade to
/// defaults with a warning; metadata is informational only.
#[must_use]
pub fn file_metadata(path: &Path) -> FileMetadata {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"));
    match fs::metadata(path) {
        Ok(meta) => {
            let modified_at = meta
                .modified()
                .map(|t| DateTime::<Utc>::from(t).to_rfc3339())
                .unwrap_or_default();
            FileMetadata { size_bytes: meta.len(), modified_at, extension }
        }
        Err(e) => {
            warn!("failed to stat {}: {e}", path.display());
            FileMetadata { size_bytes: 0, modified_at: String::new(), extension }
        }
    }
}
