//! Manifest model and builder.
//!
//! This module defines the manifest data structures (`Manifest`,
//! `ScriptEntry`, `FileEntry`) and the aggregation pass that combines
//! per-script scans into a bidirectional graph: strong read/write edges,
//! weak basename-mention edges, and unresolved references.
//!
//! You typically construct a manifest via `Manifest::build_from_directory*`
//! and hand it to `crate::report` for filtering and rendering.
use crate::errors::ManifestError;
use crate::indexer::{self, FileIndex, IndexerConfig};
use crate::parser::{PythonAnalyzer, ScriptScan};
use chrono::Utc;
use log::warn;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

pub mod infer;
pub mod resolver;

/// Default manifest filename; also excluded from mention matching so every
/// run does not produce a universal self-edge.
pub const DEFAULT_OUTPUT_NAME: &str = "directory_manifest.json";

/// One indexed file and the scripts relating to it. Edge sets mirror the
/// owning `ScriptEntry` sets and render sorted.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub size_bytes: u64,
    pub modified_at: String,
    pub extension: Option<String>,
    pub read_by: BTreeSet<String>,
    pub written_by: BTreeSet<String>,
    pub mentioned_by: BTreeSet<String>,
}

/// One analyzed script and its resolved relationships.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ScriptEntry {
    pub path: String,
    pub size_bytes: u64,
    pub modified_at: String,
    pub extension: Option<String>,
    /// Resolved strong read targets (project-relative).
    pub reads: BTreeSet<String>,
    /// Resolved strong write targets (project-relative).
    pub writes: BTreeSet<String>,
    /// Raw read references no strategy could resolve.
    pub unresolved_reads: BTreeSet<String>,
    /// Raw write references no strategy could resolve; write targets
    /// legitimately may not exist yet.
    pub unresolved_writes: BTreeSet<String>,
    /// Writes inferred from naming-convention rules, not call syntax.
    pub heuristic_writes: BTreeSet<String>,
    /// Files reachable only via weak basename mentions.
    pub related_files: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Manifest {
    pub root: String,
    pub generated_at: String,
    /// Sorted by path.
    pub scripts: Vec<ScriptEntry>,
    /// Sorted by path.
    pub files: Vec<FileEntry>,
}

/// Build-time knobs: traversal configuration and the manifest filename
/// (needed during the build for mention self-exclusion).
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub indexer: IndexerConfig,
    pub output_name: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self { indexer: IndexerConfig::default(), output_name: DEFAULT_OUTPUT_NAME.to_string() }
    }
}

impl Manifest {
    /// Build a manifest with default options.
    ///
    /// # Errors
    /// Returns `ManifestError::InvalidRoot` if `root` is not a directory;
    /// per-script failures degrade to empty results and never abort the build.
    pub fn build_from_directory(root: &Path) -> Result<Self, ManifestError> {
        Self::build_with_options(root, &BuildOptions::default())
    }

    /// Build a manifest with explicit options.
    ///
    /// The skip-set is the configured set unioned with the restricted
    /// `.gitignore` subset found at the root. All strong and weak edges for
    /// all scripts are computed before inference rules run.
    ///
    /// # Errors
    /// Returns `ManifestError::InvalidRoot` for a missing or non-directory
    /// root, or `ManifestError::Io` if the root cannot be canonicalized.
    pub fn build_with_options(root: &Path, opts: &BuildOptions) -> Result<Self, ManifestError> {
        if !root.is_dir() {
            return Err(ManifestError::InvalidRoot(root.to_path_buf()));
        }
        let root = root.canonicalize()?;

        let mut indexer_config = opts.indexer.clone();
        indexer_config.skip_dirs.extend(indexer::parse_ignore_file(&root));
        let index = indexer::index_directory(&root, &indexer_config);

        // Per-script scanning is pure and order-preserving; the graph merge
        // below stays serial.
        let scans: Vec<(String, ScriptScan)> = index
            .scripts
            .par_iter()
            .map(|rel| (rel.clone(), analyze_script(&root.join(rel))))
            .collect();

        let mut files: BTreeMap<String, FileEntry> = BTreeMap::new();
        for rel in &index.files {
            let meta = indexer::file_metadata(&root.join(rel));
            files.insert(
                rel.clone(),
                FileEntry {
                    path: rel.clone(),
                    size_bytes: meta.size_bytes,
                    modified_at: meta.modified_at,
                    extension: meta.extension,
                    ..FileEntry::default()
                },
            );
        }

        let mut scripts: Vec<ScriptEntry> = Vec::with_capacity(scans.len());
        for (rel_script, scan) in scans {
            let meta = indexer::file_metadata(&root.join(&rel_script));
            let mut entry = ScriptEntry {
                path: rel_script.clone(),
                size_bytes: meta.size_bytes,
                modified_at: meta.modified_at,
                extension: meta.extension,
                ..ScriptEntry::default()
            };

            for reference in &scan.reads {
                match resolve_indexed(&root, &rel_script, reference, &index, &files) {
                    Some(rel) => {
                        entry.reads.insert(rel.clone());
                        if let Some(info) = files.get_mut(&rel) {
                            info.read_by.insert(rel_script.clone());
                        }
                    }
                    None => {
                        entry.unresolved_reads.insert(reference.clone());
                    }
                }
            }

            for reference in &scan.writes {
                match resolve_indexed(&root, &rel_script, reference, &index, &files) {
                    Some(rel) => {
                        entry.writes.insert(rel.clone());
                        if let Some(info) = files.get_mut(&rel) {
                            info.written_by.insert(rel_script.clone());
                        }
                    }
                    None => {
                        entry.unresolved_writes.insert(reference.clone());
                    }
                }
            }

            // Weak tier: basename mentions fan out to every file sharing the
            // basename. Ambiguity is acceptable here, unlike in resolution.
            for literal in &scan.literals {
                let base = indexer::basename(literal);
                if base == opts.output_name {
                    continue;
                }
                let Some(candidates) = index.basenames.get(base) else { continue };
                for candidate in candidates {
                    entry.related_files.insert(candidate.clone());
                    if let Some(info) = files.get_mut(candidate) {
                        info.mentioned_by.insert(rel_script.clone());
                    }
                }
            }

            scripts.push(entry);
        }
        scripts.sort_by(|a, b| a.path.cmp(&b.path));

        let mut manifest = Manifest {
            root: root.display().to_string(),
            generated_at: Utc::now().to_rfc3339(),
            scripts,
            files: files.into_values().collect(),
        };

        // Strict barrier: rules see the fully aggregated graph.
        infer::apply_rules(&mut manifest);
        Ok(manifest)
    }

    /// Save the manifest as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns `ManifestError::Json` on serialization failure or
    /// `ManifestError::Io` if writing fails.
    pub fn save_json(&self, path: &Path) -> Result<(), ManifestError> {
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Load a manifest from a JSON file.
    ///
    /// # Errors
    /// Returns `ManifestError::Io` if reading fails or `ManifestError::Json`
    /// if the content is not a valid manifest.
    pub fn load_json(path: &Path) -> Result<Self, ManifestError> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

/// Resolve a reference, then gate the result on index membership so strong
/// edges always have a mirroring `FileEntry` (references into skipped
/// directories resolve on disk but stay unresolved here).
fn resolve_indexed(
    root: &Path,
    script_rel: &str,
    reference: &str,
    index: &FileIndex,
    files: &BTreeMap<String, FileEntry>,
) -> Option<String> {
    resolver::resolve(root, script_rel, reference, &index.basenames)
        .filter(|rel| files.contains_key(rel))
}

fn analyze_script(path: &Path) -> ScriptScan {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            warn!("failed to read {}: {e}", path.display());
            return ScriptScan::default();
        }
    };
    let mut analyzer = match PythonAnalyzer::new() {
        Ok(a) => a,
        Err(e) => {
            warn!("python analyzer unavailable: {e}");
            return ScriptScan::default();
        }
    };
    match analyzer.scan(&source) {
        Ok(scan) => scan,
        Err(e) => {
            warn!("failed to parse {}: {e}", path.display());
            ScriptScan::default()
        }
    }
}
