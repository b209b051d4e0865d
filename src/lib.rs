//! dir-manifest — directory file-relationship manifests
//!
//! Walk a directory tree, index every file, analyze the Python scripts in it,
//! and build a best-effort dependency graph linking scripts to the files they
//! read, write, or merely mention.
//!
//! # Features
//! - Pruned file discovery (built-in skip dirs plus a simple `.gitignore` subset)
//! - Syntax-tree scan of each script for `open(...)`, tabular `read_*`/`to_*`
//!   calls, and `Path(...)` chains with literal arguments
//! - Layered path resolution: script-relative, unambiguous basename, root-relative
//! - Strong (read/write), weak (basename mention), and heuristic edge tiers,
//!   mirrored in both directions
//! - Deterministic, sorted JSON manifest output
//!
//! # Quickstart (Library)
//! ```no_run
//! use dir_manifest::graph::Manifest;
//!
//! let manifest = Manifest::build_from_directory(std::path::Path::new(".")).expect("build manifest");
//! println!("scripts: {} files: {}", manifest.scripts.len(), manifest.files.len());
//! ```
//!
//! # Quickstart (CLI)
//! ```text
//! dir-manifest .
//! dir-manifest ./project --no-weak-edges --filter-unused
//! ```
pub mod app;
pub mod cli;
pub mod errors;
pub mod graph;
pub mod indexer;
pub mod parser;
pub mod report;
pub mod utils;
