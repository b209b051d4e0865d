use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("tree-sitter rejected the grammar: {0}")]
    Grammar(String),
    #[error("parser produced no syntax tree")]
    NoTree,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid target directory: {0}")]
    InvalidRoot(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
