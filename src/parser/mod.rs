//! Syntax scan of one Python script.
//!
//! A single pass over the tree-sitter syntax tree collects candidate read
//! references, candidate write references, and every literal string constant
//! in the file. Classification is purely syntactic: only literal string
//! arguments (optionally joined onto a base with `/`) participate in strong
//! read/write candidates; computed paths are ignored. The literal pool feeds
//! weak basename-mention matching later.
use crate::errors::ParseError;
use std::collections::BTreeSet;
use tree_sitter::{Node, Parser};

/// Method-name vocabulary recognized as I/O, passed in explicitly rather than
/// kept as ambient globals.
#[derive(Debug, Clone)]
pub struct IoVocabulary {
    pub read_methods: BTreeSet<&'static str>,
    pub write_methods: BTreeSet<&'static str>,
    pub read_prefixes: Vec<&'static str>,
    pub write_prefixes: Vec<&'static str>,
}

impl Default for IoVocabulary {
    fn default() -> Self {
        Self {
            read_methods: BTreeSet::from(["read_csv", "read_json", "read_excel", "read_parquet"]),
            write_methods: BTreeSet::from(["to_csv", "to_json", "to_excel", "to_parquet", "to_file"]),
            read_prefixes: vec!["read_", "load_"],
            // A bare `.write(...)` on an open handle writes content, not a
            // path; the underscore in "write_" keeps it out of this rule.
            write_prefixes: vec!["to_", "write_", "save_"],
        }
    }
}

impl IoVocabulary {
    fn is_read(&self, method: &str) -> bool {
        self.read_methods.contains(method) || self.read_prefixes.iter().any(|p| method.starts_with(p))
    }

    fn is_write(&self, method: &str) -> bool {
        self.write_methods.contains(method)
            || self.write_prefixes.iter().any(|p| method.starts_with(p))
    }
}

/// Immutable result of scanning one script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptScan {
    /// Raw literal references classified as reads.
    pub reads: BTreeSet<String>,
    /// Raw literal references classified as writes.
    pub writes: BTreeSet<String>,
    /// Every literal string constant anywhere in the script.
    pub literals: BTreeSet<String>,
}

pub struct PythonAnalyzer {
    parser: Parser,
    vocab: IoVocabulary,
}

impl PythonAnalyzer {
    /// # Errors
    /// Returns `ParseError::Grammar` if the bundled Python grammar cannot be
    /// loaded into tree-sitter (version skew).
    pub fn new() -> Result<Self, ParseError> {
        Self::with_vocabulary(IoVocabulary::default())
    }

    /// # Errors
    /// Returns `ParseError::Grammar` if the bundled Python grammar cannot be
    /// loaded into tree-sitter.
    pub fn with_vocabulary(vocab: IoVocabulary) -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| ParseError::Grammar(e.to_string()))?;
        Ok(Self { parser, vocab })
    }

    /// Scan a script's source text into reads, writes, and literals.
    ///
    /// The scan is a pure pass with no filesystem access; malformed regions of
    /// the script simply contribute nothing.
    ///
    /// # Errors
    /// Returns `ParseError::NoTree` in the rare case tree-sitter yields no
    /// tree at all; callers degrade to an empty result.
    pub fn scan(&mut self, source: &str) -> Result<ScriptScan, ParseError> {
        let tree = self.parser.parse(source, None).ok_or(ParseError::NoTree)?;
        let mut scan = ScriptScan::default();
        self.visit(tree.root_node(), source.as_bytes(), &mut scan);
        Ok(scan)
    }

    fn visit(&self, node: Node, src: &[u8], scan: &mut ScriptScan) {
        match node.kind() {
            "string" => {
                if let Some(text) = string_literal(node, src) {
                    scan.literals.insert(text);
                }
            }
            "call" => self.visit_call(node, src, scan),
            _ => {}
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(child, src, scan);
        }
    }

    fn visit_call(&self, call: Node, src: &[u8], scan: &mut ScriptScan) {
        let Some(func) = call.child_by_field_name("function") else { return };
        match func.kind() {
            "identifier" => {
                if node_text(func, src) == Some("open") {
                    self.classify_open(call, src, scan);
                }
            }
            "attribute" => self.visit_attribute_call(func, call, src, scan),
            _ => {}
        }
    }

    /// `open(...)` with a literal (or `BASE / "name.ext"`) first argument.
    fn classify_open(&self, call: Node, src: &[u8], scan: &mut ScriptScan) {
        let Some(filename) = positional_arg(call, 0).and_then(|arg| literal_or_joined(arg, src))
        else {
            return;
        };
        insert_for_mode(call, src, &filename, scan);
    }

    /// Attribute calls: `df.to_csv(...)`, `pd.read_csv(...)`, or the chained
    /// `Path("x").open(...)` / `(BASE / "x").open(...)` forms.
    fn visit_attribute_call(&self, func: Node, call: Node, src: &[u8], scan: &mut ScriptScan) {
        let Some(attr) = func.child_by_field_name("attribute").and_then(|n| node_text(n, src))
        else {
            return;
        };

        if attr == "open" {
            if let Some(object) = func.child_by_field_name("object") {
                if let Some(filename) = chained_path_literal(object, src) {
                    insert_for_mode(call, src, &filename, scan);
                }
            }
            return;
        }

        let Some(filename) = positional_arg(call, 0).and_then(|arg| {
            string_literal(unwrap_parens(arg), src)
        }) else {
            return;
        };

        if self.vocab.is_read(attr) {
            scan.reads.insert(filename);
        } else if self.vocab.is_write(attr) {
            scan.writes.insert(filename);
        }
    }
}

impl std::fmt::Debug for PythonAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PythonAnalyzer").field("vocab", &self.vocab).finish_non_exhaustive()
    }
}

/// Classify a resolved open-style call by its mode argument: no mode or an
/// `r` mode is a read; any of `w`, `a`, `x`, `+` is a write. `r+` is both.
fn insert_for_mode(call: Node, src: &[u8], filename: &str, scan: &mut ScriptScan) {
    match open_mode(call, src) {
        None => {
            scan.reads.insert(filename.to_string());
        }
        Some(mode) => {
            if mode.contains('r') {
                scan.reads.insert(filename.to_string());
            }
            if mode.chars().any(|c| matches!(c, 'w' | 'a' | 'x' | '+')) {
                scan.writes.insert(filename.to_string());
            }
        }
    }
}

/// Mode for an open-style call: second positional literal, else `mode=`.
fn open_mode(call: Node, src: &[u8]) -> Option<String> {
    if let Some(mode) = positional_arg(call, 1).and_then(|arg| string_literal(arg, src)) {
        return Some(mode);
    }
    let args = call.child_by_field_name("arguments")?;
    let mut cursor = args.walk();
    for child in args.named_children(&mut cursor) {
        if child.kind() != "keyword_argument" {
            continue;
        }
        if child.child_by_field_name("name").and_then(|n| node_text(n, src)) == Some("mode") {
            return child.child_by_field_name("value").and_then(|v| string_literal(v, src));
        }
    }
    None
}

/// The n-th positional argument of a call, skipping keyword arguments.
fn positional_arg(call: Node, index: usize) -> Option<Node> {
    let args = call.child_by_field_name("arguments")?;
    let mut cursor = args.walk();
    let mut seen = 0usize;
    for child in args.named_children(&mut cursor) {
        if matches!(child.kind(), "keyword_argument" | "comment") {
            continue;
        }
        if seen == index {
            return Some(child);
        }
        seen += 1;
    }
    None
}

/// Literal text of a plain string node. F-strings (any interpolation child)
/// are computed values, not literals. Escape sequences are kept verbatim.
fn string_literal(node: Node, src: &[u8]) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let mut start = None;
    let mut end = None;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "interpolation" => return None,
            "string_start" => start = Some(child.end_byte()),
            "string_end" => end = Some(child.start_byte()),
            _ => {}
        }
    }
    let (s, e) = (start?, end?);
    if s > e {
        return None;
    }
    std::str::from_utf8(&src[s..e]).ok().map(str::to_owned)
}

/// A literal string, or the literal right-hand side of a `/` path join.
fn literal_or_joined(node: Node, src: &[u8]) -> Option<String> {
    let node = unwrap_parens(node);
    string_literal(node, src).or_else(|| div_right_literal(node, src))
}

/// `BASE / "name.ext"` — the filename component of a path division.
fn div_right_literal(node: Node, src: &[u8]) -> Option<String> {
    if node.kind() != "binary_operator" {
        return None;
    }
    if node.child_by_field_name("operator")?.kind() != "/" {
        return None;
    }
    string_literal(unwrap_parens(node.child_by_field_name("right")?), src)
}

/// Literal extracted from the receiver of a chained `.open(...)`: either a
/// construction call like `Path("x")` or a `/` join onto a base.
fn chained_path_literal(object: Node, src: &[u8]) -> Option<String> {
    let object = unwrap_parens(object);
    match object.kind() {
        "call" => positional_arg(object, 0).and_then(|arg| string_literal(unwrap_parens(arg), src)),
        "binary_operator" => div_right_literal(object, src),
        _ => None,
    }
}

fn unwrap_parens(mut node: Node) -> Node {
    while node.kind() == "parenthesized_expression" {
        match node.named_child(0) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

fn node_text<'a>(node: Node, src: &'a [u8]) -> Option<&'a str> {
    node.utf8_text(src).ok()
}
