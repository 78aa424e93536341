//! Whole-file import reconciliation.
//!
//! After the generated declarations are assembled under the original file's import block,
//! the block usually lists packages only the original code needed. This pass keeps the
//! imports the generated code references, adds standard-library imports it references but
//! lacks, and prints the block sorted and grouped.

use crate::ast::ImportSpec;
use crate::error::ImportError;
use crate::parser::GoParser;
use lazy_static::lazy_static;
use std::collections::{BTreeSet, HashMap, HashSet};
use tree_sitter::Node;

lazy_static! {
    static ref STDLIB: HashMap<&'static str, &'static str> = [
        "bufio", "bytes", "cmp", "context", "embed", "errors", "flag", "fmt", "io", "iter", "log",
        "maps", "math", "net", "os", "path", "reflect", "regexp", "runtime", "slices", "sort",
        "strconv", "strings", "sync", "syscall", "testing", "time", "unicode", "unsafe",
        "container/heap", "container/list", "crypto/md5", "crypto/sha1", "crypto/sha256",
        "crypto/tls", "crypto/x509", "database/sql", "encoding/base64", "encoding/binary",
        "encoding/csv", "encoding/hex", "encoding/json", "encoding/xml", "io/fs", "io/ioutil",
        "log/slog", "math/big", "math/bits", "math/rand", "net/http", "net/url", "os/exec",
        "os/signal", "path/filepath", "sync/atomic", "text/template", "unicode/utf8",
    ]
    .into_iter()
    .map(|path| (path.rsplit('/').next().unwrap_or(path), path))
    .collect();
}

/// Package name an import path is assumed to declare when it has no alias.
pub fn assumed_name(path: &str) -> String {
    let mut elements = path.rsplit('/');
    let mut base = elements.next().unwrap_or(path);
    if let Some(version) = base.strip_prefix('v') {
        if !version.is_empty() && version.chars().all(|c| c.is_ascii_digit()) {
            if let Some(parent) = elements.next() {
                base = parent;
            }
        }
    }
    let base = base.strip_prefix("go-").unwrap_or(base);
    let end = base
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
        .map_or(base.len(), |(i, _)| i);
    base[..end].to_string()
}

/// Identifiers an import may be referenced by.
///
/// An alias is the only name. Without one, both the assumed package name and the raw
/// last path element count, since `k8s.io/api/core/v1` declares `package v1`.
pub fn reference_names(spec: &ImportSpec) -> Vec<String> {
    match spec.name.as_deref() {
        Some(name) if name != "_" && name != "." => vec![name.to_string()],
        _ => {
            let assumed = assumed_name(&spec.path);
            let last = spec.path.rsplit('/').next().unwrap_or(&spec.path);
            if assumed == last {
                vec![assumed]
            } else {
                vec![assumed, last.to_string()]
            }
        }
    }
}

/// First path element without a dot means standard library
pub fn is_stdlib(path: &str) -> bool {
    !path.split('/').next().unwrap_or(path).contains('.')
}

/// Standard-library import path for a package qualifier
pub fn stdlib_path(qualifier: &str) -> Option<&'static str> {
    STDLIB.get(qualifier).copied()
}

/// Reconcile the import block of a complete Go file against its identifier usage.
pub fn reconcile(text: &str) -> Result<String, ImportError> {
    let file = GoParser::new()?.parse(text)?;
    let root = file.root();

    let mut cursor = root.walk();
    let clause = root
        .named_children(&mut cursor)
        .find(|n| n.kind() == "package_clause")
        .ok_or(ImportError::MissingPackage)?;

    let used = used_qualifiers(root, text);

    let mut kept: Vec<ImportSpec> = Vec::new();
    let mut seen = HashSet::new();
    for spec in file.imports() {
        let needed =
            spec.is_blank() || spec.is_dot() || reference_names(spec).iter().any(|name| used.contains(name));
        if needed && seen.insert((spec.name.clone(), spec.path.clone())) {
            kept.push(spec.clone());
        } else if !needed {
            log::debug!("dropping unused import {}", spec.text);
        }
    }

    let provided: HashSet<String> = kept.iter().flat_map(reference_names).collect();
    for qualifier in &used {
        if provided.contains(qualifier) {
            continue;
        }
        match stdlib_path(qualifier) {
            Some(path) => {
                log::debug!("adding import \"{path}\"");
                kept.push(ImportSpec::new(None, path));
            }
            None => log::warn!("no import provides `{qualifier}`"),
        }
    }

    let mut out = text[..clause.end_byte()].to_string();
    if !kept.is_empty() {
        out.push_str("\n\n");
        out.push_str(&import_block(kept));
    }
    for (start, end) in chunks(root, clause.end_byte()) {
        out.push_str("\n\n");
        out.push_str(text[start..end].trim_end());
    }
    out.push('\n');
    Ok(out)
}

fn import_block(mut specs: Vec<ImportSpec>) -> String {
    specs.sort_by(|a, b| (a.path.as_str(), &a.name).cmp(&(b.path.as_str(), &b.name)));
    let (std, other): (Vec<_>, Vec<_>) = specs.into_iter().partition(|s| is_stdlib(&s.path));

    let line = |spec: &ImportSpec| match &spec.name {
        Some(name) => format!("\t{name} \"{}\"\n", spec.path),
        None => format!("\t\"{}\"\n", spec.path),
    };

    let mut block = String::from("import (\n");
    block.extend(std.iter().map(line));
    if !std.is_empty() && !other.is_empty() {
        block.push('\n');
    }
    block.extend(other.iter().map(line));
    block.push(')');
    block
}

/// Byte ranges of top-level declarations after the package clause, each
/// extended backwards over the comment lines directly above it.
fn chunks(root: Node<'_>, after: usize) -> Vec<(usize, usize)> {
    let mut chunks = Vec::new();
    let mut pending: Option<(usize, usize, usize)> = None; // start, end, end row
    let mut cursor = root.walk();

    for node in root.named_children(&mut cursor) {
        if node.start_byte() < after || node.kind() == "import_declaration" {
            continue;
        }
        let row = node.start_position().row;
        if let Some((start, end, end_row)) = pending {
            if row > end_row + 1 {
                chunks.push((start, end));
                pending = None;
            }
        }
        if node.kind() == "comment" {
            let start = pending.map_or(node.start_byte(), |(start, _, _)| start);
            pending = Some((start, node.end_byte(), node.end_position().row));
        } else {
            let start = pending.take().map_or(node.start_byte(), |(start, _, _)| start);
            chunks.push((start, node.end_byte()));
        }
    }
    if let Some((start, end, _)) = pending {
        chunks.push((start, end));
    }
    chunks
}

/// Package qualifiers referenced anywhere in the file
fn used_qualifiers(root: Node<'_>, source: &str) -> BTreeSet<String> {
    let mut globals = HashSet::new();
    let mut cursor = root.walk();
    for node in root.named_children(&mut cursor) {
        if matches!(node.kind(), "function_declaration" | "method_declaration") {
            if let Some(name) = node.child_by_field_name("name") {
                globals.insert(source[name.byte_range()].to_string());
            }
        }
    }

    let mut used = BTreeSet::new();
    let mut cursor = root.walk();
    for node in root.named_children(&mut cursor) {
        let mut bound = globals.clone();
        if matches!(node.kind(), "function_declaration" | "method_declaration") {
            collect_bindings(node, source, &mut bound);
        }
        collect_qualifiers(node, source, &bound, &mut used);
    }
    used
}

fn collect_bindings(node: Node<'_>, source: &str, bound: &mut HashSet<String>) {
    match node.kind() {
        "parameter_declaration" | "variadic_parameter_declaration" | "type_parameter_declaration" => {
            let mut cursor = node.walk();
            for name in node.children_by_field_name("name", &mut cursor) {
                bound.insert(source[name.byte_range()].to_string());
            }
        }
        "short_var_declaration" | "range_clause" => {
            if let Some(left) = node.child_by_field_name("left") {
                let mut cursor = left.walk();
                for ident in left.named_children(&mut cursor).filter(|n| n.kind() == "identifier") {
                    bound.insert(source[ident.byte_range()].to_string());
                }
            }
        }
        "var_spec" | "const_spec" => {
            let mut cursor = node.walk();
            for name in node.children_by_field_name("name", &mut cursor) {
                bound.insert(source[name.byte_range()].to_string());
            }
        }
        _ => {}
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_bindings(child, source, bound);
    }
}

fn collect_qualifiers(node: Node<'_>, source: &str, bound: &HashSet<String>, used: &mut BTreeSet<String>) {
    match node.kind() {
        "qualified_type" => {
            if let Some(package) = node.child_by_field_name("package") {
                used.insert(source[package.byte_range()].to_string());
            }
        }
        "selector_expression" => {
            if let Some(operand) = node.child_by_field_name("operand") {
                let name = &source[operand.byte_range()];
                if operand.kind() == "identifier" && !bound.contains(name) {
                    used.insert(name.to_string());
                }
            }
        }
        _ => {}
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_qualifiers(child, source, bound, used);
    }
}
