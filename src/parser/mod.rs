pub mod positions;
mod extract;
mod types;

pub use extract::extract_signature;
pub use types::type_text;
pub use positions::{Position, Span};

use crate::ast::ImportSpec;
use crate::error::{ErrorKind, ParseError};
use std::sync::Arc;
use tree_sitter::{Node, Tree};

/// Go source parser backed by tree-sitter
pub struct GoParser {
    parser: tree_sitter::Parser,
}

impl GoParser {
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&tree_sitter_go::LANGUAGE.into()).map_err(|err| {
            ParseError::new(ErrorKind::GrammarUnavailable, err.to_string(), Span::default())
        })?;
        Ok(Self { parser })
    }

    /// Parse one compilation unit. Any syntax error fails the whole file.
    pub fn parse(&mut self, source: &str) -> Result<ParsedFile, ParseError> {
        let tree = self.parser.parse(source, None).ok_or_else(|| {
            ParseError::new(ErrorKind::InvalidSyntax, "parser produced no tree", Span::default())
        })?;

        let root = tree.root_node();
        if let Some(bad) = positions::first_error(root) {
            return Err(syntax_error(bad, source));
        }

        let package = package_name(root, source).ok_or_else(|| {
            ParseError::new(ErrorKind::MissingPackage, "expected `package` clause", Span::at_byte(source, 0))
                .with_help("every Go file starts with `package <name>`")
        })?;
        let imports = import_specs(root, source);

        Ok(ParsedFile {
            tree,
            source: Arc::from(source),
            package,
            imports,
        })
    }
}

fn syntax_error(node: Node<'_>, source: &str) -> ParseError {
    if node.is_missing() {
        return ParseError::new(
            ErrorKind::MissingToken,
            format!("missing `{}`", node.kind()),
            Span::of(node),
        );
    }
    let text = &source[node.byte_range()];
    let snippet: String = text.lines().next().unwrap_or_default().chars().take(24).collect();
    ParseError::new(ErrorKind::InvalidSyntax, format!("unexpected `{}`", snippet.trim()), Span::of(node))
}

fn package_name(root: Node<'_>, source: &str) -> Option<String> {
    let mut cursor = root.walk();
    let clause = root.named_children(&mut cursor).find(|n| n.kind() == "package_clause")?;
    let mut inner = clause.walk();
    let ident = clause.named_children(&mut inner).find(|n| n.kind() == "package_identifier")?;
    Some(source[ident.byte_range()].to_string())
}

fn import_specs(root: Node<'_>, source: &str) -> Vec<ImportSpec> {
    let mut specs = Vec::new();
    let mut cursor = root.walk();
    for decl in root.named_children(&mut cursor).filter(|n| n.kind() == "import_declaration") {
        let mut inner = decl.walk();
        for child in decl.named_children(&mut inner) {
            match child.kind() {
                "import_spec" => specs.extend(import_spec(child, source)),
                "import_spec_list" => {
                    let mut list = child.walk();
                    for spec in child.named_children(&mut list).filter(|n| n.kind() == "import_spec") {
                        specs.extend(import_spec(spec, source));
                    }
                }
                _ => {}
            }
        }
    }
    specs
}

fn import_spec(node: Node<'_>, source: &str) -> Option<ImportSpec> {
    let path = node.child_by_field_name("path")?;
    let path = source[path.byte_range()].trim_matches(|c| c == '"' || c == '`');
    let name = node.child_by_field_name("name").map(|n| &source[n.byte_range()]);
    Some(ImportSpec {
        name: name.map(str::to_string),
        path: path.to_string(),
        text: source[node.byte_range()].to_string(),
    })
}

/// A parsed compilation unit
pub struct ParsedFile {
    tree: Tree,
    source: Arc<str>,
    package: String,
    imports: Vec<ImportSpec>,
}

impl ParsedFile {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn imports(&self) -> &[ImportSpec] {
        &self.imports
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Top-level declarations in file order.
    pub fn decls(&self) -> Vec<Decl<'_>> {
        let root = self.root();
        let mut cursor = root.walk();
        root.named_children(&mut cursor)
            .filter_map(|node| match node.kind() {
                "package_clause" | "import_declaration" | "comment" => None,
                "function_declaration" | "method_declaration" => Some(Decl::Function(node)),
                "type_declaration" => Some(Decl::Type(node)),
                "var_declaration" => Some(Decl::Var(node)),
                "const_declaration" => Some(Decl::Const(node)),
                _ => Some(Decl::Other(node)),
            })
            .collect()
    }
}

/// Top-level declaration kinds
#[derive(Debug, Clone, Copy)]
pub enum Decl<'tree> {
    /// Free function or method
    Function(Node<'tree>),
    Type(Node<'tree>),
    Var(Node<'tree>),
    Const(Node<'tree>),
    Other(Node<'tree>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> ParsedFile {
        GoParser::new().unwrap().parse(source).unwrap()
    }

    #[test]
    fn test_package_and_imports() {
        let file = parse(
            "package foo\n\nimport (\n\t\"fmt\"\n\tfoobar \"github.com/googleapis/gax-go/v2\"\n\t_ \"embed\"\n)\n\nimport \"os\"\n",
        );
        assert_eq!(file.package(), "foo");
        let imports = file.imports();
        assert_eq!(imports.len(), 4);
        assert_eq!(imports[0], ImportSpec::new(None, "fmt"));
        assert_eq!(imports[1].name.as_deref(), Some("foobar"));
        assert_eq!(imports[1].path, "github.com/googleapis/gax-go/v2");
        assert_eq!(imports[1].text, "foobar \"github.com/googleapis/gax-go/v2\"");
        assert!(imports[2].is_blank());
        assert_eq!(imports[3].path, "os");
    }

    #[test]
    fn test_decl_kinds_in_order() {
        let file = parse(
            "package main\n\ntype Foo struct{}\n\nvar x = 1\n\nconst y = 2\n\n// doc\nfunc (f Foo) A() {}\n\nfunc B() {}\n",
        );
        let kinds: Vec<&str> = file
            .decls()
            .iter()
            .map(|d| match d {
                Decl::Function(_) => "func",
                Decl::Type(_) => "type",
                Decl::Var(_) => "var",
                Decl::Const(_) => "const",
                Decl::Other(_) => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["type", "var", "const", "func", "func"]);
    }

    #[test]
    fn test_syntax_error_has_position() {
        let err = GoParser::new()
            .unwrap()
            .parse("package main\n\nfunc Blah(s int {\n}\n")
            .err()
            .unwrap();
        assert!(err.span.start.line >= 2, "error reported at {:?}", err.span);
    }

    #[test]
    fn test_missing_package() {
        let err = GoParser::new().unwrap().parse("// just a comment\n").err().unwrap();
        assert_eq!(err.kind, ErrorKind::MissingPackage);
    }
}
