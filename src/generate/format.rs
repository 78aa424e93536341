//! Canonical layout for generated declarations.
//!
//! The rendered templates are valid Go but loosely spaced (`(s int,a Foo,)( int,){`).
//! This pass re-parses the text and prints it the way gofmt would for the statement and
//! expression shapes the generator emits. Node kinds it does not know are printed from
//! their source text with whitespace runs collapsed.

use crate::error::ParseError;
use crate::parser::{type_text, GoParser};
use tree_sitter::Node;

/// Format a rendered declaration. Invalid input is logged and returned unchanged.
pub fn format_declaration(text: &str) -> String {
    match try_format(text) {
        Ok(formatted) => formatted,
        Err(err) => {
            log::warn!("internal error: invalid Go generated: {err}");
            log::warn!("compile the package to analyze the error");
            text.to_string()
        }
    }
}

const PREAMBLE: &str = "package p\n";

/// Format one or more declarations, failing on invalid syntax.
pub fn try_format(text: &str) -> Result<String, ParseError> {
    let wrapped = format!("{PREAMBLE}{text}");
    let file = GoParser::new()?.parse(&wrapped).map_err(|mut err| {
        // report positions relative to `text`
        err.span.start.line = err.span.start.line.saturating_sub(1);
        err.span.end.line = err.span.end.line.saturating_sub(1);
        err
    })?;

    let root = file.root();
    let mut printer = Printer::new(file.source());
    let mut cursor = root.walk();
    let mut prev: Option<Node<'_>> = None;

    for node in root.named_children(&mut cursor).filter(|n| n.kind() != "package_clause") {
        if let Some(prev) = prev {
            printer.out.push('\n');
            let attached = prev.kind() == "comment"
                && node.start_position().row <= prev.end_position().row + 1;
            if !attached {
                printer.out.push('\n');
            }
        }
        printer.top_level(node);
        prev = Some(node);
    }
    if prev.is_some() {
        printer.out.push('\n');
    }
    Ok(printer.out)
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

struct Printer<'s> {
    source: &'s str,
    out: String,
    depth: usize,
}

impl<'s> Printer<'s> {
    fn new(source: &'s str) -> Self {
        Self { source, out: String::new(), depth: 0 }
    }

    fn text(&self, node: Node<'_>) -> &'s str {
        &self.source[node.byte_range()]
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push('\t');
        }
    }

    fn top_level(&mut self, node: Node<'_>) {
        match node.kind() {
            "comment" => self.out.push_str(self.text(node).trim_end()),
            "function_declaration" | "method_declaration" => self.function(node),
            _ => {
                let text = collapse(self.text(node));
                self.out.push_str(&text);
            }
        }
    }

    fn function(&mut self, node: Node<'_>) {
        let mut header = String::from("func ");
        if let Some(receiver) = node.child_by_field_name("receiver") {
            header.push_str(&self.params(receiver));
            header.push(' ');
        }
        if let Some(name) = node.child_by_field_name("name") {
            header.push_str(self.text(name));
        }
        if let Some(type_params) = node.child_by_field_name("type_parameters") {
            header.push_str(&self.type_params(type_params));
        }
        if let Some(params) = node.child_by_field_name("parameters") {
            header.push_str(&self.params(params));
        }
        if let Some(result) = node.child_by_field_name("result") {
            let result = self.result(result);
            if !result.is_empty() {
                header.push(' ');
                header.push_str(&result);
            }
        }
        self.out.push_str(&header);

        if let Some(body) = node.child_by_field_name("body") {
            self.out.push(' ');
            self.block(body);
        }
    }

    fn params(&self, list: Node<'_>) -> String {
        let mut cursor = list.walk();
        let entries: Vec<String> = list
            .named_children(&mut cursor)
            .filter(|n| matches!(n.kind(), "parameter_declaration" | "variadic_parameter_declaration"))
            .map(|decl| self.param(decl))
            .collect();
        format!("({})", entries.join(", "))
    }

    fn param(&self, decl: Node<'_>) -> String {
        let ty = decl.child_by_field_name("type").map(|t| type_text(t, self.source)).unwrap_or_default();
        let mut cursor = decl.walk();
        let names: Vec<&str> = decl.children_by_field_name("name", &mut cursor).map(|n| self.text(n)).collect();

        if decl.kind() == "variadic_parameter_declaration" {
            return match names.first() {
                Some(name) => format!("{name} ...{ty}"),
                None => format!("...{ty}"),
            };
        }
        if names.is_empty() {
            ty
        } else {
            format!("{} {}", names.join(", "), ty)
        }
    }

    /// A single anonymous result loses its parentheses.
    fn result(&self, node: Node<'_>) -> String {
        if node.kind() != "parameter_list" {
            return type_text(node, self.source);
        }
        let mut cursor = node.walk();
        let entries: Vec<Node<'_>> = node
            .named_children(&mut cursor)
            .filter(|n| matches!(n.kind(), "parameter_declaration" | "variadic_parameter_declaration"))
            .collect();
        match entries.as_slice() {
            [] => String::new(),
            [only] if only.kind() == "parameter_declaration" && only.child_by_field_name("name").is_none() => {
                self.param(*only)
            }
            _ => self.params(node),
        }
    }

    fn type_params(&self, list: Node<'_>) -> String {
        let mut cursor = list.walk();
        let entries: Vec<String> = list
            .named_children(&mut cursor)
            .filter(|n| n.kind() == "type_parameter_declaration")
            .map(|decl| {
                let mut names = decl.walk();
                let names: Vec<&str> = decl.children_by_field_name("name", &mut names).map(|n| self.text(n)).collect();
                let constraint = decl.child_by_field_name("type").map(|t| type_text(t, self.source)).unwrap_or_default();
                format!("{} {}", names.join(", "), constraint)
            })
            .collect();
        format!("[{}]", entries.join(", "))
    }

    fn block(&mut self, node: Node<'_>) {
        let mut cursor = node.walk();
        let statements: Vec<Node<'_>> = node
            .named_children(&mut cursor)
            .filter(|n| n.kind() != "empty_statement")
            .collect();
        if statements.is_empty() {
            self.out.push_str("{}");
            return;
        }

        self.out.push_str("{\n");
        self.depth += 1;
        let mut prev_row: Option<usize> = None;
        for statement in statements {
            // keep at most one blank line
            if prev_row.is_some_and(|row| statement.start_position().row > row + 1) {
                self.out.push('\n');
            }
            self.indent();
            self.statement(statement);
            self.out.push('\n');
            prev_row = Some(statement.end_position().row);
        }
        self.depth -= 1;
        self.indent();
        self.out.push('}');
    }

    fn statement(&mut self, node: Node<'_>) {
        match node.kind() {
            "short_var_declaration" => {
                let text = self.binary_fields(node, ":=");
                self.out.push_str(&text);
            }
            "assignment_statement" => {
                let op = node.child_by_field_name("operator").map_or("=", |n| self.text(n));
                let text = self.binary_fields(node, op);
                self.out.push_str(&text);
            }
            "return_statement" => {
                self.out.push_str("return");
                let mut cursor = node.walk();
                if let Some(values) = node.named_children(&mut cursor).find(|n| n.kind() == "expression_list") {
                    let values = self.expr(values);
                    self.out.push(' ');
                    self.out.push_str(&values);
                }
            }
            "expression_statement" => {
                let text = node.named_child(0).map(|n| self.expr(n)).unwrap_or_default();
                self.out.push_str(&text);
            }
            "go_statement" | "defer_statement" => {
                let keyword = if node.kind() == "go_statement" { "go" } else { "defer" };
                let call = node.named_child(0).map(|n| self.expr(n)).unwrap_or_default();
                self.out.push_str(&format!("{keyword} {call}"));
            }
            "inc_statement" | "dec_statement" => {
                let operand = node.named_child(0).map(|n| self.expr(n)).unwrap_or_default();
                let op = if node.kind() == "inc_statement" { "++" } else { "--" };
                self.out.push_str(&format!("{operand}{op}"));
            }
            "if_statement" => self.if_statement(node),
            "block" => self.block(node),
            "comment" => self.out.push_str(self.text(node).trim_end()),
            _ => {
                let text = collapse(self.text(node));
                self.out.push_str(&text);
            }
        }
    }

    fn binary_fields(&self, node: Node<'_>, op: &str) -> String {
        let left = node.child_by_field_name("left").map(|n| self.expr(n)).unwrap_or_default();
        let right = node.child_by_field_name("right").map(|n| self.expr(n)).unwrap_or_default();
        format!("{left} {op} {right}")
    }

    fn if_statement(&mut self, node: Node<'_>) {
        self.out.push_str("if ");
        if let Some(init) = node.child_by_field_name("initializer") {
            self.statement(init);
            self.out.push_str("; ");
        }
        if let Some(condition) = node.child_by_field_name("condition") {
            let condition = self.expr(condition);
            self.out.push_str(&condition);
        }
        if let Some(consequence) = node.child_by_field_name("consequence") {
            self.out.push(' ');
            self.block(consequence);
        }
        if let Some(alternative) = node.child_by_field_name("alternative") {
            self.out.push_str(" else ");
            if alternative.kind() == "if_statement" {
                self.if_statement(alternative);
            } else {
                self.block(alternative);
            }
        }
    }

    fn expr(&self, node: Node<'_>) -> String {
        match node.kind() {
            "expression_list" | "argument_list" => {
                let mut cursor = node.walk();
                let items: Vec<String> = node
                    .named_children(&mut cursor)
                    .filter(|n| n.kind() != "comment")
                    .map(|n| self.expr(n))
                    .collect();
                if node.kind() == "argument_list" {
                    format!("({})", items.join(", "))
                } else {
                    items.join(", ")
                }
            }
            "call_expression" => {
                let function = node.child_by_field_name("function").map(|n| self.expr(n)).unwrap_or_default();
                let type_args = node
                    .child_by_field_name("type_arguments")
                    .map(|n| collapse(self.text(n)))
                    .unwrap_or_default();
                let args = node.child_by_field_name("arguments").map(|n| self.expr(n)).unwrap_or_default();
                format!("{function}{type_args}{args}")
            }
            "variadic_argument" => {
                let inner = node.named_child(0).map(|n| self.expr(n)).unwrap_or_default();
                format!("{inner}...")
            }
            "selector_expression" => {
                let operand = node.child_by_field_name("operand").map(|n| self.expr(n)).unwrap_or_default();
                let field = node.child_by_field_name("field").map_or("", |n| self.text(n));
                format!("{operand}.{field}")
            }
            "binary_expression" => {
                let left = node.child_by_field_name("left").map(|n| self.expr(n)).unwrap_or_default();
                let op = node.child_by_field_name("operator").map_or("", |n| self.text(n));
                let right = node.child_by_field_name("right").map(|n| self.expr(n)).unwrap_or_default();
                format!("{left} {op} {right}")
            }
            "unary_expression" => {
                let op = node.child_by_field_name("operator").map_or("", |n| self.text(n));
                let operand = node.child_by_field_name("operand").map(|n| self.expr(n)).unwrap_or_default();
                format!("{op}{operand}")
            }
            "parenthesized_expression" => {
                let inner = node.named_child(0).map(|n| self.expr(n)).unwrap_or_default();
                format!("({inner})")
            }
            _ => collapse(self.text(node)),
        }
    }
}
