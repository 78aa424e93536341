//! Canonical text of Go type expressions.
//!
//! Types are printed from the tree rather than sliced from the source, so a struct
//! spread over several lines comes out as `struct{ A int; B string }` and spacing such
//! as `map[string] []byte` or `chan <- int` is normalized the way gofmt prints it.

use tree_sitter::Node;

/// Canonical text of a type node. Comments are dropped.
pub fn type_text(node: Node<'_>, source: &str) -> String {
    TypePrinter { source }.ty(node)
}

struct TypePrinter<'s> {
    source: &'s str,
}

impl<'s> TypePrinter<'s> {
    fn text(&self, node: Node<'_>) -> &'s str {
        &self.source[node.byte_range()]
    }

    fn field(&self, node: Node<'_>, name: &str) -> String {
        node.child_by_field_name(name).map(|n| self.ty(n)).unwrap_or_default()
    }

    /// Named children minus comments
    fn parts<'t>(&self, node: Node<'t>) -> Vec<Node<'t>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor).filter(|n| n.kind() != "comment").collect()
    }

    fn ty(&self, node: Node<'_>) -> String {
        match node.kind() {
            "qualified_type" => format!("{}.{}", self.field(node, "package"), self.field(node, "name")),
            "pointer_type" => format!("*{}", self.first(node)),
            "negated_type" => format!("~{}", self.first(node)),
            "parenthesized_type" => format!("({})", self.first(node)),
            "slice_type" => format!("[]{}", self.field(node, "element")),
            "array_type" => {
                let length = node.child_by_field_name("length").map(|n| collapse(self.text(n))).unwrap_or_default();
                format!("[{length}]{}", self.field(node, "element"))
            }
            "implicit_length_array_type" => format!("[...]{}", self.field(node, "element")),
            "map_type" => format!("map[{}]{}", self.field(node, "key"), self.field(node, "value")),
            "channel_type" => self.channel(node),
            "generic_type" => format!("{}{}", self.field(node, "type"), self.field(node, "type_arguments")),
            "type_arguments" => {
                let args: Vec<String> = self.parts(node).into_iter().map(|n| self.ty(n)).collect();
                format!("[{}]", args.join(", "))
            }
            "type_elem" | "type_constraint" => {
                let terms: Vec<String> = self.parts(node).into_iter().map(|n| self.ty(n)).collect();
                terms.join(" | ")
            }
            "function_type" => format!("func{}", self.signature(node)),
            "struct_type" => {
                let fields = self
                    .parts(node)
                    .into_iter()
                    .find(|n| n.kind() == "field_declaration_list")
                    .map(|list| self.members(list, "field_declaration"))
                    .unwrap_or_default();
                braced("struct", &fields)
            }
            "interface_type" => {
                let elems: Vec<String> = self.parts(node).into_iter().map(|n| self.interface_elem(n)).collect();
                braced("interface", &elems)
            }
            "parameter_list" => self.params(node),
            _ => collapse(self.text(node)),
        }
    }

    fn first(&self, node: Node<'_>) -> String {
        self.parts(node).into_iter().next().map(|n| self.ty(n)).unwrap_or_default()
    }

    fn channel(&self, node: Node<'_>) -> String {
        let value = self.field(node, "value");
        let lead = node.child(0).map(|n| n.kind());
        let second = node.child(1).map(|n| n.kind());
        match (lead, second) {
            (Some("<-"), _) => format!("<-chan {value}"),
            (_, Some("<-")) => format!("chan<- {value}"),
            _ => format!("chan {value}"),
        }
    }

    /// `(params) result` of a function type or interface method
    fn signature(&self, node: Node<'_>) -> String {
        let params = node.child_by_field_name("parameters").map(|n| self.params(n)).unwrap_or_else(|| "()".into());
        match node.child_by_field_name("result") {
            Some(result) if result.kind() == "parameter_list" => {
                let entries = self.param_entries(result);
                let single_anonymous = matches!(
                    self.parts(result).as_slice(),
                    [only] if only.kind() == "parameter_declaration" && only.child_by_field_name("name").is_none()
                );
                match entries.as_slice() {
                    [] => params,
                    [only] if single_anonymous => format!("{params} {only}"),
                    _ => format!("{params} ({})", entries.join(", ")),
                }
            }
            Some(result) => format!("{params} {}", self.ty(result)),
            None => params,
        }
    }

    fn params(&self, list: Node<'_>) -> String {
        format!("({})", self.param_entries(list).join(", "))
    }

    fn param_entries(&self, list: Node<'_>) -> Vec<String> {
        self.parts(list)
            .into_iter()
            .filter_map(|decl| {
                let ty = self.field(decl, "type");
                let names = self.names(decl);
                match decl.kind() {
                    "variadic_parameter_declaration" if names.is_empty() => Some(format!("...{ty}")),
                    "variadic_parameter_declaration" => Some(format!("{} ...{ty}", names.join(", "))),
                    "parameter_declaration" if names.is_empty() => Some(ty),
                    "parameter_declaration" => Some(format!("{} {ty}", names.join(", "))),
                    _ => None,
                }
            })
            .collect()
    }

    fn names(&self, decl: Node<'_>) -> Vec<&'s str> {
        let mut cursor = decl.walk();
        decl.children_by_field_name("name", &mut cursor).map(|n| self.text(n)).collect()
    }

    fn members(&self, list: Node<'_>, kind: &str) -> Vec<String> {
        self.parts(list)
            .into_iter()
            .filter(|n| n.kind() == kind)
            .map(|decl| self.struct_field(decl))
            .collect()
    }

    fn struct_field(&self, decl: Node<'_>) -> String {
        let names = self.names(decl);
        let mut out = if names.is_empty() {
            // embedded, possibly through a pointer
            let mut cursor = decl.walk();
            let pointer = decl.children(&mut cursor).any(|n| n.kind() == "*");
            format!("{}{}", if pointer { "*" } else { "" }, self.field(decl, "type"))
        } else {
            format!("{} {}", names.join(", "), self.field(decl, "type"))
        };
        if let Some(tag) = decl.child_by_field_name("tag") {
            out.push(' ');
            out.push_str(self.text(tag));
        }
        out
    }

    fn interface_elem(&self, node: Node<'_>) -> String {
        match node.kind() {
            "method_elem" => format!("{}{}", self.field(node, "name"), self.signature(node)),
            _ => self.ty(node),
        }
    }
}

/// `struct{}` when empty, otherwise the one-line gofmt form `struct{ A int; B string }`
fn braced(keyword: &str, members: &[String]) -> String {
    if members.is_empty() {
        format!("{keyword}{{}}")
    } else {
        format!("{keyword}{{ {} }}", members.join("; "))
    }
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
