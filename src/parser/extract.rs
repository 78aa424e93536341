//! Model extraction: tree-sitter declaration node -> [`FunctionSignature`].

use crate::ast::{FunctionSignature, Parameter, Receiver, ResultValue, TypeParam, RECEIVER_PLACEHOLDER};
use super::types::type_text;
use tree_sitter::Node;

/// Build the signature model of a `function_declaration` or `method_declaration` node.
///
/// Grouped names (`a, b int`) are expanded to one entry per name. Unnamed or blank
/// parameters get positional `_p<i>` names so that forwarding them stays valid Go.
pub fn extract_signature(node: Node<'_>, source: &str) -> FunctionSignature {
    let name = node
        .child_by_field_name("name")
        .map(|n| source[n.byte_range()].to_string())
        .unwrap_or_default();

    let mut signature = FunctionSignature::new(name);

    if let Some(receiver) = node.child_by_field_name("receiver") {
        signature.receiver = extract_receiver(receiver, source);
    }
    if let Some(type_params) = node.child_by_field_name("type_parameters") {
        signature.type_params = extract_type_params(type_params, source);
    }
    if let Some(params) = node.child_by_field_name("parameters") {
        signature.parameters = fields(params, source)
            .into_iter()
            .enumerate()
            .map(|(index, (name, ty))| {
                if name.is_empty() || name == "_" {
                    Parameter::new(format!("_p{index}"), ty)
                } else {
                    Parameter::new(name, ty)
                }
            })
            .collect();
    }
    signature.results = match node.child_by_field_name("result") {
        Some(list) if list.kind() == "parameter_list" => fields(list, source)
            .into_iter()
            .map(|(name, ty)| ResultValue::new(name, ty))
            .collect(),
        Some(ty) => vec![ResultValue::anonymous(type_text(ty, source))],
        None => Vec::new(),
    };

    signature
}

fn extract_receiver(list: Node<'_>, source: &str) -> Receiver {
    match fields(list, source).into_iter().next() {
        Some((name, ty)) if name.is_empty() || name == "_" => Receiver::new(RECEIVER_PLACEHOLDER, ty),
        Some((name, ty)) => Receiver::new(name, ty),
        None => Receiver::default(),
    }
}

fn extract_type_params(list: Node<'_>, source: &str) -> Vec<TypeParam> {
    let mut params = Vec::new();
    let mut cursor = list.walk();
    for decl in list.named_children(&mut cursor).filter(|n| n.kind() == "type_parameter_declaration") {
        let constraint = decl
            .child_by_field_name("type")
            .map(|t| type_text(t, source))
            .unwrap_or_default();
        let mut names = decl.walk();
        for name in decl.children_by_field_name("name", &mut names) {
            params.push(TypeParam::new(&source[name.byte_range()], constraint.clone()));
        }
    }
    params
}

/// `(name, type)` pairs of a parameter list, one per declared name.
fn fields(list: Node<'_>, source: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let mut cursor = list.walk();
    for decl in list.named_children(&mut cursor) {
        let ty = decl.child_by_field_name("type").map(|t| type_text(t, source)).unwrap_or_default();
        match decl.kind() {
            "parameter_declaration" => {
                let mut names = decl.walk();
                let names: Vec<String> = decl
                    .children_by_field_name("name", &mut names)
                    .map(|n| source[n.byte_range()].to_string())
                    .collect();
                if names.is_empty() {
                    out.push((String::new(), ty));
                } else {
                    out.extend(names.into_iter().map(|name| (name, ty.clone())));
                }
            }
            "variadic_parameter_declaration" => {
                let name = decl
                    .child_by_field_name("name")
                    .map(|n| source[n.byte_range()].to_string())
                    .unwrap_or_default();
                out.push((name, format!("...{ty}")));
            }
            _ => {}
        }
    }
    out
}
