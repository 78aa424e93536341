//! Askama templates for every generated fragment.
//!
//! Each template borrows the model it stringifies; field access and loops are checked
//! when the crate compiles. Text the templates do not compute themselves (doc comment
//! lines, the indented body) is prepared by the typed helpers at the bottom.

use crate::ast::{FunctionSignature, ImportSpec, Parameter, ResultValue, TypeParam};
use crate::error::RenderError;
use askama::Template;

pub const TOOL_NAME: &str = "muster";
pub const REFERENCE_URL: &str = "https://github.com/joshcarp/muster";

/// `name type,` per parameter
#[derive(Template)]
#[template(
    source = "{% for param in params %}{{ param.name }} {{ param.ty }},{% endfor %}",
    ext = "txt",
    escape = "none"
)]
pub struct ParamsTemplate<'a> {
    pub params: &'a [Parameter],
}

/// `name type,` per result; anonymous results render as ` type,`
#[derive(Template)]
#[template(
    source = "{% for result in results %}{{ result.name }} {{ result.ty }},{% endfor %}",
    ext = "txt",
    escape = "none"
)]
pub struct ResultsTemplate<'a> {
    pub results: &'a [ResultValue],
}

#[derive(Template)]
#[template(
    source = "{% if !params.is_empty() %}[{% for param in params %}{{ param.name }} {{ param.constraint }},{% endfor %}]{% endif %}",
    ext = "txt",
    escape = "none"
)]
pub struct TypeParamsTemplate<'a> {
    pub params: &'a [TypeParam],
}

/// `(name type)`, or nothing for a free function
#[derive(Template)]
#[template(source = "{% if !ty.is_empty() %}({{ name }} {{ ty }}){% endif %}", ext = "txt", escape = "none")]
pub struct ReceiverTemplate<'a> {
    pub name: &'a str,
    pub ty: &'a str,
}

/// Full declaration. The closing brace ends the template; callers add the newline.
#[derive(Template)]
#[template(
    source = "{{ doc }}func {{ receiver }}{{ name }}{{ type_params }}({{ params }})({{ results }}){\n{{ body }}\n}",
    ext = "txt",
    escape = "none"
)]
pub struct FunctionTemplate<'a> {
    pub doc: String,
    pub receiver: String,
    pub name: &'a str,
    pub type_params: String,
    pub params: String,
    pub results: String,
    pub body: String,
}

/// Forwarding body of a `Must` wrapper
#[derive(Template)]
#[template(
    source = "val, err := {% if signature.is_method() %}{{ signature.receiver.name }}.{% endif %}{{ signature.name }}\
{% if !signature.type_params.is_empty() %}[{% for param in signature.type_params %}{% if !loop.first %}, {% endif %}{{ param.name }}{% endfor %}]{% endif %}\
({% for param in signature.parameters %}{{ param.name }}{% if param.is_variadic() %}...{% endif %}, {% endfor %})\n\
if err != nil {\n\tpanic(err)\n}\nreturn val",
    ext = "txt",
    escape = "none"
)]
pub struct CallTemplate<'a> {
    pub signature: &'a FunctionSignature,
}

/// Banner, package clause, the original imports verbatim, then the declarations
#[derive(Template)]
#[template(
    source = "// Code generated by {{ tool }}. DO NOT EDIT.\n// see {{ url }} for more details.\npackage {{ package }}\n\
{% if !imports.is_empty() %}import (\n{% for spec in imports %}\t{{ spec.text }}\n{% endfor %})\n{% endif %}\
\n{{ functions }}",
    ext = "txt",
    escape = "none"
)]
pub struct FileTemplate<'a> {
    pub tool: &'a str,
    pub url: &'a str,
    pub package: &'a str,
    pub imports: &'a [ImportSpec],
    pub functions: String,
}

/// Render `template`, tagging failures with its name
pub fn render<T: Template>(name: &'static str, template: &T) -> Result<String, RenderError> {
    template.render().map_err(|source| RenderError::Template { template: name, source })
}

/// Turn free text into `//` comment lines
pub fn doc_lines(text: &str) -> String {
    text.lines().map(|line| format!("// {line}\n")).collect()
}

/// Prefix every non-empty line with a tab
pub fn indent(text: &str) -> String {
    text.split('\n')
        .map(|line| if line.is_empty() { String::new() } else { format!("\t{line}") })
        .collect::<Vec<_>>()
        .join("\n")
}
