use super::render::Render;
use super::template::{render, FileTemplate, REFERENCE_URL, TOOL_NAME};
use crate::ast::ImportSpec;
use crate::error::RenderError;

/// A generated file before import reconciliation.
///
/// The import block is the original file's, copied as-is; pruning happens later.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub package: String,
    pub imports: Vec<ImportSpec>,
    pub functions: Vec<String>,
}

impl GeneratedFile {
    pub fn new(package: impl Into<String>, imports: Vec<ImportSpec>) -> Self {
        Self { package: package.into(), imports, functions: Vec::new() }
    }

    /// Append a rendered declaration
    pub fn push(&mut self, function: String) {
        self.functions.push(function);
    }
}

impl Render for GeneratedFile {
    fn render(&self) -> Result<String, RenderError> {
        let template = FileTemplate {
            tool: TOOL_NAME,
            url: REFERENCE_URL,
            package: &self.package,
            imports: &self.imports,
            functions: self.functions.concat(),
        };
        render("file", &template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_banner_package_imports_functions() {
        let mut file = GeneratedFile::new(
            "main",
            vec![ImportSpec::new(None, "fmt"), ImportSpec::new(Some("foobar"), "example.com/foo")],
        );
        file.push("func A() {}\n".to_string());
        file.push("func B() {}\n".to_string());
        assert_eq!(
            file.render().unwrap(),
            "// Code generated by muster. DO NOT EDIT.\n\
             // see https://github.com/joshcarp/muster for more details.\n\
             package main\n\
             import (\n\t\"fmt\"\n\tfoobar \"example.com/foo\"\n)\n\
             \n\
             func A() {}\nfunc B() {}\n"
        );
    }

    #[test]
    fn test_no_imports() {
        let file = GeneratedFile::new("lib", Vec::new());
        assert_eq!(
            file.render().unwrap(),
            "// Code generated by muster. DO NOT EDIT.\n// see https://github.com/joshcarp/muster for more details.\npackage lib\n\n"
        );
    }
}
