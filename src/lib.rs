pub mod ast;
pub mod driver;
pub mod error;
pub mod generate;
pub mod loader;
pub mod parser;
pub mod transform;

pub use ast::{FunctionSignature, ImportSpec, Parameter, Receiver, ResultValue, TypeParam};
pub use driver::{run, run_with, Config, Mode, Summary};
pub use error::{CompileError, ErrorKind, ImportError, LoadError, ParseError, RenderError};
pub use generate::{generate_file, Render};
pub use loader::{load, LoadedFile, Package};
pub use parser::{GoParser, ParsedFile};
pub use transform::{standard_rules, MustRule, Rule, Transformer};

use serde::Serialize;

/// Output of one compilation
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResult {
    /// Complete generated Go file
    pub code: String,
    /// Wrappers that were rendered into `code`, in source order
    pub signatures: Vec<FunctionSignature>,
}

/// Parse, transform, render, reconcile.
pub struct Pipeline {
    parser: GoParser,
    transformer: Transformer,
}

impl Pipeline {
    /// Pipeline with the `Must` rule
    pub fn standard() -> Result<Self, CompileError> {
        Ok(Self::new(standard_rules())?)
    }

    pub fn new(transformer: Transformer) -> Result<Self, ParseError> {
        Ok(Self { parser: GoParser::new()?, transformer })
    }

    pub fn parser(&mut self) -> &mut GoParser {
        &mut self.parser
    }

    /// Compile one Go source file into its wrapper file
    pub fn compile(&mut self, source: &str) -> Result<GenerateResult, CompileError> {
        let file = self.parser.parse(source)?;
        self.generate(&file)
    }

    /// Generate the wrapper file for an already parsed file
    pub fn generate(&self, file: &ParsedFile) -> Result<GenerateResult, CompileError> {
        let signatures = self.transformer.transform(file);
        log::debug!("{} wrapper(s) for package {}", signatures.len(), file.package());
        generate_file(file, signatures)
    }
}

/// Compile Go source with the standard pipeline.
pub fn generate(source: &str) -> Result<GenerateResult, CompileError> {
    Pipeline::standard()?.compile(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BANNER: &str =
        "// Code generated by muster. DO NOT EDIT.\n// see https://github.com/joshcarp/muster for more details.\n";

    fn code(source: &str) -> String {
        generate(source).unwrap().code
    }

    #[test]
    fn test_simple_function() {
        let source = "package main\n\nfunc Blah(s int, a Foo) (int, error) {\n\treturn 0, fmt.Errorf(\"\")\n}\n";
        let expected = format!(
            "{BANNER}package main\n\n// MustBlah calls Blah and panics if err is not nil.\nfunc MustBlah(s int, a Foo) int {{\n\tval, err := Blah(s, a)\n\tif err != nil {{\n\t\tpanic(err)\n\t}}\n\treturn val\n}}\n"
        );
        assert_eq!(code(source), expected);
    }

    #[test]
    fn test_pointer_receiver() {
        let source = "package main\n\nfunc (f *Foo) BlahWithRecv(s int, a Foo) (int, error) {\n\treturn 0, nil\n}\n";
        let expected = format!(
            "{BANNER}package main\n\n// MustBlahWithRecv calls BlahWithRecv and panics if err is not nil.\nfunc (f *Foo) MustBlahWithRecv(s int, a Foo) int {{\n\tval, err := f.BlahWithRecv(s, a)\n\tif err != nil {{\n\t\tpanic(err)\n\t}}\n\treturn val\n}}\n"
        );
        assert_eq!(code(source), expected);
    }

    #[test]
    fn test_external_types_keep_aliased_import() {
        let source = "package main\n\nimport (\n\t\"fmt\"\n\n\tfoobar \"github.com/googleapis/gax-go/v2\"\n)\n\nfunc MustSpannerBlah3(s foobar.Backoff, a Foo) (Foo, error) {\n\treturn Foo{}, fmt.Errorf(\"\")\n}\n";
        let expected = format!(
            "{BANNER}package main\n\nimport (\n\tfoobar \"github.com/googleapis/gax-go/v2\"\n)\n\n// MustMustSpannerBlah3 calls MustSpannerBlah3 and panics if err is not nil.\nfunc MustMustSpannerBlah3(s foobar.Backoff, a Foo) Foo {{\n\tval, err := MustSpannerBlah3(s, a)\n\tif err != nil {{\n\t\tpanic(err)\n\t}}\n\treturn val\n}}\n"
        );
        assert_eq!(code(source), expected);
    }

    #[test]
    fn test_no_eligible_functions() {
        let source = "package util\n\nimport \"fmt\"\n\nfunc Hello() { fmt.Println(\"hi\") }\n";
        let result = generate(source).unwrap();
        assert!(result.signatures.is_empty());
        assert_eq!(result.code, format!("{BANNER}package util\n"));
    }

    #[test]
    fn test_signatures_in_source_order() {
        let source = "package main\n\nfunc b() (int, error) { return 0, nil }\n\nfunc A() (string, error) { return \"\", nil }\n";
        let result = generate(source).unwrap();
        let names: Vec<&str> = result.signatures.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["mustB", "MustA"]);
        let first = result.code.find("func mustB").unwrap();
        let second = result.code.find("func MustA").unwrap();
        assert!(first < second);
        assert!(result.code.contains("}\n\n// MustA calls A"));
    }

    #[test]
    fn test_parse_error_is_fatal() {
        let err = generate("package main\n\nfunc Blah(s int {\n}\n").unwrap_err();
        assert!(matches!(err, CompileError::Parse(_)));
    }

    #[test]
    fn test_deterministic() {
        let source = "package main\n\nimport \"context\"\n\nfunc (c *Client) Fetch(ctx context.Context, ids ...string) ([]byte, error) {\n\treturn nil, nil\n}\n";
        assert_eq!(code(source), code(source));
    }

    #[test]
    fn test_json_shape() {
        let result = generate("package main\n\nfunc Blah(s int) (int, error) { return s, nil }\n").unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["signatures"][0]["name"], "MustBlah");
        assert_eq!(json["signatures"][0]["parameters"][0]["type"], "int");
        assert!(json["code"].as_str().unwrap().starts_with("// Code generated by muster."));
    }
}
