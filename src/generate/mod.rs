mod format;
pub mod imports;
mod output;
mod render;
pub mod template;

pub use format::{format_declaration, try_format};
pub use imports::reconcile;
pub use output::GeneratedFile;
pub use render::Render;
pub use template::{REFERENCE_URL, TOOL_NAME};

use crate::ast::FunctionSignature;
use crate::error::CompileError;
use crate::parser::ParsedFile;
use crate::GenerateResult;

/// Assemble the generated file for `file` from its derived declarations.
///
/// Declarations that fail to render are logged and left out of both the text and
/// the returned signatures.
pub fn generate_file(file: &ParsedFile, functions: Vec<FunctionSignature>) -> Result<GenerateResult, CompileError> {
    let mut generated = GeneratedFile::new(file.package(), file.imports().to_vec());
    let mut signatures = Vec::with_capacity(functions.len());
    for function in functions {
        match function.render() {
            Ok(text) => {
                generated.push(text);
                signatures.push(function);
            }
            Err(err) => log::error!("error printing function {}: {err}", function.name),
        }
    }

    let assembled = generated.render()?;
    Ok(GenerateResult { code: reconcile(&assembled)?, signatures })
}
