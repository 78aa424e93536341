mod must;
pub mod naming;

pub use must::{call_body, doc_comment, is_eligible, synthesize, wrapper_name, MustRule};

use crate::ast::FunctionSignature;
use crate::error::RenderError;
use crate::parser::{extract_signature, Decl, ParsedFile};

/// Derives zero or one new declaration from an existing one
pub trait Rule {
    fn apply(&self, signature: &FunctionSignature) -> Result<Option<FunctionSignature>, RenderError>;
}

/// Applies a series of rules to every function declaration of a file
pub struct Transformer {
    rules: Vec<Box<dyn Rule>>,
}

impl Transformer {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn add<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Generated declarations, in the order their sources appear.
    ///
    /// A rule that fails to render is logged and skipped; the remaining
    /// declarations are still processed.
    pub fn transform(&self, file: &ParsedFile) -> Vec<FunctionSignature> {
        let mut generated = Vec::new();
        for decl in file.decls() {
            match decl {
                Decl::Function(node) => {
                    let signature = extract_signature(node, file.source());
                    for rule in &self.rules {
                        match rule.apply(&signature) {
                            Ok(Some(derived)) => generated.push(derived),
                            Ok(None) => {}
                            Err(err) => log::error!("error printing function {}: {err}", signature.name),
                        }
                    }
                }
                Decl::Type(_) | Decl::Var(_) | Decl::Const(_) | Decl::Other(_) => {}
            }
        }
        generated
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a transformer with the standard rules
pub fn standard_rules() -> Transformer {
    Transformer::new().add(MustRule)
}
