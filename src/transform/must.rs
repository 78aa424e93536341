use super::naming::to_pascal_case;
use super::Rule;
use crate::ast::{FunctionSignature, ERROR_SENTINEL};
use crate::error::RenderError;
use crate::generate::template::{render, CallTemplate};

/// Generates `MustX` for every `X` returning `(T, error)`
#[derive(Debug, Clone, Copy, Default)]
pub struct MustRule;

impl Rule for MustRule {
    fn apply(&self, signature: &FunctionSignature) -> Result<Option<FunctionSignature>, RenderError> {
        synthesize(signature)
    }
}

/// Exactly two results, the second literally `error`
pub fn is_eligible(signature: &FunctionSignature) -> bool {
    signature.results.len() == 2 && signature.results[1].ty == ERROR_SENTINEL
}

/// `Must` + name when exported, `must` + PascalCase(name) otherwise.
/// Already-prefixed names get prefixed again.
pub fn wrapper_name(signature: &FunctionSignature) -> String {
    if signature.is_exported() {
        format!("Must{}", signature.name)
    } else {
        format!("must{}", to_pascal_case(&signature.name))
    }
}

pub fn doc_comment(wrapper: &str, original: &str) -> String {
    format!("{wrapper} calls {original} and panics if err is not nil.")
}

/// Body forwarding every parameter, positionally, to the original declaration.
pub fn call_body(signature: &FunctionSignature) -> Result<String, RenderError> {
    render("call", &CallTemplate { signature })
}

/// Wrapper for an eligible signature, `None` otherwise.
pub fn synthesize(signature: &FunctionSignature) -> Result<Option<FunctionSignature>, RenderError> {
    if !is_eligible(signature) {
        return Ok(None);
    }

    let mut wrapper = signature.clone();
    wrapper.body = call_body(signature)?;
    wrapper.name = wrapper_name(signature);
    wrapper.results.pop();
    wrapper.comment = doc_comment(&wrapper.name, &signature.name);
    Ok(Some(wrapper))
}
