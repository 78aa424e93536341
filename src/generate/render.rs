use super::format::format_declaration;
use super::template::{
    doc_lines, indent, render, FunctionTemplate, ParamsTemplate, ReceiverTemplate, ResultsTemplate,
    TypeParamsTemplate,
};
use crate::ast::{FunctionSignature, Parameter, Receiver, ResultValue, TypeParam};
use crate::error::RenderError;

/// Stringify a model through its template
pub trait Render {
    fn render(&self) -> Result<String, RenderError>;
}

impl Render for [Parameter] {
    fn render(&self) -> Result<String, RenderError> {
        render("params", &ParamsTemplate { params: self })
    }
}

impl Render for [ResultValue] {
    fn render(&self) -> Result<String, RenderError> {
        render("results", &ResultsTemplate { results: self })
    }
}

impl Render for [TypeParam] {
    fn render(&self) -> Result<String, RenderError> {
        render("type_params", &TypeParamsTemplate { params: self })
    }
}

impl Render for Receiver {
    fn render(&self) -> Result<String, RenderError> {
        render("receiver", &ReceiverTemplate { name: &self.name, ty: &self.ty })
    }
}

impl FunctionSignature {
    /// Every field the function template reads must be filled in.
    fn check_complete(&self) -> Result<(), RenderError> {
        let missing = |field: String| RenderError::MissingField { declaration: self.name.clone(), field };
        if self.name.is_empty() {
            return Err(missing("name".to_string()));
        }
        if self.is_method() && self.receiver.name.is_empty() {
            return Err(missing("receiver name".to_string()));
        }
        if let Some(i) = self.parameters.iter().position(|p| p.name.is_empty() || p.ty.is_empty()) {
            return Err(missing(format!("parameter {i}")));
        }
        if let Some(i) = self.results.iter().position(|r| r.ty.is_empty()) {
            return Err(missing(format!("type of result {i}")));
        }
        Ok(())
    }

    /// Render the declaration without the formatting pass
    pub fn render_raw(&self) -> Result<String, RenderError> {
        self.check_complete()?;
        let template = FunctionTemplate {
            doc: doc_lines(&self.comment),
            receiver: self.receiver.render()?,
            name: &self.name,
            type_params: self.type_params.render()?,
            params: self.parameters.render()?,
            results: self.results.render()?,
            body: indent(&self.body),
        };
        let mut text = render("function", &template)?;
        text.push('\n');
        Ok(text)
    }
}

impl Render for FunctionSignature {
    fn render(&self) -> Result<String, RenderError> {
        Ok(format_declaration(&self.render_raw()?))
    }
}
