use serde::Serialize;

/// Placeholder receiver name used when the original receiver is unnamed or blank.
pub const RECEIVER_PLACEHOLDER: &str = "_recv";

/// The exact result type text that makes a declaration eligible for wrapping.
pub const ERROR_SENTINEL: &str = "error";

/// A single function parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    /// Canonical type text, including a leading `...` for variadic parameters
    #[serde(rename = "type")]
    pub ty: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self { name: name.into(), ty: ty.into() }
    }

    pub fn is_variadic(&self) -> bool {
        self.ty.starts_with("...")
    }
}

/// A single result value. Anonymous results have an empty name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultValue {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl ResultValue {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self { name: name.into(), ty: ty.into() }
    }

    pub fn anonymous(ty: impl Into<String>) -> Self {
        Self::new("", ty)
    }
}

/// Method receiver. Both fields are empty for a free function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Receiver {
    pub name: String,
    /// Verbatim receiver type, pointer marker included (`*Foo`)
    #[serde(rename = "type")]
    pub ty: String,
}

impl Receiver {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self { name: name.into(), ty: ty.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.ty.is_empty()
    }
}

/// A type parameter of a generic function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeParam {
    pub name: String,
    pub constraint: String,
}

impl TypeParam {
    pub fn new(name: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self { name: name.into(), constraint: constraint.into() }
    }
}

/// Structural model of a function or method declaration.
///
/// `body` and `comment` are free-form text filled in by the transformation; everything
/// else stays typed so the wrapping rules can be checked mechanically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FunctionSignature {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
    pub receiver: Receiver,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<TypeParam>,
    pub parameters: Vec<Parameter>,
    pub results: Vec<ResultValue>,
}

impl FunctionSignature {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Exported means the first character is upper-case.
    pub fn is_exported(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }

    /// True when the last parameter is variadic
    pub fn is_variadic(&self) -> bool {
        self.parameters.last().is_some_and(Parameter::is_variadic)
    }

    pub fn is_method(&self) -> bool {
        !self.receiver.is_empty()
    }

    pub fn with_receiver(mut self, receiver: Receiver) -> Self {
        self.receiver = receiver;
        self
    }

    pub fn with_params(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_results(mut self, results: Vec<ResultValue>) -> Self {
        self.results = results;
        self
    }

    pub fn with_type_params(mut self, type_params: Vec<TypeParam>) -> Self {
        self.type_params = type_params;
        self
    }
}

/// One import clause of a source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSpec {
    /// Explicit alias, `_` or `.`, if written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unquoted import path
    pub path: String,
    /// The clause exactly as written (`foo "example.com/foo"`)
    pub text: String,
}

impl ImportSpec {
    pub fn new(name: Option<&str>, path: &str) -> Self {
        let text = match name {
            Some(name) => format!("{name} \"{path}\""),
            None => format!("\"{path}\""),
        };
        Self { name: name.map(str::to_string), path: path.to_string(), text }
    }

    pub fn is_blank(&self) -> bool {
        self.name.as_deref() == Some("_")
    }

    pub fn is_dot(&self) -> bool {
        self.name.as_deref() == Some(".")
    }
}
