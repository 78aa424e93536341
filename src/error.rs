use crate::parser::positions::Span;
use std::path::PathBuf;

/// Kind of parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidSyntax,
    MissingToken,
    MissingPackage,
    GrammarUnavailable,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidSyntax => "Invalid syntax",
            ErrorKind::MissingToken => "Missing token",
            ErrorKind::MissingPackage => "Missing package clause",
            ErrorKind::GrammarUnavailable => "Go grammar unavailable",
        }
    }
}

/// Error while parsing Go source
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}:{}: {message}", span.start.line + 1, span.start.col + 1)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
    pub help: Option<String>,
}

impl ParseError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self { kind, message: message.into(), span, help: None }
    }

    /// Add help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render the error with source context
    pub fn render(&self, source: &str, filename: &str) -> String {
        self.render_inner(source, filename, false)
    }

    /// Render the error with ANSI color codes
    pub fn render_color(&self, source: &str, filename: &str) -> String {
        self.render_inner(source, filename, true)
    }

    fn render_inner(&self, source: &str, filename: &str, color: bool) -> String {
        let red = if color { "\x1b[1;31m" } else { "" };
        let dim = if color { "\x1b[2m" } else { "" };
        let cyan = if color { "\x1b[1;38;5;73m" } else { "" };
        let reset = if color { "\x1b[0m" } else { "" };

        let mut output = String::new();

        let line = self.span.start.line + 1;
        let col = self.span.start.col + 1;
        output.push_str(&format!(" file: {}:{}:{}\n", filename, line, col));
        output.push_str(&format!("{}error:{} {}: {}\n", red, reset, self.kind.as_str(), self.message));

        if let Some(source_line) = source.lines().nth(self.span.start.line) {
            let width = format!("{}", line).len().max(2);
            output.push_str(&format!("{}{:>width$} |{}\n", dim, "", reset, width = width));
            output.push_str(&format!("{}{:>width$} |{} {}\n", dim, line, reset, source_line, width = width));

            let underline_start = self.span.start.col;
            let underline_len = if self.span.end.line == self.span.start.line {
                self.span.end.col.saturating_sub(self.span.start.col).max(1)
            } else {
                source_line.len().saturating_sub(underline_start).max(1)
            };
            output.push_str(&format!(
                "{}{:>width$} |{} {}{}{}{}\n",
                dim, "", reset,
                " ".repeat(underline_start), red, "^".repeat(underline_len), reset,
                width = width
            ));
        }

        if let Some(ref help) = self.help {
            output.push_str(&format!(" {}help:{} {}\n", cyan, reset, help));
        }

        output
    }
}

/// Error while rendering a template against a model
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template {template}: {source}")]
    Template { template: &'static str, source: askama::Error },
    #[error("{declaration}: missing {field}")]
    MissingField { declaration: String, field: String },
}

/// Error while reconciling the import block of an assembled file
#[derive(Debug, Clone, thiserror::Error)]
pub enum ImportError {
    #[error("generated file does not parse: {0}")]
    Parse(#[from] ParseError),
    #[error("generated file has no package clause")]
    MissingPackage,
}

/// Error while loading a package from disk
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("error: {count} packages found")]
    PackageCount { count: usize, names: Vec<String> },
    #[error("{path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("{path}: {source}")]
    Parse { path: PathBuf, source: ParseError },
    #[error("{path}: malformed build constraint `{expr}`")]
    Constraint { path: PathBuf, expr: String },
    #[error("{path}: not a directory or .go file")]
    NotGoSource { path: PathBuf },
}

/// Error while generating one file
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("reconciling imports: {0}")]
    Imports(#[from] ImportError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("{path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}

impl CompileError {
    /// Render the error with source context (no color)
    pub fn render(&self, source: &str, filename: &str) -> String {
        match self {
            CompileError::Parse(err) => err.render(source, filename),
            other => format!("error: {}\n", other),
        }
    }

    /// Render the error with ANSI color codes
    pub fn render_color(&self, source: &str, filename: &str) -> String {
        match self {
            CompileError::Parse(err) => err.render_color(source, filename),
            other => format!("\x1b[1;31merror\x1b[0m: \x1b[1m{}\x1b[0m\n", other),
        }
    }
}
