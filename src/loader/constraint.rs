//! `//go:build` constraint evaluation.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RELEASE_TAG: Regex = Regex::new(r"^go1\.([1-9]\d*)$").unwrap();
}

/// Newest `go1.N` release tag a constraint can be satisfied by
pub const LATEST_GO_MINOR: u32 = 26;

const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux", "nacl",
    "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "amd64p32", "arm", "armbe", "arm64", "arm64be", "loong64", "mips", "mipsle", "mips64",
    "mips64le", "mips64p32", "mips64p32le", "ppc", "ppc64", "ppc64le", "riscv", "riscv64", "s390", "s390x",
    "sparc", "sparc64", "wasm",
];

/// Tags a constraint is evaluated against
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub tags: Vec<String>,
    pub goos: &'static str,
    pub goarch: &'static str,
}

impl BuildContext {
    /// The host platform plus user-supplied tags
    pub fn host(tags: &[String]) -> Self {
        Self {
            tags: tags.to_vec(),
            goos: goos(std::env::consts::OS),
            goarch: goarch(std::env::consts::ARCH),
        }
    }

    pub fn satisfies(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
            || self.matches_os(tag)
            || tag == self.goarch
            || (tag == "unix" && cfg!(unix))
            || tag == "gc"
            || is_release_tag(tag)
    }

    /// android counts as linux, illumos as solaris, ios as darwin
    fn matches_os(&self, os: &str) -> bool {
        os == self.goos
            || matches!((os, self.goos), ("linux", "android") | ("solaris", "illumos") | ("darwin", "ios"))
    }

    /// The implicit constraint of `name_GOOS.go`, `name_GOARCH.go` and `name_GOOS_GOARCH.go`.
    /// A `_test` suffix is ignored and the part before the first `_` never counts.
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        let stem = file_name.strip_suffix(".go").unwrap_or(file_name);
        let stem = stem.strip_suffix("_test").unwrap_or(stem);
        let Some((_, rest)) = stem.split_once('_') else {
            return true;
        };
        let parts: Vec<&str> = rest.split('_').collect();
        match parts.as_slice() {
            [.., os, arch] if KNOWN_OS.contains(os) && KNOWN_ARCH.contains(arch) => {
                self.matches_os(os) && *arch == self.goarch
            }
            [.., os] if KNOWN_OS.contains(os) => self.matches_os(os),
            [.., arch] if KNOWN_ARCH.contains(arch) => *arch == self.goarch,
            _ => true,
        }
    }
}

fn is_release_tag(tag: &str) -> bool {
    RELEASE_TAG
        .captures(tag)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .is_some_and(|minor| minor <= LATEST_GO_MINOR)
}

fn goos(os: &'static str) -> &'static str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

fn goarch(arch: &'static str) -> &'static str {
    match arch {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        "wasm32" => "wasm",
        other => other,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Tag(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Parse a constraint expression such as `linux && (amd64 || arm64) && !purego`
    pub fn parse(text: &str) -> Option<Expr> {
        let tokens = tokenize(text)?;
        let mut parser = ExprParser { tokens, pos: 0 };
        let expr = parser.or()?;
        (parser.pos == parser.tokens.len()).then_some(expr)
    }

    pub fn eval(&self, ctx: &BuildContext) -> bool {
        match self {
            Expr::Tag(tag) => ctx.satisfies(tag),
            Expr::Not(inner) => !inner.eval(ctx),
            Expr::And(a, b) => a.eval(ctx) && b.eval(ctx),
            Expr::Or(a, b) => a.eval(ctx) || b.eval(ctx),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Not,
    And,
    Or,
    LParen,
    RParen,
}

fn tokenize(text: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '!' => tokens.push(Token::Not),
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            '&' | '|' => {
                chars.next_if(|(_, next)| *next == c)?;
                tokens.push(if c == '&' { Token::And } else { Token::Or });
            }
            c if c.is_alphanumeric() || c == '_' || c == '.' => {
                let mut end = start + c.len_utf8();
                while let Some((i, c)) = chars.next_if(|(_, c)| c.is_alphanumeric() || *c == '_' || *c == '.') {
                    end = i + c.len_utf8();
                }
                tokens.push(Token::Ident(text[start..end].to_string()));
            }
            _ => return None,
        }
    }
    Some(tokens)
}

struct ExprParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl ExprParser {
    fn eat(&mut self, token: &Token) -> bool {
        if self.tokens.get(self.pos) == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or(&mut self) -> Option<Expr> {
        let mut left = self.and()?;
        while self.eat(&Token::Or) {
            left = Expr::Or(Box::new(left), Box::new(self.and()?));
        }
        Some(left)
    }

    fn and(&mut self) -> Option<Expr> {
        let mut left = self.not()?;
        while self.eat(&Token::And) {
            left = Expr::And(Box::new(left), Box::new(self.not()?));
        }
        Some(left)
    }

    fn not(&mut self) -> Option<Expr> {
        if self.eat(&Token::Not) {
            return Some(Expr::Not(Box::new(self.not()?)));
        }
        if self.eat(&Token::LParen) {
            let inner = self.or()?;
            return self.eat(&Token::RParen).then_some(inner);
        }
        match self.tokens.get(self.pos)? {
            Token::Ident(name) => {
                let name = name.clone();
                self.pos += 1;
                Some(Expr::Tag(name))
            }
            _ => None,
        }
    }
}

/// The `//go:build` expression in the file header, if any.
///
/// Only comment lines before the package clause are considered.
pub fn build_line(source: &str) -> Option<&str> {
    for line in source.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some(comment) = line.strip_prefix("//") else {
            break;
        };
        if let Some(expr) = comment.strip_prefix("go:build") {
            if expr.is_empty() || expr.starts_with(char::is_whitespace) {
                return Some(expr.trim());
            }
        }
    }
    None
}
