//! Loads the Go files named on the command line as one package.

pub mod constraint;

pub use constraint::{build_line, BuildContext, Expr};

use crate::error::LoadError;
use crate::parser::{GoParser, ParsedFile};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A parsed file and where it came from
pub struct LoadedFile {
    pub path: PathBuf,
    pub file: ParsedFile,
}

/// The files of exactly one package, in path order
pub struct Package {
    pub name: String,
    pub files: Vec<LoadedFile>,
}

/// Load `paths` (directories and `.go` files; the current directory when empty) as one package.
pub fn load(paths: &[PathBuf], tags: &[String], parser: &mut GoParser) -> Result<Package, LoadError> {
    let ctx = BuildContext::host(tags);
    let mut files = Vec::new();

    for path in candidates(paths)? {
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if !ctx.matches_file_name(file_name) {
            log::debug!("skipping {}: excluded by file name on {}/{}", path.display(), ctx.goos, ctx.goarch);
            continue;
        }

        let source = fs::read_to_string(&path).map_err(|source| LoadError::Io { path: path.clone(), source })?;

        if let Some(line) = build_line(&source) {
            let expr = Expr::parse(line).ok_or_else(|| LoadError::Constraint {
                path: path.clone(),
                expr: line.to_string(),
            })?;
            if !expr.eval(&ctx) {
                log::debug!("skipping {}: excluded by build constraint `{line}`", path.display());
                continue;
            }
        }

        let file = parser.parse(&source).map_err(|source| LoadError::Parse { path: path.clone(), source })?;
        files.push(LoadedFile { path, file });
    }

    let names: BTreeSet<&str> = files.iter().map(|f| f.file.package()).collect();
    if names.len() != 1 {
        return Err(LoadError::PackageCount {
            count: names.len(),
            names: names.into_iter().map(str::to_string).collect(),
        });
    }
    let name = files[0].file.package().to_string();
    Ok(Package { name, files })
}

fn candidates(paths: &[PathBuf]) -> Result<Vec<PathBuf>, LoadError> {
    let default = [PathBuf::from(".")];
    let paths = if paths.is_empty() { &default[..] } else { paths };

    let mut found = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                if is_source(entry.path()) {
                    found.push(entry.into_path());
                }
            }
        } else if path.is_file() && path.extension().is_some_and(|ext| ext == "go") {
            if is_source(path) {
                found.push(path.clone());
            }
        } else {
            return Err(LoadError::NotGoSource { path: path.clone() });
        }
    }
    found.sort();
    found.dedup();
    Ok(found)
}

/// `.go` files other than tests; names starting with `_` or `.` are ignored
fn is_source(path: &Path) -> bool {
    path.file_name().and_then(|name| name.to_str()).is_some_and(|name| {
        name.ends_with(".go") && !name.ends_with("_test.go") && !name.starts_with(['_', '.'])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn names(package: &Package) -> Vec<String> {
        package
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_directory_listing() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b.go", "package lib\n");
        write(&dir, "a.go", "package lib\n");
        write(&dir, "a_test.go", "package lib_test\n");
        write(&dir, "notes.txt", "hello");
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        write(&dir, "sub/c.go", "package other\n");

        let package = load(&[dir.path().to_path_buf()], &[], &mut GoParser::new().unwrap()).unwrap();
        assert_eq!(package.name, "lib");
        assert_eq!(names(&package), vec!["a.go", "b.go"]);
    }

    #[test]
    fn test_build_tags() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.go", "package lib\n");
        write(&dir, "tagged.go", "//go:build integration\n\npackage lib\n");
        write(&dir, "never.go", "//go:build ignore\n\npackage main\n");

        let mut parser = GoParser::new().unwrap();
        let without = load(&[dir.path().to_path_buf()], &[], &mut parser).unwrap();
        assert_eq!(names(&without), vec!["a.go"]);

        let with = load(&[dir.path().to_path_buf()], &["integration".to_string()], &mut parser).unwrap();
        assert_eq!(names(&with), vec!["a.go", "tagged.go"]);
    }

    #[test]
    fn test_file_name_constraints() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.go", "package lib\n");
        write(&dir, "sys_plan9.go", "package lib\n");
        write(&dir, "sys_plan9_mips.go", "package lib\n");
        write(&dir, "_scratch.go", "package scratch\n");

        let package = load(&[dir.path().to_path_buf()], &[], &mut GoParser::new().unwrap()).unwrap();
        assert_eq!(names(&package), vec!["a.go"]);
    }

    #[test]
    fn test_multiple_packages() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.go", "package one\n");
        write(&dir, "b.go", "package two\n");
        let err = load(&[dir.path().to_path_buf()], &[], &mut GoParser::new().unwrap()).err().unwrap();
        assert_eq!(err.to_string(), "error: 2 packages found");
    }

    #[test]
    fn test_no_packages() {
        let dir = TempDir::new().unwrap();
        let err = load(&[dir.path().to_path_buf()], &[], &mut GoParser::new().unwrap()).err().unwrap();
        assert!(matches!(err, LoadError::PackageCount { count: 0, .. }));
    }

    #[test]
    fn test_explicit_files_and_errors() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.go", "package lib\n");
        let bad = write(&dir, "bad.go", "package lib\n\nfunc (\n");
        let txt = write(&dir, "x.txt", "");
        let constraint = write(&dir, "c.go", "//go:build linux &&\n\npackage lib\n");
        let mut parser = GoParser::new().unwrap();

        let package = load(&[a.clone()], &[], &mut parser).unwrap();
        assert_eq!(names(&package), vec!["a.go"]);

        assert!(matches!(load(&[a.clone(), bad], &[], &mut parser), Err(LoadError::Parse { .. })));
        assert!(matches!(load(&[txt], &[], &mut parser), Err(LoadError::NotGoSource { .. })));
        assert!(matches!(load(&[constraint], &[], &mut parser), Err(LoadError::Constraint { .. })));
    }
}
