//! End-to-end runs of `driver::run` in stream and batch mode.

use muster::{
    run, run_with, CompileError, Config, FunctionSignature, LoadError, Mode, MustRule, Pipeline, RenderError, Rule,
    Transformer,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const BANNER: &str =
    "// Code generated by muster. DO NOT EDIT.\n// see https://github.com/joshcarp/muster for more details.\n";

fn stream(source: &str, json: bool) -> Result<String, CompileError> {
    let config = Config { mode: Mode::Stream, tags: Vec::new(), json };
    let mut input = source.as_bytes();
    let mut output = Vec::new();
    run(&config, &mut input, &mut output)?;
    Ok(String::from_utf8(output).unwrap())
}

fn batch(paths: Vec<PathBuf>, tags: &[&str]) -> Result<muster::Summary, CompileError> {
    let config = Config {
        mode: Mode::Batch { paths },
        tags: tags.iter().map(|t| t.to_string()).collect(),
        json: false,
    };
    run(&config, &mut std::io::empty(), &mut std::io::sink())
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_stream_writes_generated_file() {
    let output = stream("package main\n\nfunc Blah(s int, a Foo) (int, error) {\n\treturn 0, nil\n}\n", false).unwrap();
    assert_eq!(
        output,
        format!(
            "{BANNER}package main\n\n// MustBlah calls Blah and panics if err is not nil.\nfunc MustBlah(s int, a Foo) int {{\n\tval, err := Blah(s, a)\n\tif err != nil {{\n\t\tpanic(err)\n\t}}\n\treturn val\n}}\n"
        )
    );
}

#[test]
fn test_stream_json() {
    let output = stream("package main\n\nfunc (f *Foo) Get(key string) (string, error) {\n\treturn key, nil\n}\n", true).unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["signatures"][0]["name"], "MustGet");
    assert_eq!(json["signatures"][0]["receiver"]["type"], "*Foo");
    assert_eq!(json["signatures"][0]["results"].as_array().unwrap().len(), 1);
    assert!(json["code"].as_str().unwrap().contains("func (f *Foo) MustGet(key string) string {"));
}

#[test]
fn test_stream_parse_error_is_fatal() {
    let err = stream("package main\n\nfunc Blah(s int {\n}\n", false).unwrap_err();
    assert!(matches!(err, CompileError::Parse(_)));
}

#[test]
fn test_batch_writes_sibling_files() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.go", "package lib\n\nfunc A() (int, error) {\n\treturn 0, nil\n}\n");
    write(&dir, "b.go", "package lib\n\nfunc b() error {\n\treturn nil\n}\n");
    write(&dir, "a_test.go", "package lib\n\nfunc T() (int, error) {\n\treturn 0, nil\n}\n");
    write(&dir, "old_must.go", "package lib\n\nfunc Stale() (int, error) {\n\treturn 0, nil\n}\n");

    let summary = batch(vec![dir.path().to_path_buf()], &[]).unwrap();
    assert_eq!(
        summary.generated,
        vec![dir.path().join("a_must.go"), dir.path().join("b_must.go")]
    );
    assert!(summary.failed.is_empty());

    let a = fs::read_to_string(dir.path().join("a_must.go")).unwrap();
    assert!(a.starts_with(BANNER));
    assert!(a.contains("func MustA() int {"));

    // files without eligible functions still get a generated file
    let b = fs::read_to_string(dir.path().join("b_must.go")).unwrap();
    assert_eq!(b, format!("{BANNER}package lib\n"));

    assert!(!dir.path().join("a_test_must.go").exists());
    assert!(!dir.path().join("old_must_must.go").exists());
}

/// Derives a wrapper with an unparsable body from any function named `Broken`
struct UnparsableBody;

impl Rule for UnparsableBody {
    fn apply(&self, signature: &FunctionSignature) -> Result<Option<FunctionSignature>, RenderError> {
        if signature.name != "Broken" {
            return Ok(None);
        }
        let mut wrapper = FunctionSignature::new("MustBroken");
        wrapper.body = "val, err := (".to_string();
        Ok(Some(wrapper))
    }
}

#[test]
fn test_batch_continues_past_failed_file() {
    let dir = TempDir::new().unwrap();
    let bad = write(&dir, "bad.go", "package lib\n\nfunc Broken() {}\n");
    write(&dir, "good.go", "package lib\n\nfunc A() (int, error) {\n\treturn 0, nil\n}\n");

    let mut pipeline = Pipeline::new(Transformer::new().add(MustRule).add(UnparsableBody)).unwrap();
    let config = Config { mode: Mode::Batch { paths: vec![dir.path().to_path_buf()] }, tags: Vec::new(), json: false };
    let summary = run_with(&mut pipeline, &config, &mut std::io::empty(), &mut std::io::sink()).unwrap();

    assert_eq!(summary.failed, vec![bad]);
    assert_eq!(summary.generated, vec![dir.path().join("good_must.go")]);
    assert!(!dir.path().join("bad_must.go").exists());
    let good = fs::read_to_string(dir.path().join("good_must.go")).unwrap();
    assert!(good.contains("func MustA() int {"));
}

#[test]
fn test_batch_skips_files_for_other_platforms() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.go", "package lib\n\nfunc A() (int, error) {\n\treturn 0, nil\n}\n");
    write(&dir, "sys_plan9.go", "package lib\n\nfunc B() (int, error) {\n\treturn 0, nil\n}\n");

    let summary = batch(vec![dir.path().to_path_buf()], &[]).unwrap();
    assert_eq!(summary.generated, vec![dir.path().join("a_must.go")]);
    assert!(!dir.path().join("sys_plan9_must.go").exists());
}

#[test]
fn test_batch_second_run_skips_generated() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.go", "package lib\n\nfunc A() (int, error) {\n\treturn 0, nil\n}\n");

    let first = batch(vec![dir.path().to_path_buf()], &[]).unwrap();
    let before = fs::read_to_string(dir.path().join("a_must.go")).unwrap();
    let second = batch(vec![dir.path().to_path_buf()], &[]).unwrap();
    let after = fs::read_to_string(dir.path().join("a_must.go")).unwrap();

    assert_eq!(first.generated, second.generated);
    assert_eq!(before, after);
}

#[test]
fn test_batch_build_tags() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.go", "package lib\n");
    write(&dir, "slow.go", "//go:build integration\n\npackage lib\n\nfunc Slow() (int, error) {\n\treturn 0, nil\n}\n");

    let summary = batch(vec![dir.path().to_path_buf()], &[]).unwrap();
    assert_eq!(summary.generated, vec![dir.path().join("a_must.go")]);

    let summary = batch(vec![dir.path().to_path_buf()], &["integration"]).unwrap();
    assert_eq!(
        summary.generated,
        vec![dir.path().join("a_must.go"), dir.path().join("slow_must.go")]
    );
}

#[test]
fn test_batch_explicit_files() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.go", "package lib\n\nfunc A() (int, error) {\n\treturn 0, nil\n}\n");
    write(&dir, "b.go", "package lib\n");

    let summary = batch(vec![a], &[]).unwrap();
    assert_eq!(summary.generated, vec![dir.path().join("a_must.go")]);
    assert!(!dir.path().join("b_must.go").exists());
}

#[test]
fn test_batch_package_count_is_fatal() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.go", "package one\n");
    write(&dir, "b.go", "package two\n");

    let err = batch(vec![dir.path().to_path_buf()], &[]).unwrap_err();
    assert!(matches!(err, CompileError::Load(LoadError::PackageCount { count: 2, .. })));
    assert_eq!(err.to_string(), "error: 2 packages found");
}

#[test]
fn test_batch_empty_directory_is_fatal() {
    let dir = TempDir::new().unwrap();
    let err = batch(vec![dir.path().to_path_buf()], &[]).unwrap_err();
    assert!(matches!(err, CompileError::Load(LoadError::PackageCount { count: 0, .. })));
}
