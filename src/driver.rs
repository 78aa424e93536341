use crate::error::CompileError;
use crate::loader::load;
use crate::Pipeline;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Suffix of generated files, before the extension
pub const GENERATED_SUFFIX: &str = "_must";

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// One file on the input stream, result on the output stream
    Stream,
    /// A package on disk, one generated file per source file
    Batch { paths: Vec<PathBuf> },
}

/// Options for one invocation
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub tags: Vec<String>,
    /// Stream mode only: emit `{code, signatures}` as JSON
    pub json: bool,
}

/// What a run produced
#[derive(Debug, Default)]
pub struct Summary {
    pub generated: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

/// Run the generator.
///
/// Stream mode fails on any error. Batch mode fails only when the package
/// cannot be loaded; per-file errors are logged and the file is skipped.
pub fn run(config: &Config, input: &mut dyn Read, output: &mut dyn Write) -> Result<Summary, CompileError> {
    run_with(&mut Pipeline::standard()?, config, input, output)
}

/// [`run`] with a caller-built pipeline
pub fn run_with(
    pipeline: &mut Pipeline,
    config: &Config,
    input: &mut dyn Read,
    output: &mut dyn Write,
) -> Result<Summary, CompileError> {
    match &config.mode {
        Mode::Stream => {
            stream(pipeline, config.json, input, output)?;
            Ok(Summary::default())
        }
        Mode::Batch { paths } => batch(pipeline, paths, &config.tags),
    }
}

fn stream(pipeline: &mut Pipeline, json: bool, input: &mut dyn Read, output: &mut dyn Write) -> Result<(), CompileError> {
    let mut source = String::new();
    input.read_to_string(&mut source).map_err(|source| stdio_error("<stdin>", source))?;

    let result = pipeline.compile(&source)?;
    let text = if json {
        let mut text = serde_json::to_string(&result).map_err(|err| stdio_error("<stdout>", err.into()))?;
        text.push('\n');
        text
    } else {
        result.code
    };
    output.write_all(text.as_bytes()).map_err(|source| stdio_error("<stdout>", source))
}

fn stdio_error(name: &str, source: std::io::Error) -> CompileError {
    CompileError::Io { path: PathBuf::from(name), source }
}

fn batch(pipeline: &mut Pipeline, paths: &[PathBuf], tags: &[String]) -> Result<Summary, CompileError> {
    let package = load(paths, tags, pipeline.parser())?;
    log::debug!("loaded package {} ({} files)", package.name, package.files.len());

    let mut summary = Summary::default();
    for loaded in &package.files {
        if is_generated(&loaded.path) {
            log::debug!("skipping generated file {}", loaded.path.display());
            continue;
        }

        let target = output_path(&loaded.path);
        let written = pipeline.generate(&loaded.file).and_then(|result| {
            fs::write(&target, result.code).map_err(|source| CompileError::Io { path: target.clone(), source })
        });
        match written {
            Ok(()) => {
                log::info!("generated {}", target.display());
                summary.generated.push(target);
            }
            Err(err) => {
                log::error!("{}: {err}", loaded.path.display());
                summary.failed.push(loaded.path.clone());
            }
        }
    }
    Ok(summary)
}

/// `dir/foo.go` becomes `dir/foo_must.go`
pub fn output_path(path: &Path) -> PathBuf {
    let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    match path.extension() {
        Some(ext) => path.with_file_name(format!("{stem}{GENERATED_SUFFIX}.{}", ext.to_string_lossy())),
        None => path.with_file_name(format!("{stem}{GENERATED_SUFFIX}")),
    }
}

/// Whether a file already follows the generated naming convention
pub fn is_generated(path: &Path) -> bool {
    path.file_stem().is_some_and(|stem| stem.to_string_lossy().ends_with(GENERATED_SUFFIX))
}
