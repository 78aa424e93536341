//! Binary to generate/update .expected.go files
//!
//! Usage:
//!   cargo run --bin accept_expected            # Update all
//!   cargo run --bin accept_expected -- receiver # Update only fixtures matching "receiver"

use muster::Pipeline;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

fn main() {
    let filter: Option<String> = std::env::args().nth(1);
    let fixture_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures");

    let mut pipeline = match Pipeline::standard() {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("Failed to create pipeline: {}", e);
            std::process::exit(1);
        }
    };

    let mut updated = 0;
    let mut skipped = 0;

    for entry in WalkDir::new(&fixture_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| is_fixture(e.path()))
    {
        let path = entry.path();

        if let Some(ref f) = filter {
            if !path.to_string_lossy().contains(f) {
                skipped += 1;
                continue;
            }
        }

        let source = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to read {:?}: {}", path, e);
                continue;
            }
        };

        match pipeline.compile(&source) {
            Ok(result) => {
                let expected = path.with_extension("expected.go");
                if let Err(e) = fs::write(&expected, &result.code) {
                    eprintln!("Failed to write {:?}: {}", expected, e);
                } else {
                    println!("  wrote {}", expected.display());
                    updated += 1;
                }
            }
            Err(e) => {
                let filename = path.file_name().and_then(|s| s.to_str()).unwrap_or("unknown");
                eprint!("{}", e.render(&source, filename));
            }
        }
    }

    println!("Updated {} files, skipped {}", updated, skipped);
}

fn is_fixture(path: &Path) -> bool {
    let name = path.to_string_lossy();
    name.ends_with(".go") && !name.ends_with(".expected.go")
}
