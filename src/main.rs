use clap::Parser;
use muster::{run, Config, Mode, Summary};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "muster")]
#[command(about = "Generate Must* wrappers for Go functions returning (T, error)")]
struct Cli {
    /// Read one Go file from stdin and write the result to stdout
    #[arg(long)]
    stream: bool,

    /// Output as JSON with the generated signatures (stream mode only)
    #[arg(long, requires = "stream")]
    json: bool,

    /// Build tags, comma or space separated
    #[arg(short, long, default_value = "")]
    tags: String,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,

    /// Package directory or .go files (default: current directory)
    #[arg(conflicts_with = "stream")]
    paths: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config {
        mode: if cli.stream { Mode::Stream } else { Mode::Batch { paths: cli.paths } },
        tags: split_tags(&cli.tags),
        json: cli.json,
    };

    let start = Instant::now();
    let summary = run(&config, &mut io::stdin().lock(), &mut io::stdout().lock())?;

    if let Mode::Batch { .. } = config.mode {
        print_summary(&summary, start.elapsed());
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| writeln!(buf, "muster: {}", record.args()))
        .init();
}

fn split_tags(tags: &str) -> Vec<String> {
    tags.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn print_summary(summary: &Summary, elapsed: std::time::Duration) {
    let is_tty = io::stderr().is_terminal();
    let time_str = format_duration(elapsed);
    let count = summary.generated.len();
    let files_word = if count == 1 { "file" } else { "files" };

    if is_tty {
        eprintln!("\x1b[1mGenerated {} {} in {}\x1b[0m", count, files_word, time_str);
    } else {
        eprintln!("Generated {} {} in {}", count, files_word, time_str);
    }
    if !summary.failed.is_empty() {
        if is_tty {
            eprintln!("\x1b[1;31m{} failed\x1b[0m", summary.failed.len());
        } else {
            eprintln!("{} failed", summary.failed.len());
        }
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let micros = d.as_micros();
    if micros < 1000 {
        format!("{}μs", micros)
    } else if micros < 1_000_000 {
        format!("{:.1}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}
