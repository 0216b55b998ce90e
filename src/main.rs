use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use blast_radius::core::{CodebaseAnalyzer, ScanOptions};
use blast_radius::formatters::{JsonFormatter, ReportFormatter};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "blast-radius",
    version,
    author = "blast-radius developers",
    about = "Estimate the blast radius of a code change"
)]
struct Cli {
    /// Root directory of the codebase to analyze
    #[arg(short, long, value_name = "PATH")]
    input: PathBuf,

    /// Free-text description of the intended change
    #[arg(short = 'c', long, value_name = "TEXT")]
    intent: String,

    /// Write the report to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format: json, pretty-json, text
    #[arg(short, long, value_name = "FORMAT", value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Skip source files larger than this many bytes
    #[arg(long, value_name = "BYTES")]
    max_file_bytes: Option<u64>,

    /// Follow symbolic links while walking the tree
    #[arg(long)]
    follow_links: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum OutputFormat {
    Json,
    PrettyJson,
    Text,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli)
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        input,
        intent,
        output,
        format,
        max_file_bytes,
        follow_links,
        verbose: _,
    } = cli;

    let start_time = Instant::now();
    let options = ScanOptions::default()
        .with_max_file_bytes(max_file_bytes)
        .with_follow_links(follow_links);
    let analyzer = CodebaseAnalyzer::with_options(options);
    let json = JsonFormatter::new().with_pretty(format == OutputFormat::PrettyJson);

    let result = match analyzer.analyze(&input, &intent) {
        Ok(result) => result,
        Err(err) => {
            if format != OutputFormat::Text {
                println!("{}", json.format_error(&err)?);
            }
            return Err(err.into());
        }
    };

    let report = ReportFormatter::new();
    match (output, format) {
        (Some(path), OutputFormat::Text) => {
            report.format_to_file(&result, &path)?;
            info!(path = %path.display(), "Report written");
        }
        (Some(path), _) => {
            json.format_to_file(&result, &path)?;
            info!(path = %path.display(), "Report written");
        }
        (None, OutputFormat::Text) => println!("{}", report.format(&result)),
        (None, _) => println!("{}", json.format(&result)?),
    }

    info!(
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "Analysis complete"
    );
    Ok(())
}
