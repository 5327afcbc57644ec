use anyhow::{Context, Result};
use clap::Parser;
use credit_sheet::{process_workbook, Config, PromptTemplate};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Message shown for a workbook that could not be processed; the cause goes to the log.
const REJECTED: &str = "file is not in the expected format";

/// Extracts credit-application workbooks into JSON client records
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Workbook files, or directories searched for .xlsm/.xlsx files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory; each client gets a subdirectory
    #[arg(short, long, default_value = credit_sheet::config::DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Instruction text file; when given, a prompt file is written per client
    #[arg(short, long)]
    prompt_template: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::default().with_output_dir(&cli.output);
    if let Some(path) = &cli.prompt_template {
        let template = PromptTemplate::from_file(path)
            .with_context(|| format!("Failed to read prompt template '{}'", path.display()))?;
        config = config.with_prompt_template(template);
    }

    let files = discover(&cli.inputs)?;
    info!(files = files.len(), output = %config.output_dir.display(), "processing workbooks");

    let mut failures = 0usize;
    for file in &files {
        match process_workbook(file, &config) {
            Ok(artifacts) => {
                println!("{}: {}", file.display(), artifacts.record.display());
                if let Some(prompt) = &artifacts.prompt {
                    println!("{}: {}", file.display(), prompt.display());
                }
            }
            Err(e) => {
                failures += 1;
                error!(file = %file.display(), error = %e, "failed to process workbook");
                eprintln!("{}: {REJECTED}", file.display());
            }
        }
    }

    info!(processed = files.len() - failures, failed = failures, "done");
    Ok(if failures == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Expands directories into the workbooks below them, skipping Office lock files.
fn discover(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            files.push(input.to_owned());
            continue;
        }
        let base = glob::Pattern::escape(&input.to_string_lossy());
        for extension in ["xlsm", "xlsx"] {
            let pattern = Path::new(&base).join("**").join(format!("*.{extension}"));
            let pattern = pattern.to_string_lossy();
            let paths = glob::glob(&pattern)
                .with_context(|| format!("Invalid search pattern '{pattern}'"))?;
            for path in paths {
                let path = path.context("Failed to list workbook directory")?;
                if is_lock_file(&path) {
                    debug!(path = %path.display(), "skipping lock file");
                } else {
                    files.push(path);
                }
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn is_lock_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with("~$"))
        .unwrap_or(false)
}
