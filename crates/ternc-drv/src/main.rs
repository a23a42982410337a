//! The `ternc` binary: parse arguments, read the input, run the pipeline,
//! and fail fast on the first diagnostic.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ternc_drv::compile;

/// Tern compiler front-end: emits IR text for one translation input.
#[derive(Parser, Debug)]
#[command(name = "ternc")]
#[command(version)]
#[command(about = "Compile a Tern source file to IR text", long_about = None)]
struct Cli {
    /// Source file to compile
    input: PathBuf,

    /// Write the IR to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    // Scoped tracing is a no-op unless explicitly enabled.
    let filter = EnvFilter::try_from_env("TERNC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let path = cli.input.display().to_string();
    let source =
        fs::read_to_string(&cli.input).with_context(|| format!("cannot read {}", path))?;

    match &cli.output {
        Some(target) => {
            let mut file = fs::File::create(target)
                .with_context(|| format!("cannot create {}", target.display()))?;
            compile(&path, &source, &mut file)?;
            file.flush()?;
        }
        None => {
            let stdout = io::stdout();
            compile(&path, &source, &mut stdout.lock())?;
        }
    }
    Ok(())
}
