//! relcheck - upstream release monitor CLI tool
//!
//! Checks every dependency listed in a TOML config file for a new upstream
//! release and files a GitHub issue (or prints it in dry-run mode) when one
//! is found.

use clap::Parser;
use relcheck::cli::CliArgs;
use relcheck::config::{load_dependencies, RunConfig};
use relcheck::notify::ConsoleNotifier;
use relcheck::orchestrator::Orchestrator;
use relcheck::output::{create_formatter, OutputConfig};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    // Fatal errors: nothing is processed
    let config = RunConfig::from_cli(&args)?;
    let dependencies = load_dependencies(&args.config)?;

    if args.verbose {
        eprintln!("relcheck v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Config: {}", args.config.display());
        eprintln!("References: {}", config.refdir.display());
        if config.dry_run {
            eprintln!("Mode: dry-run");
        }
    }

    // Dry-run notifications must not interleave with the JSON report
    let json_dry_run = config.dry_run && args.json;
    let mut orchestrator = Orchestrator::new(config, dependencies)?;
    if json_dry_run {
        orchestrator = orchestrator.with_notifier(Box::new(ConsoleNotifier::stderr()));
    }
    let report = orchestrator.run_with_progress(args.show_progress()).await;

    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet);
    let formatter = create_formatter(output_config);
    let mut stdout = io::stdout().lock();
    formatter.format(&report, &mut stdout)?;
    stdout.flush()?;

    if report.has_failures() {
        // Partial success - some dependencies failed
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
