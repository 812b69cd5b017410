use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

mod cli;

use cli::Cli;
use cli::commands::Commands;
use sigrok_dev::config::Config;
use sigrok_dev::{Invocation, SigrokCli};

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sigrok-dev")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("sigrok-dev.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<i32> {
    info!("Starting application");

    if cli.is_verbose() {
        eprintln!("{}", "Verbose mode enabled".yellow());
    }

    let sigrok = SigrokCli::with_locator(&config.sigrok.locator()).await;

    match &cli.command {
        Commands::Locate => handle_locate_command(&sigrok),
        Commands::Run { timeout, args } => {
            let timeout = timeout.map(Duration::from_secs).unwrap_or_else(|| config.sigrok.timeout());
            handle_run_command(&sigrok, args, timeout, cli.is_verbose()).await
        }
        Commands::Import {
            input,
            output,
            format,
            timeout,
        } => {
            let format = format.as_deref().unwrap_or(&config.sigrok.input_format);
            let timeout = timeout.map(Duration::from_secs).unwrap_or_else(|| config.sigrok.timeout());
            handle_import_command(&sigrok, input, output, format, timeout, cli.is_verbose()).await
        }
    }
}

fn handle_locate_command(sigrok: &SigrokCli) -> Result<i32> {
    match sigrok.path() {
        Some(path) => {
            info!("Resolved sigrok-cli: {}", path.display());
            println!("{}", path.display());
            Ok(0)
        }
        None => Err(eyre!("sigrok-cli not found on PATH or in any known location")),
    }
}

async fn handle_run_command(sigrok: &SigrokCli, args: &[String], timeout: Duration, verbose: bool) -> Result<i32> {
    info!("Running sigrok-cli with {:?} (timeout {:?})", args, timeout);
    let invocation = sigrok
        .run(args, Some(timeout))
        .await
        .ok_or_else(|| eyre!("sigrok-cli could not be run"))?;
    Ok(print_invocation(&invocation, verbose))
}

async fn handle_import_command(
    sigrok: &SigrokCli,
    input: &Path,
    output: &Path,
    format: &str,
    timeout: Duration,
    verbose: bool,
) -> Result<i32> {
    info!("Importing {} ({}) into {}", input.display(), format, output.display());
    let invocation = sigrok
        .import_file(output, input, Some(format), Some(timeout))
        .await
        .ok_or_else(|| eyre!("sigrok-cli could not be run"))?;

    let code = print_invocation(&invocation, verbose);
    if invocation.success() {
        eprintln!("{} {}", "Imported:".green(), output.display());
    } else {
        eprintln!("{} {}", "Import failed:".red(), input.display());
    }
    Ok(code)
}

/// Echo the tool's output and map its exit status to ours
fn print_invocation(invocation: &Invocation, verbose: bool) -> i32 {
    if !invocation.stdout.is_empty() {
        print!("{}", invocation.stdout);
    }
    if !invocation.stderr.is_empty() {
        eprint!("{}", invocation.stderr);
    }
    if verbose {
        eprintln!("{} {:?}", "Exit code:".yellow(), invocation.exit_code);
    }
    invocation.exit_code.unwrap_or(1)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    let code = run_application(&cli, &config).await.context("Application failed")?;
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}
