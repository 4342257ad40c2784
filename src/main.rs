//! PhaseTrack CLI entry point.

use clap::Parser;
use pt::cli::commands;
use pt::cli::{Cli, Commands, OutputFormat};
use pt::error::Error;
use std::process::ExitCode;

/// Rewrite named flags to positional args for agent ergonomics.
///
/// Coding agents tend to emit `pt kb show pattern --id auth-flow` where
/// the CLI expects the id positionally. For the handful of flags that
/// shadow a positional arg, drop the flag and keep its value; everything
/// else passes through to clap untouched.
fn preprocess_args(args: impl Iterator<Item = String>) -> Vec<String> {
    const POSITIONAL_ALIASES: &[&str] = &[
        "--id",     // kb add/show
        "--query",  // kb search
        "--number", // phase
    ];

    let mut result = Vec::new();
    let mut iter = args.peekable();

    while let Some(arg) = iter.next() {
        if POSITIONAL_ALIASES.contains(&arg.as_str()) {
            if let Some(value) = iter.next() {
                result.push(value);
            }
        } else if let Some(flag) = POSITIONAL_ALIASES
            .iter()
            .find(|f| arg.starts_with(&format!("{f}=")))
        {
            // --flag=value form
            result.push(arg[flag.len() + 1..].to_string());
        } else {
            result.push(arg);
        }
    }

    result
}

fn main() -> ExitCode {
    let args = preprocess_args(std::env::args());
    let cli = Cli::parse_from(args);

    if cli.silent {
        pt::SILENT.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.dry_run {
        pt::DRY_RUN.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.format == OutputFormat::Csv {
        pt::CSV_OUTPUT.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.no_color {
        colored::control::set_override(false);
    }

    init_tracing(cli.verbose, cli.quiet);

    // JSON mode: --json, --format json, or piped stdout
    let json = cli.json
        || cli.format == OutputFormat::Json
        || !std::io::IsTerminal::is_terminal(&std::io::stdout());

    match run(&cli, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli, json: bool) -> Result<(), Error> {
    match &cli.command {
        Commands::Init { force } => commands::init::execute(*force, json),
        Commands::Version => commands::version::execute(json),

        // Status
        Commands::Status => commands::status::execute(cli.dir.as_ref(), json),

        // Phase transitions
        Commands::Phase { number } => commands::phase::execute(number, cli.dir.as_ref(), json),
        Commands::Next => commands::next::execute(cli.dir.as_ref(), json),

        // Checkpoint
        Commands::Checkpoint { command } => {
            commands::checkpoint::execute(command, cli.dir.as_ref(), json)
        }

        // Knowledge base
        Commands::Kb { command } => {
            commands::kb::execute(command, cli.dir.as_ref(), cli.actor.as_deref(), json)
        }

        // Shell completions
        Commands::Completions { shell } => commands::completions::execute(shell),
    }
}
