//! `uml2grammar` command-line entry point.

use std::path::PathBuf;
use std::{process, str::FromStr};

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use uml2grammar::{TransformConfig, generate};

/// Generate grammars from UML class models
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Transform an XMI model into a grammar file
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Path to the input XMI/UML file
    #[arg(short, long)]
    input: PathBuf,

    /// Path of the grammar file to write
    #[arg(short, long)]
    output: PathBuf,

    /// Path to a configuration file (YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    match cli.command {
        Command::Generate(args) => {
            if let Err(message) = run_generate(&args) {
                eprintln!("{message}");
                process::exit(1);
            }
        }
    }
}

fn run_generate(args: &GenerateArgs) -> Result<(), String> {
    if !args.input.exists() {
        return Err(format!("Input file {} does not exist.", args.input.display()));
    }

    let config = match &args.config {
        Some(path) => TransformConfig::load(path).map_err(|e| e.to_string())?,
        None => TransformConfig::default(),
    };
    tracing::debug!("Using configuration {config:?}");

    generate(&args.input, &args.output, &config)
        .map_err(|e| format!("Error while generating the grammar: {e}"))?;
    println!("Grammar successfully generated in \"{}\".", args.output.display());
    Ok(())
}
