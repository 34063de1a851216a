//! Likeness CLI - compare and classify values written in literal notation
//!
//! This is a thin wrapper around likeness-core. Without a subcommand it
//! starts the interactive REPL.

mod repl;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use likeness_core::{Comparator, Value, identical, read_one};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "likeness", version, about = "Structural equality for literal values")]
struct Args {
    /// Compare without a document platform; no value is an element
    #[arg(long, global = true, env = "LIKENESS_HEADLESS")]
    headless: bool,

    /// Log verbosity: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Deep structural equality; exits with status 1 when not equal
    Compare { left: String, right: String },
    /// Strict identity; exits with status 1 when not identical
    Identical { left: String, right: String },
    /// Print the classification of one value
    Classify { value: String },
    /// Interactive session (the default)
    Repl,
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to install logger")
}

fn read_operand(text: &str) -> Result<Value> {
    read_one(text).with_context(|| format!("cannot read `{}`", text))
}

fn verdict(result: bool) -> ExitCode {
    println!("{}", result);
    if result { ExitCode::SUCCESS } else { ExitCode::from(1) }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let comparator = if args.headless {
        Comparator::headless()
    } else {
        Comparator::new()
    };
    info!(headless = comparator.is_headless(), "comparator ready");

    match args.command.unwrap_or(Command::Repl) {
        Command::Compare { left, right } => {
            let (left, right) = (read_operand(&left)?, read_operand(&right)?);
            Ok(verdict(comparator.deep_equal(&left, &right)))
        }
        Command::Identical { left, right } => {
            let (left, right) = (read_operand(&left)?, read_operand(&right)?);
            Ok(verdict(identical(&left, &right)))
        }
        Command::Classify { value } => {
            let value = read_operand(&value)?;
            println!("{}", value);
            println!("{}", comparator.classify(&value));
            Ok(ExitCode::SUCCESS)
        }
        Command::Repl => {
            repl::run_repl(&comparator)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
