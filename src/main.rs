//! Numlab - Numerical Methods Runner
//!
//! Solves a problem described in a JSON file and prints the result as JSON.
//!
//! # Usage
//!
//! ```bash
//! numlab problem.json --pretty
//! numlab problem.json --record --title "Square root of two"
//! ```
//!
//! Logs go to stderr; stdout carries only the JSON document.

use std::env;
use std::path::PathBuf;

use clap::Parser;
use log::{warn, LevelFilter};
use numlab_core::{error::Result, problem::load_problem};

/// Classical numerical methods with iteration traces
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the problem description (.json)
    #[arg(value_name = "PROBLEM_FILE")]
    problem_file: PathBuf,

    /// Title stored in the record
    #[arg(short, long)]
    title: Option<String>,

    /// Print the full record (method tag, title, input, result)
    #[arg(short, long)]
    record: bool,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,

    /// Log level (error, warn, info, debug, trace); falls back to RUST_LOG
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    let problem = load_problem(&args.problem_file)?;

    let json = if args.record {
        let record = problem.into_record(args.title.as_deref())?;
        to_json(&record, args.pretty)?
    } else {
        let outcome = problem.solve()?;
        to_json(&outcome, args.pretty)?
    };

    println!("{}", json);
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn init_logging(requested: Option<&str>) {
    let requested = requested.map(str::to_string).or_else(|| env::var("RUST_LOG").ok());
    let (level, unknown) = match requested {
        Some(name) => match name.parse::<LevelFilter>() {
            Ok(level) => (level, None),
            Err(_) => (LevelFilter::Warn, Some(name)),
        },
        None => (LevelFilter::Warn, None),
    };

    let applied = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}][{}] {}", record.target(), record.level(), message))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply();
    if let Err(e) = applied {
        eprintln!("Unable to apply logger configuration ({:?})", e);
    }

    if let Some(name) = unknown {
        warn!("Unknown log level '{}', using WARN instead.", name);
    }
}
