/*
 * Copyright (c) 2025 Raphael Amorim
 *
 * This file is part of envfile, which is licensed
 * under GNU General Public License v3.0.
 */

use anyhow::Context;
use clap::Parser;
use envfile::{DEFAULT_FILENAME, Dotenv, LoadMode, ProcessEnvironment, VariableStore};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Parse a .env file and print what it resolves to.
#[derive(Parser, Debug)]
#[command(name = "envfile", version, about)]
struct Cli {
    /// Directory containing the environment file
    #[arg(env = "ENVFILE_DIR", default_value = ".")]
    dir: PathBuf,

    /// Name of the environment file inside DIR
    #[arg(short, long, env = "ENVFILE_NAME", default_value = DEFAULT_FILENAME)]
    file: String,

    /// File values replace variables that are already set
    #[arg(long)]
    overload: bool,

    /// Treat a missing file as empty
    #[arg(long)]
    safe: bool,

    /// Print declared names only
    #[arg(long)]
    names: bool,

    /// Fail unless these variables are set and non-empty
    #[arg(short, long = "require", value_name = "NAME")]
    required: Vec<String>,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    // Resolve against the real environment without modifying it
    let mut dotenv =
        Dotenv::with_store(&cli.dir, ProcessEnvironment::in_process()).filename(&cli.file);

    let mode = if cli.overload {
        LoadMode::Overload
    } else {
        LoadMode::Immutable
    };

    let loaded = match dotenv.load_with(mode) {
        Err(err) if cli.safe && err.is_path() => Default::default(),
        other => other.with_context(|| format!("failed to load {}", dotenv.file_path().display()))?,
    };

    if !cli.required.is_empty() {
        let required: Vec<&str> = cli.required.iter().map(String::as_str).collect();
        dotenv.required(&required)?.not_empty()?;
    }

    for name in &loaded.names {
        if cli.names {
            println!("{name}");
        } else {
            let value = dotenv.store().get(name).unwrap_or_default();
            println!("{name}={value}");
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
