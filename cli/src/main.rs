// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # relaytx
//!
//! Entry point for the `relaytx` binary. Parses CLI arguments, initializes
//! logging, loads the registry and runs one subcommand.
//!
//! The binary supports five subcommands:
//!
//! - `classify`:  asset, source, destination and lock flag per selector
//! - `selectors`: list every selector the registry accepts
//! - `hash`:      build and hash a transaction from JSON input
//! - `decode`:    decode a binary transaction record to JSON
//! - `version`:   print build version information

mod cli;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};

use cli::{Commands, RelaytxCli};

/// Log filter when `RUST_LOG` is unset. Stdout carries command output, so
/// the default stays quiet.
const DEFAULT_LOG_FILTER: &str = "relaytx=warn,relaytx_protocol=warn";

fn main() -> Result<()> {
    let cli = RelaytxCli::parse();
    logging::init_logging(DEFAULT_LOG_FILTER, cli.log_format);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Version => commands::version(&mut out)?,
        Commands::Classify(args) => {
            let registry = commands::load_registry(cli.registry.as_deref())?;
            commands::classify(&registry, &args.selectors, &mut out)?;
        }
        Commands::Selectors(args) => {
            let registry = commands::load_registry(cli.registry.as_deref())?;
            commands::selectors(&registry, args.asset.as_deref(), args.lock_only, &mut out)?;
        }
        Commands::Hash(args) => {
            let registry = commands::load_registry(cli.registry.as_deref())?;
            let input = commands::read_input(&args.input)?;
            commands::hash(&registry, &args.selector, &input, &mut out)?;
        }
        Commands::Decode(args) => commands::decode(&args.hex, args.with_status, &mut out)?,
    }

    out.flush()?;
    Ok(())
}
