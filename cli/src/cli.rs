//! # CLI Interface
//!
//! Defines the command-line argument structure for `relaytx` using `clap`
//! derive. Supports five subcommands: `classify`, `selectors`, `hash`,
//! `decode` and `version`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Inspect relaytx selectors and transactions.
///
/// Classifies selectors against a registry of assets and host chains,
/// builds and hashes transactions from JSON input, and decodes binary
/// transaction records.
#[derive(Parser, Debug)]
#[command(
    name = "relaytx",
    about = "Inspect relaytx selectors and transactions",
    version,
    propagate_version = true
)]
pub struct RelaytxCli {
    /// Path to a JSON registry of assets and host chains.
    ///
    /// When omitted, the built-in production registry is used.
    #[arg(long, short = 'r', global = true, env = "RELAYTX_REGISTRY")]
    pub registry: Option<PathBuf>,

    /// Log output format. Filtering is controlled by `RUST_LOG`.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the `relaytx` binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify selectors and print one JSON line per selector.
    Classify(ClassifyArgs),
    /// List every selector the registry accepts.
    Selectors(SelectorsArgs),
    /// Build a transaction from a selector and a JSON input, and print it.
    Hash(HashArgs),
    /// Decode a hex-encoded binary transaction record and print it as JSON.
    Decode(DecodeArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `classify` subcommand.
#[derive(Parser, Debug)]
pub struct ClassifyArgs {
    /// Selectors to classify, e.g. `BTC/toEthereum`.
    #[arg(required = true)]
    pub selectors: Vec<String>,
}

/// Arguments for the `selectors` subcommand.
#[derive(Parser, Debug)]
pub struct SelectorsArgs {
    /// Only list selectors for this asset.
    #[arg(long, short = 'a')]
    pub asset: Option<String>,

    /// Only list lock selectors.
    #[arg(long)]
    pub lock_only: bool,
}

/// Arguments for the `hash` subcommand.
#[derive(Parser, Debug)]
pub struct HashArgs {
    /// Selector of the new transaction.
    #[arg(long, short = 's')]
    pub selector: String,

    /// File holding the input as a JSON array of typed fields, or `-` for
    /// stdin.
    #[arg(long, short = 'i', default_value = "-")]
    pub input: PathBuf,
}

/// Arguments for the `decode` subcommand.
#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// Hex-encoded record. A leading `0x` is accepted.
    pub hex: String,

    /// The record is a transaction followed by a status byte.
    #[arg(long)]
    pub with_status: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        RelaytxCli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = RelaytxCli::try_parse_from([
            "relaytx",
            "selectors",
            "--asset",
            "BTC",
            "--lock-only",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Commands::Selectors(args) => {
                assert_eq!(args.asset.as_deref(), Some("BTC"));
                assert!(args.lock_only);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn classify_requires_a_selector() {
        assert!(RelaytxCli::try_parse_from(["relaytx", "classify"]).is_err());
    }
}
