//! # Subcommands
//!
//! One function per subcommand. Each writes its output to the given writer
//! so the commands can be driven from tests without touching stdout.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use relaytx_protocol::codec::from_bytes;
use relaytx_protocol::config::{HASH_FUNCTION, MAX_BYTES};
use relaytx_protocol::pack::Typed;
use relaytx_protocol::registry::{Asset, Registry};
use relaytx_protocol::transaction::{Selector, Tx, TxError, Version, WithStatus};

/// Loads the registry from `path`, or the built-in one when `None`.
pub fn load_registry(path: Option<&Path>) -> Result<Registry> {
    let Some(path) = path else {
        return Ok(Registry::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read registry file {}", path.display()))?;
    let registry: Registry = serde_json::from_str(&text)
        .with_context(|| format!("invalid registry in {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        assets = registry.assets().len(),
        hosts = registry.hosts().len(),
        "registry loaded"
    );
    Ok(registry)
}

// ---------------------------------------------------------------------------
// classify
// ---------------------------------------------------------------------------

/// One classified selector, as printed by `classify`.
#[derive(Debug, Serialize)]
struct Classification<'a> {
    selector: &'a str,
    valid: bool,
    asset: String,
    source: String,
    destination: String,
    lock: bool,
}

pub fn classify<W: Write>(registry: &Registry, selectors: &[String], out: &mut W) -> Result<()> {
    for raw in selectors {
        let route = Selector::from(raw.as_str()).classify(registry);
        let line = Classification {
            selector: raw,
            valid: route.is_valid(),
            asset: route.asset().to_string(),
            source: route.source().to_string(),
            destination: route.destination().to_string(),
            lock: route.is_lock(),
        };
        serde_json::to_writer(&mut *out, &line)?;
        writeln!(out)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// selectors
// ---------------------------------------------------------------------------

pub fn selectors<W: Write>(
    registry: &Registry,
    asset: Option<&str>,
    lock_only: bool,
    out: &mut W,
) -> Result<()> {
    let mut listed = match asset {
        Some(name) => {
            if registry.asset(name).is_none() {
                bail!("unknown asset {name}");
            }
            registry
                .selectors_by_asset()
                .remove(&Asset::new(name))
                .unwrap_or_default()
        }
        None => registry.all_selectors(),
    };
    if lock_only {
        listed.retain(|selector| selector.is_lock(registry));
    }
    for selector in &listed {
        writeln!(out, "{selector}")?;
    }
    tracing::debug!(count = listed.len(), "selectors listed");
    Ok(())
}

// ---------------------------------------------------------------------------
// hash
// ---------------------------------------------------------------------------

/// Reads the whole of `path`, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read input from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read input file {}", path.display()))
}

pub fn hash<W: Write>(registry: &Registry, selector: &str, input_json: &str, out: &mut W) -> Result<()> {
    let selector = Selector::from(selector);
    if !selector.classify(registry).is_valid() {
        tracing::warn!(%selector, "selector is not valid for the registry; hashing anyway");
    }
    let input: Typed = serde_json::from_str(input_json).context("input is not a typed JSON array")?;
    let tx = Tx::new(selector, input).context("failed to hash transaction")?;
    tracing::info!(hash = %tx.hash, "transaction built");
    serde_json::to_writer_pretty(&mut *out, &tx)?;
    writeln!(out)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// decode
// ---------------------------------------------------------------------------

/// A decoded record together with the result of recomputing its hash.
#[derive(Debug, Serialize)]
struct Decoded<T> {
    record: T,
    hash_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    hash_error: Option<String>,
}

impl<T> Decoded<T> {
    fn new(record: T, tx: &Tx) -> Self {
        let check = tx.verify_hash();
        if let Err(err) = &check {
            tracing::warn!(hash = %tx.hash, %err, "decoded transaction hash does not match its fields");
        }
        Self {
            record,
            hash_valid: check.is_ok(),
            hash_error: check.err().map(|err: TxError| err.to_string()),
        }
    }
}

pub fn decode<W: Write>(hex_record: &str, with_status: bool, out: &mut W) -> Result<()> {
    let trimmed = hex_record.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if digits.len() / 2 > MAX_BYTES {
        bail!("record is larger than {MAX_BYTES} bytes");
    }
    let bytes = hex::decode(digits).context("record is not valid hex")?;

    if with_status {
        let record: WithStatus = from_bytes(&bytes).context("failed to decode transaction with status")?;
        let decoded = Decoded::new(&record, &record.tx);
        serde_json::to_writer_pretty(&mut *out, &decoded)?;
    } else {
        let record: Tx = from_bytes(&bytes).context("failed to decode transaction")?;
        let decoded = Decoded::new(&record, &record);
        serde_json::to_writer_pretty(&mut *out, &decoded)?;
    }
    writeln!(out)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// version
// ---------------------------------------------------------------------------

pub fn version<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "relaytx    {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "tx version {}", Version::CURRENT)?;
    writeln!(out, "hash       {HASH_FUNCTION}")?;
    Ok(())
}
