//! # Asset & Chain Registry
//!
//! The static set of assets and host chains a deployment supports. A
//! [`Registry`] is built once (from [`Registry::default`] or a JSON file),
//! validated, and then handed by reference to everything that classifies
//! selectors. It is never mutated after construction.
//!
//! ## Invariants
//!
//! - Every asset has exactly one origin chain.
//! - Asset, origin chain and host names are non-empty and contain no `/`.
//! - Host names never contain `From`, so `to<A>From<B>` splits one way only.
//! - No origin chain is also registered as a host.
//! - No duplicates among assets or among hosts.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Asset / Chain
// ---------------------------------------------------------------------------

/// Identifier of a native on-chain asset, e.g. `BTC`.
///
/// The empty asset stands for "no asset" and is what classification returns
/// for invalid selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Asset(String);

impl Asset {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a blockchain, e.g. `Ethereum`.
///
/// The empty chain stands for "no chain".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chain(String);

impl Chain {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A supported asset and the chain it natively lives on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub asset: Asset,
    pub origin_chain: Chain,
}

impl AssetInfo {
    pub fn new(asset: &str, origin_chain: &str) -> Self {
        Self {
            asset: Asset::new(asset),
            origin_chain: Chain::new(origin_chain),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons a registry definition is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("registry entry has an empty name")]
    EmptyName,

    #[error("name {0:?} contains the selector separator '/'")]
    ContainsSeparator(String),

    #[error("host {0:?} contains \"From\" and would make selectors ambiguous")]
    AmbiguousHost(String),

    #[error("duplicate asset {0}")]
    DuplicateAsset(String),

    #[error("duplicate host {0}")]
    DuplicateHost(String),

    #[error("origin chain {chain} of asset {asset} is also registered as a host")]
    OriginIsHost { asset: String, chain: String },
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// The immutable set of supported assets and host chains.
///
/// ```
/// use relaytx_protocol::registry::Registry;
///
/// let registry = Registry::default();
/// assert_eq!(registry.origin_chain("BTC").map(|c| c.as_str()), Some("Bitcoin"));
/// assert!(registry.is_host("Ethereum"));
/// assert!(!registry.is_host("Bitcoin"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RegistryDef")]
pub struct Registry {
    assets: Vec<AssetInfo>,
    hosts: Vec<Chain>,
}

/// Unvalidated registry shape, as read from configuration.
#[derive(Deserialize)]
struct RegistryDef {
    assets: Vec<AssetInfo>,
    hosts: Vec<Chain>,
}

impl TryFrom<RegistryDef> for Registry {
    type Error = RegistryError;

    fn try_from(def: RegistryDef) -> Result<Self, Self::Error> {
        Registry::new(def.assets, def.hosts)
    }
}

fn check_name(name: &str) -> Result<(), RegistryError> {
    if name.is_empty() {
        return Err(RegistryError::EmptyName);
    }
    if name.contains('/') {
        return Err(RegistryError::ContainsSeparator(name.to_owned()));
    }
    Ok(())
}

impl Registry {
    /// Builds a registry, rejecting definitions that would make selector
    /// classification ambiguous.
    pub fn new(assets: Vec<AssetInfo>, hosts: Vec<Chain>) -> Result<Self, RegistryError> {
        for (i, host) in hosts.iter().enumerate() {
            check_name(host.as_str())?;
            if host.as_str().contains("From") {
                return Err(RegistryError::AmbiguousHost(host.to_string()));
            }
            if hosts[..i].contains(host) {
                return Err(RegistryError::DuplicateHost(host.to_string()));
            }
        }
        for (i, info) in assets.iter().enumerate() {
            check_name(info.asset.as_str())?;
            check_name(info.origin_chain.as_str())?;
            if assets[..i].iter().any(|other| other.asset == info.asset) {
                return Err(RegistryError::DuplicateAsset(info.asset.to_string()));
            }
            if hosts.contains(&info.origin_chain) {
                return Err(RegistryError::OriginIsHost {
                    asset: info.asset.to_string(),
                    chain: info.origin_chain.to_string(),
                });
            }
        }
        Ok(Self { assets, hosts })
    }

    /// Supported assets, in registration order.
    pub fn assets(&self) -> &[AssetInfo] {
        &self.assets
    }

    /// Supported host chains, in registration order.
    pub fn hosts(&self) -> &[Chain] {
        &self.hosts
    }

    /// Looks up a registered asset by name.
    pub fn asset(&self, name: &str) -> Option<&AssetInfo> {
        self.assets.iter().find(|info| info.asset.as_str() == name)
    }

    /// Origin chain of a registered asset.
    pub fn origin_chain(&self, asset: &str) -> Option<&Chain> {
        self.asset(asset).map(|info| &info.origin_chain)
    }

    /// Looks up a registered host chain by name.
    pub fn host(&self, name: &str) -> Option<&Chain> {
        self.hosts.iter().find(|host| host.as_str() == name)
    }

    pub fn is_host(&self, name: &str) -> bool {
        self.host(name).is_some()
    }
}

impl Default for Registry {
    /// The production set of assets and host chains.
    fn default() -> Self {
        let assets = [
            ("BCH", "BitcoinCash"),
            ("BTC", "Bitcoin"),
            ("DGB", "DigiByte"),
            ("DOGE", "Dogecoin"),
            ("FIL", "Filecoin"),
            ("LUNA", "Terra"),
            ("ZEC", "Zcash"),
        ]
        .into_iter()
        .map(|(asset, chain)| AssetInfo::new(asset, chain))
        .collect();

        let hosts = [
            "Arbitrum",
            "Avalanche",
            "BinanceSmartChain",
            "Ethereum",
            "Fantom",
            "Goerli",
            "Moonbeam",
            "Polygon",
            "Solana",
        ]
        .into_iter()
        .map(Chain::new)
        .collect();

        Self { assets, hosts }
    }
}
