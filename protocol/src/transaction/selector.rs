//! Selector parsing and classification.
//!
//! A selector is the routing token of a cross-chain transaction:
//!
//! ```text
//! BTC/toEthereum              lock:     Bitcoin  -> Ethereum
//! FIL/fromPolygon             release:  Polygon  -> Filecoin
//! ZEC/toPolygonFromEthereum   move:     Ethereum -> Polygon
//! ```
//!
//! [`Selector::classify`] parses the token once into a [`Route`]; the
//! accessors on [`Route`] never fail. Anything that does not parse against
//! the [`Registry`] becomes [`Route::Invalid`], whose accessors return the
//! empty asset, the empty chain and `false`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::trace;

use crate::codec::primitives::{decode_string, encode_str};
use crate::codec::{CodecError, Decode, Encode};
use crate::config::size_hint_bytes;
use crate::registry::{Asset, Chain, Registry};

const SEPARATOR: char = '/';
const TO: &str = "to";
const FROM: &str = "from";
const FROM_HOST: &str = "From";

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// The textual routing token of a transaction.
///
/// Equality is byte-exact. A `Selector` can hold any string; validity is
/// only decided by [`Selector::classify`] against a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selector(String);

impl Selector {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// `<asset>/to<host>`: lock on the origin chain, mint on `host`.
    pub fn lock(asset: &Asset, host: &Chain) -> Self {
        Self(format!("{asset}{SEPARATOR}{TO}{host}"))
    }

    /// `<asset>/from<host>`: burn on `host`, release on the origin chain.
    pub fn release(asset: &Asset, host: &Chain) -> Self {
        Self(format!("{asset}{SEPARATOR}{FROM}{host}"))
    }

    /// `<asset>/to<to>From<from>`: burn on `from`, mint on `to`.
    pub fn move_between(asset: &Asset, to: &Chain, from: &Chain) -> Self {
        Self(format!("{asset}{SEPARATOR}{TO}{to}{FROM_HOST}{from}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses the selector against `registry`.
    ///
    /// Total: malformed tokens, unknown assets and unknown hosts all yield
    /// [`Route::Invalid`]. Callers that query several properties should
    /// keep the returned `Route` rather than classifying repeatedly.
    pub fn classify(&self, registry: &Registry) -> Route {
        let route = parse(&self.0, registry);
        if !route.is_valid() {
            trace!(selector = %self.0, "unrecognised selector");
        }
        route
    }

    /// The asset being moved, or the empty asset.
    pub fn asset(&self, registry: &Registry) -> Asset {
        self.classify(registry).asset()
    }

    /// The chain the asset leaves, or the empty chain.
    pub fn source(&self, registry: &Registry) -> Chain {
        self.classify(registry).source()
    }

    /// The chain the asset arrives on, or the empty chain.
    pub fn destination(&self, registry: &Registry) -> Chain {
        self.classify(registry).destination()
    }

    /// Whether this is a valid lock (`<asset>/to<host>`) selector.
    pub fn is_lock(&self, registry: &Registry) -> bool {
        self.classify(registry).is_lock()
    }
}

fn parse(token: &str, registry: &Registry) -> Route {
    let Some((asset, verb)) = token.split_once(SEPARATOR) else {
        return Route::Invalid;
    };
    if verb.contains(SEPARATOR) {
        return Route::Invalid;
    }
    let Some(info) = registry.asset(asset) else {
        return Route::Invalid;
    };

    if let Some(rest) = verb.strip_prefix(TO) {
        if let Some((to, from)) = rest.split_once(FROM_HOST) {
            return match (registry.host(to), registry.host(from)) {
                (Some(to), Some(from)) if to != from => Route::Move {
                    asset: info.asset.clone(),
                    from: from.clone(),
                    to: to.clone(),
                },
                _ => Route::Invalid,
            };
        }
        return match registry.host(rest) {
            Some(host) => Route::Lock {
                asset: info.asset.clone(),
                origin: info.origin_chain.clone(),
                host: host.clone(),
            },
            None => Route::Invalid,
        };
    }

    if let Some(rest) = verb.strip_prefix(FROM) {
        return match registry.host(rest) {
            Some(host) => Route::Release {
                asset: info.asset.clone(),
                origin: info.origin_chain.clone(),
                host: host.clone(),
            },
            None => Route::Invalid,
        };
    }

    Route::Invalid
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Selector {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Selector {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Encode for Selector {
    fn size_hint(&self) -> usize {
        size_hint_bytes(self.0.len())
    }

    fn encode<'a>(&self, buf: &'a mut [u8], rem: usize) -> Result<(&'a mut [u8], usize), CodecError> {
        encode_str(&self.0, buf, rem)
    }
}

impl Decode for Selector {
    fn decode(buf: &[u8], rem: usize) -> Result<(Self, &[u8], usize), CodecError> {
        let (s, buf, rem) = decode_string(buf, rem)?;
        Ok((Self(s), buf, rem))
    }
}

// ---------------------------------------------------------------------------
// Route
// ---------------------------------------------------------------------------

/// The parsed form of a [`Selector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Not a selector the registry recognises.
    Invalid,
    /// `<asset>/to<host>`: origin chain to host chain.
    Lock { asset: Asset, origin: Chain, host: Chain },
    /// `<asset>/from<host>`: host chain back to the origin chain.
    Release { asset: Asset, origin: Chain, host: Chain },
    /// `<asset>/to<to>From<from>`: between two host chains.
    Move { asset: Asset, from: Chain, to: Chain },
}

impl Route {
    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid)
    }

    pub fn is_lock(&self) -> bool {
        matches!(self, Self::Lock { .. })
    }

    pub fn asset(&self) -> Asset {
        match self {
            Self::Invalid => Asset::default(),
            Self::Lock { asset, .. } | Self::Release { asset, .. } | Self::Move { asset, .. } => {
                asset.clone()
            }
        }
    }

    pub fn source(&self) -> Chain {
        match self {
            Self::Invalid => Chain::default(),
            Self::Lock { origin, .. } => origin.clone(),
            Self::Release { host, .. } => host.clone(),
            Self::Move { from, .. } => from.clone(),
        }
    }

    pub fn destination(&self) -> Chain {
        match self {
            Self::Invalid => Chain::default(),
            Self::Lock { host, .. } => host.clone(),
            Self::Release { origin, .. } => origin.clone(),
            Self::Move { to, .. } => to.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Enumeration
// ---------------------------------------------------------------------------

/// Selector enumeration. Every table below is built straight from the
/// grammar, independently of [`Selector::classify`], so it can be used to
/// check classification.
impl Registry {
    /// Every valid selector: for each asset and host, the lock, the release
    /// and one move from every other host.
    pub fn all_selectors(&self) -> Vec<Selector> {
        let n = self.hosts().len();
        let mut selectors = Vec::with_capacity(self.assets().len() * n * (n + 1));
        for info in self.assets() {
            for host in self.hosts() {
                selectors.push(Selector::lock(&info.asset, host));
                selectors.push(Selector::release(&info.asset, host));
                for other in self.hosts().iter().filter(|other| *other != host) {
                    selectors.push(Selector::move_between(&info.asset, host, other));
                }
            }
        }
        selectors
    }

    /// Valid selectors grouped by asset.
    pub fn selectors_by_asset(&self) -> BTreeMap<Asset, Vec<Selector>> {
        let mut map: BTreeMap<Asset, Vec<Selector>> = BTreeMap::new();
        for info in self.assets() {
            let entry = map.entry(info.asset.clone()).or_default();
            for host in self.hosts() {
                entry.push(Selector::lock(&info.asset, host));
                entry.push(Selector::release(&info.asset, host));
                for other in self.hosts().iter().filter(|other| *other != host) {
                    entry.push(Selector::move_between(&info.asset, host, other));
                }
            }
        }
        map
    }

    /// Valid selectors grouped by the chain the asset leaves.
    pub fn selectors_by_source(&self) -> BTreeMap<Chain, Vec<Selector>> {
        let mut map: BTreeMap<Chain, Vec<Selector>> = BTreeMap::new();
        for info in self.assets() {
            for host in self.hosts() {
                map.entry(info.origin_chain.clone())
                    .or_default()
                    .push(Selector::lock(&info.asset, host));
                map.entry(host.clone())
                    .or_default()
                    .push(Selector::release(&info.asset, host));
                for other in self.hosts().iter().filter(|other| *other != host) {
                    map.entry(other.clone())
                        .or_default()
                        .push(Selector::move_between(&info.asset, host, other));
                }
            }
        }
        map
    }

    /// Valid selectors grouped by the chain the asset arrives on.
    pub fn selectors_by_destination(&self) -> BTreeMap<Chain, Vec<Selector>> {
        let mut map: BTreeMap<Chain, Vec<Selector>> = BTreeMap::new();
        for info in self.assets() {
            for host in self.hosts() {
                map.entry(host.clone())
                    .or_default()
                    .push(Selector::lock(&info.asset, host));
                map.entry(info.origin_chain.clone())
                    .or_default()
                    .push(Selector::release(&info.asset, host));
                for other in self.hosts().iter().filter(|other| *other != host) {
                    map.entry(host.clone())
                        .or_default()
                        .push(Selector::move_between(&info.asset, host, other));
                }
            }
        }
        map
    }

    /// Lock selectors grouped by the asset's origin chain.
    pub fn lock_selectors(&self) -> BTreeMap<Chain, Vec<Selector>> {
        let mut map: BTreeMap<Chain, Vec<Selector>> = BTreeMap::new();
        for info in self.assets() {
            let entry = map.entry(info.origin_chain.clone()).or_default();
            entry.extend(self.hosts().iter().map(|host| Selector::lock(&info.asset, host)));
        }
        map
    }

    /// Release and move selectors grouped by the asset's origin chain.
    pub fn non_lock_selectors(&self) -> BTreeMap<Chain, Vec<Selector>> {
        let mut map: BTreeMap<Chain, Vec<Selector>> = BTreeMap::new();
        for info in self.assets() {
            let entry = map.entry(info.origin_chain.clone()).or_default();
            for host in self.hosts() {
                entry.push(Selector::release(&info.asset, host));
                for other in self.hosts().iter().filter(|other| *other != host) {
                    entry.push(Selector::move_between(&info.asset, host, other));
                }
            }
        }
        map
    }
}
