//! Cached reverse-DNS resolution.
//!
//! Best-effort PTR lookups used to decorate the remote-host field of a
//! chat notification. Lookups are memoized in a bounded, concurrency-safe
//! cache for the lifetime of the process; every failure mode collapses to
//! `None` and nothing here is ever surfaced to callers as an error.

use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use std::collections::{HashMap, VecDeque};
use std::net::IpAddr;
use std::sync::{Arc, RwLock};

/// Default maximum number of memoized address→hostname pairs.
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Reverse-DNS lookup seam.
///
/// Implementations perform a single lookup attempt with no retry; all
/// failures collapse to `None`.
#[async_trait]
pub trait ReverseDns: Send + Sync {
    /// Resolve `ip` to a hostname.
    async fn reverse(&self, ip: IpAddr) -> Option<String>;
}

/// PTR resolver backed by the system DNS configuration.
pub struct PtrResolver {
    resolver: TokioAsyncResolver,
}

impl PtrResolver {
    /// Build a resolver from the system configuration, falling back to
    /// the default public configuration when none is readable.
    #[must_use]
    pub fn from_system() -> Self {
        let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|_| {
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        });
        Self { resolver }
    }
}

#[async_trait]
impl ReverseDns for PtrResolver {
    async fn reverse(&self, ip: IpAddr) -> Option<String> {
        match self.resolver.reverse_lookup(ip).await {
            Ok(lookup) => lookup.iter().next().map(|ptr| ptr.to_string()),
            Err(err) => {
                tracing::debug!(%ip, error = %err, "reverse lookup failed");
                None
            }
        }
    }
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<String, String>,
    // Insertion order, oldest first; drives eviction when full.
    order: VecDeque<String>,
}

/// Memoizing wrapper around a [`ReverseDns`] implementation.
///
/// Reads take only the read lock; a miss performs the lookup without any
/// lock held and takes the write lock to insert afterwards. Two racing
/// invocations may therefore both look up the same address; the second
/// write wins and nothing is lost beyond the redundant lookup.
pub struct DnsCache {
    lookup: Arc<dyn ReverseDns>,
    capacity: usize,
    inner: RwLock<CacheInner>,
}

impl DnsCache {
    /// Create a cache with [`DEFAULT_CACHE_CAPACITY`].
    #[must_use]
    pub fn new(lookup: Arc<dyn ReverseDns>) -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY, lookup)
    }

    /// Create a cache holding at most `capacity` entries; inserting
    /// beyond that evicts the oldest entry.
    #[must_use]
    pub fn with_capacity(capacity: usize, lookup: Arc<dyn ReverseDns>) -> Self {
        Self {
            lookup,
            capacity,
            inner: RwLock::new(CacheInner::default()),
        }
    }

    /// Resolve an IP literal to a hostname, best effort.
    ///
    /// `None`, the empty string, and the literal `"N/A"` short-circuit to
    /// `None` without a lookup, as does anything that is not an IP
    /// literal. A successful answer has its trailing root-zone dot
    /// stripped before it is cached and returned.
    pub async fn resolve(&self, ip: Option<&str>) -> Option<String> {
        let ip = match ip {
            None | Some("") | Some("N/A") => return None,
            Some(ip) => ip,
        };

        if let Some(hit) = self.get(ip) {
            return Some(hit);
        }

        let addr: IpAddr = match ip.parse() {
            Ok(addr) => addr,
            Err(_) => {
                tracing::debug!(ip, "not an IP literal, skipping reverse lookup");
                return None;
            }
        };

        let name = self.lookup.reverse(addr).await?;
        let name = name.trim_end_matches('.').to_string();
        if name.is_empty() {
            return None;
        }

        self.insert(ip, name.clone());
        Some(name)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.read().map_or(0, |inner| inner.entries.len())
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, ip: &str) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.entries.get(ip).cloned()
    }

    fn insert(&self, ip: &str, name: String) {
        let Ok(mut inner) = self.inner.write() else {
            return;
        };
        if inner.entries.insert(ip.to_string(), name).is_none() {
            inner.order.push_back(ip.to_string());
        }
        while inner.entries.len() > self.capacity {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }
}
