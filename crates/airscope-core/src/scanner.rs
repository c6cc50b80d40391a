// ── Resilient network scanner ──
//
// Walks the backend chain (nmcli, then iwlist), normalizes whichever
// result arrives, and caches it for a short window so request traffic
// cannot hammer the radio. `scan()` never fails: a dead chain yields an
// empty list and the boundary decides how to present that.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwapOption;
use tracing::{debug, error, info, warn};

use airscope_radio::scan::{NetworkObservation, scan_iwlist, scan_nmcli};
use airscope_radio::RadioError;

use crate::convert::normalize_scan;
use crate::error::CoreError;
use crate::model::NetworkRecord;

/// Scanner tuning. Every field has an environment-facing default in
/// `airscope-config`.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Interface handed to the fallback backend (`iwlist` needs one).
    pub interface: String,
    /// Validity window of a successful scan.
    pub cache_duration: Duration,
    /// Bound on each backend invocation.
    pub backend_timeout: Duration,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            interface: "wlan0".into(),
            cache_duration: Duration::from_secs(5),
            backend_timeout: Duration::from_secs(10),
        }
    }
}

/// Boxed future returned by [`ScanBackends`] implementations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Raw result of one backend attempt.
pub type ScanResult = Result<Vec<NetworkObservation>, RadioError>;

/// The backend chain as a seam: the scanner orchestrates, the chain
/// talks to the OS. Swapped for scripted results in tests.
pub trait ScanBackends: Send + Sync {
    /// Primary mechanism (NetworkManager query).
    fn primary(&self, timeout: Duration) -> BoxFuture<'_, ScanResult>;

    /// Fallback mechanism (wireless-tools query).
    fn fallback<'a>(&'a self, interface: &'a str, timeout: Duration) -> BoxFuture<'a, ScanResult>;
}

/// Production chain: shells out through `airscope-radio`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsBackends;

impl ScanBackends for OsBackends {
    fn primary(&self, timeout: Duration) -> BoxFuture<'_, ScanResult> {
        Box::pin(scan_nmcli(timeout))
    }

    fn fallback<'a>(&'a self, interface: &'a str, timeout: Duration) -> BoxFuture<'a, ScanResult> {
        Box::pin(scan_iwlist(interface, timeout))
    }
}

/// One successful scan, timestamped for freshness checks.
struct CachedScan {
    records: Arc<Vec<NetworkRecord>>,
    taken_at: Instant,
}

/// Orchestrates scan attempts across backends with fallback and a
/// time-bounded cache.
///
/// Safe to share across request contexts (`Arc<Scanner>`); the cache
/// slot is swapped atomically, so a reader never observes a
/// half-written update. Overlapping calls during a stale window may each
/// run a redundant scan — accepted.
pub struct Scanner {
    config: ScannerConfig,
    backends: Box<dyn ScanBackends>,
    cache: ArcSwapOption<CachedScan>,
}

impl Scanner {
    /// Scanner over the real OS backends.
    pub fn new(config: ScannerConfig) -> Self {
        Self::with_backends(config, Box::new(OsBackends))
    }

    /// Scanner over an explicit backend chain (tests, embedding).
    pub fn with_backends(config: ScannerConfig, backends: Box<dyn ScanBackends>) -> Self {
        Self {
            config,
            backends,
            cache: ArcSwapOption::empty(),
        }
    }

    /// Scan visible networks, never failing.
    ///
    /// Total chain failure logs at error level and yields an empty list;
    /// the previous cache is left untouched so the next call retries the
    /// chain immediately.
    pub async fn scan(&self) -> Vec<NetworkRecord> {
        match self.try_scan().await {
            Ok(records) => records,
            Err(e) => {
                error!(error = %e, "all scan backends failed");
                Vec::new()
            }
        }
    }

    /// Scan visible networks, surfacing total chain failure.
    ///
    /// The HTTP boundary uses this to distinguish "no networks" from
    /// "could not scan".
    pub async fn try_scan(&self) -> Result<Vec<NetworkRecord>, CoreError> {
        if let Some(records) = self.cached() {
            debug!(count = records.len(), "returning cached scan results");
            return Ok(records.to_vec());
        }

        let records = Arc::new(self.run_chain().await?);
        self.cache.store(Some(Arc::new(CachedScan {
            records: Arc::clone(&records),
            taken_at: Instant::now(),
        })));

        info!(count = records.len(), "scan complete");
        Ok(records.to_vec())
    }

    /// Fresh cache contents, if any. An expired entry counts as empty.
    fn cached(&self) -> Option<Arc<Vec<NetworkRecord>>> {
        let guard = self.cache.load();
        let cached = guard.as_ref()?;
        (cached.taken_at.elapsed() < self.config.cache_duration)
            .then(|| Arc::clone(&cached.records))
    }

    /// Primary first; fallback only after the primary fails.
    async fn run_chain(&self) -> Result<Vec<NetworkRecord>, CoreError> {
        match self.backends.primary(self.config.backend_timeout).await {
            Ok(observations) => Ok(normalize_scan(observations)),
            Err(e) => {
                warn!(error = %e, "primary backend failed, trying fallback");
                let observations = self
                    .backends
                    .fallback(&self.config.interface, self.config.backend_timeout)
                    .await?;
                Ok(normalize_scan(observations))
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
