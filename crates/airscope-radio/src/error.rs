use thiserror::Error;

/// Top-level error type for the `airscope-radio` crate.
///
/// Covers every failure mode at the OS boundary: scan-backend invocation,
/// monitor-mode transitions, and the pcap capture layer. `airscope-core`
/// maps these into domain-appropriate variants.
#[derive(Debug, Error)]
pub enum RadioError {
    // ── Scan backends ───────────────────────────────────────────────
    /// A backend process exceeded its invocation bound and was killed.
    #[error("{backend} timed out after {timeout_secs}s")]
    BackendTimeout {
        backend: &'static str,
        timeout_secs: u64,
    },

    /// A backend could not be spawned, exited non-zero, or produced
    /// output that did not match its expected format.
    #[error("{backend} failed: {reason}")]
    BackendFailed {
        backend: &'static str,
        reason: String,
    },

    // ── Adapter / monitor mode ──────────────────────────────────────
    /// No wireless-capable interface exists on this host.
    #[error("no wireless-capable interface found")]
    AdapterNotFound,

    /// The mode-switch command reported failure.
    #[error("failed to switch {interface} into monitor mode: {reason}")]
    ModeSwitchFailed { interface: String, reason: String },

    /// The post-switch capability check did not confirm monitor mode.
    #[error("monitor mode not confirmed on {interface}")]
    ModeVerificationFailed { interface: String },

    // ── Capture ─────────────────────────────────────────────────────
    /// The pcap handle could not be opened on the interface.
    #[error("cannot open capture on {interface}: {reason}")]
    CaptureOpen { interface: String, reason: String },

    /// The capture layer failed mid-session (e.g. the interface
    /// disappeared). Terminates the capture loop.
    #[error("capture terminated: {reason}")]
    CaptureFatal { reason: String },

    // ── OS ──────────────────────────────────────────────────────────
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RadioError {
    /// Returns `true` for scan-backend failures — the ones that trigger
    /// the fallback chain rather than aborting the caller.
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            Self::BackendTimeout { .. } | Self::BackendFailed { .. }
        )
    }
}
