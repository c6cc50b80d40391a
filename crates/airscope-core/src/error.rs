// ── Core error types ──
//
// Domain-facing errors from airscope-core. Consumers never see pcap or
// process plumbing directly -- the `From<RadioError>` impl translates
// boundary failures into these variants.

use thiserror::Error;

use airscope_radio::RadioError;

/// Top-level error type for `airscope-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Scan path ────────────────────────────────────────────────────
    /// Every backend in the chain failed. Internal to the scan path:
    /// `Scanner::scan()` converts this into an empty result.
    #[error("scan failed: {reason}")]
    ScanFailed { reason: String },

    // ── Adapter / monitor mode ───────────────────────────────────────
    #[error("no wireless-capable adapter found")]
    AdapterNotFound,

    #[error("monitor mode switch failed on {interface}: {reason}")]
    ModeSwitchFailed { interface: String, reason: String },

    #[error("monitor mode could not be verified on {interface}")]
    ModeVerificationFailed { interface: String },

    // ── Broker ───────────────────────────────────────────────────────
    #[error("broker unreachable after {attempts} attempts: {reason}")]
    BrokerRetriesExhausted { attempts: u32, reason: String },

    // ── Capture ──────────────────────────────────────────────────────
    #[error("capture error: {reason}")]
    CaptureFatal { reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("configuration error: {message}")]
    Config { message: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// `true` when the owning pipeline cannot continue. These terminate
    /// the capture path; scan serving continues independently.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::AdapterNotFound
                | Self::ModeSwitchFailed { .. }
                | Self::ModeVerificationFailed { .. }
                | Self::BrokerRetriesExhausted { .. }
                | Self::CaptureFatal { .. }
        )
    }
}

// ── Conversion from boundary errors ──────────────────────────────────

impl From<RadioError> for CoreError {
    fn from(err: RadioError) -> Self {
        match err {
            RadioError::BackendTimeout {
                backend,
                timeout_secs,
            } => CoreError::ScanFailed {
                reason: format!("{backend} timed out after {timeout_secs}s"),
            },
            RadioError::BackendFailed { backend, reason } => CoreError::ScanFailed {
                reason: format!("{backend}: {reason}"),
            },
            RadioError::AdapterNotFound => CoreError::AdapterNotFound,
            RadioError::ModeSwitchFailed { interface, reason } => {
                CoreError::ModeSwitchFailed { interface, reason }
            }
            RadioError::ModeVerificationFailed { interface } => {
                CoreError::ModeVerificationFailed { interface }
            }
            RadioError::CaptureOpen { interface, reason } => CoreError::CaptureFatal {
                reason: format!("cannot open capture on {interface}: {reason}"),
            },
            RadioError::CaptureFatal { reason } => CoreError::CaptureFatal { reason },
            RadioError::Io(e) => CoreError::Internal(e.to_string()),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_classification() {
        assert!(CoreError::AdapterNotFound.is_fatal());
        assert!(
            CoreError::BrokerRetriesExhausted {
                attempts: 5,
                reason: "refused".into()
            }
            .is_fatal()
        );
        assert!(
            !CoreError::ScanFailed {
                reason: "nmcli: timed out".into()
            }
            .is_fatal()
        );
    }

    #[test]
    fn backend_errors_map_to_scan_failed() {
        let err: CoreError = RadioError::BackendTimeout {
            backend: "nmcli",
            timeout_secs: 10,
        }
        .into();
        assert!(matches!(err, CoreError::ScanFailed { .. }));
    }
}
