//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use airscope_config::ConfigError;
use airscope_core::CoreError;

/// Exit codes for process termination.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const ADAPTER: i32 = 3;
    pub const BROKER: i32 = 4;
    pub const CAPTURE: i32 = 5;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Adapter / monitor mode ───────────────────────────────────────
    #[error("No wireless-capable adapter found")]
    #[diagnostic(
        code(airscope::adapter_not_found),
        help(
            "Check that a wireless adapter is connected and visible.\n\
             List interfaces with: iwconfig\n\
             Monitor-mode entry needs root (or CAP_NET_ADMIN)."
        )
    )]
    AdapterNotFound,

    #[error("Could not put {interface} into monitor mode")]
    #[diagnostic(
        code(airscope::monitor_mode),
        help(
            "The adapter or driver may not support monitor mode.\n\
             Reason: {reason}"
        )
    )]
    MonitorMode { interface: String, reason: String },

    // ── Broker ───────────────────────────────────────────────────────
    #[error("Message broker unreachable after {attempts} attempts")]
    #[diagnostic(
        code(airscope::broker_unreachable),
        help(
            "Check that the broker is running and reachable.\n\
             Override the target with AIRSCOPE_BROKER__HOST / AIRSCOPE_BROKER__PORT.\n\
             Last error: {reason}"
        )
    )]
    BrokerUnreachable { attempts: u32, reason: String },

    // ── Capture ──────────────────────────────────────────────────────
    #[error("Frame capture failed")]
    #[diagnostic(
        code(airscope::capture_failed),
        help(
            "The capture session ended fatally -- restart the sniffer once\n\
             the adapter is back. Reason: {reason}"
        )
    )]
    CaptureFailed { reason: String },

    // ── Scan ─────────────────────────────────────────────────────────
    #[error("Network scan failed")]
    #[diagnostic(
        code(airscope::scan_failed),
        help(
            "Neither nmcli nor iwlist produced usable results.\n\
             Reason: {reason}"
        )
    )]
    ScanFailed { reason: String },

    // ── HTTP server ──────────────────────────────────────────────────
    #[error("Could not bind HTTP listener on {addr}")]
    #[diagnostic(
        code(airscope::bind_failed),
        help("Is another process using the port? Change it with --port.")
    )]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(airscope::validation))]
    Validation { field: String, reason: String },

    #[error("Configuration error")]
    #[diagnostic(code(airscope::config))]
    Config(#[source] Box<figment::Error>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(airscope::json))]
    Json(#[from] serde_json::Error),

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    #[diagnostic(code(airscope::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AdapterNotFound | Self::MonitorMode { .. } => exit_code::ADAPTER,
            Self::BrokerUnreachable { .. } => exit_code::BROKER,
            Self::CaptureFailed { .. } => exit_code::CAPTURE,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AdapterNotFound => CliError::AdapterNotFound,

            CoreError::ModeSwitchFailed { interface, reason } => {
                CliError::MonitorMode { interface, reason }
            }

            CoreError::ModeVerificationFailed { interface } => CliError::MonitorMode {
                interface,
                reason: "the mode flag was not confirmed after the switch".into(),
            },

            CoreError::BrokerRetriesExhausted { attempts, reason } => {
                CliError::BrokerUnreachable { attempts, reason }
            }

            CoreError::CaptureFatal { reason } => CliError::CaptureFailed { reason },

            CoreError::ScanFailed { reason } => CliError::ScanFailed { reason },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Figment(inner) => CliError::Config(inner),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_per_failure_class() {
        assert_eq!(CliError::AdapterNotFound.exit_code(), exit_code::ADAPTER);
        assert_eq!(
            CliError::BrokerUnreachable {
                attempts: 5,
                reason: "refused".into()
            }
            .exit_code(),
            exit_code::BROKER
        );
        assert_eq!(
            CliError::CaptureFailed {
                reason: "gone".into()
            }
            .exit_code(),
            exit_code::CAPTURE
        );
        assert_eq!(
            CliError::ScanFailed {
                reason: "dead".into()
            }
            .exit_code(),
            exit_code::GENERAL
        );
    }

    #[test]
    fn core_errors_map_to_cli_variants() {
        let err: CliError = CoreError::BrokerRetriesExhausted {
            attempts: 5,
            reason: "connection refused".into(),
        }
        .into();
        assert!(matches!(err, CliError::BrokerUnreachable { attempts: 5, .. }));

        let err: CliError = CoreError::AdapterNotFound.into();
        assert!(matches!(err, CliError::AdapterNotFound));
    }
}
