//! Monitor-mode management for a single wireless adapter.
//!
//! Drives the adapter through an explicit state machine
//! (`Managed → Transitioning → Monitor`) using the aircrack-ng tooling,
//! and back down on teardown. The adapter is a singleton resource: one
//! manager instance owns its mode for the lifetime of a capture session,
//! and re-entering monitor mode without a teardown in between is not
//! supported.

use std::time::Duration;

use crate::backend::run_backend;
use crate::error::RadioError;

/// Suffix `airmon-ng` appends to the base interface name.
const MONITOR_SUFFIX: &str = "mon";

/// Bound on each mode-tool invocation.
const MODE_TIMEOUT: Duration = Duration::from_secs(10);

/// Adapter operating mode as tracked by the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterMode {
    Managed,
    Transitioning,
    Monitor,
    Unknown,
}

/// Process-wide adapter state. Mutated only by [`ModeManager`]; the
/// capturer reads it to confirm `Monitor` before opening a handle.
#[derive(Debug, Clone)]
pub struct AdapterState {
    pub interface: String,
    pub mode: AdapterMode,
}

/// Owner of the adapter's mode transitions.
#[derive(Debug)]
pub struct ModeManager {
    state: AdapterState,
}

impl ModeManager {
    pub fn new() -> Self {
        Self {
            state: AdapterState {
                interface: String::new(),
                mode: AdapterMode::Unknown,
            },
        }
    }

    /// Current adapter state.
    pub fn state(&self) -> &AdapterState {
        &self.state
    }

    /// Switch a wireless adapter into monitor mode and return the monitor
    /// interface name.
    ///
    /// Selects the hinted interface when given, otherwise the first
    /// wireless-capable one found. Processes holding the adapter are
    /// killed and a stale shadow interface stopped first — both
    /// best-effort. Fails with [`RadioError::AdapterNotFound`],
    /// [`RadioError::ModeSwitchFailed`], or
    /// [`RadioError::ModeVerificationFailed`].
    pub async fn enter_monitor_mode(&mut self, hint: Option<&str>) -> Result<String, RadioError> {
        let base = self.select_interface(hint).await?;
        self.state = AdapterState {
            interface: base.clone(),
            mode: AdapterMode::Transitioning,
        };

        // Anything holding the adapter (wpa_supplicant, NetworkManager)
        // breaks the switch; nothing to kill is fine.
        if let Err(e) = run_backend("airmon-ng", "airmon-ng", &["check", "kill"], MODE_TIMEOUT).await
        {
            tracing::debug!(error = %e, "airmon-ng check kill reported nothing to do");
        }

        // A monitor interface left over from a previous run shadows the
        // one we are about to create.
        let shadow = format!("{base}{MONITOR_SUFFIX}");
        if let Err(e) = run_backend("airmon-ng", "airmon-ng", &["stop", &shadow], MODE_TIMEOUT).await
        {
            tracing::debug!(error = %e, interface = %shadow, "no stale monitor interface to stop");
        }

        tracing::info!(interface = %base, "starting monitor mode");
        if let Err(e) = run_backend("airmon-ng", "airmon-ng", &["start", &base], MODE_TIMEOUT).await
        {
            self.state.mode = AdapterMode::Unknown;
            return Err(RadioError::ModeSwitchFailed {
                interface: base,
                reason: e.to_string(),
            });
        }

        let monitor = format!("{base}{MONITOR_SUFFIX}");
        self.verify_monitor(&monitor).await?;

        self.state = AdapterState {
            interface: monitor.clone(),
            mode: AdapterMode::Monitor,
        };
        tracing::info!(interface = %monitor, "monitor mode active");
        Ok(monitor)
    }

    /// Tear the adapter back down to managed mode.
    ///
    /// No-op unless the manager currently holds `Monitor`.
    pub async fn restore_managed(&mut self) -> Result<(), RadioError> {
        if self.state.mode != AdapterMode::Monitor {
            return Ok(());
        }

        let monitor = self.state.interface.clone();
        self.state.mode = AdapterMode::Transitioning;

        if let Err(e) = run_backend("airmon-ng", "airmon-ng", &["stop", &monitor], MODE_TIMEOUT).await
        {
            self.state.mode = AdapterMode::Unknown;
            return Err(RadioError::ModeSwitchFailed {
                interface: monitor,
                reason: e.to_string(),
            });
        }

        let base = monitor
            .strip_suffix(MONITOR_SUFFIX)
            .unwrap_or(&monitor)
            .to_owned();
        tracing::info!(interface = %base, "managed mode restored");
        self.state = AdapterState {
            interface: base,
            mode: AdapterMode::Managed,
        };
        Ok(())
    }

    async fn select_interface(&self, hint: Option<&str>) -> Result<String, RadioError> {
        if let Some(hint) = hint.filter(|h| !h.is_empty()) {
            return Ok(hint.to_owned());
        }

        let output = run_backend("iwconfig", "iwconfig", &[], MODE_TIMEOUT)
            .await
            .map_err(|_| RadioError::AdapterNotFound)?;
        wireless_interfaces(&output)
            .into_iter()
            .next()
            .ok_or(RadioError::AdapterNotFound)
    }

    async fn verify_monitor(&self, interface: &str) -> Result<(), RadioError> {
        let output = run_backend("iwconfig", "iwconfig", &[interface], MODE_TIMEOUT)
            .await
            .map_err(|_| RadioError::ModeVerificationFailed {
                interface: interface.to_owned(),
            })?;

        if !output.contains("Mode:Monitor") {
            return Err(RadioError::ModeVerificationFailed {
                interface: interface.to_owned(),
            });
        }
        Ok(())
    }
}

impl Default for ModeManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract wireless-capable interface names from `iwconfig` output.
///
/// Wireless interfaces report an `IEEE 802.11` line; wired ones report
/// `no wireless extensions`.
pub fn wireless_interfaces(iwconfig_output: &str) -> Vec<String> {
    iwconfig_output
        .lines()
        .filter(|line| line.contains("IEEE 802.11"))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_owned)
        .collect()
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE_IWCONFIG_OUTPUT: &str = "\
lo        no wireless extensions.

eth0      no wireless extensions.

wlan0     IEEE 802.11  ESSID:off/any
          Mode:Managed  Access Point: Not-Associated   Tx-Power=20 dBm

wlan1     IEEE 802.11  ESSID:\"HomeNetwork\"
          Mode:Managed  Frequency:2.437 GHz
";

    #[test]
    fn finds_wireless_interfaces_only() {
        let ifaces = wireless_interfaces(SAMPLE_IWCONFIG_OUTPUT);
        assert_eq!(ifaces, vec!["wlan0".to_owned(), "wlan1".to_owned()]);
    }

    #[test]
    fn no_wireless_interfaces() {
        let output = "lo        no wireless extensions.\n\neth0      no wireless extensions.\n";
        assert!(wireless_interfaces(output).is_empty());
    }

    #[test]
    fn manager_starts_unknown() {
        let manager = ModeManager::new();
        assert_eq!(manager.state().mode, AdapterMode::Unknown);
        assert!(manager.state().interface.is_empty());
    }

    #[tokio::test]
    async fn restore_is_noop_outside_monitor_mode() {
        let mut manager = ModeManager::new();
        // Unknown state: nothing to stop, no commands run.
        manager
            .restore_managed()
            .await
            .expect("restore from Unknown must be a no-op");
        assert_eq!(manager.state().mode, AdapterMode::Unknown);
    }
}
