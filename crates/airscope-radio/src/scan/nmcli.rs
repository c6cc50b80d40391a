//! Primary scan backend: NetworkManager's `nmcli` in terse mode.

use std::time::Duration;

use crate::backend::run_backend;
use crate::error::RadioError;

use super::NetworkObservation;

const BACKEND: &str = "nmcli";

/// Scan via `nmcli -t -f SSID,SIGNAL,SECURITY,CHAN,FREQ dev wifi`.
///
/// Non-blank output that yields no observations is treated as a backend
/// failure so the caller moves on to the fallback mechanism.
pub async fn scan_nmcli(timeout: Duration) -> Result<Vec<NetworkObservation>, RadioError> {
    let stdout = run_backend(
        BACKEND,
        "nmcli",
        &["-t", "-f", "SSID,SIGNAL,SECURITY,CHAN,FREQ", "dev", "wifi"],
        timeout,
    )
    .await?;

    let observations = parse_nmcli_output(&stdout);
    if observations.is_empty() && !stdout.trim().is_empty() {
        return Err(RadioError::BackendFailed {
            backend: BACKEND,
            reason: "output did not match the expected terse format".into(),
        });
    }
    Ok(observations)
}

/// Parse terse `nmcli` output: one network per line, colon-delimited
/// `SSID:SIGNAL:SECURITY:CHAN:FREQ`. Lines with fewer than 3 fields are
/// discarded.
pub fn parse_nmcli_output(output: &str) -> Vec<NetworkObservation> {
    output.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<NetworkObservation> {
    if line.is_empty() {
        return None;
    }

    let parts: Vec<&str> = line.split(':').collect();
    if parts.len() < 3 {
        return None;
    }

    let field = |idx: usize| {
        parts
            .get(idx)
            .copied()
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    };

    Some(NetworkObservation {
        ssid: field(0),
        // A non-numeric SIGNAL field means 0, not a dropped line.
        signal: Some(parts[1].parse().unwrap_or(0)),
        security: field(2),
        channel: field(3),
        frequency: field(4),
    })
}

// ── Tests ────────────────────────────────────────────────────────────
