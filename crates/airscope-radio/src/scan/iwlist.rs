//! Fallback scan backend: wireless-tools `iwlist` scanning.

use std::time::Duration;

use crate::backend::run_backend;
use crate::error::RadioError;

use super::NetworkObservation;

const BACKEND: &str = "iwlist";

/// Scan via `iwlist <interface> scanning`.
///
/// Same malformed-output rule as the primary backend: non-blank output
/// with no recognizable cells is a failure, not an empty survey.
pub async fn scan_iwlist(
    interface: &str,
    timeout: Duration,
) -> Result<Vec<NetworkObservation>, RadioError> {
    let stdout = run_backend(BACKEND, "iwlist", &[interface, "scanning"], timeout).await?;

    let observations = parse_iwlist_output(&stdout);
    if observations.is_empty() && !stdout.trim().is_empty() {
        return Err(RadioError::BackendFailed {
            backend: BACKEND,
            reason: "output contained no recognizable cells".into(),
        });
    }
    Ok(observations)
}

/// Parse `iwlist scanning` free text.
///
/// Each `Cell NN - Address: …` line starts a network; the fields we care
/// about are matched per line by keyword. A quality ratio `num/denom`
/// converts to a rounded 0–100 percentage; encryption presence maps to
/// `"Secured"`/`"Open"`.
pub fn parse_iwlist_output(output: &str) -> Vec<NetworkObservation> {
    let mut networks = Vec::new();
    let mut current: Option<NetworkObservation> = None;

    for line in output.lines() {
        let line = line.trim();

        if line.contains("Cell") && line.contains("Address") {
            if let Some(net) = current.take() {
                networks.push(net);
            }
            current = Some(NetworkObservation::default());
            continue;
        }

        let Some(net) = current.as_mut() else {
            continue;
        };

        if let Some((_, rest)) = line.split_once("ESSID:") {
            let ssid = rest.trim().trim_matches('"');
            net.ssid = (!ssid.is_empty()).then(|| ssid.to_owned());
        } else if let Some((_, rest)) = line.split_once("Quality=") {
            net.signal = parse_quality_ratio(rest);
        } else if let Some((_, rest)) = line.split_once("Encryption key:") {
            let secured = rest.trim().eq_ignore_ascii_case("on");
            net.security = Some(if secured { "Secured" } else { "Open" }.to_owned());
        } else if let Some((_, rest)) = line.split_once("Channel:") {
            let channel = rest.trim();
            net.channel = (!channel.is_empty()).then(|| channel.to_owned());
        }
    }

    if let Some(net) = current.take() {
        networks.push(net);
    }
    networks
}

/// `"51/70  Signal level=-59 dBm"` → `round(51/70 * 100)` = 73.
#[allow(clippy::cast_possible_truncation)]
fn parse_quality_ratio(rest: &str) -> Option<i64> {
    let ratio = rest.split_whitespace().next()?;
    let (num, denom) = ratio.split_once('/')?;
    let num: f64 = num.parse().ok()?;
    let denom: f64 = denom.parse().ok()?;
    if denom <= 0.0 {
        return None;
    }
    Some((num / denom * 100.0).round() as i64)
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Trimmed real-world `iwlist wlan0 scanning` output (two cells).
    const SAMPLE_IWLIST_OUTPUT: &str = r#"wlan0     Scan completed :
          Cell 01 - Address: AA:BB:CC:DD:EE:FF
                    Channel:6
                    Frequency:2.437 GHz (Channel 6)
                    Quality=51/70  Signal level=-59 dBm
                    Encryption key:on
                    ESSID:"HomeNetwork"
                    Bit Rates:1 Mb/s; 2 Mb/s; 5.5 Mb/s; 11 Mb/s
          Cell 02 - Address: 11:22:33:44:55:66
                    Channel:11
                    Frequency:2.462 GHz (Channel 11)
                    Quality=30/70  Signal level=-80 dBm
                    Encryption key:off
                    ESSID:"OpenCafe"
"#;

    #[test]
    fn parse_two_cells() {
        let obs = parse_iwlist_output(SAMPLE_IWLIST_OUTPUT);
        assert_eq!(obs.len(), 2);

        assert_eq!(obs[0].ssid.as_deref(), Some("HomeNetwork"));
        assert_eq!(obs[0].signal, Some(73)); // round(51/70 * 100)
        assert_eq!(obs[0].security.as_deref(), Some("Secured"));
        assert_eq!(obs[0].channel.as_deref(), Some("6"));

        assert_eq!(obs[1].ssid.as_deref(), Some("OpenCafe"));
        assert_eq!(obs[1].signal, Some(43)); // round(30/70 * 100)
        assert_eq!(obs[1].security.as_deref(), Some("Open"));
        assert_eq!(obs[1].channel.as_deref(), Some("11"));
    }

    #[test]
    fn quality_ratio_rounds() {
        assert_eq!(parse_quality_ratio("51/70  Signal level=-59 dBm"), Some(73));
        assert_eq!(parse_quality_ratio("70/70"), Some(100));
        assert_eq!(parse_quality_ratio("1/70"), Some(1));
        assert_eq!(parse_quality_ratio("0/70"), Some(0));
    }

    #[test]
    fn bad_quality_ratio_is_ignored() {
        assert_eq!(parse_quality_ratio("garbage"), None);
        assert_eq!(parse_quality_ratio("51of70"), None);
        assert_eq!(parse_quality_ratio("51/0"), None);
    }

    #[test]
    fn hidden_essid_stays_unset() {
        let output = "\
Cell 01 - Address: AA:BB:CC:DD:EE:FF
          Quality=35/70  Signal level=-75 dBm
          Encryption key:on
          ESSID:\"\"
";
        let obs = parse_iwlist_output(output);
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].ssid, None);
        assert_eq!(obs[0].signal, Some(50));
    }

    #[test]
    fn cell_without_quality_has_no_signal() {
        let output = "\
Cell 01 - Address: AA:BB:CC:DD:EE:FF
          ESSID:\"NoQuality\"
          Encryption key:off
";
        let obs = parse_iwlist_output(output);
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].signal, None);
        assert_eq!(obs[0].security.as_deref(), Some("Open"));
    }

    #[test]
    fn lines_before_first_cell_are_ignored() {
        let obs = parse_iwlist_output("wlan0     Scan completed :\n");
        assert!(obs.is_empty());
    }
}
