// ── Observed-network domain types ──

use serde::{Deserialize, Serialize};
use strum::Display;

/// SSID sentinel for networks that suppress their broadcast.
pub const HIDDEN_NETWORK: &str = "(Hidden Network)";

/// Sentinel for channel/frequency fields a backend did not report.
pub const UNKNOWN_FIELD: &str = "N/A";

/// Human-readable signal classification derived from the numeric
/// percentage. Pure and monotonic in `signal`; the variant order gives
/// `Poor < Fair < Good < Excellent`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
pub enum SignalQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl SignalQuality {
    /// Band edges: `[0,30) Poor, [30,50) Fair, [50,70) Good, [70,..] Excellent`.
    pub fn from_signal(signal: i64) -> Self {
        if signal >= 70 {
            Self::Excellent
        } else if signal >= 50 {
            Self::Good
        } else if signal >= 30 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

/// One observed wireless network, normalized across backends.
///
/// All fields are always present; unknown values use explicit sentinels
/// rather than options so every consumer sees one shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRecord {
    pub ssid: String,
    /// Normalized 0–100 scale regardless of backend.
    pub signal: i64,
    /// `"Open"`, `"Secured"`, or a backend-reported cipher label.
    pub security: String,
    pub channel: String,
    pub frequency: String,
    pub quality: SignalQuality,
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn quality_band_edges() {
        assert_eq!(SignalQuality::from_signal(0), SignalQuality::Poor);
        assert_eq!(SignalQuality::from_signal(29), SignalQuality::Poor);
        assert_eq!(SignalQuality::from_signal(30), SignalQuality::Fair);
        assert_eq!(SignalQuality::from_signal(49), SignalQuality::Fair);
        assert_eq!(SignalQuality::from_signal(50), SignalQuality::Good);
        assert_eq!(SignalQuality::from_signal(69), SignalQuality::Good);
        assert_eq!(SignalQuality::from_signal(70), SignalQuality::Excellent);
        assert_eq!(SignalQuality::from_signal(100), SignalQuality::Excellent);
    }

    #[test]
    fn quality_is_monotonic_over_the_whole_range() {
        let mut previous = SignalQuality::from_signal(0);
        for signal in 1..=100 {
            let current = SignalQuality::from_signal(signal);
            assert!(
                current >= previous,
                "quality must not decrease: {previous:?} -> {current:?} at {signal}"
            );
            previous = current;
        }
    }

    #[test]
    fn quality_serializes_as_capitalized_word() {
        let json = serde_json::to_string(&SignalQuality::Excellent).expect("serialize");
        assert_eq!(json, "\"Excellent\"");
        assert_eq!(SignalQuality::Good.to_string(), "Good");
    }

    #[test]
    fn record_round_trips_through_json() {
        let record = NetworkRecord {
            ssid: "MyNet".into(),
            signal: 80,
            security: "WPA2".into(),
            channel: "6".into(),
            frequency: "2437".into(),
            quality: SignalQuality::Excellent,
        };
        let json = serde_json::to_string(&record).expect("serialize");
        let back: NetworkRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, record);
    }
}
