// ── Backend-observation normalization ──
//
// Pure functions turning raw per-backend observations into canonical
// `NetworkRecord`s: sentinel fill, quality derivation, descending sort.

use airscope_radio::NetworkObservation;

use crate::model::{HIDDEN_NETWORK, NetworkRecord, SignalQuality, UNKNOWN_FIELD};

/// Normalize one backend observation into the canonical record shape.
pub fn record_from_observation(obs: NetworkObservation) -> NetworkRecord {
    let signal = obs.signal.unwrap_or(0).clamp(0, 100);

    NetworkRecord {
        ssid: obs.ssid.unwrap_or_else(|| HIDDEN_NETWORK.to_owned()),
        signal,
        security: obs.security.unwrap_or_else(|| "Open".to_owned()),
        channel: obs.channel.unwrap_or_else(|| UNKNOWN_FIELD.to_owned()),
        frequency: obs.frequency.unwrap_or_else(|| UNKNOWN_FIELD.to_owned()),
        quality: SignalQuality::from_signal(signal),
    }
}

/// Normalize a whole backend result: convert every observation, then
/// sort by descending signal. The sort is stable, so ties keep backend
/// emission order.
pub fn normalize_scan(observations: Vec<NetworkObservation>) -> Vec<NetworkRecord> {
    let mut records: Vec<NetworkRecord> = observations
        .into_iter()
        .map(record_from_observation)
        .collect();
    records.sort_by(|a, b| b.signal.cmp(&a.signal));
    records
}

// ── Tests ────────────────────────────────────────────────────────────
