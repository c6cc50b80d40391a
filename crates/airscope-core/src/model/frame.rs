// ── Captured-frame domain type ──

use serde::{Deserialize, Serialize};

use airscope_radio::FrameMeta;

/// One observed 802.11 frame, normalized for the message bus.
///
/// Constructed per captured frame, serialized, published -- never
/// retained. Field names match the bus payload schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureFrame {
    /// Capture timestamp in seconds.
    pub timestamp: f64,
    #[serde(rename = "type")]
    pub frame_type: u8,
    #[serde(rename = "subtype")]
    pub frame_subtype: u8,
    pub signal_strength: Option<i32>,
    pub channel: Option<u32>,
    pub src: Option<String>,
    pub dst: Option<String>,
}

impl CaptureFrame {
    /// Pair parsed frame metadata with its arrival timestamp.
    pub fn from_meta(timestamp: f64, meta: FrameMeta) -> Self {
        Self {
            timestamp,
            frame_type: meta.frame_type,
            frame_subtype: meta.frame_subtype,
            signal_strength: meta.signal_dbm,
            channel: meta.channel,
            src: meta.source,
            dst: meta.destination,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
