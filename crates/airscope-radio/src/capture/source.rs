//! pcap-backed frame source.
//!
//! Opens a live capture on a monitor-mode interface. The read timeout
//! keeps the blocking loop responsive: a timed-out read returns
//! `Ok(None)` so the caller can check its stop signal between reads.

use pcap::{Active, Capture};

use crate::error::RadioError;

/// Whole management frames including any vendor trailer.
const SNAPLEN: i32 = 2048;

/// Read timeout — the upper bound on shutdown latency.
const READ_TIMEOUT_MS: i32 = 1000;

/// A single captured frame: raw bytes plus the pcap arrival timestamp.
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Arrival time in seconds since the epoch.
    pub timestamp: f64,
    pub data: Vec<u8>,
}

/// Anything the capture loop can pull frames from. The pcap handle is
/// the production implementation; tests feed scripted frames.
pub trait FrameRead {
    /// Blocking read of the next frame.
    ///
    /// `Ok(None)` means the read timeout elapsed with no traffic — check
    /// the stop signal and call again. Any error is fatal for the
    /// session.
    fn next_frame(&mut self) -> Result<Option<RawFrame>, RadioError>;

    /// Interface this source reads from.
    fn interface(&self) -> &str;
}

/// Live capture handle over one monitor-mode interface.
pub struct FrameSource {
    capture: Capture<Active>,
    interface: String,
}

impl FrameSource {
    /// Open a promiscuous live capture on `interface`.
    pub fn open(interface: &str) -> Result<Self, RadioError> {
        let capture = Capture::from_device(interface)
            .map_err(|e| RadioError::CaptureOpen {
                interface: interface.to_owned(),
                reason: e.to_string(),
            })?
            .promisc(true)
            .snaplen(SNAPLEN)
            .timeout(READ_TIMEOUT_MS)
            .open()
            .map_err(|e| RadioError::CaptureOpen {
                interface: interface.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            capture,
            interface: interface.to_owned(),
        })
    }
}

impl FrameRead for FrameSource {
    fn next_frame(&mut self) -> Result<Option<RawFrame>, RadioError> {
        match self.capture.next_packet() {
            Ok(packet) => {
                let ts = packet.header.ts;
                #[allow(clippy::cast_precision_loss)]
                let timestamp = ts.tv_sec as f64 + ts.tv_usec as f64 / 1_000_000.0;
                Ok(Some(RawFrame {
                    timestamp,
                    data: packet.data.to_vec(),
                }))
            }
            Err(pcap::Error::TimeoutExpired) => Ok(None),
            Err(e) => Err(RadioError::CaptureFatal {
                reason: e.to_string(),
            }),
        }
    }

    fn interface(&self) -> &str {
        &self.interface
    }
}
