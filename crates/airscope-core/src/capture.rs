// ── Frame capture loop ──
//
// Pulls raw frames from a monitor-mode source on a blocking worker,
// parses them, and hands normalized frames to a callback in arrival
// order. Malformed frames are skipped with a warning; a capture-layer
// failure ends the session and surfaces as `CaptureFatal`. Restarting a
// dead capture is the operator's concern, not this loop's.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use airscope_radio::capture::{FrameRead, parse_frame};

use crate::error::CoreError;
use crate::model::CaptureFrame;

/// The long-running capture loop, stoppable between reads.
#[derive(Debug)]
pub struct Capturer {
    cancel: CancellationToken,
}

impl Capturer {
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// Run the capture loop until cancelled or a fatal capture error.
    ///
    /// Blocks its thread; call from `spawn_blocking` or a dedicated
    /// worker. The stop signal is checked between reads — the source's
    /// read timeout bounds shutdown latency.
    pub fn run(
        &self,
        mut source: impl FrameRead,
        mut on_frame: impl FnMut(CaptureFrame),
    ) -> Result<(), CoreError> {
        info!(interface = source.interface(), "starting frame capture");
        let mut captured: u64 = 0;
        let mut skipped: u64 = 0;

        while !self.cancel.is_cancelled() {
            let raw = match source.next_frame() {
                Ok(Some(raw)) => raw,
                // Read timeout: no traffic, re-check the stop signal.
                Ok(None) => continue,
                Err(e) => {
                    warn!(error = %e, captured, "capture loop terminated");
                    return Err(e.into());
                }
            };

            if let Some(meta) = parse_frame(&raw.data) {
                captured += 1;
                on_frame(CaptureFrame::from_meta(raw.timestamp, meta));
            } else {
                skipped += 1;
                warn!(len = raw.data.len(), "skipping malformed frame");
            }
        }

        info!(captured, skipped, "capture stopped");
        Ok(())
    }

    /// Request cooperative shutdown.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use pretty_assertions::assert_eq;

    use airscope_radio::capture::RawFrame;
    use airscope_radio::RadioError;

    use super::*;

    /// Scripted frame source: plays back a queue, then either idles or
    /// fails depending on the configured ending.
    struct ScriptedSource {
        frames: VecDeque<RawFrame>,
        ending: Ending,
        cancel_on_drain: Option<CancellationToken>,
    }

    enum Ending {
        Idle,
        Fatal,
    }

    impl FrameRead for ScriptedSource {
        fn next_frame(&mut self) -> Result<Option<RawFrame>, RadioError> {
            if let Some(frame) = self.frames.pop_front() {
                return Ok(Some(frame));
            }
            if let Some(cancel) = &self.cancel_on_drain {
                cancel.cancel();
            }
            match self.ending {
                Ending::Idle => Ok(None),
                Ending::Fatal => Err(RadioError::CaptureFatal {
                    reason: "interface disappeared".into(),
                }),
            }
        }

        fn interface(&self) -> &str {
            "wlan0mon"
        }
    }

    /// Valid beacon: 12-byte radiotap (trailer byte 200 → -56 dBm) plus
    /// a 24-byte management header.
    fn beacon(ts: f64) -> RawFrame {
        let mut data = vec![0u8; 12 + 24];
        data[2] = 12;
        data[8] = 200;
        data[12] = 0x80;
        RawFrame {
            timestamp: ts,
            data,
        }
    }

    fn garbage() -> RawFrame {
        RawFrame {
            timestamp: 0.0,
            data: vec![0x1, 0x2, 0x3],
        }
    }

    fn assert_timestamps(seen: &[f64], expected: &[f64]) {
        assert_eq!(seen.len(), expected.len(), "{seen:?} vs {expected:?}");
        for (a, b) in seen.iter().zip(expected) {
            assert!((a - b).abs() < f64::EPSILON, "{seen:?} vs {expected:?}");
        }
    }

    #[test]
    fn frames_are_delivered_in_arrival_order() {
        let cancel = CancellationToken::new();
        let source = ScriptedSource {
            frames: vec![beacon(1.0), beacon(2.0), beacon(3.0)].into(),
            ending: Ending::Idle,
            cancel_on_drain: Some(cancel.clone()),
        };

        let mut seen = Vec::new();
        Capturer::new(cancel)
            .run(source, |frame| seen.push(frame.timestamp))
            .expect("idle ending stops cleanly");

        assert_timestamps(&seen, &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn malformed_frames_are_skipped_not_fatal() {
        let cancel = CancellationToken::new();
        let source = ScriptedSource {
            frames: vec![beacon(1.0), garbage(), beacon(2.0)].into(),
            ending: Ending::Idle,
            cancel_on_drain: Some(cancel.clone()),
        };

        let mut seen = Vec::new();
        Capturer::new(cancel)
            .run(source, |frame| seen.push(frame.timestamp))
            .expect("garbage must not kill the loop");

        assert_timestamps(&seen, &[1.0, 2.0]);
    }

    #[test]
    fn fatal_source_error_terminates_with_capture_fatal() {
        let cancel = CancellationToken::new();
        let source = ScriptedSource {
            frames: vec![beacon(1.0)].into(),
            ending: Ending::Fatal,
            cancel_on_drain: None,
        };

        let mut seen = Vec::new();
        let err = Capturer::new(cancel)
            .run(source, |frame| seen.push(frame.timestamp))
            .expect_err("fatal source error must surface");

        assert_timestamps(&seen, &[1.0]);
        assert!(matches!(err, CoreError::CaptureFatal { .. }));
    }

    #[test]
    fn pre_cancelled_loop_reads_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let source = ScriptedSource {
            frames: vec![beacon(1.0)].into(),
            ending: Ending::Idle,
            cancel_on_drain: None,
        };

        let mut seen = Vec::new();
        Capturer::new(cancel)
            .run(source, |frame| seen.push(frame.timestamp))
            .expect("cancelled loop exits cleanly");

        assert!(seen.is_empty());
    }

    #[test]
    fn signal_metadata_flows_through() {
        let cancel = CancellationToken::new();
        let source = ScriptedSource {
            frames: vec![beacon(5.5)].into(),
            ending: Ending::Idle,
            cancel_on_drain: Some(cancel.clone()),
        };

        let mut frames = Vec::new();
        Capturer::new(cancel)
            .run(source, |frame| frames.push(frame))
            .expect("capture succeeds");

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].signal_strength, Some(-56));
        assert_eq!(frames[0].channel, Some(200));
        assert_eq!(frames[0].frame_type, 0);
        assert_eq!(frames[0].frame_subtype, 8);
    }
}
