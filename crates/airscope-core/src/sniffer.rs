// ── Capture pipeline ──
//
// Wires the mode manager, the capture loop, and the publisher into the
// one long-running session this process supports: enter monitor mode,
// connect the broker, stream frames, tear down. Ordering is part of the
// contract -- the adapter must reach monitor mode before the capture
// opens, and the broker must be up before the first frame is read.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use airscope_radio::capture::FrameSource;
use airscope_radio::monitor::ModeManager;

use crate::capture::Capturer;
use crate::error::CoreError;
use crate::publish::{Publisher, PublisherConfig};

/// Bus topic carrying serialized [`CaptureFrame`](crate::CaptureFrame)s.
pub const FRAME_TOPIC: &str = "wifi/packets";

#[derive(Debug, Clone)]
pub struct SnifferConfig {
    /// Explicit interface to use; `None` enumerates and takes the first.
    pub interface_hint: Option<String>,
    /// Walk the adapter back to managed mode on shutdown.
    pub restore_managed: bool,
    pub publisher: PublisherConfig,
}

/// The monitor-mode capture-and-publish pipeline.
pub struct Sniffer {
    config: SnifferConfig,
    cancel: CancellationToken,
}

impl Sniffer {
    pub fn new(config: SnifferConfig, cancel: CancellationToken) -> Self {
        Self { config, cancel }
    }

    /// Run the full pipeline to completion.
    ///
    /// Any fatal error tears down in reverse order; a cancelled run is a
    /// clean stop. Capture restart after a fatal error is deliberately
    /// left to the operator.
    pub async fn run(&self) -> Result<(), CoreError> {
        let mut modes = ModeManager::new();
        let monitor_iface = modes
            .enter_monitor_mode(self.config.interface_hint.as_deref())
            .await?;

        let publisher = match Publisher::connect(
            self.config.publisher.clone(),
            self.cancel.child_token(),
        )
        .await
        {
            Ok(publisher) => publisher,
            Err(e) => {
                self.teardown(&mut modes).await;
                return Err(e);
            }
        };

        let source = match FrameSource::open(&monitor_iface) {
            Ok(source) => source,
            Err(e) => {
                publisher.shutdown();
                self.teardown(&mut modes).await;
                return Err(e.into());
            }
        };

        let capturer = Capturer::new(self.cancel.clone());
        let worker_publisher = publisher.clone();
        let result = tokio::task::spawn_blocking(move || {
            capturer.run(source, move |frame| match serde_json::to_vec(&frame) {
                Ok(payload) => worker_publisher.publish(FRAME_TOPIC, payload),
                Err(e) => warn!(error = %e, "failed to serialize frame"),
            })
        })
        .await
        .map_err(|e| CoreError::Internal(format!("capture worker panicked: {e}")))?;

        publisher.shutdown();
        self.teardown(&mut modes).await;
        info!("capture pipeline stopped");
        result
    }

    /// Request cooperative shutdown of the capture loop and keep-alive.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    async fn teardown(&self, modes: &mut ModeManager) {
        if !self.config.restore_managed {
            return;
        }
        if let Err(e) = modes.restore_managed().await {
            warn!(error = %e, "failed to restore managed mode");
        }
    }
}
