// airscope-core: scan/capture/publish orchestration over airscope-radio.

pub mod capture;
pub mod convert;
pub mod error;
pub mod model;
pub mod publish;
pub mod scanner;
pub mod sniffer;

// ── Primary re-exports ──────────────────────────────────────────────
pub use capture::Capturer;
pub use error::CoreError;
pub use publish::{BrokerState, Publisher, PublisherConfig};
pub use scanner::{OsBackends, ScanBackends, Scanner, ScannerConfig};
pub use sniffer::{FRAME_TOPIC, Sniffer, SnifferConfig};

// Re-export model types at the crate root for ergonomics.
pub use model::{CaptureFrame, HIDDEN_NETWORK, NetworkRecord, SignalQuality, UNKNOWN_FIELD};
