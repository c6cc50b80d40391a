// ── Canonical domain model ──

pub mod frame;
pub mod network;

pub use frame::CaptureFrame;
pub use network::{HIDDEN_NETWORK, NetworkRecord, SignalQuality, UNKNOWN_FIELD};
