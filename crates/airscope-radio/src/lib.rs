//! OS-facing wireless boundary for airscope.
//!
//! Everything that touches the operating system lives here: invoking the
//! scan tools (`nmcli`, `iwlist`), driving an adapter into monitor mode
//! via the aircrack-ng tooling, and reading raw 802.11 frames from a pcap
//! handle. `airscope-core` builds the scan/capture pipelines on top and
//! never talks to the OS directly.

pub mod backend;
pub mod capture;
pub mod error;
pub mod monitor;
pub mod scan;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::run_backend;
pub use capture::{FrameMeta, FrameRead, FrameSource, RawFrame, parse_frame};
pub use error::RadioError;
pub use monitor::{AdapterMode, AdapterState, ModeManager};
pub use scan::NetworkObservation;
