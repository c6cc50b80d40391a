//! Fire-and-forget launch of the external audit tool.
//!
//! The tool runs detached with its output discarded; the service keeps
//! no handle and never inspects it beyond the spawn result.

use std::process::Stdio;

use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct AuditLauncher {
    pub tool: String,
    pub interface: String,
}

impl AuditLauncher {
    /// Start the audit tool against a BSSID or SSID target.
    ///
    /// Returns as soon as the process is spawned; a background task reaps
    /// it whenever it exits.
    pub fn launch(&self, target: &str) -> std::io::Result<()> {
        let mut child = Command::new(&self.tool)
            .args(["-i", &self.interface, "-b", target])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        tracing::info!(tool = %self.tool, target, "audit tool launched");
        tokio::spawn(async move {
            let _ = child.wait().await;
        });
        Ok(())
    }
}
