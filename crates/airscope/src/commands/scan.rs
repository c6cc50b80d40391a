//! `airscope scan` -- one-shot survey printed to stdout.

use airscope_config::Config;
use airscope_core::{Scanner, ScannerConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(global: &GlobalOpts, config: Config) -> Result<(), CliError> {
    let scanner = Scanner::new(ScannerConfig {
        interface: global
            .interface
            .clone()
            .unwrap_or_else(|| config.scan.interface.clone()),
        cache_duration: config.scan.cache_duration(),
        backend_timeout: config.scan.backend_timeout(),
    });

    // One-shot: unlike the HTTP path, surface total failure to the user.
    let records = scanner.try_scan().await?;

    let rendered = output::render_records(&global.output, &records)?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}
