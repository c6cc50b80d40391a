//! `airscope sniff` -- the monitor-mode capture pipeline.

use tokio_util::sync::CancellationToken;
use tracing::info;

use airscope_config::Config;
use airscope_core::{PublisherConfig, Sniffer, SnifferConfig};

use crate::cli::{GlobalOpts, SniffArgs};
use crate::error::CliError;

pub async fn handle(
    args: SniffArgs,
    global: &GlobalOpts,
    config: Config,
) -> Result<(), CliError> {
    let sniffer_config = SnifferConfig {
        // No hint means the mode manager enumerates and takes the first
        // wireless-capable interface.
        interface_hint: global.interface.clone(),
        restore_managed: config.capture.restore_managed && !args.keep_monitor,
        publisher: PublisherConfig {
            host: config.broker.host.clone(),
            port: config.broker.port,
            client_id: config.broker.client_id.clone(),
            keepalive: config.broker.keepalive(),
            connect_retries: config.broker.connect_retries,
            retry_delay: config.broker.retry_delay(),
        },
    };

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutdown signal received, stopping capture");
        signal_cancel.cancel();
    });

    let sniffer = Sniffer::new(sniffer_config, cancel);
    sniffer.run().await.map_err(CliError::from)
}
