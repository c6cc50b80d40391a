//! `airscope serve` -- the HTTP front door.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use airscope_config::Config;
use airscope_core::{Scanner, ScannerConfig};

use crate::audit::AuditLauncher;
use crate::bridge;
use crate::cli::{GlobalOpts, ServeArgs};
use crate::error::CliError;
use crate::server::{self, AppState};

pub async fn handle(
    args: ServeArgs,
    global: &GlobalOpts,
    config: Config,
) -> Result<(), CliError> {
    let interface = global
        .interface
        .clone()
        .unwrap_or_else(|| config.scan.interface.clone());

    let scanner = Scanner::new(ScannerConfig {
        interface: interface.clone(),
        cache_duration: config.scan.cache_duration(),
        backend_timeout: config.scan.backend_timeout(),
    });

    let cancel = CancellationToken::new();
    let frames = args
        .bridge
        .then(|| bridge::spawn_bridge(config.broker.clone(), cancel.child_token()));

    let state = Arc::new(AppState {
        scanner,
        frames,
        audit: AuditLauncher {
            tool: config.audit.tool.clone(),
            interface,
        },
    });

    let app = server::router(state);

    let host = args.host.unwrap_or(config.http.host);
    let port = args.port.unwrap_or(config.http.port);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| CliError::Bind {
            addr: addr.clone(),
            source,
        })?;

    info!(addr = %addr, bridge = args.bridge, "serving wifi survey API");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel))
        .await
        .map_err(CliError::Io)?;

    info!("server stopped");
    Ok(())
}

/// Resolve on ctrl-c; also cancels the bridge task.
async fn shutdown_signal(cancel: CancellationToken) {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
    cancel.cancel();
}
