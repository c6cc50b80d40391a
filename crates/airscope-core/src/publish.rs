// ── MQTT publisher ──
//
// Owns the broker connection: bounded connect retries with a fixed
// delay, a cancellable keep-alive event loop, and fire-and-forget QoS 0
// publishing. Message loss across transient disconnects is accepted
// (at-most-once, no store-and-forward).

use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::CoreError;

/// Bound on a single TCP + CONNECT/CONNACK exchange.
const CONNACK_TIMEOUT: Duration = Duration::from_secs(10);

/// Broker connection tuning. The retry bound and delay are explicit and
/// configurable rather than an opaque client default.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub keepalive: Duration,
    pub connect_retries: u32,
    pub retry_delay: Duration,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 1883,
            client_id: "airscope".into(),
            keepalive: Duration::from_secs(60),
            connect_retries: 5,
            retry_delay: Duration::from_secs(5),
        }
    }
}

/// Broker connection state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrokerState {
    Disconnected,
    Connecting { attempt: u32 },
    Connected,
    Failed,
}

/// Handle to a live broker connection.
///
/// Cheaply cloneable; the capture worker clones one into its frame
/// callback. Call [`shutdown`](Self::shutdown) to stop the background
/// keep-alive loop.
#[derive(Clone, Debug)]
pub struct Publisher {
    client: AsyncClient,
    state_rx: watch::Receiver<BrokerState>,
    cancel: CancellationToken,
}

impl Publisher {
    /// Connect to the broker, retrying up to the configured bound with a
    /// fixed delay between attempts.
    ///
    /// On success the keep-alive event loop is spawned under `cancel`.
    /// Exhausting the bound returns
    /// [`CoreError::BrokerRetriesExhausted`] — fatal for the capture
    /// pipeline, irrelevant to the scan path.
    pub async fn connect(
        config: PublisherConfig,
        cancel: CancellationToken,
    ) -> Result<Self, CoreError> {
        let (state_tx, state_rx) = watch::channel(BrokerState::Disconnected);

        let mut last_error = String::new();
        for attempt in 1..=config.connect_retries {
            let _ = state_tx.send(BrokerState::Connecting { attempt });
            info!(
                host = %config.host,
                port = config.port,
                attempt,
                max = config.connect_retries,
                "connecting to MQTT broker"
            );

            let mut options = MqttOptions::new(&config.client_id, &config.host, config.port);
            options.set_keep_alive(config.keepalive);
            let (client, eventloop) = AsyncClient::new(options, 64);

            match tokio::time::timeout(CONNACK_TIMEOUT, wait_for_connack(eventloop)).await {
                Ok(Ok(eventloop)) => {
                    info!("connected to MQTT broker");
                    let _ = state_tx.send(BrokerState::Connected);
                    tokio::spawn(keepalive_loop(eventloop, state_tx, cancel.clone()));
                    return Ok(Self {
                        client,
                        state_rx,
                        cancel,
                    });
                }
                Ok(Err(reason)) => last_error = reason,
                Err(_) => last_error = "timed out waiting for broker acknowledgment".into(),
            }

            warn!(error = %last_error, attempt, "broker connect failed");
            if attempt < config.connect_retries {
                tokio::time::sleep(config.retry_delay).await;
            }
        }

        let _ = state_tx.send(BrokerState::Failed);
        Err(CoreError::BrokerRetriesExhausted {
            attempts: config.connect_retries,
            reason: last_error,
        })
    }

    /// Fire-and-forget publish at QoS 0.
    ///
    /// Never blocks on the broker; a full client queue is logged and the
    /// message dropped.
    pub fn publish(&self, topic: &str, payload: Vec<u8>) {
        if let Err(e) = self
            .client
            .try_publish(topic, QoS::AtMostOnce, false, payload)
        {
            warn!(error = %e, topic, "dropping message");
        }
    }

    /// Subscribe to connection state changes.
    pub fn state(&self) -> watch::Receiver<BrokerState> {
        self.state_rx.clone()
    }

    /// Signal the keep-alive loop to shut down.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

// ── Connection establishment ─────────────────────────────────────────

/// Poll the event loop until the broker acknowledges the session.
async fn wait_for_connack(mut eventloop: EventLoop) -> Result<EventLoop, String> {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => return Ok(eventloop),
            // Outgoing CONNECT and pings before the ack; keep polling.
            Ok(_) => {}
            Err(e) => return Err(e.to_string()),
        }
    }
}

// ── Background keep-alive loop ───────────────────────────────────────

/// Drives the client's I/O and pings until cancelled.
///
/// Transient disconnects are retried by the client on the next poll;
/// frames published meanwhile are dropped, which the delivery contract
/// allows.
async fn keepalive_loop(
    mut eventloop: EventLoop,
    state_tx: watch::Sender<BrokerState>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            event = eventloop.poll() => match event {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    debug!("broker session re-established");
                    let _ = state_tx.send(BrokerState::Connected);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "broker connection error, client will retry");
                    let _ = state_tx.send(BrokerState::Disconnected);
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }
        }
    }

    let _ = state_tx.send(BrokerState::Disconnected);
    debug!("keep-alive loop exiting");
}

// ── Tests ────────────────────────────────────────────────────────────
