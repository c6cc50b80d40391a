//! Bus-to-WebSocket bridge.
//!
//! Subscribes to the frame topic and fans payloads out to a broadcast
//! channel that `/ws/live` connections tap. Runs until cancelled; broker
//! outages are ridden out by the client's own reconnect, and the
//! subscription is re-issued on every session acknowledgment.

use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use airscope_config::BrokerConfig;
use airscope_core::FRAME_TOPIC;

const CHANNEL_CAPACITY: usize = 1024;

/// Spawn the bridge task and return the channel WebSocket handlers
/// subscribe to.
pub fn spawn_bridge(config: BrokerConfig, cancel: CancellationToken) -> broadcast::Sender<String> {
    let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
    let task_tx = tx.clone();
    tokio::spawn(async move {
        bridge_loop(config, task_tx, cancel).await;
    });
    tx
}

async fn bridge_loop(
    config: BrokerConfig,
    tx: broadcast::Sender<String>,
    cancel: CancellationToken,
) {
    // Distinct client id -- the sniffer may share the broker.
    let client_id = format!("{}-bridge", config.client_id);
    let mut options = MqttOptions::new(client_id, &config.host, config.port);
    options.set_keep_alive(config.keepalive());

    let (client, mut eventloop) = AsyncClient::new(options, 64);
    info!(topic = FRAME_TOPIC, host = %config.host, "bridge starting");

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            event = eventloop.poll() => match event {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    debug!("bridge session established, subscribing");
                    if let Err(e) = client.try_subscribe(FRAME_TOPIC, QoS::AtMostOnce) {
                        warn!(error = %e, "bridge subscribe failed");
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    match String::from_utf8(publish.payload.to_vec()) {
                        // No live subscribers is fine.
                        Ok(payload) => {
                            let _ = tx.send(payload);
                        }
                        Err(e) => debug!(error = %e, "non-utf8 frame payload dropped"),
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "bridge connection error, retrying");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }
        }
    }

    debug!("bridge loop exiting");
}
