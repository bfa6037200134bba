//! MQTT broker client wrapper.
//!
//! All protocol work (TLS handshake, framing, keepalive, reconnection) is
//! delegated to rumqttc. This module owns the client handle and its event
//! loop task and exposes a narrow [`CommandPublisher`] seam so handlers and
//! tests never touch the library directly. Sends are QoS 0, at-most-once;
//! there is no retry and no acknowledgement wait here.

use std::time::Duration;

use async_trait::async_trait;
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS, TlsConfiguration, Transport};
use thiserror::Error;
use tracing::{debug, error, info};

/// Broker connection settings.
#[derive(Debug, Clone)]
pub struct MqttConfig {
    /// Broker endpoint (e.g., an AWS IoT endpoint).
    pub broker_host: String,
    /// 8883 for plain MQTT-over-TLS, 443 with ALPN on AWS IoT.
    pub broker_port: u16,
    pub client_id: String,
    pub keep_alive_secs: u64,
    /// PEM paths for mutual TLS. All three must be set to enable TLS.
    pub ca_cert_path: Option<String>,
    pub client_cert_path: Option<String>,
    pub client_key_path: Option<String>,
    /// ALPN protocol name, e.g. "x-amzn-mqtt-ca" when using port 443.
    pub alpn: Option<String>,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "gate-central".to_string(),
            keep_alive_secs: 60,
            ca_cert_path: None,
            client_cert_path: None,
            client_key_path: None,
            alpn: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum MqttError {
    #[error("MQTT configuration error: {0}")]
    Config(String),
    #[error("MQTT publish error: {0}")]
    Publish(String),
}

/// Outbound seam for gate control messages.
#[async_trait]
pub trait CommandPublisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), MqttError>;
}

/// rumqttc-backed publisher. One instance per process, built at startup and
/// shared with request handlers.
pub struct MqttPublisher {
    client: AsyncClient,
}

impl MqttPublisher {
    /// Build the client and spawn its event loop. The connection itself is
    /// established lazily by the loop and re-established after errors.
    pub fn connect(config: &MqttConfig) -> Result<Self, MqttError> {
        let mut options = MqttOptions::new(
            config.client_id.clone(),
            config.broker_host.clone(),
            config.broker_port,
        );
        options.set_keep_alive(Duration::from_secs(config.keep_alive_secs));

        if let (Some(ca_path), Some(cert_path), Some(key_path)) = (
            &config.ca_cert_path,
            &config.client_cert_path,
            &config.client_key_path,
        ) {
            let ca = std::fs::read(ca_path)
                .map_err(|e| MqttError::Config(format!("Failed to read CA cert: {}", e)))?;
            let client_cert = std::fs::read(cert_path)
                .map_err(|e| MqttError::Config(format!("Failed to read client cert: {}", e)))?;
            let client_key = std::fs::read(key_path)
                .map_err(|e| MqttError::Config(format!("Failed to read client key: {}", e)))?;

            let alpn = config
                .alpn
                .as_ref()
                .map(|proto| vec![proto.as_bytes().to_vec()]);

            options.set_transport(Transport::Tls(TlsConfiguration::Simple {
                ca,
                alpn,
                client_auth: Some((client_cert, client_key)),
            }));
        }

        let (client, mut eventloop) = AsyncClient::new(options, 16);

        // Owned event loop; rumqttc handles reconnection, we just keep polling.
        tokio::spawn(async move {
            loop {
                match eventloop.poll().await {
                    Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                        info!("Connected to MQTT broker: {:?}", ack.code);
                    }
                    Ok(event) => {
                        debug!("MQTT event: {:?}", event);
                    }
                    Err(e) => {
                        error!("MQTT connection error: {}", e);
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                }
            }
        });

        Ok(Self { client })
    }
}

#[async_trait]
impl CommandPublisher for MqttPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), MqttError> {
        self.client
            .publish(topic, QoS::AtMostOnce, false, payload.as_bytes().to_vec())
            .await
            .map_err(|e| MqttError::Publish(e.to_string()))
    }
}
