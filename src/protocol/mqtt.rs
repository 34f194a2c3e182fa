// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT broker transport.
//!
//! # Examples
//!
//! ```no_run
//! use heater_control::protocol::MqttTransport;
//!
//! # async fn example() -> heater_control::Result<()> {
//! let (transport, mut incoming) = MqttTransport::builder()
//!     .host("192.168.1.50")
//!     .credentials("panel", "password")
//!     .build()
//!     .await?;
//!
//! while let Some(message) = incoming.recv().await {
//!     println!("{} -> {}", message.topic, message.payload);
//! }
//!
//! transport.disconnect().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS};
use tokio::sync::{mpsc, oneshot};

use super::{IncomingMessage, Transport};
use crate::command::{Command, Publication, StateCommand};
use crate::config::{BrokerConfig, DEFAULT_TOPIC_ROOT, TransportKind};
use crate::error::ProtocolError;

const REQUEST_CHANNEL_CAPACITY: usize = 10;
const INCOMING_CHANNEL_CAPACITY: usize = 64;

/// Settings for [`MqttTransport`].
#[derive(Debug, Clone)]
struct MqttTransportConfig {
    host: String,
    port: Option<u16>,
    transport: TransportKind,
    ws_path: String,
    credentials: Option<(String, String)>,
    client_id: Option<String>,
    topic_root: String,
    keep_alive: Duration,
    connection_timeout: Duration,
    reconnect_delay: Duration,
}

impl Default for MqttTransportConfig {
    fn default() -> Self {
        let broker = BrokerConfig::default();
        Self {
            host: String::new(),
            port: None,
            transport: broker.transport,
            ws_path: broker.ws_path.clone(),
            credentials: None,
            client_id: None,
            topic_root: DEFAULT_TOPIC_ROOT.to_string(),
            keep_alive: broker.keep_alive(),
            connection_timeout: broker.connection_timeout(),
            reconnect_delay: broker.reconnect_delay(),
        }
    }
}

impl MqttTransportConfig {
    fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.transport.default_port())
    }

    fn subscription(&self) -> String {
        format!("{}/#", self.topic_root)
    }

    fn options(&self, client_id: &str) -> Result<MqttOptions, ProtocolError> {
        let port = self.port();
        let mut options = match self.transport {
            TransportKind::Tcp | TransportKind::Tls => {
                MqttOptions::new(client_id, &self.host, port)
            }
            TransportKind::Ws | TransportKind::Wss => {
                let scheme = self.transport.as_str();
                let url = format!("{scheme}://{}:{port}{}", self.host, self.ws_path);
                MqttOptions::new(client_id, url, port)
            }
        };
        options.set_keep_alive(self.keep_alive);
        options.set_clean_session(true);

        if let Some((username, password)) = &self.credentials {
            options.set_credentials(username, password);
        }

        options.set_transport(network_transport(self.transport)?);
        Ok(options)
    }
}

fn network_transport(kind: TransportKind) -> Result<rumqttc::Transport, ProtocolError> {
    match kind {
        TransportKind::Tcp => Ok(rumqttc::Transport::Tcp),
        TransportKind::Tls => Ok(rumqttc::Transport::tls_with_default_config()),
        #[cfg(feature = "websocket")]
        TransportKind::Ws => Ok(rumqttc::Transport::Ws),
        #[cfg(feature = "websocket")]
        TransportKind::Wss => Ok(rumqttc::Transport::wss_with_default_config()),
        #[cfg(not(feature = "websocket"))]
        TransportKind::Ws | TransportKind::Wss => {
            Err(ProtocolError::UnsupportedTransport(kind.as_str().to_string()))
        }
    }
}

/// State shared between the transport handle and its event loop task.
struct Shared {
    client: AsyncClient,
    config: MqttTransportConfig,
    connected: AtomicBool,
    shutdown: AtomicBool,
}

/// Connection to the broker the heater listens on.
///
/// The transport subscribes to `<root>/#` and forwards every received
/// message to the channel returned by [`MqttTransportBuilder::build`].
/// After a connection loss it keeps retrying with a fixed delay, and on
/// every successful (re)connect it resubscribes and asks the heater for a
/// fresh state report.
///
/// `MqttTransport` is cheaply cloneable and all clones share one
/// connection.
#[derive(Clone)]
pub struct MqttTransport {
    shared: Arc<Shared>,
}

impl MqttTransport {
    /// Creates a builder.
    #[must_use]
    pub fn builder() -> MqttTransportBuilder {
        MqttTransportBuilder::default()
    }

    /// Returns whether the broker connection is currently up.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::Acquire)
    }

    /// Returns the broker host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.shared.config.host
    }

    /// Returns the broker port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.shared.config.port()
    }

    /// Returns the topic root.
    #[must_use]
    pub fn topic_root(&self) -> &str {
        &self.shared.config.topic_root
    }

    /// Closes the connection and stops reconnecting.
    ///
    /// # Errors
    ///
    /// Returns error if the disconnect request cannot be queued.
    pub async fn disconnect(&self) -> Result<(), ProtocolError> {
        tracing::info!(
            host = %self.shared.config.host,
            port = %self.shared.config.port(),
            "Disconnecting from MQTT broker"
        );
        self.shared.shutdown.store(true, Ordering::Release);
        self.shared
            .client
            .disconnect()
            .await
            .map_err(ProtocolError::Mqtt)?;
        self.shared.connected.store(false, Ordering::Release);
        Ok(())
    }
}

impl Transport for MqttTransport {
    async fn publish(&self, publication: Publication) -> Result<(), ProtocolError> {
        tracing::debug!(
            topic = %publication.topic,
            payload = ?publication.payload,
            "Publishing MQTT command"
        );
        self.shared
            .client
            .publish(publication.topic, QoS::AtLeastOnce, false, publication.payload)
            .await
            .map_err(ProtocolError::Mqtt)
    }
}

impl std::fmt::Debug for MqttTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MqttTransport")
            .field("host", &self.shared.config.host)
            .field("port", &self.shared.config.port())
            .field("transport", &self.shared.config.transport)
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Builder for [`MqttTransport`].
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use heater_control::config::TransportKind;
/// use heater_control::protocol::MqttTransport;
///
/// # async fn example() -> heater_control::Result<()> {
/// let (transport, incoming) = MqttTransport::builder()
///     .host("broker.example.net")
///     .transport(TransportKind::Tls)
///     .topic_root("boiler")
///     .keep_alive(Duration::from_secs(30))
///     .reconnect_delay(Duration::from_secs(2))
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MqttTransportBuilder {
    config: MqttTransportConfig,
}

impl MqttTransportBuilder {
    /// Takes every broker setting from a configuration section.
    #[must_use]
    pub fn from_config(broker: &BrokerConfig, topic_root: impl Into<String>) -> Self {
        let credentials = match (&broker.username, &broker.password) {
            (Some(username), password) => Some((
                username.clone(),
                password.clone().unwrap_or_default(),
            )),
            (None, _) => None,
        };
        Self {
            config: MqttTransportConfig {
                host: broker.host.clone(),
                port: broker.port,
                transport: broker.transport,
                ws_path: broker.ws_path.clone(),
                credentials,
                client_id: broker.client_id.clone(),
                topic_root: topic_root.into(),
                keep_alive: broker.keep_alive(),
                connection_timeout: broker.connection_timeout(),
                reconnect_delay: broker.reconnect_delay(),
            },
        }
    }

    /// Sets the broker host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Sets the broker port (default: the transport's standard port).
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = Some(port);
        self
    }

    /// Sets the network transport (default: TCP).
    #[must_use]
    pub fn transport(mut self, transport: TransportKind) -> Self {
        self.config.transport = transport;
        self
    }

    /// Sets the WebSocket request path (default: `/mqtt`).
    #[must_use]
    pub fn ws_path(mut self, path: impl Into<String>) -> Self {
        self.config.ws_path = path.into();
        self
    }

    /// Sets authentication credentials.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the client id (default: `heater_ui_<uuid>`).
    #[must_use]
    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.config.client_id = Some(id.into());
        self
    }

    /// Sets the topic root (default: `heater`).
    #[must_use]
    pub fn topic_root(mut self, root: impl Into<String>) -> Self {
        self.config.topic_root = root.into();
        self
    }

    /// Sets the keep-alive interval (default: 10 seconds).
    #[must_use]
    pub fn keep_alive(mut self, duration: Duration) -> Self {
        self.config.keep_alive = duration;
        self
    }

    /// Sets how long to wait for the first connection (default: 10 seconds).
    #[must_use]
    pub fn connection_timeout(mut self, duration: Duration) -> Self {
        self.config.connection_timeout = duration;
        self
    }

    /// Sets the delay between reconnect attempts (default: 1 second).
    #[must_use]
    pub fn reconnect_delay(mut self, duration: Duration) -> Self {
        self.config.reconnect_delay = duration;
        self
    }

    /// Connects to the broker.
    ///
    /// Returns the transport and the receiver of incoming messages.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Host is not set
    /// - The transport is not compiled in
    /// - No connection acknowledgement arrives within the timeout
    pub async fn build(
        self,
    ) -> Result<(MqttTransport, mpsc::Receiver<IncomingMessage>), ProtocolError> {
        if self.config.host.is_empty() {
            return Err(ProtocolError::InvalidAddress(
                "MQTT broker host is required".to_string(),
            ));
        }

        let client_id = self
            .config
            .client_id
            .clone()
            .unwrap_or_else(|| format!("heater_ui_{}", uuid::Uuid::new_v4().simple()));
        let options = self.config.options(&client_id)?;
        let (client, event_loop) = AsyncClient::new(options, REQUEST_CHANNEL_CAPACITY);

        let shared = Arc::new(Shared {
            client,
            config: self.config,
            connected: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
        });

        let (incoming_tx, incoming_rx) = mpsc::channel(INCOMING_CHANNEL_CAPACITY);
        let (connack_tx, connack_rx) = oneshot::channel();

        tokio::spawn(handle_events(
            event_loop,
            Arc::clone(&shared),
            incoming_tx,
            connack_tx,
        ));

        let timeout = shared.config.connection_timeout;
        match tokio::time::timeout(timeout, connack_rx).await {
            Ok(Ok(())) => {
                tracing::info!(
                    host = %shared.config.host,
                    port = %shared.config.port(),
                    client_id = %client_id,
                    "Connected to MQTT broker"
                );
            }
            Ok(Err(_)) => {
                return Err(ProtocolError::ConnectionFailed(
                    "MQTT event loop terminated unexpectedly".to_string(),
                ));
            }
            Err(_) => {
                shared.shutdown.store(true, Ordering::Release);
                return Err(ProtocolError::ConnectionFailed(format!(
                    "MQTT connection timeout after {}s",
                    timeout.as_secs()
                )));
            }
        }

        Ok((MqttTransport { shared }, incoming_rx))
    }
}

/// Runs the event loop until the transport shuts down.
async fn handle_events(
    mut event_loop: EventLoop,
    shared: Arc<Shared>,
    incoming_tx: mpsc::Sender<IncomingMessage>,
    connack_tx: oneshot::Sender<()>,
) {
    let mut connack_tx = Some(connack_tx);

    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                tracing::debug!(?connack, "MQTT broker connected");
                shared.connected.store(true, Ordering::Release);
                on_connected(&shared);
                if let Some(tx) = connack_tx.take() {
                    let _ = tx.send(());
                }
            }
            Ok(Event::Incoming(Packet::SubAck(suback))) => {
                tracing::debug!(?suback, "MQTT subscription acknowledged");
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let message = IncomingMessage {
                    topic: publish.topic.clone(),
                    payload: String::from_utf8_lossy(&publish.payload).into_owned(),
                };
                tracing::debug!(
                    topic = %message.topic,
                    payload = %message.payload,
                    "MQTT message received"
                );
                if incoming_tx.send(message).await.is_err() {
                    tracing::trace!("Incoming message receiver dropped");
                }
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                if shared.shutdown.load(Ordering::Acquire) {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => {
                shared.connected.store(false, Ordering::Release);
                if shared.shutdown.load(Ordering::Acquire) {
                    tracing::debug!(error = %e, "MQTT event loop stopped");
                    break;
                }
                tracing::warn!(
                    error = %e,
                    retry_in_ms = shared.config.reconnect_delay.as_millis(),
                    "MQTT connection lost, retrying"
                );
                tokio::time::sleep(shared.config.reconnect_delay).await;
            }
        }
    }
}

/// Resubscribes and requests a state report after each ConnAck.
///
/// Uses the non-blocking client calls because the request queue is drained
/// by this very event loop.
fn on_connected(shared: &Shared) {
    let subscription = shared.config.subscription();
    if let Err(e) = shared.client.try_subscribe(&subscription, QoS::AtLeastOnce) {
        tracing::warn!(topic = %subscription, error = %e, "Failed to subscribe");
    } else {
        tracing::debug!(topic = %subscription, "Subscribed to heater topics");
    }

    let update = StateCommand::Update;
    if let Err(e) = shared
        .client
        .try_publish(update.topic(), QoS::AtLeastOnce, false, update.payload())
    {
        tracing::warn!(error = %e, "Failed to request state update");
    }
}
