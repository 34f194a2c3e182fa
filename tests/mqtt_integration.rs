// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the MQTT transport using mockforge-mqtt.

#![cfg(feature = "mqtt")]

use std::time::Duration;

use heater_control::command::{ActivateCommand, ImmediateCommand, Publication, SetStartCommand};
use heater_control::config::ClientConfig;
use heater_control::protocol::{IncomingMessage, MqttTransport, MqttTransportBuilder, Transport};
use heater_control::types::ActivationState;
use heater_control::{HeaterController, PanelLayout, ProgramId, ProtocolError};
use mockforge_mqtt::broker::MqttConfig;
use mockforge_mqtt::start_mqtt_server;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

/// Helper to find an available port for testing.
fn get_test_port() -> u16 {
    use std::sync::atomic::{AtomicU16, Ordering};
    static PORT_COUNTER: AtomicU16 = AtomicU16::new(18950);
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Starts a mock MQTT broker on the given port.
async fn start_mock_broker(port: u16) {
    let config = MqttConfig {
        port,
        host: "127.0.0.1".to_string(),
        ..Default::default()
    };

    tokio::spawn(async move {
        let _ = start_mqtt_server(config).await;
    });

    sleep(Duration::from_millis(500)).await;
}

async fn connect(port: u16) -> MqttTransport {
    let (transport, _incoming) = MqttTransport::builder()
        .host("127.0.0.1")
        .port(port)
        .build()
        .await
        .expect("connect to mock broker");
    transport
}

/// Waits for the next message on `topic`, skipping everything else.
async fn next_on(
    incoming: &mut mpsc::Receiver<IncomingMessage>,
    topic: &str,
) -> Option<IncomingMessage> {
    timeout(Duration::from_secs(3), async {
        while let Some(message) = incoming.recv().await {
            if message.topic == topic {
                return Some(message);
            }
        }
        None
    })
    .await
    .ok()
    .flatten()
}

/// Drops whatever has arrived so far.
async fn drain(incoming: &mut mpsc::Receiver<IncomingMessage>) {
    sleep(Duration::from_millis(300)).await;
    while incoming.try_recv().is_ok() {}
}

mod connection {
    use super::*;

    #[tokio::test]
    async fn connect_to_broker() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let transport = connect(port).await;
        assert!(transport.is_connected());
        assert_eq!(transport.host(), "127.0.0.1");
        assert_eq!(transport.port(), port);
        assert_eq!(transport.topic_root(), "heater");
    }

    #[tokio::test]
    async fn connect_from_config() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let config = ClientConfig::from_json(&format!(
            r#"{{"broker":{{"host":"127.0.0.1","port":{port},"client_id":"panel_test"}},"topic_root":"boiler"}}"#
        ))
        .unwrap();

        let (transport, _incoming) =
            MqttTransportBuilder::from_config(&config.broker, config.topic_root.clone())
                .build()
                .await
                .unwrap();
        assert!(transport.is_connected());
        assert_eq!(transport.topic_root(), "boiler");
    }

    #[tokio::test]
    async fn unreachable_broker_times_out() {
        let port = get_test_port();

        let result = MqttTransport::builder()
            .host("127.0.0.1")
            .port(port)
            .connection_timeout(Duration::from_millis(300))
            .reconnect_delay(Duration::from_millis(50))
            .build()
            .await;

        assert!(matches!(result, Err(ProtocolError::ConnectionFailed(_))));
    }

    #[tokio::test]
    async fn disconnect_marks_transport_down() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let transport = connect(port).await;
        transport.disconnect().await.unwrap();
        assert!(!transport.is_connected());
    }

    #[cfg(not(feature = "websocket"))]
    #[tokio::test]
    async fn websocket_needs_feature() {
        let result = MqttTransport::builder()
            .host("127.0.0.1")
            .transport(heater_control::config::TransportKind::Wss)
            .build()
            .await;

        assert!(matches!(result, Err(ProtocolError::UnsupportedTransport(_))));
    }
}

mod publishing {
    use super::*;

    #[tokio::test]
    async fn connect_requests_state_update() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let (_observer, mut observed) = MqttTransport::builder()
            .host("127.0.0.1")
            .port(port)
            .client_id("observer")
            .build()
            .await
            .unwrap();
        drain(&mut observed).await;

        let _panel = connect(port).await;

        let request = next_on(&mut observed, "heater/command/state")
            .await
            .expect("state update request after connect");
        assert_eq!(request.payload, "update");
    }

    #[tokio::test]
    async fn connect_subscribes_topic_root() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let (_panel, mut incoming) = MqttTransport::builder()
            .host("127.0.0.1")
            .port(port)
            .topic_root("boiler")
            .build()
            .await
            .unwrap();
        let (device, _device_incoming) = MqttTransport::builder()
            .host("127.0.0.1")
            .port(port)
            .client_id("device")
            .topic_root("device")
            .build()
            .await
            .unwrap();
        sleep(Duration::from_millis(200)).await;

        device
            .publish(Publication::new("boiler/status/temp", "51"))
            .await
            .unwrap();

        let message = next_on(&mut incoming, "boiler/status/temp")
            .await
            .expect("status message under the topic root");
        assert_eq!(message.payload, "51");
    }

    #[tokio::test]
    async fn commands_are_accepted() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let transport = connect(port).await;
        let program = ProgramId::new(1).unwrap();

        transport
            .send_command(&SetStartCommand::from_raw(1, 6, 30).unwrap())
            .await
            .unwrap();
        transport
            .send_command(&ActivateCommand::new(program, ActivationState::Active))
            .await
            .unwrap();
        transport
            .send_command(&ImmediateCommand::Stop)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn controller_over_mqtt() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let (transport, incoming) = MqttTransport::builder()
            .host("127.0.0.1")
            .port(port)
            .build()
            .await
            .unwrap();

        let controller = HeaterController::builder(transport)
            .layout(PanelLayout::classic())
            .build()
            .unwrap();
        let runner = tokio::spawn({
            let controller = controller.clone();
            async move { controller.run(incoming).await }
        });

        controller
            .activation_selected(ProgramId::new(2).unwrap(), ActivationState::Once)
            .await
            .unwrap();
        controller.request_state_update().await.unwrap();

        controller.transport().disconnect().await.unwrap();
        runner.abort();
    }
}
