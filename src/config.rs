// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client configuration file.
//!
//! Configuration is a JSON document. Every field has a default, so a file
//! only needs to name what differs:
//!
//! ```json
//! {
//!   "broker": {
//!     "host": "broker.example.net",
//!     "transport": "wss",
//!     "username": "panel",
//!     "password": "secret"
//!   },
//!   "panel": { "layout": "classic", "locale": "he" }
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::panel::{Locale, PanelLayout};

/// Default MQTT topic root.
pub const DEFAULT_TOPIC_ROOT: &str = "heater";

/// How the client reaches the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Plain TCP.
    #[default]
    Tcp,
    /// TCP with TLS.
    Tls,
    /// MQTT over WebSocket.
    Ws,
    /// MQTT over secure WebSocket.
    Wss,
}

impl TransportKind {
    /// Port used when the configuration names none.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Tcp => 1883,
            Self::Tls => 8883,
            Self::Ws => 8000,
            Self::Wss => 8884,
        }
    }

    /// Returns `true` for the WebSocket variants.
    #[must_use]
    pub const fn is_websocket(self) -> bool {
        matches!(self, Self::Ws | Self::Wss)
    }

    /// Returns the lowercase name used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Tls => "tls",
            Self::Ws => "ws",
            Self::Wss => "wss",
        }
    }
}

/// Broker connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Broker host name or address.
    pub host: String,
    /// Broker port; the transport's default when absent.
    pub port: Option<u16>,
    /// Transport to use.
    pub transport: TransportKind,
    /// Request path for WebSocket transports.
    pub ws_path: String,
    /// Username for broker authentication.
    pub username: Option<String>,
    /// Password for broker authentication.
    pub password: Option<String>,
    /// Client id; a random `heater_ui_<uuid>` id when absent.
    pub client_id: Option<String>,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u64,
    /// Delay between reconnect attempts in milliseconds.
    pub reconnect_delay_ms: u64,
    /// How long to wait for the first connection acknowledgement, in seconds.
    pub connection_timeout_secs: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: None,
            transport: TransportKind::default(),
            ws_path: "/mqtt".to_string(),
            username: None,
            password: None,
            client_id: None,
            keep_alive_secs: 10,
            reconnect_delay_ms: 1000,
            connection_timeout_secs: 10,
        }
    }
}

impl BrokerConfig {
    /// Returns the configured or default port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.transport.default_port())
    }

    /// Returns the keep-alive interval.
    #[must_use]
    pub const fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }

    /// Returns the reconnect delay.
    #[must_use]
    pub const fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    /// Returns the initial connection timeout.
    #[must_use]
    pub const fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }
}

/// Panel layout preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutPreset {
    /// Dial gauge, no target marker.
    Classic,
    /// Bar gauge with target marker.
    #[default]
    Modern,
}

/// Panel settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Layout preset.
    pub layout: LayoutPreset,
    /// Number of scheduled programs; the preset's count when absent.
    pub program_count: Option<u8>,
    /// Event log language.
    pub locale: Locale,
}

/// Complete client configuration.
///
/// # Examples
///
/// ```
/// use heater_control::config::{ClientConfig, TransportKind};
///
/// let config = ClientConfig::from_json(r#"{"broker":{"host":"10.0.0.2","transport":"tls"}}"#).unwrap();
/// assert_eq!(config.broker.port(), 8883);
/// assert_eq!(config.broker.transport, TransportKind::Tls);
/// assert_eq!(config.topic_root, "heater");
/// assert_eq!(config.debounce_ms, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Broker connection.
    pub broker: BrokerConfig,
    /// Topic root the device publishes status under.
    pub topic_root: String,
    /// Panel appearance.
    pub panel: PanelConfig,
    /// Debounce quiet period in milliseconds.
    pub debounce_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            broker: BrokerConfig::default(),
            topic_root: DEFAULT_TOPIC_ROOT.to_string(),
            panel: PanelConfig::default(),
            debounce_ms: 1000,
        }
    }
}

impl ClientConfig {
    /// Reads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, and the errors
    /// of [`from_json`](Self::from_json) otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), host = %config.broker.host, "Configuration loaded");
        Ok(config)
    }

    /// Parses and validates a configuration document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` for malformed JSON and
    /// `ConfigError::Invalid` when [`validate`](Self::validate) fails.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value constraints serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.broker.host.trim().is_empty() {
            return Err(invalid("broker.host", "must not be empty"));
        }
        if self.broker.port == Some(0) {
            return Err(invalid("broker.port", "must not be zero"));
        }
        if self.topic_root.is_empty() || self.topic_root.contains(['/', '#', '+']) {
            return Err(invalid(
                "topic_root",
                "must be a single non-empty topic segment",
            ));
        }
        if self.broker.transport.is_websocket() && !self.broker.ws_path.starts_with('/') {
            return Err(invalid("broker.ws_path", "must start with '/'"));
        }
        if let Some(count) = self.panel.program_count {
            if count == 0 {
                return Err(invalid("panel.program_count", "must be at least 1"));
            }
            if count > PanelLayout::MAX_PROGRAMS {
                return Err(invalid(
                    "panel.program_count",
                    format!("must be at most {}", PanelLayout::MAX_PROGRAMS),
                ));
            }
        }
        Ok(())
    }

    /// Returns the panel layout described by the `panel` section.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the program count does not fit.
    pub fn panel_layout(&self) -> Result<PanelLayout, ConfigError> {
        let layout = match self.panel.layout {
            LayoutPreset::Classic => PanelLayout::classic(),
            LayoutPreset::Modern => PanelLayout::modern(),
        };
        match self.panel.program_count {
            Some(count) => layout
                .with_program_count(count)
                .map_err(|e| invalid("panel.program_count", e.to_string())),
            None => Ok(layout),
        }
    }

    /// Returns the debounce quiet period.
    #[must_use]
    pub const fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn invalid(field: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::GaugeStyle;

    #[test]
    fn empty_document_uses_defaults() {
        let config = ClientConfig::from_json("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.broker.port(), 1883);
        assert_eq!(config.broker.keep_alive(), Duration::from_secs(10));
        assert_eq!(config.broker.reconnect_delay(), Duration::from_secs(1));
        assert_eq!(config.debounce_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn full_document() {
        let json = r#"{
            "broker": {
                "host": "broker.example.net",
                "port": 9001,
                "transport": "wss",
                "ws_path": "/ws",
                "username": "panel",
                "password": "pw",
                "client_id": "kitchen",
                "keep_alive_secs": 30,
                "reconnect_delay_ms": 2500
            },
            "topic_root": "boiler",
            "panel": {"layout": "classic", "program_count": 4, "locale": "he"},
            "debounce_ms": 300
        }"#;
        let config = ClientConfig::from_json(json).unwrap();

        assert_eq!(config.broker.port(), 9001);
        assert_eq!(config.broker.transport, TransportKind::Wss);
        assert_eq!(config.broker.username.as_deref(), Some("panel"));
        assert_eq!(config.broker.reconnect_delay(), Duration::from_millis(2500));
        assert_eq!(config.topic_root, "boiler");
        assert_eq!(config.panel.locale, Locale::Hebrew);
        assert_eq!(config.debounce_delay(), Duration::from_millis(300));

        let layout = config.panel_layout().unwrap();
        assert_eq!(layout.program_count(), 4);
        assert_eq!(layout.gauge(), GaugeStyle::Dial);
    }

    #[test]
    fn default_ports_follow_transport() {
        assert_eq!(TransportKind::Tcp.default_port(), 1883);
        assert_eq!(TransportKind::Tls.default_port(), 8883);
        assert_eq!(TransportKind::Wss.default_port(), 8884);
        assert!(TransportKind::Ws.is_websocket());
        assert!(!TransportKind::Tls.is_websocket());
    }

    #[test]
    fn validation_failures() {
        let cases = [
            (r#"{"broker":{"host":" "}}"#, "broker.host"),
            (r#"{"broker":{"port":0}}"#, "broker.port"),
            (r#"{"topic_root":"a/b"}"#, "topic_root"),
            (r#"{"topic_root":""}"#, "topic_root"),
            (r#"{"broker":{"transport":"ws","ws_path":"mqtt"}}"#, "broker.ws_path"),
            (r#"{"panel":{"program_count":0}}"#, "panel.program_count"),
            (r#"{"panel":{"program_count":255}}"#, "panel.program_count"),
        ];
        for (json, expected) in cases {
            match ClientConfig::from_json(json) {
                Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected, "{json}"),
                other => panic!("expected invalid {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            ClientConfig::from_json("{\"broker\":"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            ClientConfig::from_json(r#"{"broker":{"transport":"udp"}}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn load_missing_file() {
        let err = ClientConfig::load("/nonexistent/heater.json").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Io { ref path, .. } if path == "/nonexistent/heater.json"
        ));
    }

    #[test]
    fn load_file_from_disk() {
        let path =
            std::env::temp_dir().join(format!("heater_config_{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"{"debounce_ms": 50}"#).unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.debounce_ms, 50);

        std::fs::remove_file(&path).unwrap();
    }
}
