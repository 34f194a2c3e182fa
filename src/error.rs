// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the heater control library.
//!
//! This module provides the error hierarchy for the library: value
//! validation, transport communication, status payload parsing, and
//! configuration loading.

use thiserror::Error;

use crate::status::StatusKind;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during transport communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a status payload.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred while loading or validating configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The program id does not exist on the configured panel layout.
    #[error("program {0} does not exist on this panel")]
    UnknownProgram(u8),

    /// A status router was built without a handler for this kind.
    #[error("no handler registered for status kind `{0}`")]
    UnhandledStatusKind(StatusKind),

    /// The operation needs a Tokio runtime and none is running.
    #[error("no Tokio runtime available")]
    NoRuntime,
}

/// Errors related to value validation and constraints.
///
/// These errors occur when user input or device values cannot be
/// represented by the constrained wire types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// Text that should hold a number does not.
    #[error("not a number: {0:?}")]
    InvalidNumber(String),

    /// Text that should hold a clock time does not.
    #[error("invalid time: {0:?}")]
    InvalidTime(String),

    /// An activation state code is not one of 1, 2 or 3.
    #[error("invalid activation state code: {0}")]
    InvalidActivationCode(u8),

    /// An activation state name is not recognised.
    #[error("invalid activation state: {0:?}")]
    InvalidActivationState(String),
}

/// Errors related to the MQTT transport.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// MQTT connection or communication failed.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// Connection to the broker failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid broker address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The requested transport is not compiled in.
    #[error("transport `{0}` is not supported by this build")]
    UnsupportedTransport(String),

    /// Internal channel was closed.
    #[error("channel closed: {0}")]
    ChannelClosed(String),
}

/// Errors related to parsing incoming status payloads.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the payload.
    #[error("missing field in payload: {0}")]
    MissingField(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// Errors related to loading client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the configuration file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`ClientConfig`](crate::ClientConfig).
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value is not acceptable.
    #[error("invalid configuration value for {field}: {message}")]
    Invalid {
        /// The offending field.
        field: &'static str,
        /// Why it was rejected.
        message: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
