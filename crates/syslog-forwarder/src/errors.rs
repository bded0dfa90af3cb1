// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use crate::config::Protocol;

/// Errors that can occur while configuring or running the forwarder
#[derive(Debug, thiserror::Error)]
pub enum ForwarderError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid server address: {0}")]
    InvalidAddress(String),

    #[error("Failed to connect UDP socket: {0}")]
    Connect(#[source] std::io::Error),

    #[error("Protocol {0} is not supported")]
    UnsupportedProtocol(Protocol),

    #[error("Failed to read watch directory {path}: {source}")]
    WatchDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Shutdown timeout exceeded")]
    ShutdownTimeout,

    #[error("Worker task failed: {0}")]
    WorkerPanicked(String),
}

/// Returned by [`crate::ring_buffer::RingBuffer::append`] when no slot is free. Hands the
/// rejected line back to the caller.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("ring buffer is full")]
pub struct BufferFull(pub String);

/// The cancellation token fired while waiting on the ring buffer.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("operation cancelled")]
pub struct Cancelled;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ForwarderError::InvalidConfig("facility out of range".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid configuration: facility out of range"
        );
    }

    #[test]
    fn test_unsupported_protocol_display() {
        let error = ForwarderError::UnsupportedProtocol(Protocol::Tcp);
        assert_eq!(error.to_string(), "Protocol tcp is not supported");
    }

    #[test]
    fn test_watch_dir_display_includes_path() {
        let error = ForwarderError::WatchDir {
            path: PathBuf::from("/var/log/missing"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(error.to_string().contains("/var/log/missing"));
    }

    #[test]
    fn test_buffer_full_returns_line() {
        let BufferFull(line) = BufferFull("kept".to_string());
        assert_eq!(line, "kept");
    }
}
