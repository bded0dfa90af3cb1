// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! One-shot mode: send a whole file once, without the ring buffer or worker tasks.

use std::path::Path;

use tracing::{debug, warn};

use crate::config::SyslogConfig;
use crate::errors::ForwarderError;
use crate::framer::{frame_message, Clock};
use crate::transport::Transport;
use crate::util::split_lines;

/// Sends every non-empty line of `path` as one datagram and returns the number of failed writes.
///
/// All lines share a single timestamp taken before the first send.
///
/// # Errors
///
/// Returns [`ForwarderError::ReadFile`] if the file cannot be read. Failed sends are counted,
/// not reported as errors.
pub async fn send_file(
    path: &Path,
    config: &SyslogConfig,
    transport: &dyn Transport,
    clock: &dyn Clock,
) -> Result<u64, ForwarderError> {
    let content = tokio::fs::read(path)
        .await
        .map_err(|source| ForwarderError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

    let pri = config.pri();
    let timestamp = clock.syslog_timestamp();
    let mut sent = 0u64;
    let mut failed = 0u64;

    for line in split_lines(&content) {
        let message = frame_message(pri, &timestamp, &config.sender_id, &line);
        match transport.send(message.as_bytes()).await {
            Ok(_) => sent += 1,
            Err(e) => {
                warn!("Failed to send line of {}: {}", path.display(), e);
                failed += 1;
            }
        }
    }

    debug!(
        "Sent {} lines of {}, {} failed",
        sent,
        path.display(),
        failed
    );
    Ok(failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framer::FixedClock;
    use crate::test_support::RecordingTransport;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_send_file_counts_failures() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("three.log");
        std::fs::write(&path, "one\ntwo\nthree\n").unwrap();

        let transport = RecordingTransport::failing_on(&[1]);
        let clock = FixedClock("Jan 01 00:00:00".to_string());
        let failed = send_file(&path, &SyslogConfig::default(), &transport, &clock)
            .await
            .unwrap();

        assert_eq!(failed, 1);
        assert_eq!(
            transport.sent(),
            vec![
                "<8>Jan 01 00:00:00 admin one".to_string(),
                "<8>Jan 01 00:00:00 admin three".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_send_file_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blank.log");
        std::fs::write(&path, "\na\n\nb").unwrap();

        let transport = RecordingTransport::new();
        let clock = FixedClock("Jan 01 00:00:00".to_string());
        let failed = send_file(&path, &SyslogConfig::default(), &transport, &clock)
            .await
            .unwrap();

        assert_eq!(failed, 0);
        assert_eq!(transport.attempts(), 2);
    }

    #[tokio::test]
    async fn test_send_file_missing_file() {
        let dir = TempDir::new().unwrap();
        let transport = RecordingTransport::new();
        let clock = FixedClock("Jan 01 00:00:00".to_string());

        let result = send_file(
            &dir.path().join("absent.log"),
            &SyslogConfig::default(),
            &transport,
            &clock,
        )
        .await;

        assert!(matches!(result, Err(ForwarderError::ReadFile { .. })));
        assert_eq!(transport.attempts(), 0);
    }
}
