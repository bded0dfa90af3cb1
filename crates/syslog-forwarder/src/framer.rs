// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Syslog message framing: `<PRI>TIMESTAMP SENDER_ID MESSAGE`.

use std::fmt::Debug;

use crate::constants::SYSLOG_TIME_FORMAT;

/// Source of the timestamp stamped on every message.
pub trait Clock: Debug + Send + Sync {
    /// Current time formatted as `Mon DD HH:MM:SS`.
    fn syslog_timestamp(&self) -> String;
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn syslog_timestamp(&self) -> String {
        chrono::Local::now().format(SYSLOG_TIME_FORMAT).to_string()
    }
}

/// Always returns the same timestamp.
#[derive(Debug, Clone)]
pub struct FixedClock(pub String);

impl Clock for FixedClock {
    fn syslog_timestamp(&self) -> String {
        self.0.clone()
    }
}

/// Builds one syslog line. No trailing newline is added.
#[must_use]
pub fn frame_message(pri: u8, timestamp: &str, sender_id: &str, line: &str) -> String {
    format!("<{pri}>{timestamp} {sender_id} {line}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_message() {
        assert_eq!(
            frame_message(8, "Jan 01 00:00:00", "admin", "hello"),
            "<8>Jan 01 00:00:00 admin hello"
        );
    }

    #[test]
    fn test_frame_message_keeps_line_verbatim() {
        let framed = frame_message(191, "Dec 31 23:59:59", "host", "  spaced <tag> ");
        assert_eq!(framed, "<191>Dec 31 23:59:59 host   spaced <tag> ");
        assert!(!framed.ends_with('\n'));
    }

    #[test]
    fn test_system_clock_format() {
        let timestamp = SystemClock.syslog_timestamp();
        // e.g. "Mar 07 09:05:01"
        assert_eq!(timestamp.len(), 15);
        let bytes = timestamp.as_bytes();
        assert!(bytes[..3].iter().all(u8::is_ascii_alphabetic));
        assert_eq!(bytes[3], b' ');
        assert!(bytes[4..6].iter().all(u8::is_ascii_digit));
        assert_eq!(bytes[6], b' ');
        assert_eq!(bytes[9], b':');
        assert_eq!(bytes[12], b':');
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock("Jan 01 00:00:00".to_string());
        assert_eq!(clock.syslog_timestamp(), "Jan 01 00:00:00");
    }
}
