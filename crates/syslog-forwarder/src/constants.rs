// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

/// Number of line slots in the ring buffer. One slot is always kept free.
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// Pause between two sweeps of the watched directory.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(1);

pub const DEFAULT_SERVER_IP: &str = "127.0.0.1";
pub const DEFAULT_SYSLOG_PORT: u16 = 514;
pub const DEFAULT_SENDER_ID: &str = "admin";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// `strftime` pattern of the RFC 3164 timestamp, e.g. `Jan 01 00:00:00`.
pub const SYSLOG_TIME_FORMAT: &str = "%b %d %T";

/// Upper bound for the graceful shutdown of the pipeline workers.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);
