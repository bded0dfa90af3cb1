// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Consumer side of the pipeline: drains the ring buffer and ships one datagram per line.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::config::SyslogConfig;
use crate::framer::{frame_message, Clock};
use crate::ring_buffer::SharedRingBuffer;
use crate::transport::Transport;

/// Delivery counters, written by the sender and readable from any task.
#[derive(Debug, Default)]
pub struct SenderCounters {
    sent: AtomicU64,
    failed: AtomicU64,
}

impl SenderCounters {
    #[must_use]
    pub fn snapshot(&self) -> SenderStats {
        SenderStats {
            sent: self.sent.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }

    #[must_use]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SenderStats {
    pub sent: u64,
    pub failed: u64,
}

/// Pulls lines from the ring buffer, frames them and sends them to the collector.
///
/// A failed send is counted and the line dropped; it is never retried or requeued.
#[derive(Debug)]
pub struct SyslogSender {
    buffer: SharedRingBuffer,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    pri: u8,
    sender_id: String,
    counters: Arc<SenderCounters>,
    cancel_token: CancellationToken,
}

impl SyslogSender {
    /// The PRI value is fixed here from `config` for the lifetime of the sender.
    #[must_use]
    pub fn new(
        config: &SyslogConfig,
        buffer: SharedRingBuffer,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            buffer,
            transport,
            clock,
            pri: config.pri(),
            sender_id: config.sender_id.clone(),
            counters: Arc::new(SenderCounters::default()),
            cancel_token,
        }
    }

    #[must_use]
    pub fn counters(&self) -> Arc<SenderCounters> {
        Arc::clone(&self.counters)
    }

    /// Main loop. Returns once cancelled and the buffer is drained.
    pub async fn run(self) {
        debug!("Syslog sender started with PRI {}", self.pri);

        while let Some(line) = self.buffer.pop(&self.cancel_token).await {
            self.send_line(&line).await;
        }

        let stats = self.counters.snapshot();
        debug!(
            "Syslog sender stopped: {} lines sent, {} failed",
            stats.sent, stats.failed
        );
    }

    async fn send_line(&self, line: &str) {
        let timestamp = self.clock.syslog_timestamp();
        let message = frame_message(self.pri, &timestamp, &self.sender_id, line);

        match self.transport.send(message.as_bytes()).await {
            Ok(_) => {
                trace!("Sent syslog message: {}", message);
                self.counters.sent.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                let failed = self.counters.failed.fetch_add(1, Ordering::Relaxed) + 1;
                warn!("Failed to send syslog message ({} failures so far): {}", failed, e);
            }
        }
    }
}
