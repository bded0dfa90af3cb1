// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Wires the directory tailer and the syslog sender around one shared ring buffer.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::{ForwarderConfig, Protocol};
use crate::errors::ForwarderError;
use crate::framer::{Clock, SystemClock};
use crate::ring_buffer::SharedRingBuffer;
use crate::sender::{SenderCounters, SenderStats, SyslogSender};
use crate::tailer::DirectoryTailer;
use crate::transport::{Transport, UdpTransport};

/// A configured, connected pipeline that has not started yet.
#[derive(Debug)]
pub struct Pipeline {
    config: ForwarderConfig,
    buffer: SharedRingBuffer,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
}

impl Pipeline {
    /// Validates `config` and connects the UDP socket to the collector.
    ///
    /// Nothing is started on failure.
    ///
    /// # Errors
    ///
    /// Returns [`ForwarderError::InvalidConfig`], [`ForwarderError::UnsupportedProtocol`] for
    /// TCP, [`ForwarderError::InvalidAddress`] or [`ForwarderError::Connect`].
    pub async fn init(config: ForwarderConfig) -> Result<Self, ForwarderError> {
        config.validate()?;

        let transport = match config.syslog.protocol {
            Protocol::Udp => {
                UdpTransport::connect(&config.syslog.server_ip, config.syslog.port)
                    .await
                    .inspect_err(|e| error!("Socket init failed: {}", e))?
            }
            protocol @ Protocol::Tcp => {
                error!("Socket init failed: {} transport is not implemented", protocol);
                return Err(ForwarderError::UnsupportedProtocol(protocol));
            }
        };
        info!("Forwarding syslog messages to udp://{}", transport.peer_addr());

        Ok(Self::with_transport(
            config,
            Arc::new(transport),
            Arc::new(SystemClock),
        ))
    }

    /// Builds a pipeline around caller-provided collaborators. `config` is not validated.
    #[must_use]
    pub fn with_transport(
        config: ForwarderConfig,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let buffer = SharedRingBuffer::new(config.buffer_capacity);
        Self {
            config,
            buffer,
            transport,
            clock,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ForwarderConfig {
        &self.config
    }

    /// Spawns the tailer and the sender on the current tokio runtime.
    #[must_use]
    pub fn start(self) -> PipelineHandle {
        let cancel_token = CancellationToken::new();

        let tailer = DirectoryTailer::new(
            self.config.watch_dir.clone(),
            self.buffer.clone(),
            self.config.scan_interval,
            cancel_token.clone(),
        );
        let sender = SyslogSender::new(
            &self.config.syslog,
            self.buffer,
            self.transport,
            self.clock,
            cancel_token.clone(),
        );
        let counters = sender.counters();

        let tailer_task = tokio::spawn(tailer.run());
        let sender_task = tokio::spawn(sender.run());
        debug!("Pipeline started");

        PipelineHandle {
            cancel_token,
            counters,
            tailer_task,
            sender_task,
        }
    }
}

/// Handle to the running pipeline workers.
///
/// Neither worker stops on its own: a directory failure only ends the tailer while the sender
/// keeps waiting for lines. [`PipelineHandle::shutdown`] stops both.
#[derive(Debug)]
pub struct PipelineHandle {
    cancel_token: CancellationToken,
    counters: Arc<SenderCounters>,
    tailer_task: JoinHandle<Result<(), ForwarderError>>,
    sender_task: JoinHandle<()>,
}

impl PipelineHandle {
    /// Signals both workers to stop. The sender drains lines already buffered first.
    pub fn shutdown(&self) {
        debug!("Pipeline shutdown requested");
        self.cancel_token.cancel();
    }

    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    #[must_use]
    pub fn stats(&self) -> SenderStats {
        self.counters.snapshot()
    }

    #[must_use]
    pub fn failed_sends(&self) -> u64 {
        self.counters.failed()
    }

    #[must_use]
    pub fn tailer_finished(&self) -> bool {
        self.tailer_task.is_finished()
    }

    #[must_use]
    pub fn sender_finished(&self) -> bool {
        self.sender_task.is_finished()
    }

    /// Waits for both workers to finish.
    ///
    /// # Errors
    ///
    /// Returns the tailer's error (e.g. [`ForwarderError::WatchDir`]) or
    /// [`ForwarderError::WorkerPanicked`] if a worker task failed.
    pub async fn wait(self) -> Result<(), ForwarderError> {
        let (tailer, sender) = tokio::join!(self.tailer_task, self.sender_task);
        sender.map_err(|e| ForwarderError::WorkerPanicked(e.to_string()))?;
        tailer.map_err(|e| ForwarderError::WorkerPanicked(e.to_string()))?
    }

    /// Like [`PipelineHandle::wait`] but aborts the workers once `timeout` expires.
    ///
    /// # Errors
    ///
    /// Returns [`ForwarderError::ShutdownTimeout`] on expiry, otherwise as [`PipelineHandle::wait`].
    pub async fn wait_timeout(self, timeout: Duration) -> Result<(), ForwarderError> {
        let abort_handles = [
            self.tailer_task.abort_handle(),
            self.sender_task.abort_handle(),
        ];
        if let Ok(result) = tokio::time::timeout(timeout, self.wait()).await {
            result
        } else {
            error!("Pipeline workers did not stop within {:?}, aborting", timeout);
            for handle in abort_handles {
                handle.abort();
            }
            Err(ForwarderError::ShutdownTimeout)
        }
    }

    /// Requests shutdown and waits at most `timeout` for both workers.
    ///
    /// # Errors
    ///
    /// As [`PipelineHandle::wait_timeout`].
    pub async fn shutdown_and_wait(self, timeout: Duration) -> Result<(), ForwarderError> {
        self.shutdown();
        let counters = Arc::clone(&self.counters);
        let result = self.wait_timeout(timeout).await;
        let stats = counters.snapshot();
        info!(
            "Pipeline stopped: {} lines sent, {} failed before shutdown",
            stats.sent, stats.failed
        );
        result
    }
}
