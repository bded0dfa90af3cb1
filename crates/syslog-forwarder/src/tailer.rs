// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Producer side of the pipeline: sweeps the watch directory and feeds the ring buffer.
//!
//! Every sweep reads every regular file from its first byte, so lines already forwarded by a
//! previous sweep are forwarded again. No read offsets are kept between sweeps.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace, warn};

use crate::errors::{Cancelled, ForwarderError};
use crate::ring_buffer::SharedRingBuffer;
use crate::util::to_log_line;

/// Why a sweep ended early
#[derive(Debug)]
pub enum SweepError {
    /// The watch directory could not be listed
    Directory(io::Error),
    Cancelled,
}

impl From<Cancelled> for SweepError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

/// Repeatedly reads every file of a directory into the ring buffer.
#[derive(Debug)]
pub struct DirectoryTailer {
    watch_dir: Option<PathBuf>,
    buffer: SharedRingBuffer,
    scan_interval: Duration,
    cancel_token: CancellationToken,
}

impl DirectoryTailer {
    #[must_use]
    pub fn new(
        watch_dir: Option<PathBuf>,
        buffer: SharedRingBuffer,
        scan_interval: Duration,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            watch_dir,
            buffer,
            scan_interval,
            cancel_token,
        }
    }

    /// Main loop. Runs until cancelled.
    ///
    /// Returns immediately when no directory is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ForwarderError::WatchDir`] when the directory cannot be listed. The tailer
    /// stops for good in that case; the sender is left running.
    pub async fn run(self) -> Result<(), ForwarderError> {
        let Some(dir) = self.watch_dir.as_deref() else {
            warn!("No watch directory configured, directory tailer not started");
            return Ok(());
        };

        debug!("Directory tailer started on {}", dir.display());

        while !self.cancel_token.is_cancelled() {
            match self.sweep(dir).await {
                Ok(pushed) => trace!("Sweep of {} pushed {} lines", dir.display(), pushed),
                Err(SweepError::Cancelled) => break,
                Err(SweepError::Directory(source)) => {
                    error!("Failed to open watch directory {}: {}", dir.display(), source);
                    return Err(ForwarderError::WatchDir {
                        path: dir.to_path_buf(),
                        source,
                    });
                }
            }

            tokio::select! {
                () = tokio::time::sleep(self.scan_interval) => {}
                () = self.cancel_token.cancelled() => break,
            }
        }

        debug!("Directory tailer stopped");
        Ok(())
    }

    /// Reads every regular file of `dir` once, in file name order, and returns the number of
    /// lines pushed. Files that cannot be opened or read are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Directory`] if `dir` cannot be listed and
    /// [`SweepError::Cancelled`] if cancelled while waiting on a full buffer.
    pub async fn sweep(&self, dir: &Path) -> Result<usize, SweepError> {
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(SweepError::Directory)?;

        let mut paths = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => paths.push(entry.path()),
                Ok(None) => break,
                Err(e) => {
                    warn!("Stopped listing {} early: {}", dir.display(), e);
                    break;
                }
            }
        }
        paths.sort();

        let mut pushed = 0;
        for path in paths {
            pushed += self.forward_file(&path).await?;
        }
        Ok(pushed)
    }

    async fn forward_file(&self, path: &Path) -> Result<usize, Cancelled> {
        let file = match tokio::fs::metadata(path).await {
            Ok(metadata) if metadata.is_file() => match File::open(path).await {
                Ok(file) => file,
                Err(e) => {
                    trace!("Skipping {}: {}", path.display(), e);
                    return Ok(0);
                }
            },
            Ok(_) => {
                trace!("Skipping {}: not a regular file", path.display());
                return Ok(0);
            }
            Err(e) => {
                trace!("Skipping {}: {}", path.display(), e);
                return Ok(0);
            }
        };

        let mut reader = BufReader::new(file);
        let mut raw = Vec::new();
        let mut pushed = 0;
        loop {
            raw.clear();
            match reader.read_until(b'\n', &mut raw).await {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    trace!("Stopped reading {}: {}", path.display(), e);
                    break;
                }
            }

            let without_newline = raw.strip_suffix(b"\n").unwrap_or(&raw[..]);
            let Some(line) = to_log_line(without_newline) else {
                continue;
            };

            if self.buffer.is_full() {
                debug!("Ring buffer full, directory tailer waiting");
            }
            self.buffer.push(line, &self.cancel_token).await?;
            pushed += 1;
        }

        trace!("Forwarded {} lines from {}", pushed, path.display());
        Ok(pushed)
    }
}
