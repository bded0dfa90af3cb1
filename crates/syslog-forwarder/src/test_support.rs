// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;
use std::io;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::transport::Transport;

/// Records every datagram and fails the writes whose zero-based attempt index is listed.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    fail_on: HashSet<usize>,
    attempts: Mutex<usize>,
    sent: Mutex<Vec<String>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(attempts: &[usize]) -> Self {
        Self {
            fail_on: attempts.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, datagram: &[u8]) -> io::Result<usize> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            let current = *attempts;
            *attempts += 1;
            current
        };
        if self.fail_on.contains(&attempt) {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        }
        self.sent
            .lock()
            .unwrap()
            .push(String::from_utf8_lossy(datagram).into_owned());
        Ok(datagram.len())
    }
}
