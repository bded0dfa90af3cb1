// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Bounded FIFO between the directory tailer and the syslog sender.
//!
//! [`RingBuffer`] is the plain single-threaded structure: a fixed array of line slots, a read
//! cursor pointing at the most recently consumed slot and a write cursor pointing at the next
//! slot to fill. The buffer is full when both cursors meet, so one slot always stays free and
//! at most `capacity - 1` lines are held at once.
//!
//! [`SharedRingBuffer`] puts the ring behind a mutex and pairs it with two [`Notify`]s so the
//! producer parks while the ring is full and the consumer parks while it is empty. Both waits
//! give up as soon as the pipeline's cancellation token fires.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::errors::{BufferFull, Cancelled};

const MIN_CAPACITY: usize = 2;

#[derive(Debug)]
pub struct RingBuffer {
    slots: Vec<Option<String>>,
    read_pos: usize,
    write_pos: usize,
    is_empty: bool,
}

impl RingBuffer {
    /// Creates a ring with `capacity` slots. Capacities below 2 are raised to 2.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        Self {
            slots: vec![None; capacity],
            // "One before slot 0": the first fetch reads slot 0
            read_pos: capacity - 1,
            write_pos: 0,
            is_empty: true,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of lines waiting to be fetched.
    #[must_use]
    pub fn len(&self) -> usize {
        let capacity = self.capacity();
        (self.write_pos + capacity - self.read_pos - 1) % capacity
    }

    /// No free slot is left: the write cursor caught up with the last read slot.
    #[must_use]
    pub fn full(&self) -> bool {
        self.read_pos == self.write_pos
    }

    #[must_use]
    pub fn empty(&self) -> bool {
        self.is_empty
    }

    /// Stores `line` in the next free slot.
    ///
    /// # Errors
    ///
    /// Returns the line back inside [`BufferFull`] when [`RingBuffer::full`] is true.
    pub fn append(&mut self, line: String) -> Result<(), BufferFull> {
        if self.full() {
            return Err(BufferFull(line));
        }
        self.slots[self.write_pos] = Some(line);
        self.write_pos = (self.write_pos + 1) % self.capacity();
        self.is_empty = false;
        Ok(())
    }

    /// Removes and returns the oldest line, or `None` when the ring is empty.
    pub fn fetch(&mut self) -> Option<String> {
        if self.is_empty {
            return None;
        }
        let capacity = self.capacity();
        self.read_pos = (self.read_pos + 1) % capacity;
        let line = self.slots[self.read_pos].take();
        if (self.read_pos + 1) % capacity == self.write_pos {
            self.is_empty = true;
        }
        line
    }
}

struct Shared {
    ring: Mutex<RingBuffer>,
    not_empty: Notify,
    not_full: Notify,
}

/// Cheaply cloneable handle to a ring buffer shared by one producer and one consumer.
#[derive(Clone)]
pub struct SharedRingBuffer {
    inner: Arc<Shared>,
}

impl std::fmt::Debug for SharedRingBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ring = self.lock();
        f.debug_struct("SharedRingBuffer")
            .field("capacity", &ring.capacity())
            .field("len", &ring.len())
            .finish()
    }
}

impl SharedRingBuffer {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Shared {
                ring: Mutex::new(RingBuffer::new(capacity)),
                not_empty: Notify::new(),
                not_full: Notify::new(),
            }),
        }
    }

    // A panic while holding the lock cannot leave the cursors half-updated, so a poisoned
    // ring is still consistent.
    fn lock(&self) -> MutexGuard<'_, RingBuffer> {
        self.inner.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.lock().full()
    }

    /// Appends without waiting.
    ///
    /// # Errors
    ///
    /// Returns the line inside [`BufferFull`] when no slot is free.
    pub fn try_push(&self, line: String) -> Result<(), BufferFull> {
        let appended = self.lock().append(line);
        if appended.is_ok() {
            self.inner.not_empty.notify_one();
        }
        appended
    }

    /// Fetches without waiting.
    pub fn try_pop(&self) -> Option<String> {
        let fetched = self.lock().fetch();
        if fetched.is_some() {
            self.inner.not_full.notify_one();
        }
        fetched
    }

    /// Appends `line`, waiting for the consumer to free a slot while the ring is full.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if `cancel_token` has fired, before or while waiting for a slot.
    /// The line is dropped and never reaches the ring.
    pub async fn push(&self, line: String, cancel_token: &CancellationToken) -> Result<(), Cancelled> {
        let mut line = line;
        loop {
            match self.push_unless_cancelled(line, cancel_token) {
                Ok(()) => return Ok(()),
                Err(None) => return Err(Cancelled),
                Err(Some(BufferFull(rejected))) => line = rejected,
            }

            trace!("Ring buffer full, waiting for the sender to catch up");
            tokio::select! {
                () = self.inner.not_full.notified() => {}
                () = cancel_token.cancelled() => return Err(Cancelled),
            }
        }
    }

    // The token is checked under the lock: once `pop` sees the token fired and the ring
    // empty, no later append can slip in behind it.
    fn push_unless_cancelled(
        &self,
        line: String,
        cancel_token: &CancellationToken,
    ) -> Result<(), Option<BufferFull>> {
        let mut ring = self.lock();
        if cancel_token.is_cancelled() {
            return Err(None);
        }
        ring.append(line).map_err(Some)?;
        drop(ring);
        self.inner.not_empty.notify_one();
        Ok(())
    }

    /// Fetches the oldest line, waiting for the producer while the ring is empty.
    ///
    /// After `cancel_token` fires, buffered lines are still returned one by one; `None` means
    /// cancelled and empty.
    pub async fn pop(&self, cancel_token: &CancellationToken) -> Option<String> {
        loop {
            if let Some(line) = self.try_pop() {
                return Some(line);
            }

            tokio::select! {
                () = self.inner.not_empty.notified() => {}
                // A push may have landed between the failed fetch and the cancellation.
                () = cancel_token.cancelled() => return self.try_pop(),
            }
        }
    }
}
