// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Forwards the lines of a watched log directory to a remote syslog collector.
//!
//! A [`tailer::DirectoryTailer`] sweeps the directory and pushes every non-empty line into a
//! bounded [`ring_buffer::SharedRingBuffer`]. A [`sender::SyslogSender`] drains the buffer,
//! frames each line as `<PRI>TIMESTAMP SENDER_ID LINE` and ships it as one UDP datagram.
//! [`pipeline::Pipeline`] wires both workers together and owns their shutdown.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod batch;
pub mod config;
pub mod constants;
pub mod errors;
pub mod framer;
pub mod pipeline;
pub mod priority;
pub mod ring_buffer;
pub mod sender;
pub mod tailer;
#[cfg(test)]
mod test_support;
pub mod transport;
pub mod util;

pub use config::{ForwarderConfig, Protocol, SyslogConfig};
pub use errors::ForwarderError;
pub use pipeline::{Pipeline, PipelineHandle};
