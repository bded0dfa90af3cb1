// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Datagram transport to the syslog collector.
//!
//! Protocol: one UDP packet = one syslog message. The socket is connected once at startup so
//! every later send is a plain write to the fixed destination.

use std::fmt::Debug;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use async_trait::async_trait;
use tokio::net::UdpSocket;
use tracing::debug;

use crate::errors::ForwarderError;

/// Fire-and-forget datagram sink. Implementations must not retry.
#[async_trait]
pub trait Transport: Debug + Send + Sync {
    /// Sends one datagram, returning the number of bytes written.
    async fn send(&self, datagram: &[u8]) -> io::Result<usize>;
}

/// UDP socket connected to the syslog collector
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl UdpTransport {
    /// Binds an ephemeral local port and connects it to `server_ip:port`.
    ///
    /// `server_ip` must be an IPv4 or IPv6 literal; the local socket uses the same family.
    ///
    /// # Errors
    ///
    /// Returns [`ForwarderError::InvalidAddress`] if `server_ip` is not an IP literal and
    /// [`ForwarderError::Connect`] if the socket cannot be created or connected.
    pub async fn connect(server_ip: &str, port: u16) -> Result<Self, ForwarderError> {
        let ip: IpAddr = server_ip
            .trim()
            .parse()
            .map_err(|e| ForwarderError::InvalidAddress(format!("{server_ip}: {e}")))?;
        let peer = SocketAddr::new(ip, port);

        let local: SocketAddr = match ip {
            IpAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            IpAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(local)
            .await
            .map_err(ForwarderError::Connect)?;
        socket.connect(peer).await.map_err(ForwarderError::Connect)?;

        debug!("UDP socket {:?} connected to {}", socket.local_addr().ok(), peer);
        Ok(Self { socket, peer })
    }

    /// Address of the syslog collector
    #[must_use]
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Get the local address
    ///
    /// # Errors
    ///
    /// Returns an error if the socket address cannot be queried.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn send(&self, datagram: &[u8]) -> io::Result<usize> {
        self.socket.send(datagram).await
    }
}
