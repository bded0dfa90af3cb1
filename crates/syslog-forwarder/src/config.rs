// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_BUFFER_CAPACITY, DEFAULT_LOG_LEVEL, DEFAULT_SCAN_INTERVAL, DEFAULT_SENDER_ID,
    DEFAULT_SERVER_IP, DEFAULT_SYSLOG_PORT,
};
use crate::errors::ForwarderError;
use crate::priority::{pri, Facility, Severity};
use crate::util::parse_sender_id;

/// Transport used to reach the syslog collector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    #[default]
    Udp,
    /// Accepted by the configuration but rejected when the pipeline connects.
    Tcp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Udp => f.write_str("udp"),
            Self::Tcp => f.write_str("tcp"),
        }
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "udp" | "1" => Ok(Self::Udp),
            "tcp" | "2" => Ok(Self::Tcp),
            other => Err(format!("unknown protocol '{other}'")),
        }
    }
}

/// Settings describing how every forwarded line is tagged and where it is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyslogConfig {
    /// Identifier of this forwarder instance
    pub id: u32,
    /// Syslog facility (e.g., user, local0)
    pub facility: Facility,
    /// Syslog severity applied to every line
    pub severity: Severity,
    /// IPv4 or IPv6 literal of the collector (e.g., "127.0.0.1")
    pub server_ip: String,
    /// Collector port (e.g., 514)
    pub port: u16,
    pub protocol: Protocol,
    /// Tag written between the timestamp and the message
    pub sender_id: String,
    /// Optional language tag of the forwarded content
    pub lang: Option<String>,
}

impl Default for SyslogConfig {
    fn default() -> Self {
        Self {
            id: 0,
            facility: Facility::USER,
            severity: Severity::EMERGENCY,
            server_ip: DEFAULT_SERVER_IP.to_string(),
            port: DEFAULT_SYSLOG_PORT,
            protocol: Protocol::Udp,
            sender_id: DEFAULT_SENDER_ID.to_string(),
            lang: None,
        }
    }
}

impl SyslogConfig {
    /// PRI value derived from the facility and severity
    #[must_use]
    pub fn pri(&self) -> u8 {
        pri(self.facility, self.severity)
    }
}

/// Configuration for the forwarding pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwarderConfig {
    pub syslog: SyslogConfig,
    /// Directory whose files are forwarded. The tailer does nothing when unset.
    pub watch_dir: Option<PathBuf>,
    /// Number of slots in the ring buffer
    pub buffer_capacity: usize,
    /// Pause between two sweeps of the watch directory
    pub scan_interval: Duration,
    /// Log level (e.g., trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            syslog: SyslogConfig::default(),
            watch_dir: None,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            scan_interval: DEFAULT_SCAN_INTERVAL,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ForwarderConfig {
    /// Create configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ForwarderError::InvalidConfig`] if a variable holds an unparsable value or the
    /// resulting configuration fails [`ForwarderConfig::validate`].
    pub fn from_env() -> Result<Self, ForwarderError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source, falling back to defaults.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ForwarderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let syslog_defaults = defaults.syslog;

        let syslog = SyslogConfig {
            id: parse_var(&lookup, "SYSLOG_ID")?.unwrap_or(syslog_defaults.id),
            facility: parse_var(&lookup, "SYSLOG_FACILITY")?.unwrap_or(syslog_defaults.facility),
            severity: parse_var(&lookup, "SYSLOG_SEVERITY")?.unwrap_or(syslog_defaults.severity),
            server_ip: lookup("SYSLOG_SERVER_IP")
                .map(|ip| ip.trim().to_string())
                .unwrap_or(syslog_defaults.server_ip),
            port: parse_var(&lookup, "SYSLOG_PORT")?.unwrap_or(syslog_defaults.port),
            protocol: parse_var(&lookup, "SYSLOG_PROTOCOL")?.unwrap_or(syslog_defaults.protocol),
            sender_id: lookup("SYSLOG_SENDER_ID")
                .and_then(|val| parse_sender_id(&val))
                .unwrap_or(syslog_defaults.sender_id),
            lang: lookup("SYSLOG_LANG").filter(|lang| !lang.trim().is_empty()),
        };

        let config = Self {
            syslog,
            watch_dir: lookup("SYSLOG_WATCH_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            buffer_capacity: parse_var(&lookup, "SYSLOG_BUFFER_CAPACITY")?
                .unwrap_or(defaults.buffer_capacity),
            scan_interval: parse_var::<u64, _>(&lookup, "SYSLOG_SCAN_INTERVAL_MS")?
                .map_or(defaults.scan_interval, Duration::from_millis),
            log_level: lookup("SYSLOG_LOG_LEVEL")
                .map(|val| val.to_lowercase())
                .unwrap_or(defaults.log_level),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`ForwarderError::InvalidConfig`] describing the first invalid field.
    pub fn validate(&self) -> Result<(), ForwarderError> {
        // One slot is always kept free, so a single slot could never hold a line
        if self.buffer_capacity < 2 {
            return Err(ForwarderError::InvalidConfig(format!(
                "buffer capacity must be at least 2, got {}",
                self.buffer_capacity
            )));
        }

        if self.syslog.port == 0 {
            return Err(ForwarderError::InvalidConfig(
                "syslog port must be greater than 0".to_string(),
            ));
        }

        if self.syslog.server_ip.trim().is_empty() {
            return Err(ForwarderError::InvalidConfig(
                "SYSLOG_SERVER_IP cannot be empty".to_string(),
            ));
        }

        if parse_sender_id(&self.syslog.sender_id).as_deref() != Some(self.syslog.sender_id.as_str())
        {
            return Err(ForwarderError::InvalidConfig(format!(
                "Invalid sender id '{}'",
                self.syslog.sender_id
            )));
        }

        if self.scan_interval.is_zero() {
            return Err(ForwarderError::InvalidConfig(
                "scan interval must be greater than 0".to_string(),
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(ForwarderError::InvalidConfig(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ForwarderError>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ForwarderError::InvalidConfig(format!("{key}={raw}: {e}"))),
    }
}
