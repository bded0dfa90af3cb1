// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Syslog facility and severity codes and the PRI value derived from them.
//!
//! Both codes accept either their numeric value or their conventional keyword, so
//! `SYSLOG_FACILITY=local0` and `SYSLOG_FACILITY=16` configure the same facility.

use std::fmt;
use std::str::FromStr;

const FACILITY_NAMES: [&str; 24] = [
    "kern", "user", "mail", "daemon", "auth", "syslog", "lpr", "news", "uucp", "cron",
    "authpriv", "ftp", "ntp", "audit", "alert", "clock", "local0", "local1", "local2", "local3",
    "local4", "local5", "local6", "local7",
];

const SEVERITY_NAMES: [&str; 8] = [
    "emerg", "alert", "crit", "err", "warning", "notice", "info", "debug",
];

/// Source category of a syslog message, `0..=23`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Facility(u8);

impl Facility {
    pub const KERN: Facility = Facility(0);
    pub const USER: Facility = Facility(1);
    pub const MAIL: Facility = Facility(2);
    pub const DAEMON: Facility = Facility(3);
    pub const AUTH: Facility = Facility(4);
    pub const SYSLOG: Facility = Facility(5);
    pub const LPR: Facility = Facility(6);
    pub const NEWS: Facility = Facility(7);
    pub const UUCP: Facility = Facility(8);
    pub const CRON: Facility = Facility(9);
    pub const AUTHPRIV: Facility = Facility(10);
    pub const FTP: Facility = Facility(11);
    pub const NTP: Facility = Facility(12);
    pub const AUDIT: Facility = Facility(13);
    pub const ALERT: Facility = Facility(14);
    pub const CLOCK: Facility = Facility(15);
    pub const LOCAL0: Facility = Facility(16);
    pub const LOCAL1: Facility = Facility(17);
    pub const LOCAL2: Facility = Facility(18);
    pub const LOCAL3: Facility = Facility(19);
    pub const LOCAL4: Facility = Facility(20);
    pub const LOCAL5: Facility = Facility(21);
    pub const LOCAL6: Facility = Facility(22);
    pub const LOCAL7: Facility = Facility(23);

    #[must_use]
    pub fn code(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        FACILITY_NAMES[usize::from(self.0)]
    }
}

impl Default for Facility {
    fn default() -> Self {
        Self::USER
    }
}

impl TryFrom<u8> for Facility {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        if usize::from(code) < FACILITY_NAMES.len() {
            Ok(Facility(code))
        } else {
            Err(format!("facility {code} out of range 0-23"))
        }
    }
}

impl FromStr for Facility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_code(s, &FACILITY_NAMES, "facility").map(Facility)
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Importance of a syslog message, `0..=7`. Lower is more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Severity(u8);

impl Severity {
    pub const EMERGENCY: Severity = Severity(0);
    pub const ALERT: Severity = Severity(1);
    pub const CRITICAL: Severity = Severity(2);
    pub const ERROR: Severity = Severity(3);
    pub const WARNING: Severity = Severity(4);
    pub const NOTICE: Severity = Severity(5);
    pub const INFO: Severity = Severity(6);
    pub const DEBUG: Severity = Severity(7);

    #[must_use]
    pub fn code(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        SEVERITY_NAMES[usize::from(self.0)]
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::EMERGENCY
    }
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        if usize::from(code) < SEVERITY_NAMES.len() {
            Ok(Severity(code))
        } else {
            Err(format!("severity {code} out of range 0-7"))
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_code(s, &SEVERITY_NAMES, "severity").map(Severity)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// PRI value carried in angle brackets at the start of every message: `facility * 8 + severity`.
#[must_use]
pub fn pri(facility: Facility, severity: Severity) -> u8 {
    facility.0 * 8 + severity.0
}

fn parse_code(s: &str, names: &[&str], kind: &str) -> Result<u8, String> {
    let trimmed = s.trim();
    if let Ok(code) = trimmed.parse::<u8>() {
        if usize::from(code) < names.len() {
            return Ok(code);
        }
        return Err(format!("{kind} {code} out of range 0-{}", names.len() - 1));
    }

    let lowered = trimmed.to_ascii_lowercase();
    names
        .iter()
        .position(|name| *name == lowered)
        .and_then(|index| u8::try_from(index).ok())
        .ok_or_else(|| format!("unknown {kind} '{trimmed}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pri_user_emergency() {
        assert_eq!(pri(Facility::USER, Severity::EMERGENCY), 8);
    }

    #[test]
    fn test_pri_auth_critical() {
        assert_eq!(pri(Facility::AUTH, Severity::CRITICAL), 34);
    }

    #[test]
    fn test_pri_bounds() {
        assert_eq!(pri(Facility::KERN, Severity::EMERGENCY), 0);
        assert_eq!(pri(Facility::LOCAL7, Severity::DEBUG), 191);
    }

    #[test]
    fn test_facility_from_number_and_name() {
        assert_eq!("16".parse::<Facility>(), Ok(Facility::LOCAL0));
        assert_eq!("local0".parse::<Facility>(), Ok(Facility::LOCAL0));
        assert_eq!(" Daemon ".parse::<Facility>(), Ok(Facility::DAEMON));
    }

    #[test]
    fn test_facility_rejects_out_of_range() {
        assert!("24".parse::<Facility>().is_err());
        assert!(Facility::try_from(24).is_err());
        assert!("local8".parse::<Facility>().is_err());
    }

    #[test]
    fn test_severity_from_number_and_name() {
        assert_eq!("2".parse::<Severity>(), Ok(Severity::CRITICAL));
        assert_eq!("warning".parse::<Severity>(), Ok(Severity::WARNING));
        assert_eq!("DEBUG".parse::<Severity>(), Ok(Severity::DEBUG));
    }

    #[test]
    fn test_severity_rejects_out_of_range() {
        assert!("8".parse::<Severity>().is_err());
        assert!(Severity::try_from(8).is_err());
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn test_facility_constants_match_keywords() {
        let all = [
            Facility::KERN,
            Facility::USER,
            Facility::MAIL,
            Facility::DAEMON,
            Facility::AUTH,
            Facility::SYSLOG,
            Facility::LPR,
            Facility::NEWS,
            Facility::UUCP,
            Facility::CRON,
            Facility::AUTHPRIV,
            Facility::FTP,
            Facility::NTP,
            Facility::AUDIT,
            Facility::ALERT,
            Facility::CLOCK,
            Facility::LOCAL0,
            Facility::LOCAL1,
            Facility::LOCAL2,
            Facility::LOCAL3,
            Facility::LOCAL4,
            Facility::LOCAL5,
            Facility::LOCAL6,
            Facility::LOCAL7,
        ];
        for (code, facility) in all.into_iter().enumerate() {
            assert_eq!(usize::from(facility.code()), code);
            assert_eq!(facility.name().parse::<Facility>(), Ok(facility));
        }
    }

    #[test]
    fn test_display_uses_keyword() {
        assert_eq!(Facility::LOCAL7.to_string(), "local7");
        assert_eq!(Severity::INFO.to_string(), "info");
    }
}
