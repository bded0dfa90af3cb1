// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Utility functions for syslog field validation and for splitting file content into log lines.

/// Parses and validates the sender identifier placed between the timestamp and the message.
///
/// A valid sender identifier must:
/// - Not be empty or contain only whitespace
/// - Contain only printable ASCII characters and no spaces, since a space ends the field
///
/// Whitespace is automatically trimmed from the input.
///
/// # Examples
///
/// ```
/// use syslog_forwarder::util::parse_sender_id;
///
/// assert_eq!(parse_sender_id("admin"), Some("admin".to_string()));
/// assert_eq!(parse_sender_id(" web-01 "), Some("web-01".to_string()));
/// assert_eq!(parse_sender_id("two words"), None);
/// assert_eq!(parse_sender_id(""), None);
/// ```
pub fn parse_sender_id(sender_id: &str) -> Option<String> {
    let trimmed = sender_id.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(invalid_char) = trimmed.chars().find(|ch| !ch.is_ascii_graphic()) {
        tracing::error!(
            "SYSLOG_SENDER_ID contains invalid character {:?} in '{}'. Only printable ASCII without spaces is allowed. Ignoring sender id.",
            invalid_char,
            trimmed
        );
        return None;
    }

    Some(trimmed.to_string())
}

/// Splits raw file content into forwardable lines.
///
/// Lines are separated by `\n`; a trailing `\r` is dropped and empty lines are skipped.
/// Invalid UTF-8 is replaced rather than rejected so one bad byte does not hide a whole file.
pub fn split_lines(content: &[u8]) -> impl Iterator<Item = String> + '_ {
    content.split(|b| *b == b'\n').filter_map(to_log_line)
}

/// Converts one raw line (without its `\n`) into a log line, or `None` when it is empty.
pub fn to_log_line(raw: &[u8]) -> Option<String> {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    if raw.is_empty() {
        return None;
    }
    Some(String::from_utf8_lossy(raw).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sender_id_valid() {
        assert_eq!(parse_sender_id("admin"), Some("admin".to_string()));
        assert_eq!(parse_sender_id("host-01.example"), Some("host-01.example".to_string()));
        assert_eq!(parse_sender_id("app[42]:"), Some("app[42]:".to_string()));
    }

    #[test]
    fn test_parse_sender_id_with_whitespace() {
        assert_eq!(parse_sender_id("  admin  "), Some("admin".to_string()));
        assert_eq!(parse_sender_id("\tadmin\n"), Some("admin".to_string()));
    }

    #[test]
    fn test_parse_sender_id_empty() {
        assert_eq!(parse_sender_id(""), None);
        assert_eq!(parse_sender_id("   "), None);
    }

    #[test]
    fn test_parse_sender_id_invalid_characters() {
        assert_eq!(parse_sender_id("my app"), None);
        assert_eq!(parse_sender_id("tab\tbed"), None);
        assert_eq!(parse_sender_id("héllo"), None);
    }

    #[test]
    fn test_split_lines_skips_blank_lines() {
        let lines: Vec<String> = split_lines(b"\na\n\nb").collect();
        assert_eq!(lines, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_split_lines_strips_carriage_return() {
        let lines: Vec<String> = split_lines(b"first\r\n\r\nsecond\r\n").collect();
        assert_eq!(lines, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_split_lines_keeps_whitespace_only_lines() {
        let lines: Vec<String> = split_lines(b"  \n").collect();
        assert_eq!(lines, vec!["  ".to_string()]);
    }

    #[test]
    fn test_to_log_line_replaces_invalid_utf8() {
        let line = to_log_line(b"bad \xff byte").unwrap();
        assert_eq!(line, "bad \u{fffd} byte");
    }
}
