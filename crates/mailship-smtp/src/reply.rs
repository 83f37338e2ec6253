//! SMTP reply codes and multi-line reply parsing.

use crate::error::{Error, Result};

/// SMTP reply code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReplyCode(u16);

impl ReplyCode {
    /// 220 Service ready
    pub const SERVICE_READY: Self = Self(220);
    /// 221 Service closing transmission channel
    pub const CLOSING: Self = Self(221);
    /// 250 Requested mail action okay, completed
    pub const OK: Self = Self(250);
    /// 354 Start mail input
    pub const START_DATA: Self = Self(354);

    /// Creates a reply code.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns true for a success code (2xx).
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns true for an intermediate code (3xx).
    #[must_use]
    pub const fn is_intermediate(self) -> bool {
        self.0 >= 300 && self.0 < 400
    }
}

impl std::fmt::Display for ReplyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A parsed SMTP reply.
///
/// Replies may be single-line (`250 OK`) or multi-line, where every line
/// but the last uses a `-` separator (`250-line`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Reply code.
    pub code: ReplyCode,
    /// Message lines with code and separator stripped.
    pub message: Vec<String>,
}

impl Reply {
    /// Parses a reply from its raw response lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the reply is empty or malformed.
    pub fn parse(lines: &[String]) -> Result<Self> {
        let first = lines
            .first()
            .ok_or_else(|| Error::Protocol("empty reply".into()))?;

        let code = first
            .get(0..3)
            .and_then(|s| s.parse::<u16>().ok())
            .ok_or_else(|| Error::Protocol(format!("invalid reply line: {first}")))?;

        let mut message = Vec::with_capacity(lines.len());
        for line in lines {
            match line.len() {
                0..3 => return Err(Error::Protocol(format!("malformed reply line: {line}"))),
                3 => message.push(String::new()),
                _ => message.push(line.get(4..).unwrap_or_default().to_string()),
            }
        }

        Ok(Self {
            code: ReplyCode::new(code),
            message,
        })
    }

    /// Returns true if a raw line terminates a multi-line reply.
    #[must_use]
    pub fn is_last_line(line: &str) -> bool {
        line.len() == 3 || (line.len() >= 4 && line.as_bytes()[3] == b' ')
    }

    /// Returns true for a success reply (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code.is_success()
    }

    /// Returns the full message as a single string.
    #[must_use]
    pub fn message_text(&self) -> String {
        self.message.join("\n")
    }
}
