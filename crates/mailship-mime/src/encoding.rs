//! Base64 and RFC 2047 encoding helpers for mail payloads.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Maximum length of an encoded base64 line (RFC 2045).
const MAX_LINE_LENGTH: usize = 76;

/// Number of source characters per encoded-word subject chunk.
///
/// Keeps each folded `Subject:` line within header length conventions
/// even for four-byte UTF-8 code points.
const SUBJECT_CHUNK_CHARS: usize = 13;

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes Base64 data.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(data)
}

/// Encodes data as Base64 hard-wrapped at 76 characters with CRLF breaks,
/// per MIME transfer-encoding convention.
#[must_use]
pub fn encode_base64_wrapped(data: &[u8]) -> String {
    let encoded = STANDARD.encode(data);
    let mut result = String::with_capacity(encoded.len() + encoded.len() / MAX_LINE_LENGTH * 2);

    for chunk in encoded.as_bytes().chunks(MAX_LINE_LENGTH) {
        // chunks() only yields valid ASCII slices of a base64 string
        result.push_str(std::str::from_utf8(chunk).unwrap_or_default());
        if chunk.len() == MAX_LINE_LENGTH {
            result.push_str("\r\n");
        }
    }

    result
}

/// Splits text into UTF-8 code-point chunks of at most `length` characters.
#[must_use]
pub fn split_utf8(text: &str, length: usize) -> Vec<String> {
    let mut result = Vec::new();
    let mut buffer = String::new();

    for (i, c) in text.chars().enumerate() {
        buffer.push(c);
        if i % length == length - 1 {
            result.push(std::mem::take(&mut buffer));
        }
    }

    if !buffer.is_empty() {
        result.push(buffer);
    }

    result
}

/// Encodes a subject as folded RFC 2047 encoded-word lines.
///
/// The subject is split into chunks of at most 13 source characters and
/// each chunk becomes one `=?utf-8?B?…?=` word on its own physical line,
/// so arbitrary Unicode subjects stay within header line-length limits.
/// Returns an empty string for an empty subject (no header emitted).
#[must_use]
pub fn encode_subject(subject: &str) -> String {
    if subject.is_empty() {
        return String::new();
    }

    let mut result = String::from("Subject:");
    for chunk in split_utf8(subject, SUBJECT_CHUNK_CHARS) {
        result.push_str(" =?utf-8?B?");
        result.push_str(&encode_base64(chunk.as_bytes()));
        result.push_str("?=\r\n");
    }

    result
}
