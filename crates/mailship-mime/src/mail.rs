//! Outgoing message construction and payload rendering.

use crate::boundary::{BoundarySource, RandomBoundary};
use crate::encoding::{encode_base64_wrapped, encode_subject};
use crate::error::{Error, Result};
use std::fmt::Write as _;
use std::io::Read;
use std::path::Path;

/// Body format of an outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyFormat {
    /// `text/plain` body.
    #[default]
    Plain,
    /// `text/html` body.
    Html,
}

impl BodyFormat {
    /// Returns the MIME content type for this format.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Plain => "text/plain",
            Self::Html => "text/html",
        }
    }
}

/// An accumulated attachment: display name plus content already
/// base64-encoded at attach time.
#[derive(Debug, Clone)]
struct Attachment {
    filename: String,
    content: String,
}

/// An outgoing mail message.
///
/// Mutable until handed to the transport; rendering does not consume it
/// and holds no network-visible identity.
#[derive(Debug, Clone, Default)]
pub struct Mail {
    /// Sender address. Must be non-empty by render time.
    pub from: String,
    /// Reply-To address. Defaults to the sender when unset.
    pub reply_to: Option<String>,
    /// Primary recipients.
    pub to: Vec<String>,
    /// Carbon-copy recipients.
    pub cc: Vec<String>,
    /// Blind-carbon-copy recipients.
    pub bcc: Vec<String>,
    /// Subject line. An empty subject emits no Subject header.
    pub subject: String,
    /// Body text.
    pub body: String,
    /// Body format.
    pub format: BodyFormat,
    attachments: Vec<Attachment>,
}

impl Mail {
    /// Creates a new message.
    #[must_use]
    pub fn new(
        from: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            subject: subject.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    /// Adds a primary recipient.
    #[must_use]
    pub fn to(mut self, recipient: impl Into<String>) -> Self {
        self.to.push(recipient.into());
        self
    }

    /// Adds a carbon-copy recipient.
    #[must_use]
    pub fn cc(mut self, recipient: impl Into<String>) -> Self {
        self.cc.push(recipient.into());
        self
    }

    /// Adds a blind-carbon-copy recipient.
    #[must_use]
    pub fn bcc(mut self, recipient: impl Into<String>) -> Self {
        self.bcc.push(recipient.into());
        self
    }

    /// Sets the Reply-To address.
    #[must_use]
    pub fn reply_to(mut self, address: impl Into<String>) -> Self {
        self.reply_to = Some(address.into());
        self
    }

    /// Sets the body format.
    #[must_use]
    pub const fn format(mut self, format: BodyFormat) -> Self {
        self.format = format;
        self
    }

    /// Returns the combined envelope recipient list, to then cc then bcc.
    #[must_use]
    pub fn recipients(&self) -> Vec<&str> {
        self.to
            .iter()
            .chain(&self.cc)
            .chain(&self.bcc)
            .map(String::as_str)
            .collect()
    }

    /// Attaches raw bytes under the given display name.
    ///
    /// The bytes are base64-encoded immediately; parts are appended in
    /// attach order and never removed or reordered.
    pub fn attach(&mut self, data: &[u8], filename: impl Into<String>) {
        self.attachments.push(Attachment {
            filename: filename.into(),
            content: encode_base64_wrapped(data),
        });
    }

    /// Reads a file from disk and attaches it under the given display name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AttachmentRead`] if the file cannot be read.
    pub fn attach_file(&mut self, path: impl AsRef<Path>, filename: impl Into<String>) -> Result<()> {
        let data = std::fs::read(path)?;
        self.attach(&data, filename);
        Ok(())
    }

    /// Reads an upload stream to its end and attaches the bytes under the
    /// given display name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AttachmentRead`] if reading the stream fails.
    pub fn attach_reader(
        &mut self,
        mut reader: impl Read,
        filename: impl Into<String>,
    ) -> Result<()> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.attach(&data, filename);
        Ok(())
    }

    /// Renders the message into a complete SMTP DATA payload.
    ///
    /// Draws a fresh random boundary token when attachments are present;
    /// repeated renders differ only in that token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSender`] if the sender address is empty.
    pub fn render(&self) -> Result<String> {
        self.render_with(&mut RandomBoundary)
    }

    /// Renders the message using the given boundary source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSender`] if the sender address is empty.
    pub fn render_with(&self, boundary: &mut impl BoundarySource) -> Result<String> {
        if self.from.is_empty() {
            return Err(Error::MissingSender);
        }

        let mut payload = String::new();
        let _ = write!(payload, "From: <{}>\r\n", self.from);

        let reply_to = self.reply_to.as_deref().unwrap_or(&self.from);
        let _ = write!(payload, "Reply-To: {reply_to}\r\n");

        if !self.to.is_empty() {
            let _ = write!(payload, "To: {}\r\n", self.to.join(","));
        }
        if !self.cc.is_empty() {
            let _ = write!(payload, "Cc: {}\r\n", self.cc.join(","));
        }
        if !self.bcc.is_empty() {
            let _ = write!(payload, "Bcc: {}\r\n", self.bcc.join(","));
        }

        payload.push_str(&encode_subject(&self.subject));

        let body = encode_base64_wrapped(self.body.as_bytes());
        if self.attachments.is_empty() {
            payload.push_str("MIME-Version: 1.0\r\n");
            let _ = write!(
                payload,
                "Content-Type: {}; charset=utf-8\r\n",
                self.format.content_type()
            );
            payload.push_str("Content-Transfer-Encoding: base64\r\n\r\n");
            payload.push_str(&body);
            payload.push_str("\r\n");
        } else {
            let token = boundary.boundary();
            payload.push_str("MIME-Version: 1.0\r\n");
            let _ = write!(payload, "Content-Type: multipart/mixed; boundary={token}\r\n");
            let _ = write!(payload, "\r\n--{token}\r\n");
            let _ = write!(
                payload,
                "Content-Type: {}; charset=utf-8\r\n",
                self.format.content_type()
            );
            payload.push_str("Content-Transfer-Encoding: base64\r\n\r\n");
            payload.push_str(&body);
            for part in &self.attachments {
                let _ = write!(payload, "\r\n--{token}\r\n");
                let _ = write!(
                    payload,
                    "Content-Type: application/octet-stream; name=\"{}\"\r\n",
                    part.filename
                );
                payload.push_str("Content-Transfer-Encoding: base64\r\n");
                let _ = write!(
                    payload,
                    "Content-Disposition: attachment; filename=\"{}\"\r\n\r\n",
                    part.filename
                );
                payload.push_str(&part.content);
            }
            let _ = write!(payload, "\r\n--{token}--\r\n");
        }

        Ok(payload)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::boundary::FixedBoundary;
    use crate::encoding::decode_base64;

    fn body_of(payload: &str) -> Vec<u8> {
        let (_, body) = payload.split_once("\r\n\r\n").unwrap();
        let stripped: String = body.chars().filter(|c| !c.is_whitespace()).collect();
        decode_base64(&stripped).unwrap()
    }

    #[test]
    fn missing_sender_fails() {
        let mail = Mail::new("", "Hi", "Hello");
        assert!(matches!(mail.render(), Err(Error::MissingSender)));
    }

    #[test]
    fn single_part_plain_text() {
        let mail = Mail::new("a@x.com", "Hi", "Hello").to("b@x.com");
        let payload = mail.render().unwrap();

        assert!(payload.starts_with("From: <a@x.com>\r\n"));
        assert!(payload.contains("Reply-To: a@x.com\r\n"));
        assert!(payload.contains("To: b@x.com\r\n"));
        assert!(payload.contains("Subject: =?utf-8?B?SGk=?=\r\n"));
        assert!(payload.contains("Content-Type: text/plain; charset=utf-8\r\n"));
        assert!(payload.contains("Content-Transfer-Encoding: base64\r\n"));
        assert!(!payload.contains("multipart/mixed"));
        assert_eq!(body_of(&payload), b"Hello");
    }

    #[test]
    fn html_format_changes_content_type() {
        let mail = Mail::new("a@x.com", "Hi", "<p>Hello</p>")
            .to("b@x.com")
            .format(BodyFormat::Html);
        let payload = mail.render().unwrap();
        assert!(payload.contains("Content-Type: text/html; charset=utf-8\r\n"));
    }

    #[test]
    fn reply_to_overrides_sender() {
        let mail = Mail::new("a@x.com", "Hi", "Hello")
            .to("b@x.com")
            .reply_to("other@x.com");
        let payload = mail.render().unwrap();
        assert!(payload.contains("Reply-To: other@x.com\r\n"));
    }

    #[test]
    fn empty_recipient_sets_omit_headers() {
        let mail = Mail::new("a@x.com", "Hi", "Hello");
        let payload = mail.render().unwrap();
        assert!(!payload.contains("\r\nTo:"));
        assert!(!payload.contains("\r\nCc:"));
        assert!(!payload.contains("\r\nBcc:"));
    }

    #[test]
    fn recipients_comma_joined_in_order() {
        let mail = Mail::new("a@x.com", "Hi", "Hello")
            .to("b@x.com")
            .to("c@x.com")
            .cc("d@x.com")
            .bcc("e@x.com");
        let payload = mail.render().unwrap();
        assert!(payload.contains("To: b@x.com,c@x.com\r\n"));
        assert!(payload.contains("Cc: d@x.com\r\n"));
        assert!(payload.contains("Bcc: e@x.com\r\n"));
        assert_eq!(
            mail.recipients(),
            vec!["b@x.com", "c@x.com", "d@x.com", "e@x.com"]
        );
    }

    #[test]
    fn empty_subject_emits_no_header() {
        let mail = Mail::new("a@x.com", "", "Hello").to("b@x.com");
        let payload = mail.render().unwrap();
        assert!(!payload.contains("Subject"));
    }

    #[test]
    fn multipart_with_one_attachment() {
        let mut mail = Mail::new("a@x.com", "Hi", "Hello").to("b@x.com");
        mail.attach(&[1, 2, 3], "f.bin");

        let payload = mail
            .render_with(&mut FixedBoundary("ABCDEF0123456789ABCDEF01".into()))
            .unwrap();

        assert!(payload.contains(
            "Content-Type: multipart/mixed; boundary=ABCDEF0123456789ABCDEF01\r\n"
        ));
        // body part + one attachment part + closing delimiter
        assert_eq!(payload.matches("--ABCDEF0123456789ABCDEF01\r\n").count(), 2);
        assert!(payload.ends_with("--ABCDEF0123456789ABCDEF01--\r\n"));
        assert!(payload.contains("Content-Disposition: attachment; filename=\"f.bin\"\r\n"));

        let part = payload
            .split("Content-Disposition: attachment; filename=\"f.bin\"\r\n\r\n")
            .nth(1)
            .unwrap();
        let encoded = part.split("\r\n--").next().unwrap();
        assert_eq!(decode_base64(encoded.trim()).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn attachments_keep_attach_order() {
        let mut mail = Mail::new("a@x.com", "Hi", "Hello").to("b@x.com");
        mail.attach(b"first", "one.txt");
        mail.attach(b"second", "two.txt");

        let payload = mail.render().unwrap();
        let one = payload.find("one.txt").unwrap();
        let two = payload.find("two.txt").unwrap();
        assert!(one < two);
    }

    #[test]
    fn attach_reader_streams_bytes() {
        let mut mail = Mail::new("a@x.com", "Hi", "Hello").to("b@x.com");
        mail.attach_reader(&b"stream data"[..], "up.bin").unwrap();
        let payload = mail.render().unwrap();
        assert!(payload.contains("filename=\"up.bin\""));
    }

    #[test]
    fn attach_file_missing_path_is_io_error() {
        let mut mail = Mail::new("a@x.com", "Hi", "Hello");
        let err = mail
            .attach_file("/nonexistent/f.bin", "f.bin")
            .unwrap_err();
        assert!(matches!(err, Error::AttachmentRead(_)));
    }

    #[test]
    fn renders_identical_except_boundary() {
        let mut mail = Mail::new("a@x.com", "Hi", "Hello").to("b@x.com");
        mail.attach(&[9, 9, 9], "f.bin");

        let first = mail.render_with(&mut FixedBoundary("AAAA0000AAAA0000AAAA0000".into()));
        let second = mail.render_with(&mut FixedBoundary("BBBB1111BBBB1111BBBB1111".into()));
        let second = second
            .unwrap()
            .replace("BBBB1111BBBB1111BBBB1111", "AAAA0000AAAA0000AAAA0000");
        assert_eq!(first.unwrap(), second);
    }

    #[test]
    fn random_renders_use_distinct_boundaries() {
        let mut mail = Mail::new("a@x.com", "Hi", "Hello").to("b@x.com");
        mail.attach(&[0], "f.bin");

        let extract = |payload: &str| {
            payload
                .split("boundary=")
                .nth(1)
                .unwrap()
                .chars()
                .take(24)
                .collect::<String>()
        };
        let a = extract(&mail.render().unwrap());
        let b = extract(&mail.render().unwrap());
        assert_ne!(a, b);
    }
}
