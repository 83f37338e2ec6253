//! One dial-to-termination SMTP session.
//!
//! The three delivery modes (relay, plain submission, encrypted submission)
//! all drive this single pipeline; the mailer parameterizes which optional
//! steps run.

use crate::address::Address;
use crate::command::Command;
use crate::error::{Error, Result};
use crate::reply::{Reply, ReplyCode};
use crate::stream::{SmtpStream, connect};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

/// Hostname announced in EHLO.
const EHLO_HOSTNAME: &str = "localhost";

/// An open SMTP session.
#[derive(Debug)]
pub struct Session {
    stream: SmtpStream,
}

impl Session {
    /// Dials the server, consumes the greeting, and sends EHLO.
    ///
    /// # Errors
    ///
    /// Returns an error if the dial fails, the greeting is not a success
    /// reply, or EHLO is rejected.
    pub async fn open(host: &str, port: u16) -> Result<Self> {
        debug!(host, port, "opening SMTP session");
        let mut session = Self {
            stream: connect(host, port).await?,
        };

        let greeting = session.read_reply().await?;
        if !greeting.is_success() {
            return Err(Error::smtp(greeting.code.as_u16(), greeting.message_text()));
        }

        session.ehlo().await?;
        Ok(session)
    }

    /// Negotiates STARTTLS and repeats EHLO on the encrypted stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects STARTTLS or the TLS
    /// handshake fails.
    pub async fn starttls(mut self, hostname: &str, insecure: bool) -> Result<Self> {
        self.expect_success(Command::StartTls).await?;
        debug!(hostname, insecure, "upgrading to TLS");
        self.stream = self.stream.upgrade_to_tls(hostname, insecure).await?;
        self.ehlo().await?;
        Ok(self)
    }

    /// Authenticates with AUTH PLAIN, sending the initial response inline.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the credentials.
    pub async fn auth_plain(&mut self, username: &str, password: &str) -> Result<()> {
        let credentials = format!("\0{username}\0{password}");
        let response = STANDARD.encode(credentials.as_bytes());
        self.expect_success(Command::AuthPlain { response }).await?;
        Ok(())
    }

    /// Opens the envelope with MAIL FROM.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the sender.
    pub async fn mail_from(&mut self, from: &Address) -> Result<()> {
        self.expect_success(Command::MailFrom { from: from.clone() })
            .await?;
        Ok(())
    }

    /// Adds one envelope recipient with RCPT TO.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the recipient.
    pub async fn rcpt_to(&mut self, to: &Address) -> Result<()> {
        self.expect_success(Command::RcptTo { to: to.clone() })
            .await?;
        Ok(())
    }

    /// Streams the payload as DATA content.
    ///
    /// Lines are normalized to CRLF, leading dots are byte-stuffed, and the
    /// terminating `.` line is appended.
    ///
    /// # Errors
    ///
    /// Returns an error if DATA is refused or the server rejects the
    /// message after the terminating line.
    pub async fn data(&mut self, payload: &[u8]) -> Result<()> {
        let reply = self.command(Command::Data).await?;
        if reply.code != ReplyCode::START_DATA {
            return Err(Error::smtp(reply.code.as_u16(), reply.message_text()));
        }

        for line in payload.split(|&b| b == b'\n') {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if line.first() == Some(&b'.') {
                self.stream.write_all(b".").await?;
            }
            self.stream.write_all(line).await?;
            self.stream.write_all(b"\r\n").await?;
        }
        self.stream.write_all(b".\r\n").await?;

        let reply = self.read_reply().await?;
        if !reply.is_success() {
            return Err(Error::smtp(reply.code.as_u16(), reply.message_text()));
        }
        Ok(())
    }

    /// Terminates the session with QUIT, expecting a 221 closing reply.
    ///
    /// # Errors
    ///
    /// Returns an [`Error::Smtp`] carrying the server's code and text for
    /// any other reply; the caller decides which completion codes to
    /// tolerate.
    pub async fn quit(mut self) -> Result<()> {
        let reply = self.command(Command::Quit).await?;
        if reply.code != ReplyCode::CLOSING {
            return Err(Error::smtp(reply.code.as_u16(), reply.message_text()));
        }
        Ok(())
    }

    async fn ehlo(&mut self) -> Result<()> {
        self.expect_success(Command::Ehlo {
            hostname: EHLO_HOSTNAME.to_string(),
        })
        .await?;
        Ok(())
    }

    async fn command(&mut self, cmd: Command) -> Result<Reply> {
        self.stream.write_all(&cmd.serialize()).await?;
        self.read_reply().await
    }

    async fn expect_success(&mut self, cmd: Command) -> Result<Reply> {
        let reply = self.command(cmd).await?;
        if !reply.is_success() {
            return Err(Error::smtp(reply.code.as_u16(), reply.message_text()));
        }
        Ok(reply)
    }

    async fn read_reply(&mut self) -> Result<Reply> {
        let mut lines = Vec::new();
        loop {
            let line = self.stream.read_line().await?;
            if line.is_empty() {
                continue;
            }

            let is_last = Reply::is_last_line(&line);
            lines.push(line);
            if is_last {
                break;
            }
        }

        Reply::parse(&lines)
    }
}
