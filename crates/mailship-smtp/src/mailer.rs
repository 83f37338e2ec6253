//! Configured SMTP endpoint and the send dispatch.

use crate::address::Address;
use crate::error::Error;
use crate::session::Session;
use mailship_mime::Mail;
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::{debug, warn};

/// Authentication mode for a configured endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// No authentication; unauthenticated relay.
    #[default]
    None,
    /// AUTH PLAIN username/password exchange.
    Plain,
}

/// Errors surfaced by [`Mailer`] operations.
///
/// Each variant marks the session stage that failed first; there is no
/// retry, and every failure is returned as a value.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// Payload rendering failed (missing sender, attachment I/O).
    #[error(transparent)]
    Render(#[from] mailship_mime::Error),

    /// Authenticated path selected but username or password is empty.
    #[error("username or password is not set")]
    MissingCredentials,

    /// Dialing the endpoint (or the greeting/EHLO/STARTTLS exchange) failed.
    #[error("dial '{host}:{port}' failed: {source}")]
    Dial {
        /// Endpoint host.
        host: String,
        /// Endpoint port.
        port: u16,
        /// Underlying protocol error.
        #[source]
        source: Error,
    },

    /// The connectivity probe window elapsed before the dial completed.
    #[error("'{host}:{port}' connection refused, timed out after {timeout:?}")]
    Timeout {
        /// Endpoint host.
        host: String,
        /// Endpoint port.
        port: u16,
        /// Probe window.
        timeout: Duration,
    },

    /// The server rejected the sender, or the sender address is malformed.
    #[error("sender rejected: {0}")]
    SenderRejected(#[source] Error),

    /// The server rejected a recipient; remaining recipients were not
    /// submitted.
    #[error("recipient '{address}' rejected: {source}")]
    RecipientRejected {
        /// The rejected recipient.
        address: String,
        /// Underlying protocol error.
        #[source]
        source: Error,
    },

    /// The AUTH PLAIN exchange failed.
    #[error("authentication failed: {0}")]
    Auth(#[source] Error),

    /// The DATA transfer or session termination failed.
    #[error("data transfer failed: {0}")]
    DataTransfer(#[source] Error),
}

/// A configured SMTP endpoint.
///
/// Immutable for the life of a send; independent messages may be sent
/// concurrently from separate tasks, each send owning its own connection.
#[derive(Debug, Clone, Default)]
pub struct Mailer {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Username for AUTH PLAIN.
    pub username: String,
    /// Password for AUTH PLAIN.
    pub password: String,
    /// Request a STARTTLS upgrade after connecting.
    pub starttls: bool,
    /// Skip certificate validation when upgrading.
    pub insecure: bool,
    /// Authentication mode.
    pub auth: AuthMode,
}

impl Mailer {
    /// Creates an unauthenticated relay configuration.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Sets AUTH PLAIN credentials and switches to authenticated mode.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self.auth = AuthMode::Plain;
        self
    }

    /// Requests a STARTTLS upgrade for authenticated sends.
    #[must_use]
    pub const fn starttls(mut self, enabled: bool) -> Self {
        self.starttls = enabled;
        self
    }

    /// Skips certificate validation during the STARTTLS upgrade.
    #[must_use]
    pub const fn insecure(mut self, enabled: bool) -> Self {
        self.insecure = enabled;
        self
    }

    /// Connectivity probe: a dial attempt racing a timer.
    ///
    /// Whichever completes first determines the outcome. Best-effort
    /// diagnostic, independent of [`Mailer::send`].
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Timeout`] if the window elapses first, or
    /// [`SendError::Dial`] if the dial completes with a failure.
    pub async fn ping(&self, timeout: Duration) -> Result<(), SendError> {
        let addr = format!("{}:{}", self.host, self.port);
        match tokio::time::timeout(timeout, TcpStream::connect(&addr)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(SendError::Dial {
                host: self.host.clone(),
                port: self.port,
                source: e.into(),
            }),
            Err(_) => Err(SendError::Timeout {
                host: self.host.clone(),
                port: self.port,
                timeout,
            }),
        }
    }

    /// Eagerly validates the configuration: endpoint reachability, then
    /// credential completeness for the authenticated mode.
    ///
    /// Credentials are re-checked lazily at send time regardless.
    ///
    /// # Errors
    ///
    /// Returns the probe failure, or [`SendError::MissingCredentials`] if
    /// the authenticated mode lacks a username or password.
    pub async fn validate(&self, timeout: Duration) -> Result<(), SendError> {
        self.ping(timeout).await?;
        if self.auth == AuthMode::Plain && !self.has_credentials() {
            return Err(SendError::MissingCredentials);
        }
        Ok(())
    }

    /// Sends one message, driving exactly one session to completion.
    ///
    /// Session selection: no authentication ⇒ unauthenticated relay;
    /// authentication without upgrade ⇒ plain submission; authentication
    /// with upgrade ⇒ encrypted submission.
    ///
    /// # Errors
    ///
    /// Returns the first failure encountered; see [`SendError`].
    pub async fn send(&self, mail: &Mail) -> Result<(), SendError> {
        match (self.auth, self.starttls) {
            (AuthMode::None, _) => self.submit(mail, false, false).await,
            (AuthMode::Plain, upgrade) => self.submit(mail, true, upgrade).await,
        }
    }

    /// The shared dial → auth → envelope → data → terminate pipeline.
    async fn submit(&self, mail: &Mail, authenticate: bool, upgrade: bool) -> Result<(), SendError> {
        if authenticate && !self.has_credentials() {
            return Err(SendError::MissingCredentials);
        }

        // Materialize the payload and envelope before any network I/O.
        let payload = mail.render()?;
        let from = Address::new(&mail.from).map_err(SendError::SenderRejected)?;
        let mut recipients = Vec::new();
        for addr in mail.recipients() {
            recipients.push(Address::new(addr).map_err(|e| SendError::RecipientRejected {
                address: addr.to_string(),
                source: e,
            })?);
        }

        let dial_err = |source| SendError::Dial {
            host: self.host.clone(),
            port: self.port,
            source,
        };

        let mut session = Session::open(&self.host, self.port).await.map_err(dial_err)?;
        if upgrade {
            session = session
                .starttls(&self.host, self.insecure)
                .await
                .map_err(dial_err)?;
        }
        if authenticate {
            session
                .auth_plain(&self.username, &self.password)
                .await
                .map_err(SendError::Auth)?;
        }

        session
            .mail_from(&from)
            .await
            .map_err(SendError::SenderRejected)?;
        for to in &recipients {
            session
                .rcpt_to(to)
                .await
                .map_err(|e| SendError::RecipientRejected {
                    address: to.as_str().to_string(),
                    source: e,
                })?;
        }

        session
            .data(payload.as_bytes())
            .await
            .map_err(SendError::DataTransfer)?;

        match session.quit().await {
            Ok(()) => {}
            // Some servers answer QUIT with "250 2.0.0 ..." after accepting
            // the mail; that completion is absorbed. The literal prefix
            // check is kept for interoperability.
            Err(Error::Smtp { code: 250, message }) if message.starts_with("2.0.0") => {
                warn!(message, "tolerated non-closing QUIT reply");
            }
            Err(e) => return Err(SendError::DataTransfer(e)),
        }

        debug!(host = %self.host, recipients = recipients.len(), "message sent");
        Ok(())
    }

    fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mailship_mime::Mail;

    #[tokio::test]
    async fn missing_credentials_fails_before_dial() {
        // The host is unroutable; reaching the dial would hang or error
        // differently, so a MissingCredentials result proves the early check.
        let mailer = Mailer::new("mail.invalid", 587).credentials("user", "");
        let mail = Mail::new("a@x.com", "Hi", "Hello").to("b@x.com");

        let err = mailer.send(&mail).await.unwrap_err();
        assert!(matches!(err, SendError::MissingCredentials));
    }

    #[tokio::test]
    async fn missing_credentials_with_starttls() {
        let mailer = Mailer::new("mail.invalid", 587)
            .credentials("", "secret")
            .starttls(true);
        let mail = Mail::new("a@x.com", "Hi", "Hello").to("b@x.com");

        let err = mailer.send(&mail).await.unwrap_err();
        assert!(matches!(err, SendError::MissingCredentials));
    }

    #[tokio::test]
    async fn empty_sender_fails_without_network() {
        let mailer = Mailer::new("mail.invalid", 25);
        let mail = Mail::new("", "Hi", "Hello").to("b@x.com");

        let err = mailer.send(&mail).await.unwrap_err();
        assert!(matches!(
            err,
            SendError::Render(mailship_mime::Error::MissingSender)
        ));
    }

    #[tokio::test]
    async fn malformed_recipient_fails_without_network() {
        let mailer = Mailer::new("mail.invalid", 25);
        let mail = Mail::new("a@x.com", "Hi", "Hello").to("not-an-address");

        let err = mailer.send(&mail).await.unwrap_err();
        match err {
            SendError::RecipientRejected { address, .. } => assert_eq!(address, "not-an-address"),
            other => panic!("expected RecipientRejected, got {other}"),
        }
    }
}
