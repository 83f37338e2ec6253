//! Error types for payload construction.

use std::io;

/// Result type alias for payload construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Payload construction error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The sender address was empty when the payload was rendered.
    #[error("sender address is empty")]
    MissingSender,

    /// Reading attachment bytes from a file or stream failed.
    ///
    /// This is an I/O failure from the attachment source, distinct from
    /// any encoding step.
    #[error("failed to read attachment: {0}")]
    AttachmentRead(#[from] io::Error),
}
